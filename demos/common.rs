#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const VID: u16 = 0xcafe;
pub const PID: u16 = 0x4002;

pub const MANUFACTURER: &str = "uac2-mic";
pub const PRODUCT: &str = "Mono Mic";
pub const SERIAL: &str = "123456";

pub fn init_log() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        tracing_subscriber::registry().with(fmt::layer()).with(EnvFilter::from_default_env()).init();
        tracing_log::LogTracer::init().unwrap();
    });
}
