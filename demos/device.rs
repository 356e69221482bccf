//! Device-side example.
//!
//! Binds the function to the default UDC and streams the tone. Host audio
//! drivers do not bind without class-specific descriptors, so this exercises
//! the gadget transport only.

use std::time::Duration;
use tokio::time::sleep;
use usb_gadget::{default_udc, Config, Gadget, Id, Strings};

use uac2_mic::device::{DeviceConfig, Uac2Function};
use uac2_mic::{Class, MicConfig};

mod common;
use common::*;

/// Miscellaneous device class with interface association descriptors.
const DEVICE_CLASS: Class = Class::new(0xef, 0x02, 0x01);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_log();

    usb_gadget::remove_all().expect("cannot remove all USB gadgets");
    sleep(Duration::from_secs(1)).await;

    println!("Creating UAC2 function...");
    let (mut mic, hnd) =
        Uac2Function::new(MicConfig::new(), DeviceConfig::new("UAC2")).expect("cannot create function");

    println!("Registering gadget...");
    let udc = default_udc().expect("cannot get UDC");
    let gadget = Gadget::new(DEVICE_CLASS.into(), Id::new(VID, PID), Strings::new(MANUFACTURER, PRODUCT, SERIAL))
        .with_config(Config::new("config").with_function(hnd));
    let reg = gadget.bind(&udc).expect("cannot bind to UDC");
    assert!(reg.is_attached());

    println!("Streaming, press Ctrl+C to stop");
    let entities = mic.entities().clone();
    loop {
        tokio::select! {
            res = mic.wait() => {
                println!("Function terminated: {res:?}");
                break;
            }
            () = sleep(Duration::from_secs(5)) => {
                println!(
                    "alt={:?} rate={} Hz muted={} volume={:.1} dB",
                    entities.alt_setting(),
                    entities.clock.rate_hz(),
                    entities.feature.is_muted(),
                    f32::from(entities.feature.volume()) / 256.0
                );
            }
        }
    }

    drop(reg);
}
