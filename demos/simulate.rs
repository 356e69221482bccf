//! Drives the microphone with synthetic host events, without any USB stack.

use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

use uac2_mic::{
    ControlRequest, EntityId, FrameQueue, MicConfig, Microphone, CS_SAM_FREQ_CONTROL, CUR, FU_VOLUME_CONTROL, RANGE,
};

mod common;
use common::*;

const TICKS: usize = 3_000;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_log();

    let mut mic = Microphone::new(MicConfig::new(), FrameQueue::default()).expect("invalid config");

    let rates = mic.on_get(&ControlRequest::new(EntityId::ClockSource, CS_SAM_FREQ_CONTROL, RANGE), 64).unwrap();
    println!("Sample rate range: {:02x?}", &rates[..]);

    mic.on_set(&ControlRequest::new(EntityId::ClockSource, CS_SAM_FREQ_CONTROL, CUR), &44_100u32.to_le_bytes())
        .expect("rate rejected");
    mic.on_set(&ControlRequest::new(EntityId::FeatureUnit, FU_VOLUME_CONTROL, CUR), &(-6 * 256i16).to_le_bytes())
        .expect("volume rejected");
    mic.on_set_interface(1).expect("alt setting rejected");

    let mut ticker = interval(Duration::from_millis(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    let start = Instant::now();
    let mut total = 0;
    for n in 0..TICKS {
        ticker.tick().await;
        mic.on_produce_tick();
        while let Some(frame) = mic.transport_mut().pop() {
            total += frame.len();
        }
        if n == TICKS / 2 {
            println!("Switching to 24-bit");
            mic.on_close_endpoint();
            mic.on_set_interface(2).expect("alt setting rejected");
        }
    }

    let elapsed = start.elapsed().as_secs_f32();
    println!("Produced {total} bytes in {elapsed:.2} seconds: {:.1} kB/s", total as f32 / elapsed / 1000.);

    mic.on_set_interface(0).expect("alt setting rejected");
}
