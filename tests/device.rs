#![cfg(feature = "device")]

use std::time::Duration;
use tokio::time::sleep;
use usb_gadget::{default_udc, Config, Gadget, Id, Strings};

use uac2_mic::{
    device::{DeviceConfig, Uac2Function},
    AltSetting, Class, MicConfig,
};

mod util;
use util::*;

const VID: u16 = 0xcafe;
const PID: u16 = 0x4002;

const DEVICE_CLASS: Class = Class::new(0xef, 0x02, 0x01);

#[tokio::test]
#[ignore = "USB device controller and host required"]
async fn device() {
    init_log();
    usb_gadget::remove_all().expect("cannot remove all USB gadgets");
    sleep(Duration::from_secs(1)).await;

    println!("Creating UAC2 function...");
    let (mut mic, hnd) =
        Uac2Function::new(MicConfig::new(), DeviceConfig::new("UAC2").with_stream_alt(AltSetting::Bits24))
            .expect("cannot create function");

    println!("Registering gadget...");
    let udc = default_udc().expect("cannot get UDC");
    let gadget = Gadget::new(DEVICE_CLASS.into(), Id::new(VID, PID), Strings::new("uac2-mic", "Mono Mic", "123456"))
        .with_config(Config::new("config").with_function(hnd));
    let reg = gadget.bind(&udc).expect("cannot bind to UDC");
    assert!(reg.is_attached());

    println!("Streaming for 10 seconds...");
    let entities = mic.entities().clone();
    tokio::select! {
        res = mic.wait() => panic!("function terminated: {res:?}"),
        () = sleep(Duration::from_secs(10)) => (),
    }

    println!("Rate: {} Hz, volume: {}", entities.clock.rate_hz(), entities.feature.volume());
    drop(reg);
}
