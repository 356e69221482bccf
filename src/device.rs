//! Device-side UAC2 microphone function for Linux USB gadgets.
//!
//! The function consists of an AudioControl interface, whose class-specific
//! requests are routed to the [`Microphone`], and an AudioStreaming interface
//! with an isochronous IN endpoint fed once per millisecond.
//!
//! Only the standard interface and endpoint descriptors are registered. The
//! class-specific AudioControl topology (clock, terminals, feature unit), the
//! interface association and a zero-bandwidth streaming alternate setting are
//! not described, so host audio drivers do not bind to this function. It
//! serves as a transport harness that drives the control and streaming paths
//! from a real UDC.

use futures::{future, FutureExt};
use std::{
    fmt,
    io::{Error, ErrorKind, Result},
    sync::Arc,
    time::Duration,
};
use tokio::{
    task::JoinSet,
    time::{interval, MissedTickBehavior},
};

use usb_gadget::function::{
    custom::{Custom, Endpoint, EndpointDirection, EndpointSender, Event, Interface, TransferType},
    Handle,
};

use crate::{
    AltSetting, Class, ControlRequest, Entities, FrameQueue, MicConfig, Microphone, ITF_NUM_AUDIO_CONTROL,
    TICKS_PER_SECOND,
};

const TICK_PERIOD: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

const REQ_TYPE_MASK: u8 = 0x60;
const REQ_TYPE_CLASS: u8 = 0x20;
const REQ_RECIPIENT_MASK: u8 = 0x1f;
const REQ_RECIPIENT_INTERFACE: u8 = 0x01;

/// Gadget-specific settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Interface name.
    pub name: String,
    /// Streaming format used while the host has the function enabled.
    pub stream_alt: AltSetting,
    /// Capacity of the software frame queue in bytes.
    pub queue_capacity: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new("UAC2")
    }
}

impl DeviceConfig {
    /// Streams 16-bit samples under the given interface name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_string(),
            stream_alt: AltSetting::Bits16,
            queue_capacity: FrameQueue::DEFAULT_CAPACITY,
        }
    }

    /// Sets the streaming format.
    #[must_use]
    pub fn with_stream_alt(mut self, alt: AltSetting) -> Self {
        self.stream_alt = alt;
        self
    }

    /// Sets the frame queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

/// UAC2 microphone device-side function.
pub struct Uac2Function {
    name: String,
    entities: Arc<Entities>,
    task: JoinSet<Result<()>>,
}

impl fmt::Debug for Uac2Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Uac2Function").field("name", &self.name).finish()
    }
}

impl Uac2Function {
    /// Creates the function and starts its task.
    ///
    /// The returned handle must be added to a gadget configuration.
    pub fn new(config: MicConfig, device: DeviceConfig) -> Result<(Self, Handle)> {
        let mic = Microphone::new(config, FrameQueue::new(device.queue_capacity))
            .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;
        let entities = mic.entities().clone();

        let (ep_tx, ep_tx_dir) = EndpointDirection::device_to_host();

        let (ep0, handle) = Custom::builder()
            .with_interface(Interface::new(Class::AUDIO_CONTROL.into(), device.name.as_str()))
            .with_interface(
                Interface::new(Class::AUDIO_STREAMING.into(), device.name.as_str())
                    .with_endpoint(Endpoint::custom(ep_tx_dir, TransferType::Isochronous)),
            )
            .build();

        let mut task = JoinSet::new();
        task.spawn(Self::task(ep0, ep_tx, mic, device.stream_alt));

        Ok((Self { name: device.name, entities, task }, handle))
    }

    /// Entity state, shared with the running function.
    pub fn entities(&self) -> &Arc<Entities> {
        &self.entities
    }

    /// Waits until the function terminates.
    pub async fn wait(&mut self) -> Result<()> {
        match self.task.join_next().await {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Err(Error::new(ErrorKind::BrokenPipe, "the USB function has already terminated")),
        }
    }

    async fn task(
        mut ep0: Custom, mut ep_tx: EndpointSender, mut mic: Microphone<FrameQueue>, stream_alt: AltSetting,
    ) -> Result<()> {
        ep0.status().bound().await?;
        tracing::debug!("function bound");

        let mut ticker = interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let status = ep0.status();

            let send_task = match mic.transport().front() {
                Some(frame) => ep_tx.send_async(frame.to_vec()).left_future(),
                None => future::pending().right_future(),
            };

            tokio::select! {
                () = status.unbound() => {
                    tracing::debug!("function unbound");
                    break;
                }
                _ = ticker.tick() => {
                    mic.on_produce_tick();
                }
                res = send_task => match res {
                    Ok(()) => {
                        mic.transport_mut().pop();
                    }
                    Err(err) => {
                        tracing::warn!("send error: {err}");
                        mic.transport_mut().clear();
                    }
                },
                res = ep0.wait_event() => {
                    res?;
                    Self::handle_event(&mut ep0, &mut mic, stream_alt)?;
                }
            }
        }

        Ok(())
    }

    fn handle_event(ep0: &mut Custom, mic: &mut Microphone<FrameQueue>, stream_alt: AltSetting) -> Result<()> {
        match ep0.event()? {
            Event::Enable => {
                tracing::debug!("function enabled");
                mic.on_set_interface(stream_alt as u8).map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;
            }
            Event::Disable => {
                tracing::debug!("function disabled");
                mic.on_close_endpoint();
                mic.on_set_interface(AltSetting::Stopped as u8)
                    .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;
            }
            Event::Suspend => tracing::debug!("bus suspended"),
            Event::Resume => tracing::debug!("bus resumed"),
            Event::SetupDeviceToHost(req) => {
                let ctrl_req = req.ctrl_req();
                tracing::trace!("outgoing control request: {ctrl_req:?}");
                let request =
                    ControlRequest::from_setup(ctrl_req.request, ctrl_req.value, ctrl_req.index, ctrl_req.length);
                if !is_audio_control_request(ctrl_req.request_type, &request) {
                    tracing::warn!("unknown control request {:x}", ctrl_req.request);
                    req.halt()?;
                    return Ok(());
                }

                match mic.on_get(&request, ctrl_req.length.into()) {
                    Ok(data) => {
                        if let Err(err) = req.send(&data) {
                            tracing::warn!("control response send error: {err}");
                        }
                    }
                    Err(_) => req.halt()?,
                }
            }
            Event::SetupHostToDevice(req) => {
                let ctrl_req = req.ctrl_req();
                tracing::trace!("incoming control request: {ctrl_req:?}");
                let request =
                    ControlRequest::from_setup(ctrl_req.request, ctrl_req.value, ctrl_req.index, ctrl_req.length);
                if !is_audio_control_request(ctrl_req.request_type, &request) {
                    tracing::warn!("unknown control request {:x}", ctrl_req.request);
                    req.halt()?;
                    return Ok(());
                }

                // The data stage is acknowledged once received, so refuse
                // everything detectable from the setup packet beforehand.
                match mic.check_set(&request) {
                    Ok(len) if len == usize::from(ctrl_req.length) => {
                        let data = req.recv_all()?;
                        if let Err(err) = mic.on_set(&request, &data) {
                            tracing::warn!("SET {request} acknowledged but not applied: {err}");
                        }
                    }
                    Ok(len) => {
                        tracing::warn!("SET {request} rejected: expected {len} bytes");
                        req.halt()?;
                    }
                    Err(err) => {
                        tracing::warn!("SET {request} rejected: {err}");
                        req.halt()?;
                    }
                }
            }
            _ => (),
        }

        Ok(())
    }
}

fn is_audio_control_request(request_type: u8, request: &ControlRequest) -> bool {
    request_type & REQ_TYPE_MASK == REQ_TYPE_CLASS
        && request_type & REQ_RECIPIENT_MASK == REQ_RECIPIENT_INTERFACE
        && request.interface == ITF_NUM_AUDIO_CONTROL
}
