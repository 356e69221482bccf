//! Entity request router.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    entity::{Entities, EntityId},
    error::ControlError,
    request::{ControlRequest, ControlSelector, RequestKind},
};

/// Builds the response to a GET request, truncated to `max_len`.
pub(crate) fn handle_get(entities: &Entities, req: &ControlRequest, max_len: usize) -> Result<Bytes, ControlError> {
    let (entity, selector, kind) = req.target()?;
    check_channel(entities, entity, req.channel)?;

    let mut buf = BytesMut::new();
    match (selector, kind) {
        (ControlSelector::SamplingFrequency, RequestKind::Range) => {
            let rates = entities.clock.supported_rates();
            buf.put_u16_le(rates.len() as u16);
            for &rate in rates {
                buf.put_u32_le(rate);
                buf.put_u32_le(rate);
                buf.put_u32_le(0);
            }
        }
        (ControlSelector::SamplingFrequency, RequestKind::Cur) => buf.put_u32_le(entities.clock.rate_hz()),
        (ControlSelector::ClockValid, RequestKind::Cur) => buf.put_u8(entities.clock.is_valid().into()),
        (ControlSelector::Mute, RequestKind::Cur) => buf.put_u8(entities.feature.is_muted().into()),
        (ControlSelector::Volume, RequestKind::Cur) => buf.put_i16_le(entities.feature.volume()),
        (ControlSelector::Volume, RequestKind::Range) => {
            let range = entities.feature.range();
            buf.put_u16_le(1);
            buf.put_i16_le(range.min);
            buf.put_i16_le(range.max);
            buf.put_i16_le(range.res);
        }
        (ControlSelector::Connector, RequestKind::Cur) => {
            let terminal = entities.terminal;
            buf.put_u8(terminal.channel_count());
            buf.put_u32_le(terminal.channel_config());
            buf.put_u8(terminal.name_index());
        }
        _ => return Err(unsupported(req)),
    }

    buf.truncate(max_len);
    Ok(buf.freeze())
}

/// Validates the SET request without applying it.
///
/// Returns the control and the payload length its data stage must have.
pub(crate) fn check_set(entities: &Entities, req: &ControlRequest) -> Result<(ControlSelector, usize), ControlError> {
    let (entity, selector, kind) = req.target()?;
    check_channel(entities, entity, req.channel)?;

    match (selector, kind) {
        (ControlSelector::SamplingFrequency, RequestKind::Cur) => Ok((selector, 4)),
        (ControlSelector::Mute, RequestKind::Cur) => Ok((selector, 1)),
        (ControlSelector::Volume, RequestKind::Cur) => Ok((selector, 2)),
        _ => Err(unsupported(req)),
    }
}

/// Applies a SET request.
pub(crate) fn handle_set(entities: &Entities, req: &ControlRequest, data: &[u8]) -> Result<(), ControlError> {
    let (selector, expected) = check_set(entities, req)?;
    if data.len() != expected {
        return Err(ControlError::Length { expected, actual: data.len() });
    }

    match selector {
        ControlSelector::SamplingFrequency => {
            let rate = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
            entities.clock.set_rate_hz(rate)?;
            tracing::debug!("new sample rate: {rate} Hz");
        }
        ControlSelector::Mute => {
            let muted = data[0] != 0;
            entities.feature.set_muted(muted);
            tracing::debug!("set mute: {muted}");
        }
        ControlSelector::Volume => {
            let requested = i16::from_le_bytes([data[0], data[1]]);
            let volume = entities.feature.set_volume(requested);
            if volume != requested {
                tracing::debug!("set volume: {volume} (clamped from {requested})");
            } else {
                tracing::debug!("set volume: {volume}");
            }
        }
        ControlSelector::ClockValid | ControlSelector::Connector => return Err(unsupported(req)),
    }

    Ok(())
}

/// Feature unit controls exist for the master channel 0 and each logical
/// channel. Clock and terminal controls ignore the channel number.
fn check_channel(entities: &Entities, entity: EntityId, channel: u8) -> Result<(), ControlError> {
    if entity == EntityId::FeatureUnit && channel > entities.terminal.channel_count() {
        return Err(ControlError::InvalidChannel(channel));
    }
    Ok(())
}

fn unsupported(req: &ControlRequest) -> ControlError {
    ControlError::Unsupported { entity: req.entity, selector: req.selector, request: req.request }
}
