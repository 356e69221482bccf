//! Class-specific control requests.

use std::fmt;

use crate::{
    entity::EntityId, error::ControlError, CS_CLOCK_VALID_CONTROL, CS_SAM_FREQ_CONTROL, CUR, FU_MUTE_CONTROL,
    FU_VOLUME_CONTROL, RANGE, TE_CONNECTOR_CONTROL,
};

/// Request attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Current setting.
    Cur,
    /// Parameter block of sub-ranges.
    Range,
}

impl RequestKind {
    /// Request kind of a `bRequest` code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            CUR => Some(Self::Cur),
            RANGE => Some(Self::Range),
            _ => None,
        }
    }
}

/// Controls exposed by the entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSelector {
    /// Clock source sampling frequency.
    SamplingFrequency,
    /// Clock source validity.
    ClockValid,
    /// Feature unit mute.
    Mute,
    /// Feature unit volume.
    Volume,
    /// Input terminal connector.
    Connector,
}

impl ControlSelector {
    /// Resolves a selector code, whose meaning depends on the entity type.
    pub const fn resolve(entity: EntityId, selector: u8) -> Option<Self> {
        match (entity, selector) {
            (EntityId::ClockSource, CS_SAM_FREQ_CONTROL) => Some(Self::SamplingFrequency),
            (EntityId::ClockSource, CS_CLOCK_VALID_CONTROL) => Some(Self::ClockValid),
            (EntityId::FeatureUnit, FU_MUTE_CONTROL) => Some(Self::Mute),
            (EntityId::FeatureUnit, FU_VOLUME_CONTROL) => Some(Self::Volume),
            (EntityId::InputTerminal, TE_CONNECTOR_CONTROL) => Some(Self::Connector),
            _ => None,
        }
    }
}

/// Control request addressed to an entity of the AudioControl interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlRequest {
    /// `bRequest` code.
    pub request: u8,
    /// Control selector, high byte of `wValue`.
    pub selector: u8,
    /// Channel number, low byte of `wValue`.
    pub channel: u8,
    /// Entity id, high byte of `wIndex`.
    pub entity: u8,
    /// Interface number, low byte of `wIndex`.
    pub interface: u8,
    /// `wLength` of the data stage.
    pub length: u16,
}

impl ControlRequest {
    /// Creates a request for the entity's control.
    pub const fn new(entity: EntityId, selector: u8, request: u8) -> Self {
        Self { request, selector, channel: 0, entity: entity.id(), interface: 0, length: 0 }
    }

    /// Decodes the fields of a setup packet.
    pub const fn from_setup(request: u8, value: u16, index: u16, length: u16) -> Self {
        Self {
            request,
            selector: (value >> 8) as u8,
            channel: value as u8,
            entity: (index >> 8) as u8,
            interface: index as u8,
            length,
        }
    }

    /// Sets the channel number.
    #[must_use]
    pub const fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Sets `wLength`.
    #[must_use]
    pub const fn with_length(mut self, length: u16) -> Self {
        self.length = length;
        self
    }

    /// Resolves entity, control and kind, failing for anything not implemented.
    pub fn target(&self) -> Result<(EntityId, ControlSelector, RequestKind), ControlError> {
        let entity = EntityId::from_id(self.entity).ok_or(ControlError::UnknownEntity(self.entity))?;
        let unsupported =
            ControlError::Unsupported { entity: self.entity, selector: self.selector, request: self.request };
        let selector = ControlSelector::resolve(entity, self.selector).ok_or_else(|| unsupported.clone())?;
        let kind = RequestKind::from_code(self.request).ok_or(unsupported)?;
        Ok((entity, selector, kind))
    }
}

impl fmt::Display for ControlRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match EntityId::from_id(self.entity) {
            Some(entity) => write!(f, "ent={entity}")?,
            None => write!(f, "ent=0x{:02X}(UNKNOWN)", self.entity)?,
        }
        write!(
            f,
            " sel=0x{:02X} ch={} req=0x{:02X} wLen={}",
            self.selector, self.channel, self.request, self.length
        )
    }
}
