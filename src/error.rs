//! Our error types for the ADP5055.

use thiserror::Error;

use crate::{config::PropertyKey, field::FieldOverflow, voltage::OutOfRange};

pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Custom error type for ADP5055 register access and configuration.
#[derive(Error, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: core::fmt::Debug> {
    #[error("Register bus error")]
    Bus(E),
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    OutOfRange(#[from] OutOfRange),
    #[error("Register address {0:#04x} is not accessible")]
    InvalidAddress(u8),
}

/// Problems with the supplied configuration, detected before anything is written to the device.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    #[error("{property} value {value} exceeds the field maximum of {max}")]
    FieldOverflow {
        property: PropertyKey,
        value: u32,
        max: u32,
    },
    #[error("{property} needs one value per channel, got {len}")]
    ChannelCount { property: PropertyKey, len: usize },
    #[error("Unknown property")]
    UnknownProperty,
    #[error("{property} given a value of the wrong kind")]
    PropertyType { property: PropertyKey },
}

impl ConfigurationError {
    /// Attach the property name to an encoder overflow.
    pub(crate) fn overflow(property: PropertyKey, err: FieldOverflow) -> Self {
        ConfigurationError::FieldOverflow {
            property,
            value: err.value,
            max: err.max(),
        }
    }
}
