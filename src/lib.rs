//! This crate provides a driver for the Analog Devices ADP5055, a triple buck regulator
//! configured over I2C/PMBus.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag, and
//! logs register traffic through `defmt` when the `defmt` feature is enabled.
//!
//! The three outputs are called `DCDC1`, `DCDC2` and `DCDC3`. Each one can be
//! enabled, disabled and set to an output voltage between 408 mV and 790.5 mV in
//! 1.5 mV steps.
//!
//! At start-up the driver writes a complete configuration to the device:
//! * Enable mode (hardware pins, software bits or both)
//! * Over-current blanking, power saving mode and output discharge
//! * Per-channel enable and disable delays
//! * Per-channel dynamic voltage scaling limits
//! * Per-channel fast transient sensitivity
//! * Power-good delay and masking
//!
//! Any setting not supplied in [`Overrides`] takes its default. Every value is
//! checked against its register field before anything is written, so an invalid
//! configuration leaves the device untouched.
//!
//! Register access goes through [`RegisterBus`]. [`I2cBus`] implements it for any
//! `embedded-hal` I2C bus.

#![cfg_attr(feature = "no-std", no_std)]

pub mod bus;
pub mod config;
pub mod error;
pub mod field;
pub mod register;
pub mod regulator;
pub mod sequence;
pub mod types;
pub mod voltage;

#[cfg(test)]
mod mock_bus;

pub use bus::{I2cBus, RegisterBus};
pub use config::{Configuration, Overrides, PropertyKey, PropertyValue};
pub use error::{ConfigurationError, Error, Result};
pub use regulator::{Adp5055, REGULATORS, RegulatorDesc};
pub use types::{Channel, ChannelMap, State};
pub use voltage::{OutOfRange, VOLTAGE_RANGE};
