//! Device configuration: built-in defaults, user overrides and the resolved record.
//!
//! Use [`Overrides`] to describe the settings which differ from the defaults, then
//! [`Configuration::resolve`] to merge them into a complete [`Configuration`].

use core::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{error::ConfigurationError, types::ChannelMap};

/// Names of the firmware properties which can override a default.
#[derive(
    Debug, Display, EnumString, IntoStaticStr, EnumIter, Clone, Copy, PartialEq, Eq, Hash,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyKey {
    #[strum(serialize = "adi,enable-mode-code")]
    EnableMode,
    #[strum(serialize = "adi,ocp-blanking")]
    OcpBlanking,
    #[strum(serialize = "adi,power-saving-mode-ch321-code")]
    PowerSavingMode,
    #[strum(serialize = "adi,output-discharge-function-ch321-code")]
    OutputDischarge,
    #[strum(serialize = "adi,disable-delay-code-ch123")]
    DisableDelay,
    #[strum(serialize = "adi,enable-delay-code-ch123")]
    EnableDelay,
    #[strum(serialize = "adi,dvs-limit-upper-code-ch123")]
    DvsLimitUpper,
    #[strum(serialize = "adi,dvs-limit-lower-code-ch123")]
    DvsLimitLower,
    #[strum(serialize = "adi,fast-transient-code-ch123")]
    FastTransient,
    #[strum(serialize = "adi,delay-power-good")]
    DelayPowerGood,
    #[strum(serialize = "adi,mask-power-good-ch321-code")]
    MaskPowerGood,
}

/// The kind of value each property expects, so a configuration source knows how to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Flag,
    Code,
    PerChannel,
}

impl PropertyKey {
    pub const fn kind(self) -> PropertyKind {
        use PropertyKey as PK;
        match self {
            PK::OcpBlanking | PK::DelayPowerGood => PropertyKind::Flag,
            PK::EnableMode | PK::PowerSavingMode | PK::OutputDischarge | PK::MaskPowerGood => {
                PropertyKind::Code
            }
            PK::DisableDelay
            | PK::EnableDelay
            | PK::DvsLimitUpper
            | PK::DvsLimitLower
            | PK::FastTransient => PropertyKind::PerChannel,
        }
    }
}

/// A property value as handed over by the configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Flag(bool),
    Code(u32),
    /// One value per channel, channel 1 first.
    PerChannel(&'a [u32]),
}

/// Sparse set of settings which should replace the defaults.
///
/// Anything left as `None` keeps its default. Per-channel settings are replaced
/// as a whole, so their slices must hold exactly one value per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides<'a> {
    pub enable_mode: Option<u32>,
    pub ocp_blanking: Option<bool>,
    pub power_saving_mode: Option<u32>,
    pub output_discharge: Option<u32>,
    pub disable_delay: Option<&'a [u32]>,
    pub enable_delay: Option<&'a [u32]>,
    pub dvs_limit_upper: Option<&'a [u32]>,
    pub dvs_limit_lower: Option<&'a [u32]>,
    pub fast_transient: Option<&'a [u32]>,
    pub delay_power_good: Option<bool>,
    pub mask_power_good: Option<u32>,
}

impl<'a> Overrides<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property by its firmware name.
    pub fn set_property(
        &mut self,
        name: &str,
        value: PropertyValue<'a>,
    ) -> Result<(), ConfigurationError> {
        let key = PropertyKey::from_str(name).map_err(|_| ConfigurationError::UnknownProperty)?;
        self.set(key, value)
    }

    /// Set a property by key. The value must be of the kind the key expects.
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue<'a>) -> Result<(), ConfigurationError> {
        use PropertyKey as PK;
        use PropertyValue as PV;

        match (key, value) {
            (PK::EnableMode, PV::Code(code)) => self.enable_mode = Some(code),
            (PK::OcpBlanking, PV::Flag(flag)) => self.ocp_blanking = Some(flag),
            (PK::PowerSavingMode, PV::Code(code)) => self.power_saving_mode = Some(code),
            (PK::OutputDischarge, PV::Code(code)) => self.output_discharge = Some(code),
            (PK::DisableDelay, PV::PerChannel(codes)) => self.disable_delay = Some(codes),
            (PK::EnableDelay, PV::PerChannel(codes)) => self.enable_delay = Some(codes),
            (PK::DvsLimitUpper, PV::PerChannel(codes)) => self.dvs_limit_upper = Some(codes),
            (PK::DvsLimitLower, PV::PerChannel(codes)) => self.dvs_limit_lower = Some(codes),
            (PK::FastTransient, PV::PerChannel(codes)) => self.fast_transient = Some(codes),
            (PK::DelayPowerGood, PV::Flag(flag)) => self.delay_power_good = Some(flag),
            (PK::MaskPowerGood, PV::Code(code)) => self.mask_power_good = Some(code),
            (property, _) => return Err(ConfigurationError::PropertyType { property }),
        }
        Ok(())
    }

    /// Select the enable mode. Two bit code.
    pub fn with_enable_mode(mut self, code: u32) -> Self {
        self.enable_mode = Some(code);
        self
    }

    pub fn with_ocp_blanking(mut self, enabled: bool) -> Self {
        self.ocp_blanking = Some(enabled);
        self
    }

    /// Power saving mode, bit 2 is channel 3 and bit 0 is channel 1.
    pub fn with_power_saving_mode(mut self, code: u32) -> Self {
        self.power_saving_mode = Some(code);
        self
    }

    /// Output discharge function, bit 2 is channel 3 and bit 0 is channel 1.
    pub fn with_output_discharge(mut self, code: u32) -> Self {
        self.output_discharge = Some(code);
        self
    }

    pub fn with_disable_delay(mut self, codes: &'a [u32]) -> Self {
        self.disable_delay = Some(codes);
        self
    }

    pub fn with_enable_delay(mut self, codes: &'a [u32]) -> Self {
        self.enable_delay = Some(codes);
        self
    }

    pub fn with_dvs_limit_upper(mut self, codes: &'a [u32]) -> Self {
        self.dvs_limit_upper = Some(codes);
        self
    }

    pub fn with_dvs_limit_lower(mut self, codes: &'a [u32]) -> Self {
        self.dvs_limit_lower = Some(codes);
        self
    }

    pub fn with_fast_transient(mut self, codes: &'a [u32]) -> Self {
        self.fast_transient = Some(codes);
        self
    }

    pub fn with_delay_power_good(mut self, enabled: bool) -> Self {
        self.delay_power_good = Some(enabled);
        self
    }

    /// Power-good mask, bit 2 is channel 3 and bit 0 is channel 1.
    pub fn with_mask_power_good(mut self, code: u32) -> Self {
        self.mask_power_good = Some(code);
        self
    }
}

/// Fully resolved device configuration.
///
/// Code values are raw register codes and are only range checked when encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub enable_mode: u32,
    pub ocp_blanking: bool,
    pub power_saving_mode: u32,
    pub output_discharge: u32,
    pub disable_delay: ChannelMap<u32>,
    pub enable_delay: ChannelMap<u32>,
    pub dvs_limit_upper: ChannelMap<u32>,
    pub dvs_limit_lower: ChannelMap<u32>,
    pub fast_transient: ChannelMap<u32>,
    pub delay_power_good: bool,
    pub mask_power_good: u32,
}

/// Built-in values for anything not overridden.
impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            enable_mode: 0,
            ocp_blanking: false,
            power_saving_mode: 0,
            output_discharge: 7,
            disable_delay: ChannelMap::splat(0),
            enable_delay: ChannelMap::splat(0),
            dvs_limit_upper: ChannelMap::splat(0),
            dvs_limit_lower: ChannelMap::splat(0),
            fast_transient: ChannelMap::splat(3),
            delay_power_good: true,
            mask_power_good: 0,
        }
    }
}

impl Configuration {
    /// Merge `overrides` over the defaults.
    pub fn resolve(overrides: &Overrides<'_>) -> Result<Self, ConfigurationError> {
        let defaults = Self::default();

        Ok(Configuration {
            enable_mode: overrides.enable_mode.unwrap_or(defaults.enable_mode),
            ocp_blanking: overrides.ocp_blanking.unwrap_or(defaults.ocp_blanking),
            power_saving_mode: overrides
                .power_saving_mode
                .unwrap_or(defaults.power_saving_mode),
            output_discharge: overrides
                .output_discharge
                .unwrap_or(defaults.output_discharge),
            disable_delay: per_channel(
                PropertyKey::DisableDelay,
                overrides.disable_delay,
                defaults.disable_delay,
            )?,
            enable_delay: per_channel(
                PropertyKey::EnableDelay,
                overrides.enable_delay,
                defaults.enable_delay,
            )?,
            dvs_limit_upper: per_channel(
                PropertyKey::DvsLimitUpper,
                overrides.dvs_limit_upper,
                defaults.dvs_limit_upper,
            )?,
            dvs_limit_lower: per_channel(
                PropertyKey::DvsLimitLower,
                overrides.dvs_limit_lower,
                defaults.dvs_limit_lower,
            )?,
            fast_transient: per_channel(
                PropertyKey::FastTransient,
                overrides.fast_transient,
                defaults.fast_transient,
            )?,
            delay_power_good: overrides
                .delay_power_good
                .unwrap_or(defaults.delay_power_good),
            mask_power_good: overrides.mask_power_good.unwrap_or(defaults.mask_power_good),
        })
    }
}

fn per_channel(
    property: PropertyKey,
    codes: Option<&[u32]>,
    default: ChannelMap<u32>,
) -> Result<ChannelMap<u32>, ConfigurationError> {
    match codes {
        Some(codes) => ChannelMap::try_from_slice(codes)
            .map_err(|len| ConfigurationError::ChannelCount { property, len }),
        None => Ok(default),
    }
}
