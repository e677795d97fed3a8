//! The register writes which apply a [`Configuration`] to the device.
//!
//! The whole sequence is encoded up front, so a bad configuration value is
//! reported before anything reaches the bus.

use strum::IntoEnumIterator;

use crate::{
    config::{Configuration, PropertyKey},
    error::ConfigurationError,
    field::{self, FieldSpec},
    register::Register,
    types::{Channel, ChannelMap},
};

/// Number of writes in an initialization sequence.
pub const INIT_WRITES: usize = 10;

/// A single byte destined for a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    pub register: Register,
    pub value: u8,
}

/// Ordered register writes produced from a [`Configuration`].
///
/// Order:
/// 1. [`Register::CtrlMode1`]
/// 2. [`Register::CtrlMode2`]
/// 3. [`Register::Dly0`] to [`Register::Dly2`]
/// 4. [`Register::DvsLim0`] to [`Register::DvsLim2`]
/// 5. [`Register::FtCfg`]
/// 6. [`Register::PgCfg`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitSequence {
    writes: [RegisterWrite; INIT_WRITES],
}

impl InitSequence {
    /// Encode every field of `config`.
    pub fn encode(config: &Configuration) -> Result<Self, ConfigurationError> {
        use PropertyKey as PK;

        let delay = |channel: Channel| -> Result<RegisterWrite, ConfigurationError> {
            Ok(RegisterWrite {
                register: Register::delay(channel),
                value: encode(
                    PK::DisableDelay,
                    field::disable_delay(channel),
                    config.disable_delay[channel],
                )? | encode(
                    PK::EnableDelay,
                    field::enable_delay(channel),
                    config.enable_delay[channel],
                )?,
            })
        };
        let dvs_limit = |channel: Channel| -> Result<RegisterWrite, ConfigurationError> {
            Ok(RegisterWrite {
                register: Register::dvs_limit(channel),
                value: encode(
                    PK::DvsLimitUpper,
                    field::dvs_limit_upper(channel),
                    config.dvs_limit_upper[channel],
                )? | encode(
                    PK::DvsLimitLower,
                    field::dvs_limit_lower(channel),
                    config.dvs_limit_lower[channel],
                )?,
            })
        };

        let mut fast_transient = 0;
        for (channel, code) in config.fast_transient.iter() {
            fast_transient |= encode(PK::FastTransient, field::fast_transient(channel), code)?;
        }

        let writes = [
            RegisterWrite {
                register: Register::CtrlMode1,
                value: encode(PK::EnableMode, field::EN_MODE, config.enable_mode)?,
            },
            RegisterWrite {
                register: Register::CtrlMode2,
                value: field::OCP_BLANKING.encode_flag(config.ocp_blanking)
                    | encode(PK::PowerSavingMode, field::PSM321, config.power_saving_mode)?
                    | encode(PK::OutputDischarge, field::DIS, config.output_discharge)?,
            },
            delay(Channel::Dcdc1)?,
            delay(Channel::Dcdc2)?,
            delay(Channel::Dcdc3)?,
            dvs_limit(Channel::Dcdc1)?,
            dvs_limit(Channel::Dcdc2)?,
            dvs_limit(Channel::Dcdc3)?,
            RegisterWrite {
                register: Register::FtCfg,
                value: fast_transient,
            },
            RegisterWrite {
                register: Register::PgCfg,
                value: field::DLY_PWRGD.encode_flag(config.delay_power_good)
                    | encode(PK::MaskPowerGood, field::PWRGD321, config.mask_power_good)?,
            },
        ];

        Ok(Self { writes })
    }

    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Byte this sequence writes to `register`, if it writes to it at all.
    pub fn value_of(&self, register: Register) -> Option<u8> {
        self.writes
            .iter()
            .find(|write| write.register == register)
            .map(|write| write.value)
    }
}

impl<'a> IntoIterator for &'a InitSequence {
    type Item = &'a RegisterWrite;
    type IntoIter = core::slice::Iter<'a, RegisterWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.iter()
    }
}

fn encode(property: PropertyKey, field: FieldSpec, value: u32) -> Result<u8, ConfigurationError> {
    field.encode(value)
        .map_err(|err| ConfigurationError::overflow(property, err))
}

/// Rebuild a [`Configuration`] from the registers an [`InitSequence`] writes.
///
/// `read` is called once for each of those registers, in sequence order.
pub fn decode<E>(mut read: impl FnMut(Register) -> Result<u8, E>) -> Result<Configuration, E> {
    let mode1 = read(Register::CtrlMode1)?;
    let mode2 = read(Register::CtrlMode2)?;

    let mut disable_delay = ChannelMap::splat(0);
    let mut enable_delay = ChannelMap::splat(0);
    for channel in Channel::iter() {
        let value = read(Register::delay(channel))?;
        disable_delay[channel] = field::disable_delay(channel).extract(value);
        enable_delay[channel] = field::enable_delay(channel).extract(value);
    }

    let mut dvs_limit_upper = ChannelMap::splat(0);
    let mut dvs_limit_lower = ChannelMap::splat(0);
    for channel in Channel::iter() {
        let value = read(Register::dvs_limit(channel))?;
        dvs_limit_upper[channel] = field::dvs_limit_upper(channel).extract(value);
        dvs_limit_lower[channel] = field::dvs_limit_lower(channel).extract(value);
    }

    let ft_cfg = read(Register::FtCfg)?;
    let mut fast_transient = ChannelMap::splat(0);
    for channel in Channel::iter() {
        fast_transient[channel] = field::fast_transient(channel).extract(ft_cfg);
    }

    let pg_cfg = read(Register::PgCfg)?;

    Ok(Configuration {
        enable_mode: field::EN_MODE.extract(mode1),
        ocp_blanking: field::OCP_BLANKING.extract_flag(mode2),
        power_saving_mode: field::PSM321.extract(mode2),
        output_discharge: field::DIS.extract(mode2),
        disable_delay,
        enable_delay,
        dvs_limit_upper,
        dvs_limit_lower,
        fast_transient,
        delay_power_good: field::DLY_PWRGD.extract_flag(pg_cfg),
        mask_power_good: field::PWRGD321.extract(pg_cfg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    fn encode_overrides(overrides: Overrides) -> Result<InitSequence, ConfigurationError> {
        InitSequence::encode(&Configuration::resolve(&overrides)?)
    }

    #[test]
    fn default_configuration_bytes() {
        let sequence = encode_overrides(Overrides::new()).unwrap();

        assert_eq!(sequence.value_of(Register::CtrlMode1), Some(0x00));
        assert_eq!(sequence.value_of(Register::CtrlMode2), Some(0x07));
        assert_eq!(sequence.value_of(Register::FtCfg), Some(0x3F));
        assert_eq!(sequence.value_of(Register::PgCfg), Some(0x10));
        for register in [Register::Dly0, Register::Dly1, Register::Dly2] {
            assert_eq!(sequence.value_of(register), Some(0x00));
        }
        for register in [Register::DvsLim0, Register::DvsLim1, Register::DvsLim2] {
            assert_eq!(sequence.value_of(register), Some(0x00));
        }
    }

    #[test]
    fn write_order() {
        let sequence = encode_overrides(Overrides::new()).unwrap();
        let order: heapless::Vec<Register, INIT_WRITES> =
            sequence.into_iter().map(|write| write.register).collect();

        assert_eq!(
            order.as_slice(),
            [
                Register::CtrlMode1,
                Register::CtrlMode2,
                Register::Dly0,
                Register::Dly1,
                Register::Dly2,
                Register::DvsLim0,
                Register::DvsLim1,
                Register::DvsLim2,
                Register::FtCfg,
                Register::PgCfg,
            ]
        );
    }

    #[test]
    fn dvs_limits_per_channel() {
        let upper = [0x0, 0xA, 0x0];
        let lower = [0x0, 0x3, 0x0];
        let sequence =
            encode_overrides(Overrides::new().with_dvs_limit_upper(&upper).with_dvs_limit_lower(&lower))
                .unwrap();

        assert_eq!(sequence.value_of(Register::DvsLim1), Some(0xA3));
        assert_eq!(sequence.value_of(Register::DvsLim0), Some(0x00));
        assert_eq!(sequence.value_of(Register::DvsLim2), Some(0x00));
    }

    #[test]
    fn delays_per_channel() {
        let disable = [1, 2, 7];
        let enable = [4, 0, 5];
        let sequence =
            encode_overrides(Overrides::new().with_disable_delay(&disable).with_enable_delay(&enable))
                .unwrap();

        assert_eq!(sequence.value_of(Register::Dly0), Some(0x14));
        assert_eq!(sequence.value_of(Register::Dly1), Some(0x20));
        assert_eq!(sequence.value_of(Register::Dly2), Some(0x75));
    }

    #[test]
    fn fast_transient_shares_one_register() {
        let codes = [1, 2, 0];
        let sequence = encode_overrides(Overrides::new().with_fast_transient(&codes)).unwrap();

        // Channel 1 in [1:0], channel 2 in [3:2], channel 3 in [5:4].
        assert_eq!(sequence.value_of(Register::FtCfg), Some(0b00_10_01));
    }

    #[test]
    fn mode_and_power_good_fields_combine() {
        let sequence = encode_overrides(
            Overrides::new()
                .with_enable_mode(3)
                .with_ocp_blanking(true)
                .with_power_saving_mode(0b010)
                .with_output_discharge(0b001)
                .with_delay_power_good(false)
                .with_mask_power_good(0b110),
        )
        .unwrap();

        assert_eq!(sequence.value_of(Register::CtrlMode1), Some(0x03));
        assert_eq!(sequence.value_of(Register::CtrlMode2), Some(0b1010_0001));
        assert_eq!(sequence.value_of(Register::PgCfg), Some(0b0000_0110));
    }

    #[test]
    fn overflow_names_the_property() {
        assert_eq!(
            encode_overrides(Overrides::new().with_enable_mode(4)),
            Err(ConfigurationError::FieldOverflow {
                property: PropertyKey::EnableMode,
                value: 4,
                max: 3
            })
        );

        let lower = [0, 0, 16];
        assert_eq!(
            encode_overrides(Overrides::new().with_dvs_limit_lower(&lower)),
            Err(ConfigurationError::FieldOverflow {
                property: PropertyKey::DvsLimitLower,
                value: 16,
                max: 15
            })
        );

        let fast = [3, 4, 3];
        assert!(matches!(
            encode_overrides(Overrides::new().with_fast_transient(&fast)),
            Err(ConfigurationError::FieldOverflow {
                property: PropertyKey::FastTransient,
                ..
            })
        ));
    }

    #[test]
    fn decode_inverts_encode() {
        let disable = [1, 2, 3];
        let enable = [7, 6, 5];
        let upper = [0xF, 0x8, 0x1];
        let lower = [0x0, 0x9, 0xE];
        let fast = [0, 1, 2];
        let overrides = Overrides::new()
            .with_enable_mode(1)
            .with_ocp_blanking(true)
            .with_power_saving_mode(5)
            .with_output_discharge(2)
            .with_disable_delay(&disable)
            .with_enable_delay(&enable)
            .with_dvs_limit_upper(&upper)
            .with_dvs_limit_lower(&lower)
            .with_fast_transient(&fast)
            .with_delay_power_good(false)
            .with_mask_power_good(3);
        let config = Configuration::resolve(&overrides).unwrap();
        let sequence = InitSequence::encode(&config).unwrap();

        let decoded = decode(|register| sequence.value_of(register).ok_or(register)).unwrap();
        assert_eq!(decoded, config);
    }
}
