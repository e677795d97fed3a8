//! Bit field descriptions and the encoder that packs configuration codes into register bytes.
//!
//! Every configurable parameter of the ADP5055 lives in a fixed sub-range of one
//! 8-bit register. A [`FieldSpec`] names that sub-range, and [`FieldSpec::encode`]
//! turns a code into its contribution to the register byte. Fields sharing a
//! register are combined with a bitwise OR.

use thiserror::Error;

use crate::{register::Register, types::Channel};

/// A value too wide for the field it was destined for.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} does not fit in {width} bits")]
pub struct FieldOverflow {
    pub value: u32,
    pub width: u8,
}

impl FieldOverflow {
    /// Largest value the field could have held.
    pub const fn max(&self) -> u32 {
        (1 << self.width) - 1
    }
}

/// Location of a logical parameter inside a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSpec {
    pub register: Register,
    pub offset: u8,
    pub width: u8,
}

impl FieldSpec {
    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        assert!(width >= 1 && offset + width <= 8);
        Self {
            register,
            offset,
            width,
        }
    }

    /// Largest value representable by this field.
    pub const fn max(&self) -> u32 {
        (1 << self.width) - 1
    }

    /// Bits occupied by this field within its register.
    pub const fn mask(&self) -> u8 {
        (self.max() << self.offset) as u8
    }

    /// Shift `value` into position. Fails rather than truncating.
    pub const fn encode(&self, value: u32) -> Result<u8, FieldOverflow> {
        if value > self.max() {
            return Err(FieldOverflow {
                value,
                width: self.width,
            });
        }
        Ok((value << self.offset) as u8)
    }

    /// Encode a flag, `true` being `1`.
    pub const fn encode_flag(&self, flag: bool) -> u8 {
        (flag as u8) << self.offset
    }

    /// Recover this field's value from a whole register byte.
    pub const fn extract(&self, register_value: u8) -> u32 {
        ((register_value & self.mask()) >> self.offset) as u32
    }

    pub const fn extract_flag(&self, register_value: u8) -> bool {
        self.extract(register_value) != 0
    }
}

/// Enable mode select.
pub const EN_MODE: FieldSpec = FieldSpec::new(Register::CtrlMode1, 0, 2);
/// Over-current protection blanking.
pub const OCP_BLANKING: FieldSpec = FieldSpec::new(Register::CtrlMode2, 7, 1);
/// Power saving mode, one bit per channel (3, 2, 1).
pub const PSM321: FieldSpec = FieldSpec::new(Register::CtrlMode2, 4, 3);
/// Output discharge function, one bit per channel (3, 2, 1).
pub const DIS: FieldSpec = FieldSpec::new(Register::CtrlMode2, 0, 3);
/// Delay power-good assertion.
pub const DLY_PWRGD: FieldSpec = FieldSpec::new(Register::PgCfg, 4, 1);
/// Power-good mask, one bit per channel (3, 2, 1).
pub const PWRGD321: FieldSpec = FieldSpec::new(Register::PgCfg, 0, 3);

/// Disable delay. Each channel has its own delay register.
pub const fn disable_delay(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::delay(channel), 4, 3)
}

/// Enable delay. Shares the delay register with [`disable_delay`].
pub const fn enable_delay(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::delay(channel), 0, 3)
}

pub const fn dvs_limit_upper(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::dvs_limit(channel), 4, 4)
}

pub const fn dvs_limit_lower(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::dvs_limit(channel), 0, 4)
}

/// Fast transient setting. All channels share [`Register::FtCfg`], two bits each.
pub const fn fast_transient(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::FtCfg, 2 * channel.index() as u8, 2)
}

/// Channel enable bit in [`Register::Ctrl123`].
pub const fn enable(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::Ctrl123, channel.index() as u8, 1)
}

/// Output voltage selector. Uses the whole register.
pub const fn voltage_selector(channel: Channel) -> FieldSpec {
    FieldSpec::new(Register::vid(channel), 0, 8)
}
