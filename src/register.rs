//! This module is used to define the registers on the ADP5055.

use modular_bitfield::prelude::*;
use strum_macros::EnumIter;

use crate::types::Channel;

/// Lowest address the device accepts for reads and writes.
pub const FIRST_ADDRESS: u8 = 0xD1;
/// Highest address the device accepts for reads and writes.
pub const LAST_ADDRESS: u8 = 0xE0;
/// Number of bytes spanned by the accessible address window.
pub const REGISTER_COUNT: usize = (LAST_ADDRESS - FIRST_ADDRESS + 1) as usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// __R/W__ - Channel enable bits.
    ///
    /// Bit `n` enables channel `n`. See [`EnableControl`].
    Ctrl123 = 0xD1,
    /// __R/W__ - Enable mode, bits `[1:0]`.
    CtrlMode1 = 0xD3,
    /// __R/W__ - OCP blanking `[7]`, power saving mode `[6:4]`, output discharge `[2:0]`.
    CtrlMode2 = 0xD4,
    /// __R/W__ - Channel 1 disable delay `[6:4]` and enable delay `[2:0]`.
    Dly0 = 0xD5,
    /// __R/W__ - Channel 2 delays.
    Dly1 = 0xD6,
    /// __R/W__ - Channel 3 delays.
    Dly2 = 0xD7,
    /// __R/W__ - Channel 1 output voltage selector. Full byte.
    Vid0 = 0xD8,
    /// __R/W__ - Channel 2 output voltage selector.
    Vid1 = 0xD9,
    /// __R/W__ - Channel 3 output voltage selector.
    Vid2 = 0xDA,
    /// __R/W__ - Channel 1 DVS upper limit `[7:4]` and lower limit `[3:0]`.
    DvsLim0 = 0xDC,
    /// __R/W__ - Channel 2 DVS limits.
    DvsLim1 = 0xDD,
    /// __R/W__ - Channel 3 DVS limits.
    DvsLim2 = 0xDE,
    /// __R/W__ - Fast transient settings for all three channels.
    ///
    /// * `[1:0]` - Channel 1.
    /// * `[3:2]` - Channel 2.
    /// * `[5:4]` - Channel 3.
    FtCfg = 0xDF,
    /// __R/W__ - Power-good delay `[4]` and power-good mask `[2:0]`.
    PgCfg = 0xE0,
}

impl Register {
    /// Address of this register.
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Delay register owned by a channel.
    pub const fn delay(channel: Channel) -> Self {
        match channel {
            Channel::Dcdc1 => Register::Dly0,
            Channel::Dcdc2 => Register::Dly1,
            Channel::Dcdc3 => Register::Dly2,
        }
    }

    /// Voltage selector register owned by a channel.
    pub const fn vid(channel: Channel) -> Self {
        match channel {
            Channel::Dcdc1 => Register::Vid0,
            Channel::Dcdc2 => Register::Vid1,
            Channel::Dcdc3 => Register::Vid2,
        }
    }

    /// DVS limit register owned by a channel.
    pub const fn dvs_limit(channel: Channel) -> Self {
        match channel {
            Channel::Dcdc1 => Register::DvsLim0,
            Channel::Dcdc2 => Register::DvsLim1,
            Channel::Dcdc3 => Register::DvsLim2,
        }
    }
}

impl From<Register> for u8 {
    fn from(value: Register) -> Self {
        value.addr()
    }
}

/// A register address which has been checked against the device access table.
///
/// Only `0xD1..=0xE0` may be read or written. Addresses inside the window
/// without a [`Register`] name are still accessible.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress(u8);

impl RegisterAddress {
    pub const fn new(address: u8) -> Option<Self> {
        if address >= FIRST_ADDRESS && address <= LAST_ADDRESS {
            Some(Self(address))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position of this address within the accessible window, `0` for [`FIRST_ADDRESS`].
    pub const fn offset(self) -> usize {
        (self.0 - FIRST_ADDRESS) as usize
    }
}

impl From<Register> for RegisterAddress {
    fn from(value: Register) -> Self {
        RegisterAddress(value.addr())
    }
}

impl TryFrom<u8> for RegisterAddress {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RegisterAddress::new(value).ok_or(value)
    }
}

/// Contents of [`Register::Ctrl123`].
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableControl {
    pub en1: bool,
    pub en2: bool,
    pub en3: bool,
    #[skip]
    __: B5,
}

impl EnableControl {
    pub fn from_register(value: u8) -> Self {
        Self::from_bytes([value])
    }

    pub fn to_register(self) -> u8 {
        self.into_bytes()[0]
    }

    /// Whether a channel's enable bit is set.
    pub fn channel(&self, channel: Channel) -> bool {
        match channel {
            Channel::Dcdc1 => self.en1(),
            Channel::Dcdc2 => self.en2(),
            Channel::Dcdc3 => self.en3(),
        }
    }

    /// Set or clear a single channel's enable bit, leaving the others alone.
    pub fn set_channel(&mut self, channel: Channel, enabled: bool) {
        match channel {
            Channel::Dcdc1 => self.set_en1(enabled),
            Channel::Dcdc2 => self.set_en2(enabled),
            Channel::Dcdc3 => self.set_en3(enabled),
        }
    }

    /// Mask of the bit belonging to a channel.
    pub fn mask(channel: Channel) -> u8 {
        let mut bits = Self::new();
        bits.set_channel(channel, true);
        bits.to_register()
    }
}
