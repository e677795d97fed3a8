//! This module contains the channel types shared by the rest of the driver.

use core::ops::{Index, IndexMut};

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

/// One of the three buck regulator outputs.
///
/// Iterates and indexes in fixed order: `DCDC1` is index 0.
#[derive(
    Debug,
    Display,
    IntoStaticStr,
    EnumIter,
    EnumCountMacro,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    #[strum(serialize = "DCDC1")]
    Dcdc1 = 0,
    #[strum(serialize = "DCDC2")]
    Dcdc2 = 1,
    #[strum(serialize = "DCDC3")]
    Dcdc3 = 2,
}

/// Number of regulator channels on the device.
pub const NUM_CHANNELS: usize = Channel::COUNT;

impl Channel {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable name, `"DCDC1"` to `"DCDC3"`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<usize> for Channel {
    type Error = usize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Channel::iter().nth(value).ok_or(value)
    }
}

/// One value per channel, indexed by [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMap<T>([T; NUM_CHANNELS]);

impl<T: Copy> ChannelMap<T> {
    /// Same value on every channel.
    pub const fn splat(value: T) -> Self {
        Self([value; NUM_CHANNELS])
    }

    /// Build from a slice holding exactly one value per channel.
    ///
    /// Returns the slice length if it does not match.
    pub fn try_from_slice(values: &[T]) -> Result<Self, usize> {
        <[T; NUM_CHANNELS]>::try_from(values)
            .map(Self)
            .map_err(|_| values.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, T)> + '_ {
        Channel::iter().zip(self.0.iter().copied())
    }
}

impl<T> ChannelMap<T> {
    pub const fn new(values: [T; NUM_CHANNELS]) -> Self {
        Self(values)
    }

    pub fn into_inner(self) -> [T; NUM_CHANNELS] {
        self.0
    }
}

impl<T> From<[T; NUM_CHANNELS]> for ChannelMap<T> {
    fn from(value: [T; NUM_CHANNELS]) -> Self {
        Self(value)
    }
}

impl<T> Index<Channel> for ChannelMap<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &Self::Output {
        &self.0[channel.index()]
    }
}

impl<T> IndexMut<Channel> for ChannelMap<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut Self::Output {
        &mut self.0[channel.index()]
    }
}

/// Used to be less ambiguous and whether something is on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Disabled.
    #[default]
    Off,
    /// Enabled.
    On,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}
