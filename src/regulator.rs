use crate::{
    bus::RegisterBus,
    config::{Configuration, Overrides},
    error::{Error, Result},
    field::{self, FieldSpec},
    register::{EnableControl, Register, RegisterAddress},
    sequence::{self, InitSequence},
    types::{Channel, NUM_CHANNELS, State},
    voltage::{LinearRange, VOLTAGE_RANGE},
};

/// Static description of one regulator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegulatorDesc {
    pub channel: Channel,
    /// Where the output voltage selector lives.
    pub vsel: FieldSpec,
    /// Where the enable bit lives.
    pub enable: FieldSpec,
    pub range: LinearRange,
}

impl RegulatorDesc {
    const fn new(channel: Channel) -> Self {
        Self {
            channel,
            vsel: field::voltage_selector(channel),
            enable: field::enable(channel),
            range: VOLTAGE_RANGE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.channel.name()
    }
}

/// Descriptors for `DCDC1` to `DCDC3`, in channel order.
pub static REGULATORS: [RegulatorDesc; NUM_CHANNELS] = [
    RegulatorDesc::new(Channel::Dcdc1),
    RegulatorDesc::new(Channel::Dcdc2),
    RegulatorDesc::new(Channel::Dcdc3),
];

impl Channel {
    pub fn desc(self) -> &'static RegulatorDesc {
        &REGULATORS[self.index()]
    }
}

/// An ADP5055 on a [`RegisterBus`].
///
/// For it's methods, we generally use the nomenclature that "set" means to write a
/// setting and "get" means to read it back. Nothing is cached: every get is a
/// fresh bus read and every set a fresh bus write.
pub struct Adp5055<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Adp5055<B> {
    /// Wrap a device without touching its configuration.
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Attach to the device, resolve `overrides` against the defaults and
    /// write the resulting configuration.
    ///
    /// Configuration errors are reported before any register is written.
    pub fn initialize(bus: B, overrides: &Overrides<'_>) -> Result<Self, B::Error> {
        let config = Configuration::resolve(overrides)?;
        let mut device = Self::new(bus);
        device.configure(&config)?;
        Ok(device)
    }

    /// Encode and write a complete configuration.
    pub fn configure(&mut self, config: &Configuration) -> Result<(), B::Error> {
        let sequence = InitSequence::encode(config)?;
        self.apply(&sequence)
    }

    /// Write an encoded sequence, stopping at the first failed write.
    ///
    /// Registers written before the failure are left as they are.
    pub fn apply(&mut self, sequence: &InitSequence) -> Result<(), B::Error> {
        for write in sequence {
            #[cfg(feature = "defmt")]
            defmt::debug!("Writing {=u8:#x} to {}", write.value, write.register);

            if let Err(err) = self.bus.write_register(write.register.into(), write.value) {
                #[cfg(feature = "defmt")]
                defmt::warn!("Initialization aborted at {}", write.register);
                return Err(Error::Bus(err));
            }
        }
        Ok(())
    }

    /// Read the configuration registers back and decode them.
    pub fn read_configuration(&mut self) -> Result<Configuration, B::Error> {
        sequence::decode(|register| self.read(register))
    }

    /// Give back the bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Enable a channel's output. The other channels are left alone.
    pub fn enable(&mut self, channel: Channel) -> Result<(), B::Error> {
        self.set_enabled(channel, State::On)
    }

    /// Disable a channel's output. The other channels are left alone.
    pub fn disable(&mut self, channel: Channel) -> Result<(), B::Error> {
        self.set_enabled(channel, State::Off)
    }

    pub fn set_enabled(&mut self, channel: Channel, state: impl Into<State>) -> Result<(), B::Error> {
        let state: State = state.into();
        let enable = channel.desc().enable;
        let value = enable.encode_flag(state.into());
        self.update_register(enable.register, enable.mask(), value)
    }

    pub fn is_enabled(&mut self, channel: Channel) -> Result<bool, B::Error> {
        Ok(self.get_enable_control()?.channel(channel))
    }

    /// Read the enable bits of all channels at once.
    pub fn get_enable_control(&mut self) -> Result<EnableControl, B::Error> {
        let value = self.read(Register::Ctrl123)?;
        Ok(EnableControl::from_register(value))
    }

    /// Get the raw output voltage selector of a channel.
    pub fn get_selector(&mut self, channel: Channel) -> Result<u8, B::Error> {
        let vsel = channel.desc().vsel;
        let value = self.read(vsel.register)?;
        Ok(vsel.extract(value) as u8)
    }

    /// Set the raw output voltage selector of a channel.
    pub fn set_selector(&mut self, channel: Channel, selector: u8) -> Result<(), B::Error> {
        // The selector fills the whole register.
        self.write(channel.desc().vsel.register, selector)
    }

    /// Output voltage in microvolts produced by `selector`.
    pub fn list_voltage(&self, selector: u8) -> u32 {
        VOLTAGE_RANGE.decode(selector)
    }

    /// Smallest selector producing at least `microvolts`.
    pub fn map_voltage(&self, microvolts: u32) -> Result<u8, B::Error> {
        Ok(VOLTAGE_RANGE.map_to_selector(microvolts)?)
    }

    /// Get the configured output voltage of a channel in microvolts.
    pub fn get_voltage(&mut self, channel: Channel) -> Result<u32, B::Error> {
        let selector = self.get_selector(channel)?;
        Ok(vsel_range(channel).decode(selector))
    }

    /// Set the output voltage of a channel to the lowest step within `[min_uv, max_uv]`.
    ///
    /// Returns the selector written.
    pub fn set_voltage(&mut self, channel: Channel, min_uv: u32, max_uv: u32) -> Result<u8, B::Error> {
        let selector = vsel_range(channel).map_voltage_range(min_uv, max_uv)?;
        self.set_selector(channel, selector)?;
        Ok(selector)
    }

    /// Read any register in the device access window.
    pub fn read_register(&mut self, address: u8) -> Result<u8, B::Error> {
        let address = RegisterAddress::new(address).ok_or(Error::InvalidAddress(address))?;
        self.bus.read_register(address).map_err(Error::Bus)
    }

    /// Write any register in the device access window.
    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), B::Error> {
        let address = RegisterAddress::new(address).ok_or(Error::InvalidAddress(address))?;
        self.bus.write_register(address, value).map_err(Error::Bus)
    }

    /// Update masked bits in a register (read-modify-write).
    pub fn update_register(&mut self, register: Register, mask: u8, value: u8) -> Result<(), B::Error> {
        let current = self.read(register)?;
        let new = (current & !mask) | (value & mask);
        self.write(register, new)
    }

    fn read(&mut self, register: Register) -> Result<u8, B::Error> {
        self.bus.read_register(register.into()).map_err(Error::Bus)
    }

    fn write(&mut self, register: Register, value: u8) -> Result<(), B::Error> {
        self.bus
            .write_register(register.into(), value)
            .map_err(Error::Bus)
    }
}

fn vsel_range(channel: Channel) -> LinearRange {
    channel.desc().range
}
