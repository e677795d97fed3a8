//! We use this mocking module in unit tests to emulate the device registers.

use crate::{
    bus::RegisterBus,
    register::{REGISTER_COUNT, RegisterAddress},
};

/// Our mock type used to emulate the register file behind the bus.
pub struct MockBus {
    /// Current contents of every accessible register.
    registers: [u8; REGISTER_COUNT],
    /// Every successful write, in order, as `(address, value)`.
    write_log: heapless::Vec<(u8, u8), 64>,
    /// Number of write calls made, including failed ones.
    write_attempts: usize,
    /// Number of read calls made.
    read_count: usize,
    /// Fail the write with this zero-based call index.
    fail_write_at: Option<usize>,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    /// Generic simulated error for testing
    SimulatedError,
    /// The write log is full
    LogOverflow,
}

impl RegisterBus for MockBus {
    type Error = MockBusError;

    fn write_register(&mut self, address: RegisterAddress, value: u8) -> Result<(), Self::Error> {
        let attempt = self.write_attempts;
        self.write_attempts += 1;

        if self.fail_write_at == Some(attempt) {
            return Err(MockBusError::SimulatedError);
        }

        self.write_log
            .push((address.get(), value))
            .map_err(|_| MockBusError::LogOverflow)?;
        self.registers[address.offset()] = value;
        Ok(())
    }

    fn read_register(&mut self, address: RegisterAddress) -> Result<u8, Self::Error> {
        self.read_count += 1;
        if self.should_error_on_read {
            return Err(MockBusError::SimulatedError);
        }
        Ok(self.registers[address.offset()])
    }
}

impl MockBus {
    /// Create a new MockBus with every register cleared.
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            write_log: heapless::Vec::new(),
            write_attempts: 0,
            read_count: 0,
            fail_write_at: None,
            should_error_on_read: false,
        }
    }

    /// Preload a register without logging a write.
    pub fn set_register(&mut self, address: u8, value: u8) {
        let address = RegisterAddress::new(address).expect("address outside register window");
        self.registers[address.offset()] = value;
    }

    /// Current contents of a register.
    pub fn register(&self, address: u8) -> u8 {
        let address = RegisterAddress::new(address).expect("address outside register window");
        self.registers[address.offset()]
    }

    /// Successful writes so far.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.write_log
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }

    pub fn read_count(&self) -> usize {
        self.read_count
    }

    /// Clear the write log and call counters, keeping register contents.
    pub fn clear_log(&mut self) {
        self.write_log.clear();
        self.write_attempts = 0;
        self.read_count = 0;
    }

    /// Make the write with zero-based call index `attempt` fail.
    pub fn fail_write_at(&mut self, attempt: Option<usize>) {
        self.fail_write_at = attempt;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(address: u8) -> RegisterAddress {
        RegisterAddress::new(address).unwrap()
    }

    #[test]
    fn test_new_mock_bus() {
        let mock = MockBus::new();
        assert!(mock.writes().is_empty());
        assert_eq!(mock.write_attempts(), 0);
        assert_eq!(mock.read_count(), 0);
        assert_eq!(mock.register(0xD1), 0);
        assert_eq!(mock.register(0xE0), 0);
    }

    #[test]
    fn test_write_then_read() {
        let mut mock = MockBus::new();
        mock.write_register(addr(0xD9), 0x42).unwrap();

        assert_eq!(mock.read_register(addr(0xD9)), Ok(0x42));
        assert_eq!(mock.writes(), [(0xD9, 0x42)]);
        assert_eq!(mock.read_count(), 1);
    }

    #[test]
    fn test_preload_is_not_logged() {
        let mut mock = MockBus::new();
        mock.set_register(0xD1, 0x05);

        assert_eq!(mock.read_register(addr(0xD1)), Ok(0x05));
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn test_write_error_simulation() {
        let mut mock = MockBus::new();
        mock.fail_write_at(Some(1));

        assert!(mock.write_register(addr(0xD3), 0x01).is_ok());
        assert_eq!(
            mock.write_register(addr(0xD4), 0x02),
            Err(MockBusError::SimulatedError)
        );
        assert!(mock.write_register(addr(0xD5), 0x03).is_ok());

        assert_eq!(mock.write_attempts(), 3);
        assert_eq!(mock.writes(), [(0xD3, 0x01), (0xD5, 0x03)]);
        // The failed write did not land.
        assert_eq!(mock.register(0xD4), 0x00);
    }

    #[test]
    fn test_read_error_simulation() {
        let mut mock = MockBus::new();
        mock.set_read_error(true);
        assert_eq!(
            mock.read_register(addr(0xD1)),
            Err(MockBusError::SimulatedError)
        );

        mock.set_read_error(false);
        assert!(mock.read_register(addr(0xD1)).is_ok());
    }

    #[test]
    fn test_clear_log() {
        let mut mock = MockBus::new();
        mock.write_register(addr(0xDF), 0x3F).unwrap();
        mock.clear_log();

        assert!(mock.writes().is_empty());
        assert_eq!(mock.write_attempts(), 0);
        assert_eq!(mock.register(0xDF), 0x3F);
    }
}
