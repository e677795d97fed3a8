//! Conversion between voltage selector codes and output voltage.
//!
//! The ADP5055 output voltage is a single linear range: each selector step adds
//! a fixed number of microvolts on top of the range minimum.

use thiserror::Error;

/// A requested voltage the selector cannot produce.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{microvolts} uV is outside the selectable output range")]
pub struct OutOfRange {
    pub microvolts: u32,
}

/// A linear selector to microvolt mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearRange {
    /// Output voltage at `min_selector`, in microvolts.
    pub min_uv: u32,
    pub min_selector: u8,
    pub max_selector: u8,
    /// Microvolts per selector step.
    pub step_uv: u32,
}

/// Output range shared by all three channels: 408 mV to 790.5 mV in 1.5 mV steps.
pub const VOLTAGE_RANGE: LinearRange = LinearRange::new(408_000, 0, 255, 1_500);

impl LinearRange {
    pub const fn new(min_uv: u32, min_selector: u8, max_selector: u8, step_uv: u32) -> Self {
        Self {
            min_uv,
            min_selector,
            max_selector,
            step_uv,
        }
    }

    /// Lowest voltage in the range.
    pub const fn min_uv(&self) -> u32 {
        self.min_uv
    }

    /// Highest voltage in the range.
    pub const fn max_uv(&self) -> u32 {
        self.decode(self.max_selector)
    }

    /// Number of selectable voltages.
    pub const fn n_voltages(&self) -> usize {
        (self.max_selector - self.min_selector) as usize + 1
    }

    /// Voltage produced by `selector`.
    ///
    /// Selectors outside the range are clamped to the nearest end of it.
    pub const fn decode(&self, selector: u8) -> u32 {
        let selector = if selector < self.min_selector {
            self.min_selector
        } else if selector > self.max_selector {
            self.max_selector
        } else {
            selector
        };
        self.min_uv + (selector - self.min_selector) as u32 * self.step_uv
    }

    /// Exact selector for `microvolts`.
    ///
    /// Fails unless the voltage lies inside the range and on a step boundary.
    pub const fn encode(&self, microvolts: u32) -> Result<u8, OutOfRange> {
        if microvolts < self.min_uv || microvolts > self.max_uv() {
            return Err(OutOfRange { microvolts });
        }
        let offset = microvolts - self.min_uv;
        if offset % self.step_uv != 0 {
            return Err(OutOfRange { microvolts });
        }
        Ok(self.min_selector + (offset / self.step_uv) as u8)
    }

    /// Smallest selector whose voltage is at least `microvolts`.
    ///
    /// Rounds up so the requested voltage is never under-supplied. A request
    /// below the range minimum selects the first step.
    pub const fn map_to_selector(&self, microvolts: u32) -> Result<u8, OutOfRange> {
        if microvolts > self.max_uv() {
            return Err(OutOfRange { microvolts });
        }
        if microvolts <= self.min_uv {
            return Ok(self.min_selector);
        }
        let steps = (microvolts - self.min_uv).div_ceil(self.step_uv);
        Ok(self.min_selector + steps as u8)
    }

    /// Smallest selector inside `[min_uv, max_uv]`.
    pub const fn map_voltage_range(&self, min_uv: u32, max_uv: u32) -> Result<u8, OutOfRange> {
        let selector = match self.map_to_selector(min_uv) {
            Ok(selector) => selector,
            Err(err) => return Err(err),
        };
        if self.decode(selector) > max_uv {
            return Err(OutOfRange { microvolts: max_uv });
        }
        Ok(selector)
    }
}
