//! Board configuration and address registry
//!
//! Which analog peripherals exist, and at which address, is decided by the
//! firmware build running on the companion microcontroller. [`BoardConfig`]
//! describes that build; [`Board`] pairs it with the registry of addresses
//! already bound to a driver. Drivers consult the board only while being
//! constructed.

use bitflags::bitflags;
use heapless::Vec;

use crate::error::ConfigError;
use crate::protocol::Address;

/// Number of addresses the registry can remember
pub const MAX_CLAIMED: usize = 32;

bitflags! {
    /// Optional peripherals present in the firmware build
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Peripherals: u16 {
        /// Delta-sigma ADC
        const DELSIG = 1;
        /// First successive approximation ADC
        const SAR0 = 1 << 1;
        /// Second successive approximation ADC
        const SAR1 = 1 << 2;
        /// First current DAC
        const IDAC0 = 1 << 3;
        /// Second current DAC
        const IDAC1 = 1 << 4;
        /// First voltage DAC
        const VDAC0 = 1 << 5;
        /// Second voltage DAC
        const VDAC1 = 1 << 6;
        /// Waveform DAC
        const WAVEDAC = 1 << 7;
    }
}

/// Fixed peripheral addresses.
///
/// The defaults follow the order of the firmware dispatch table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressMap {
    /// Delta-sigma ADC
    pub delsig: Address,
    /// First SAR ADC
    pub sar0: Address,
    /// Second SAR ADC
    pub sar1: Address,
    /// First voltage DAC
    pub vdac0: Address,
    /// Second voltage DAC
    pub vdac1: Address,
    /// First current DAC
    pub idac0: Address,
    /// Second current DAC
    pub idac1: Address,
    /// Waveform DAC
    pub wavedac: Address,
    /// Analog input pins, shared by all pins
    pub analog_in: Address,
    /// CapSense buttons, shared by all buttons
    pub capsense: Address,
}

impl Default for AddressMap {
    fn default() -> Self {
        Self {
            delsig: Address(0x01),
            sar0: Address(0x02),
            sar1: Address(0x03),
            vdac0: Address(0x04),
            vdac1: Address(0x05),
            idac0: Address(0x06),
            idac1: Address(0x07),
            wavedac: Address(0x08),
            analog_in: Address(0x15),
            capsense: Address(0x16),
        }
    }
}

/// Description of the firmware build on the companion microcontroller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    /// Optional peripherals present in the build
    pub peripherals: Peripherals,
    /// Peripheral addresses
    pub addresses: AddressMap,
    /// Number of CapSense buttons
    pub capsense_sensors: u8,
    /// Number of analog input pins
    pub analog_inputs: u8,
    /// Full-scale range of each current DAC at power-up, in milliamps
    pub idac_range: [f32; 2],
    /// Full-scale range of each voltage DAC at power-up, in volts
    pub vdac_range: [f32; 2],
}

impl Default for BoardConfig {
    /// The stock build: six CapSense buttons, eight analog inputs, both
    /// current and voltage DACs and the waveform DAC. No ADCs.
    fn default() -> Self {
        Self {
            peripherals: Peripherals::IDAC0
                | Peripherals::IDAC1
                | Peripherals::VDAC0
                | Peripherals::VDAC1
                | Peripherals::WAVEDAC,
            addresses: AddressMap::default(),
            capsense_sensors: 6,
            analog_inputs: 8,
            idac_range: [0.255; 2],
            vdac_range: [4.08; 2],
        }
    }
}

impl BoardConfig {
    /// A build with no optional peripherals, no CapSense and no analog inputs
    pub fn empty() -> Self {
        Self {
            peripherals: Peripherals::empty(),
            capsense_sensors: 0,
            analog_inputs: 0,
            ..Self::default()
        }
    }

    /// Replaces the set of optional peripherals
    pub fn with_peripherals(mut self, peripherals: Peripherals) -> Self {
        self.peripherals = peripherals;
        self
    }

    /// Replaces the address map
    pub fn with_addresses(mut self, addresses: AddressMap) -> Self {
        self.addresses = addresses;
        self
    }

    /// Sets the number of CapSense buttons
    pub fn with_capsense_sensors(mut self, count: u8) -> Self {
        self.capsense_sensors = count;
        self
    }

    /// Sets the number of analog input pins
    pub fn with_analog_inputs(mut self, count: u8) -> Self {
        self.analog_inputs = count;
        self
    }

    /// Sets the power-up full-scale ranges of the DACs
    pub fn with_dac_ranges(mut self, idac_ma: [f32; 2], vdac_volts: [f32; 2]) -> Self {
        self.idac_range = idac_ma;
        self.vdac_range = vdac_volts;
        self
    }

    /// Fails with [`ConfigError::NotPresent`] when `peripheral` is missing
    pub fn require(&self, peripheral: Peripherals, name: &'static str) -> Result<(), ConfigError> {
        if self.peripherals.contains(peripheral) {
            Ok(())
        } else {
            Err(ConfigError::NotPresent(name))
        }
    }
}

/// Board configuration plus the registry of claimed addresses
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    claimed: Vec<Address, MAX_CLAIMED>,
}

impl Board {
    /// Wraps `config` with an empty registry
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            claimed: Vec::new(),
        }
    }

    /// Firmware build description
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Records `address` as bound to a driver.
    ///
    /// Returns `false` and logs a warning when the address was already
    /// claimed. Reuse is advisory only; construction goes ahead either way.
    pub fn claim(&mut self, address: Address) -> bool {
        if self.is_claimed(address) {
            warn!("initializing a driver at address {} which is already in use", address);
            return false;
        }
        if self.claimed.push(address).is_err() {
            warn!("address registry full, {} not recorded", address);
        }
        true
    }

    /// Whether `address` has been claimed
    pub fn is_claimed(&self, address: Address) -> bool {
        self.claimed.contains(&address)
    }

    /// Addresses claimed so far, in claim order
    pub fn claimed(&self) -> &[Address] {
        &self.claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_warns_but_does_not_block_reuse() {
        let mut board = Board::new(BoardConfig::default());
        assert!(board.claim(Address(0x04)));
        assert!(!board.claim(Address(0x04)));
        assert_eq!(board.claimed(), &[Address(0x04)]);
    }

    #[test]
    fn require_reports_missing_peripheral() {
        let config = BoardConfig::empty().with_peripherals(Peripherals::SAR0);
        assert_eq!(config.require(Peripherals::SAR0, "SAR0 ADC"), Ok(()));
        assert_eq!(
            config.require(Peripherals::DELSIG, "Delta-Sigma ADC"),
            Err(ConfigError::NotPresent("Delta-Sigma ADC"))
        );
    }
}
