//! Analog input pins
//!
//! The pins are multiplexed onto one sequencing ADC on the device. Offset
//! and resolution are properties of that shared ADC, so setting them through
//! one [`AnalogPin`] affects every other pin as well.

use crate::board::Board;
use crate::commands::{analog, Resolution};
use crate::error::{ConfigError, Error, InvalidArgument};
use crate::protocol::Address;
use crate::transport::Transport;

/// Decimal places returned by [`AnalogPin::read_volts`] unless asked otherwise
pub const DEFAULT_PRECISION: u8 = 2;
/// Largest supported decimal precision; the device reports microvolts
pub const MAX_PRECISION: u8 = 5;

/// An analog input pin
#[derive(Debug, Clone)]
pub struct AnalogPin {
    address: Address,
    pin: u8,
}

impl AnalogPin {
    /// Binds to analog input `pin`.
    ///
    /// All pins share the analog input address, so binding one does not
    /// claim it.
    pub fn new(board: &Board, pin: u8) -> Result<Self, Error> {
        let config = board.config();
        if pin >= config.analog_inputs {
            return Err(ConfigError::InvalidPin {
                pin,
                available: config.analog_inputs,
            }
            .into());
        }

        Ok(Self {
            address: config.addresses.analog_in,
            pin,
        })
    }

    /// Shared analog input address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Analog input index
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Converts the pin and returns counts at the current resolution
    pub fn read<T: Transport>(&mut self, bus: &mut T) -> Result<i32, Error> {
        let reply = bus.execute(self.address, analog::Read { pin: self.pin })?;
        Ok(reply.value())
    }

    /// Converts the pin and returns volts rounded to `precision` decimals.
    ///
    /// The conversion to volts happens on the device, so the result does not
    /// depend on the configured resolution.
    pub fn read_volts<T: Transport>(&mut self, bus: &mut T, precision: u8) -> Result<f32, Error> {
        if precision > MAX_PRECISION {
            return Err(InvalidArgument::Precision(precision).into());
        }
        let reply = bus.execute(self.address, analog::ReadVolts { pin: self.pin })?;
        Ok(round_microvolts(reply.value(), precision))
    }

    /// Sets the offset in counts subtracted before voltage conversion
    pub fn set_offset<T: Transport>(&mut self, bus: &mut T, counts: i16) -> Result<(), Error> {
        bus.execute(
            self.address,
            analog::SetOffset {
                offset: counts.into(),
            },
        )?;
        Ok(())
    }

    /// Sets the resolution of the shared ADC: 8, 10 or 12 bits
    pub fn set_resolution<T: Transport>(&mut self, bus: &mut T, bits: u8) -> Result<(), Error> {
        let resolution = Resolution::try_from(bits)?;
        bus.execute(self.address, analog::SetResolution { resolution })?;
        Ok(())
    }
}

/// Rounds a microvolt reading to `precision` decimals of a volt, half away
/// from zero. Done in integers so no digits are lost before rounding.
fn round_microvolts(microvolts: i32, precision: u8) -> f32 {
    let step = 10i64.pow(u32::from(6 - precision));
    let micros = i64::from(microvolts);
    let half = step / 2;
    let steps = if micros >= 0 {
        (micros + half) / step
    } else {
        (micros - half) / step
    };
    (steps as f64 / 10i64.pow(u32::from(precision)) as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_requested_decimals() {
        assert_eq!(round_microvolts(1_234_567, 2), 1.23);
        assert_eq!(round_microvolts(1_235_000, 2), 1.24);
        assert_eq!(round_microvolts(1_234_567, 5), 1.23457);
        assert_eq!(round_microvolts(1_500_000, 0), 2.0);
    }

    #[test]
    fn rounds_negative_readings_away_from_zero() {
        assert_eq!(round_microvolts(-1_235_000, 2), -1.24);
        assert_eq!(round_microvolts(-4_000, 2), 0.0);
    }
}
