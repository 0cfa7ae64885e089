//! Waveform DAC
//!
//! The waveform DAC replays a stored waveform, clocked from a divided master
//! clock. Amplitude and DC bias are held here and only reach the device with
//! the next [`generate`](WaveDac::generate).
//!
//! # Frequency
//! Each waveform period is 100 samples, so the output frequency is
//! `master_clock / divider / 100`. The divider is an integer, so the device
//! reports back the divider it actually applied and [`frequency`]
//! recomputes the real frequency from it without a bus exchange.
//!
//! [`frequency`]: WaveDac::frequency

use crate::board::{Board, Peripherals};
use crate::commands::wavedac::{self, WaveParameters};
use crate::commands::{Speed, WaveType};
use crate::error::{Error, InvalidArgument};
use crate::protocol::Address;
use crate::transport::Transport;

/// Frequency of the clock feeding the divider, in Hz
pub const MASTER_CLOCK_HZ: u32 = 3_000_000;
/// Lowest frequency any divider can reach, in Hz
pub const MIN_FREQUENCY_HZ: f32 = 0.46;
/// Highest supported frequency, in Hz
pub const MAX_FREQUENCY_HZ: f32 = 2500.0;
/// Nominal peak voltage represented by the full 8 bit count
pub const FULL_SCALE_VOLTS: f32 = 4.0;

const SAMPLES_PER_PERIOD: f32 = 100.0;
const INITIAL_DIVIDER: u32 = 12;

/// The waveform DAC
#[derive(Debug, Clone)]
pub struct WaveDac {
    address: Address,
    master_clock: u32,
    frequency: f32,
    divider: u32,
    amplitude: u8,
    dc_bias: u8,
    wave: WaveType,
}

impl WaveDac {
    /// Binds to the waveform DAC.
    ///
    /// Starts out with full amplitude, no DC bias and a sine wave.
    pub fn new(board: &mut Board) -> Result<Self, Error> {
        let config = board.config();
        config.require(Peripherals::WAVEDAC, "Wave DAC")?;
        let address = config.addresses.wavedac;
        board.claim(address);

        Ok(Self {
            address,
            master_clock: MASTER_CLOCK_HZ,
            frequency: MASTER_CLOCK_HZ as f32 / (INITIAL_DIVIDER as f32 * SAMPLES_PER_PERIOD),
            divider: INITIAL_DIVIDER,
            amplitude: u8::MAX,
            dc_bias: 0,
            wave: WaveType::Sine,
        })
    }

    /// Address the DAC is bound to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Amplitude count sent with the next waveform
    pub fn amplitude(&self) -> u8 {
        self.amplitude
    }

    /// DC bias count sent with the next waveform
    pub fn dc_bias(&self) -> u8 {
        self.dc_bias
    }

    /// Waveform selected by the last [`generate`](Self::generate)
    pub fn wave(&self) -> WaveType {
        self.wave
    }

    /// Clock divider confirmed by the device
    pub fn divider(&self) -> u32 {
        self.divider
    }

    /// Frequency last requested, after clamping
    pub fn requested_frequency(&self) -> f32 {
        self.frequency
    }

    /// Powers up the block with its current settings
    pub fn start<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, wavedac::Start)?;
        Ok(())
    }

    /// Stops the waveform and powers down the block
    pub fn stop<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, wavedac::Stop)?;
        Ok(())
    }

    /// Selects the drive speed
    pub fn set_speed<T: Transport>(&mut self, bus: &mut T, speed: Speed) -> Result<(), Error> {
        bus.execute(self.address, wavedac::SetSpeed { speed })?;
        Ok(())
    }

    /// Starts generating `wave` with the stored amplitude and DC bias.
    ///
    /// The firmware expects the generate command first and the
    /// [`WaveParameters`] as a second frame.
    pub fn generate<T: Transport>(&mut self, bus: &mut T, wave: WaveType) -> Result<(), Error> {
        bus.execute(self.address, wavedac::GenerateWave)?;
        bus.send(
            WaveParameters {
                wave,
                amplitude: self.amplitude,
                dc_bias: self.dc_bias,
            }
            .into(),
        )?;
        self.wave = wave;
        Ok(())
    }

    /// Drives a static output count.
    ///
    /// Stop the clock first, or the running waveform overwrites the value.
    pub fn set_value<T: Transport>(&mut self, bus: &mut T, value: u8) -> Result<(), Error> {
        bus.execute(self.address, wavedac::SetValue { value })?;
        Ok(())
    }

    /// Stops the block and saves its configuration
    pub fn sleep<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, wavedac::Sleep)?;
        Ok(())
    }

    /// Restores the configuration saved by [`sleep`](Self::sleep)
    pub fn wakeup<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, wavedac::Wakeup)?;
        Ok(())
    }

    /// Restarts the waveform clock
    pub fn start_clock<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, wavedac::StartClock)?;
        Ok(())
    }

    /// Stops the waveform clock so [`set_value`](Self::set_value) holds
    pub fn stop_clock<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, wavedac::StopClock)?;
        Ok(())
    }

    /// Requests the divider closest to `hz`.
    ///
    /// Frequencies outside 0.46 Hz to 2.5 kHz are clamped with a warning.
    /// Use [`frequency`](Self::frequency) to learn the frequency achieved.
    pub fn set_frequency<T: Transport>(&mut self, bus: &mut T, hz: f32) -> Result<(), Error> {
        if hz.is_nan() {
            return Err(InvalidArgument::PhysicalValue.into());
        }
        let hz = if hz > MAX_FREQUENCY_HZ {
            warn!("wave frequency {} Hz above 2.5 kHz, using 2.5 kHz", hz);
            MAX_FREQUENCY_HZ
        } else if hz < MIN_FREQUENCY_HZ {
            warn!("wave frequency {} Hz below 0.46 Hz, using 0.46 Hz", hz);
            MIN_FREQUENCY_HZ
        } else {
            hz
        };

        let divider = (self.master_clock as f32 / (hz * SAMPLES_PER_PERIOD) + 0.5) as u32;
        let divider = u16::try_from(divider).map_err(|_| InvalidArgument::Overflow(divider as i32))?;

        let reply = bus.execute(
            self.address,
            wavedac::SetFrequency {
                divider: divider.into(),
            },
        )?;
        let applied = u32::try_from(reply.value()).map_err(|_| Error::UnexpectedReply(reply.value()))?;

        self.frequency = hz;
        self.divider = applied + 1;
        Ok(())
    }

    /// Actual output frequency in Hz, from the divider confirmed by the
    /// device
    pub fn frequency(&self) -> f32 {
        self.master_clock as f32 / self.divider as f32 / SAMPLES_PER_PERIOD
    }

    /// Sets the peak voltage of the next waveform.
    ///
    /// 4 V is nominal full scale; anything from 4.08 V up saturates at count
    /// 255.
    pub fn set_amplitude(&mut self, volts: f32) -> Result<(), Error> {
        self.amplitude = volts_to_count(volts)?;
        Ok(())
    }

    /// Sets the DC bias of the next waveform, scaled like
    /// [`set_amplitude`](Self::set_amplitude)
    pub fn set_dc_bias(&mut self, volts: f32) -> Result<(), Error> {
        self.dc_bias = volts_to_count(volts)?;
        Ok(())
    }
}

fn volts_to_count(volts: f32) -> Result<u8, InvalidArgument> {
    if volts.is_nan() || volts < 0.0 {
        return Err(InvalidArgument::PhysicalValue);
    }
    let count = u8::MAX as f32 / FULL_SCALE_VOLTS * volts + 0.5;
    Ok(if count >= u8::MAX as f32 { u8::MAX } else { count as u8 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volts_scale_to_255_over_4_volts() {
        assert_eq!(volts_to_count(0.0), Ok(0));
        assert_eq!(volts_to_count(2.0), Ok(128));
        assert_eq!(volts_to_count(4.0), Ok(255));
        assert_eq!(volts_to_count(4.08), Ok(255));
        assert_eq!(volts_to_count(12.0), Ok(255));
    }

    #[test]
    fn negative_volts_are_rejected() {
        assert_eq!(volts_to_count(-1.0), Err(InvalidArgument::PhysicalValue));
    }
}
