//! Waveform DAC commands

use core::str::FromStr;

use regiface::{Command, NoParameters};

use crate::commands::Speed;
use crate::error::InvalidArgument;
use crate::protocol::{Argument, Frame, Reply};

simple_command! {
    /// Start command (0x00)
    ///
    /// Powers up the block with its current settings.
    Start = 0x00
}

simple_command! {
    /// Stop command (0x01)
    Stop = 0x01
}

simple_command! {
    /// GenerateWave command (0x04)
    ///
    /// Announces a waveform. The firmware then reads one more frame holding
    /// `(wave code, amplitude, dc bias)`, see [`WaveParameters`].
    GenerateWave = 0x04
}

/// SetSpeed command (0x07)
#[derive(Debug, Clone, Copy)]
pub struct SetSpeed {
    /// Drive speed
    pub speed: Speed,
}

impl Command for SetSpeed {
    type IdType = u8;
    type CommandParameters = Speed;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x07
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.speed
    }
}

/// SetValue command (0x09)
///
/// Drives a static level, best used with the clock stopped.
#[derive(Debug, Clone, Copy)]
pub struct SetValue {
    /// Output count
    pub value: u8,
}

impl Command for SetValue {
    type IdType = u8;
    type CommandParameters = u8;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x09
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.value
    }
}

simple_command! {
    /// Sleep command (0x0B)
    Sleep = 0x0B
}

simple_command! {
    /// Wakeup command (0x0C)
    Wakeup = 0x0C
}

simple_command! {
    /// StartClock command (0xFD)
    StartClock = 0xFD
}

simple_command! {
    /// StopClock command (0xFE)
    StopClock = 0xFE
}

/// SetFrequency command (0xFF)
///
/// Takes a clock divider and replies with the divider actually applied,
/// minus one.
#[derive(Debug, Clone, Copy)]
pub struct SetFrequency {
    /// Requested clock divider
    pub divider: Argument,
}

impl Command for SetFrequency {
    type IdType = u8;
    type CommandParameters = Argument;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        0xFF
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.divider
    }
}

/// Frame following [`GenerateWave`].
///
/// It carries no address: the wave code takes the first byte, the amplitude
/// the second and the DC bias the argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveParameters {
    /// Waveform to generate
    pub wave: WaveType,
    /// Peak count
    pub amplitude: u8,
    /// DC bias count
    pub dc_bias: u8,
}

impl From<WaveParameters> for Frame {
    fn from(parameters: WaveParameters) -> Self {
        Frame::raw(
            parameters.wave.code(),
            parameters.amplitude,
            parameters.dc_bias.into(),
        )
    }
}

/// Waveform shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaveType {
    /// Sine wave
    Sine,
    /// Square wave
    Square,
    /// Triangle wave
    Triangle,
    /// Rising sawtooth
    Sawtooth,
}

impl WaveType {
    /// Selection code sent in the waveform parameter frame
    pub const fn code(self) -> u8 {
        match self {
            Self::Sine => 0x01,
            Self::Square => 0x03,
            Self::Triangle => 0x05,
            Self::Sawtooth => 0x07,
        }
    }
}

impl FromStr for WaveType {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SINE" => Ok(Self::Sine),
            "SQUARE" => Ok(Self::Square),
            "TRIANGLE" => Ok(Self::Triangle),
            "SAWTOOTH" => Ok(Self::Sawtooth),
            _ => Err(InvalidArgument::WaveType),
        }
    }
}
