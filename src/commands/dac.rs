//! Current and voltage DAC commands
//!
//! Both DACs are 8 bit: a count of 255 produces the full-scale value of the
//! selected range.

use core::convert::Infallible;
use core::str::FromStr;

use regiface::ToByteArray;

use crate::board::Peripherals;
use crate::error::{ConfigError, InvalidArgument};

/// Current DAC commands
pub mod idac {
    use regiface::{Command, NoParameters};

    use super::{IdacPolarity, IdacRange, Speed};

    simple_command! {
        /// Start command (0x00)
        ///
        /// Enables and powers up the DAC.
        Start = 0x00
    }

    simple_command! {
        /// Stop command (0x01)
        ///
        /// Powers down the DAC and disables its output.
        Stop = 0x01
    }

    /// SetSpeed command (0x02)
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
            0x02
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.speed
        }
    }

    /// SetPolarity command (0x03)
    #[derive(Debug, Clone, Copy)]
    pub struct SetPolarity {
        /// Output polarity
        pub polarity: IdacPolarity,
    }

    impl Command for SetPolarity {
        type IdType = u8;
        type CommandParameters = IdacPolarity;
        type ResponseParameters = NoParameters;

        fn id() -> Self::IdType {
            0x03
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.polarity
        }
    }

    /// SetRange command (0x04)
    #[derive(Debug, Clone, Copy)]
    pub struct SetRange {
        /// Full-scale range
        pub range: IdacRange,
    }

    impl Command for SetRange {
        type IdType = u8;
        type CommandParameters = IdacRange;
        type ResponseParameters = NoParameters;

        fn id() -> Self::IdType {
            0x04
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.range
        }
    }

    /// SetValue command (0x05)
    #[derive(Debug, Clone, Copy)]
    pub struct SetValue {
        /// Output count, 255 is full scale
        pub value: u8,
    }

    impl Command for SetValue {
        type IdType = u8;
        type CommandParameters = u8;
        type ResponseParameters = NoParameters;

        fn id() -> Self::IdType {
            0x05
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.value
        }
    }

    simple_command! {
        /// Sleep command (0x06)
        ///
        /// Stops the DAC and saves its configuration.
        Sleep = 0x06
    }

    simple_command! {
        /// Wakeup command (0x07)
        ///
        /// Restores the configuration saved by [`Sleep`].
        Wakeup = 0x07
    }
}

/// Voltage DAC commands
pub mod vdac {
    use regiface::{Command, NoParameters};

    use super::{Speed, VdacRange};

    simple_command! {
        /// Start command (0x00)
        Start = 0x00
    }

    simple_command! {
        /// Stop command (0x01)
        Stop = 0x01
    }

    /// SetSpeed command (0x02)
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
            0x02
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.speed
        }
    }

    /// SetRange command (0x03)
    #[derive(Debug, Clone, Copy)]
    pub struct SetRange {
        /// Full-scale range
        pub range: VdacRange,
    }

    impl Command for SetRange {
        type IdType = u8;
        type CommandParameters = VdacRange;
        type ResponseParameters = NoParameters;

        fn id() -> Self::IdType {
            0x03
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.range
        }
    }

    /// SetValue command (0x04)
    #[derive(Debug, Clone, Copy)]
    pub struct SetValue {
        /// Output count, 255 is full scale
        pub value: u8,
    }

    impl Command for SetValue {
        type IdType = u8;
        type CommandParameters = u8;
        type ResponseParameters = NoParameters;

        fn id() -> Self::IdType {
            0x04
        }

        fn invoking_parameters(self) -> Self::CommandParameters {
            self.value
        }
    }

    simple_command! {
        /// Sleep command (0x05)
        Sleep = 0x05
    }

    simple_command! {
        /// Wakeup command (0x06)
        Wakeup = 0x06
    }
}

/// Highest DAC count
pub const MAX_COUNT: u8 = u8::MAX;

/// Converts a physical value to the count that produces it.
///
/// The result is `value / full_range * 255` rounded half up. Values at or
/// above `full_range` saturate to 255. Negative or NaN values are rejected.
pub fn counts_for(value: f32, full_range: f32) -> Result<u8, InvalidArgument> {
    if value.is_nan() || value < 0.0 {
        return Err(InvalidArgument::PhysicalValue);
    }
    if value >= full_range {
        return Ok(MAX_COUNT);
    }
    Ok((value / full_range * MAX_COUNT as f32 + 0.5) as u8)
}

/// Drive speed of a DAC, trading settling time for power
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// Slow settling, low power
    Low = 0,
    /// Fast settling
    High = 1,
}

impl FromStr for Speed {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "HIGH" => Ok(Self::High),
            _ => Err(InvalidArgument::Speed),
        }
    }
}

impl ToByteArray for Speed {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// Current DAC output polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdacPolarity {
    /// Current flows out of the pin
    Source = 0,
    /// Current flows into the pin
    Sink = 1,
}

impl FromStr for IdacPolarity {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SOURCE" => Ok(Self::Source),
            "SINK" => Ok(Self::Sink),
            _ => Err(InvalidArgument::Polarity),
        }
    }
}

impl ToByteArray for IdacPolarity {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// Current DAC full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdacRange {
    /// 31.875 µA full scale
    Micro32 = 0,
    /// 255 µA full scale
    Micro255 = 1,
    /// 2.04 mA full scale
    Milli2 = 2,
}

impl IdacRange {
    /// Full-scale current in milliamps
    pub const fn full_range_ma(self) -> f32 {
        match self {
            Self::Micro32 => 0.031875,
            Self::Micro255 => 0.255,
            Self::Milli2 => 2.04,
        }
    }
}

impl TryFrom<u8> for IdacRange {
    type Error = InvalidArgument;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Micro32),
            1 => Ok(Self::Micro255),
            2 => Ok(Self::Milli2),
            invalid => Err(InvalidArgument::RangeMode(invalid)),
        }
    }
}

impl ToByteArray for IdacRange {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// Voltage DAC full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VdacRange {
    /// 1.020 V full scale
    Low = 0,
    /// 4.080 V full scale
    High = 1,
}

impl VdacRange {
    /// Full-scale voltage in volts
    pub const fn full_range_volts(self) -> f32 {
        match self {
            Self::Low => 1.02,
            Self::High => 4.08,
        }
    }
}

impl FromStr for VdacRange {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "HIGH" => Ok(Self::High),
            _ => Err(InvalidArgument::Range),
        }
    }
}

impl ToByteArray for VdacRange {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

/// Current DAC instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdacChannel {
    /// First current DAC
    Idac0 = 0,
    /// Second current DAC
    Idac1 = 1,
}

impl IdacChannel {
    /// Position in per-channel configuration arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Presence flag in the board configuration
    pub const fn peripheral(self) -> Peripherals {
        match self {
            Self::Idac0 => Peripherals::IDAC0,
            Self::Idac1 => Peripherals::IDAC1,
        }
    }

    /// Name used in configuration errors
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idac0 => "IDAC0",
            Self::Idac1 => "IDAC1",
        }
    }
}

impl TryFrom<u8> for IdacChannel {
    type Error = ConfigError;

    fn try_from(channel: u8) -> Result<Self, Self::Error> {
        match channel {
            0 => Ok(Self::Idac0),
            1 => Ok(Self::Idac1),
            invalid => Err(ConfigError::InvalidChannel(invalid)),
        }
    }
}

/// Voltage DAC instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VdacChannel {
    /// First voltage DAC
    Vdac0 = 0,
    /// Second voltage DAC
    Vdac1 = 1,
}

impl VdacChannel {
    /// Position in per-channel configuration arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Presence flag in the board configuration
    pub const fn peripheral(self) -> Peripherals {
        match self {
            Self::Vdac0 => Peripherals::VDAC0,
            Self::Vdac1 => Peripherals::VDAC1,
        }
    }

    /// Name used in configuration errors
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vdac0 => "VDAC0",
            Self::Vdac1 => "VDAC1",
        }
    }
}

impl TryFrom<u8> for VdacChannel {
    type Error = ConfigError;

    fn try_from(channel: u8) -> Result<Self, Self::Error> {
        match channel {
            0 => Ok(Self::Vdac0),
            1 => Ok(Self::Vdac1),
            invalid => Err(ConfigError::InvalidChannel(invalid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_full_scale() {
        assert_eq!(counts_for(0.0, 1.02), Ok(0));
        assert_eq!(counts_for(1.02, 1.02), Ok(255));
        assert_eq!(counts_for(2.04, 2.04), Ok(255));
    }

    #[test]
    fn above_full_scale_saturates() {
        assert_eq!(counts_for(1.5, 1.02), Ok(255));
        assert_eq!(counts_for(f32::INFINITY, 4.08), Ok(255));
    }

    #[test]
    fn negative_and_nan_are_rejected() {
        assert_eq!(counts_for(-0.01, 1.02), Err(InvalidArgument::PhysicalValue));
        assert_eq!(counts_for(f32::NAN, 1.02), Err(InvalidArgument::PhysicalValue));
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(counts_for(0.51, 1.02), Ok(128));
        assert_eq!(counts_for(0.1275, 0.255), Ok(128));
        assert_eq!(counts_for(0.001, 1.02), Ok(0));
    }

    #[test]
    fn parse_enumerated_strings() {
        assert_eq!("HIGH".parse(), Ok(Speed::High));
        assert_eq!("MEDIUM".parse::<Speed>(), Err(InvalidArgument::Speed));
        assert_eq!("SINK".parse(), Ok(IdacPolarity::Sink));
        assert_eq!("sink".parse::<IdacPolarity>(), Err(InvalidArgument::Polarity));
        assert_eq!("LOW".parse(), Ok(VdacRange::Low));
        assert_eq!("MID".parse::<VdacRange>(), Err(InvalidArgument::Range));
    }

    #[test]
    fn idac_range_modes() {
        assert_eq!(IdacRange::try_from(2).map(IdacRange::full_range_ma), Ok(2.04));
        assert_eq!(IdacRange::try_from(3), Err(InvalidArgument::RangeMode(3)));
    }

    #[test]
    fn channels_are_zero_or_one() {
        assert_eq!(VdacChannel::try_from(1), Ok(VdacChannel::Vdac1));
        assert_eq!(IdacChannel::try_from(2), Err(ConfigError::InvalidChannel(2)));
    }
}
