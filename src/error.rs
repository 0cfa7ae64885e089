//! Error types
//!
//! Every fallible driver operation returns [`Error`]. Configuration and
//! argument errors are raised before anything is put on the wire, so a failed
//! call leaves the transport and the device untouched.

use core::fmt;

use regiface::errors::Error as RegifaceError;

use crate::commands::AdcKind;

/// Failures detected while binding a driver to the board
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The peripheral is not part of the firmware build
    NotPresent(&'static str),
    /// The firmware build has no CapSense sensors
    NoCapSense,
    /// Sensor or pin index beyond what the board exposes
    InvalidPin {
        /// Requested pin
        pin: u8,
        /// Number of pins available on the board
        available: u8,
    },
    /// Channel index other than 0 or 1
    InvalidChannel(u8),
    /// ADC name other than `DELSIG`, `SAR0` or `SAR1`
    UnknownAdc,
}

/// Argument rejected before any exchange
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidArgument {
    /// Resolution other than 8, 10 or 12 bits
    Resolution(u8),
    /// Delta-sigma buffer gain other than 1, 2, 4 or 8
    BufferGain(u8),
    /// IDAC range mode other than 0, 1 or 2
    RangeMode(u8),
    /// Decimal precision above [`MAX_PRECISION`](crate::peripherals::analog_pin::MAX_PRECISION)
    Precision(u8),
    /// Physical value that is negative or not a number
    PhysicalValue,
    /// Value that does not fit in the 16 bit argument slot of a frame
    Overflow(i32),
    /// Unrecognised speed name
    Speed,
    /// Unrecognised IDAC polarity name
    Polarity,
    /// Unrecognised range name
    Range,
    /// Unrecognised waveform name
    WaveType,
}

/// Bus level failures reported by a [`Transport`](crate::Transport)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The underlying SPI or I2C exchange failed
    Bus,
    /// The reply could not be decoded
    Decode,
}

impl From<RegifaceError> for TransportError {
    fn from(err: RegifaceError) -> Self {
        match err {
            RegifaceError::BusError => Self::Bus,
            _ => Self::Decode,
        }
    }
}

/// Driver error
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The driver could not be bound to the board
    Config(ConfigError),
    /// An argument was outside its allowed set or range
    InvalidArgument(InvalidArgument),
    /// The operation does not exist for this ADC variant
    Unsupported {
        /// Variant the driver is bound to
        kind: AdcKind,
        /// Name of the rejected operation
        operation: &'static str,
    },
    /// [`CapSense::is_touched`](crate::CapSense::is_touched) was called before a baseline was taken
    Uncalibrated,
    /// Baseline acquisition gave up after the given number of read pairs
    Unstable {
        /// Read pairs attempted
        attempts: u32,
    },
    /// The device answered with a value outside the expected domain
    UnexpectedReply(i32),
    /// The transport failed
    Transport(TransportError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InvalidArgument> for Error {
    fn from(err: InvalidArgument) -> Self {
        Self::InvalidArgument(err)
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<RegifaceError> for Error {
    fn from(err: RegifaceError) -> Self {
        Self::Transport(err.into())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPresent(name) => write!(f, "{name} not found in the firmware build"),
            Self::NoCapSense => f.write_str("no CapSense sensors found in the firmware build"),
            Self::InvalidPin { pin, available } => {
                write!(f, "pin {pin} out of range, {available} available")
            }
            Self::InvalidChannel(channel) => write!(f, "invalid channel {channel}, choose 0 or 1"),
            Self::UnknownAdc => f.write_str("unknown ADC, choose DELSIG, SAR0 or SAR1"),
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution(bits) => write!(f, "invalid resolution {bits}, use 8, 10 or 12"),
            Self::BufferGain(gain) => write!(f, "invalid buffer gain {gain}, use 1, 2, 4 or 8"),
            Self::RangeMode(mode) => write!(f, "invalid range mode {mode}, use 0, 1 or 2"),
            Self::Precision(digits) => write!(f, "precision {digits} exceeds 5 decimals"),
            Self::PhysicalValue => f.write_str("value must be a non-negative number"),
            Self::Overflow(value) => write!(f, "{value} does not fit in a 16 bit argument"),
            Self::Speed => f.write_str("invalid speed, use HIGH or LOW"),
            Self::Polarity => f.write_str("invalid polarity, use SOURCE or SINK"),
            Self::Range => f.write_str("invalid range, use HIGH or LOW"),
            Self::WaveType => f.write_str("invalid wave type, use SINE, SQUARE, TRIANGLE or SAWTOOTH"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            Self::Unsupported { kind, operation } => {
                write!(f, "{operation} is not supported by the {} ADC", kind.name())
            }
            Self::Uncalibrated => f.write_str("CapSense baseline not acquired, call start first"),
            Self::Unstable { attempts } => {
                write!(f, "CapSense baseline did not settle after {attempts} read pairs")
            }
            Self::UnexpectedReply(value) => write!(f, "unexpected reply {value}"),
            Self::Transport(TransportError::Bus) => f.write_str("transport bus error"),
            Self::Transport(TransportError::Decode) => f.write_str("malformed reply"),
        }
    }
}
