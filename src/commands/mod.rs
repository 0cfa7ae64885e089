//! Firmware commands
//!
//! Every operation the firmware understands is a type implementing
//! [`regiface::Command`]: its `id()` is the command code and its parameters
//! fill the 16 bit argument slot of the frame. Execute them with
//! [`Transport::execute`](crate::Transport::execute).
//!
//! Command codes are only meaningful together with the peripheral family they
//! are sent to: `0x03` starts a conversion on the delta-sigma ADC, selects
//! the range of a voltage DAC and sets the polarity of a current DAC. Each
//! family therefore gets its own module of commands, alongside the typed
//! arguments they accept.
//!
//! # Families
//! - [`capsense`]: CapSense buttons
//! - [`analog`]: analog input pins
//! - [`adc`]: delta-sigma and SAR ADCs, generic over the variant's [`AdcCommands`] table
//! - [`dac`]: current and voltage DACs
//! - [`wavedac`]: waveform DAC
//!
//! # Argument validation
//! Enumerated arguments are modelled as enums with `TryFrom<u8>` and
//! `FromStr` implementations. Validation happens while building the
//! argument, so an invalid value never reaches the transport.

use core::convert::Infallible;

use regiface::ToByteArray;

use crate::error::InvalidArgument;

/// Declares a command that carries no argument and expects no reply
macro_rules! simple_command {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl regiface::Command for $name {
            type IdType = u8;
            type CommandParameters = regiface::NoParameters;
            type ResponseParameters = regiface::NoParameters;

            fn id() -> Self::IdType {
                $id
            }

            fn invoking_parameters(self) -> Self::CommandParameters {
                regiface::NoParameters::default()
            }
        }
    };
}

pub mod adc;
pub mod analog;
pub mod capsense;
pub mod dac;
pub mod wavedac;

pub use adc::{AdcCommands, AdcKind, AdcVariant, BufferGain};
pub use dac::{IdacChannel, IdacPolarity, IdacRange, Speed, VdacChannel, VdacRange};
pub use wavedac::WaveType;

/// Resolution of the SAR ADCs and of the analog input pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 8 bits
    Bits8 = 8,
    /// 10 bits
    Bits10 = 10,
    /// 12 bits
    Bits12 = 12,
}

impl Resolution {
    /// Number of bits
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Resolution {
    type Error = InvalidArgument;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            10 => Ok(Self::Bits10),
            12 => Ok(Self::Bits12),
            invalid => Err(InvalidArgument::Resolution(invalid)),
        }
    }
}

impl ToByteArray for Resolution {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.bits()])
    }
}
