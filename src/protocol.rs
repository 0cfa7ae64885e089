//! Wire level building blocks
//!
//! Every exchange with the companion microcontroller starts with a 4 byte
//! frame:
//!
//! | byte | content                       |
//! |------|-------------------------------|
//! | 0    | peripheral address            |
//! | 1    | command code                  |
//! | 2    | argument, least significant   |
//! | 3    | argument, most significant    |
//!
//! Exchanges that expect a result are answered with 4 bytes holding a signed
//! 32 bit value, least significant byte first.

use core::convert::Infallible;
use core::fmt;

use regiface::{ByteArray, Command, FromByteArray, ToByteArray};

use crate::error::InvalidArgument;

/// Peripheral address used to route a frame on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(pub u8);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// One request frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// First byte, normally the peripheral address
    pub address: u8,
    /// Second byte, normally the command code
    pub command: u8,
    /// 16 bit payload
    pub argument: u16,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:#04x}, {:#04x}, {:#06x})",
            self.address, self.command, self.argument
        )
    }
}

impl Frame {
    /// Frame carrying only a command
    pub const fn command(address: Address, command: u8) -> Self {
        Self {
            address: address.0,
            command,
            argument: 0,
        }
    }

    /// Frame carrying a command and an argument
    pub const fn with_argument(address: Address, command: u8, argument: u16) -> Self {
        Self {
            address: address.0,
            command,
            argument,
        }
    }

    /// Frame carrying a signed argument.
    ///
    /// Values in `i16` range travel two's complement, values up to `u16::MAX`
    /// travel unsigned. Anything else is rejected.
    pub fn with_signed(address: Address, command: u8, value: i32) -> Result<Self, InvalidArgument> {
        Ok(Self::with_argument(address, command, encode_argument(value)?))
    }

    /// Frame carrying `command` to the peripheral at `address`.
    ///
    /// The command's parameters fill the argument slot least significant
    /// byte first; parameters shorter than two bytes are zero extended.
    pub fn for_command<C>(address: Address, command: C) -> Self
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let parameters = match command.invoking_parameters().to_bytes() {
            Ok(bytes) => bytes,
            Err(never) => match never {},
        };

        let mut argument = [0u8; 2];
        for (slot, byte) in argument.iter_mut().zip(parameters.as_ref()) {
            *slot = *byte;
        }
        Self::with_argument(address, C::id(), u16::from_le_bytes(argument))
    }

    /// Frame with arbitrary contents in all three slots.
    ///
    /// The waveform DAC expects its waveform parameters in this form, without
    /// an address.
    pub const fn raw(first: u8, second: u8, argument: u16) -> Self {
        Self {
            address: first,
            command: second,
            argument,
        }
    }
}

impl ToByteArray for Frame {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [lo, hi] = self.argument.to_le_bytes();
        Ok([self.address, self.command, lo, hi])
    }
}

/// Contents of the 16 bit argument slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Argument(pub u16);

impl Argument {
    /// Encodes a signed value, see [`encode_argument`]
    pub fn signed(value: i32) -> Result<Self, InvalidArgument> {
        encode_argument(value).map(Self)
    }
}

impl From<u8> for Argument {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl From<u16> for Argument {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<i16> for Argument {
    fn from(value: i16) -> Self {
        Self(value as u16)
    }
}

impl ToByteArray for Argument {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_le_bytes())
    }
}

/// Fits a signed value into the 16 bit argument slot
pub fn encode_argument(value: i32) -> Result<u16, InvalidArgument> {
    if let Ok(signed) = i16::try_from(value) {
        Ok(signed as u16)
    } else {
        u16::try_from(value).map_err(|_| InvalidArgument::Overflow(value))
    }
}

/// Reply to a receiving exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reply(pub i32);

impl Reply {
    /// Raw reply value
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl FromByteArray for Reply {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(i32::from_le_bytes(bytes)))
    }
}

/// Converts a reply in millionths to a float
pub(crate) fn micros_to_unit(micros: i32) -> f32 {
    (micros as f64 / 1_000_000.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout_is_address_command_then_little_endian_argument() {
        let frame = Frame::with_argument(Address(0x06), 0x05, 0x1234);
        assert_eq!(frame.to_bytes(), Ok([0x06, 0x05, 0x34, 0x12]));
    }

    #[test]
    fn signed_arguments_use_twos_complement() {
        assert_eq!(encode_argument(-1), Ok(0xFFFF));
        assert_eq!(encode_argument(-32768), Ok(0x8000));
        assert_eq!(encode_argument(40_000), Ok(40_000));
        assert_eq!(encode_argument(70_000), Err(InvalidArgument::Overflow(70_000)));
        assert_eq!(encode_argument(-40_000), Err(InvalidArgument::Overflow(-40_000)));
    }

    #[test]
    fn negative_arguments_fill_both_bytes() {
        assert_eq!(Argument::from(-2i16).to_bytes(), Ok([0xFE, 0xFF]));
        assert_eq!(Argument::signed(-300), Ok(Argument(0xFED4)));
        assert_eq!(Argument::signed(65_536), Err(InvalidArgument::Overflow(65_536)));
    }

    #[test]
    fn reply_is_signed_little_endian() {
        assert_eq!(Reply::from_bytes([0x10, 0x27, 0, 0]), Ok(Reply(10_000)));
        assert_eq!(Reply::from_bytes([0xFE, 0xFF, 0xFF, 0xFF]), Ok(Reply(-2)));
    }
}
