//! ADC commands
//!
//! The delta-sigma ADC and the two SAR ADCs share most operations, but the
//! firmware assigns them different codes. The shared commands are generic
//! over an [`AdcVariant`], a sealed marker type carrying the variant's
//! [`AdcCommands`] table, so `StartConvert<DelSig>` and `StartConvert<Sar>`
//! are distinct commands. Operations only one variant has are plain commands.
//!
//! | operation          | DelSig | Sar0/Sar1 |
//! |--------------------|--------|-----------|
//! | start              | 0x00   | 0x00      |
//! | stop               | 0x01   | 0x01      |
//! | set buffer gain    | 0x02   | -         |
//! | set resolution     | -      | 0x03      |
//! | start convert      | 0x03   | 0x04      |
//! | stop convert       | 0x04   | 0x05      |
//! | is end conversion  | 0x07   | 0x08      |
//! | get result         | 0x0A   | 0x0A      |
//! | read               | 0x0D   | -         |
//! | set offset         | 0x0E   | 0x0B      |
//! | set gain           | 0x0F   | 0x0C      |
//! | counts to volts    | 0x10   | 0x0D      |
//! | sleep              | 0x14   | 0x10      |
//! | wakeup             | 0x15   | 0x11      |

use core::convert::Infallible;
use core::marker::PhantomData;
use core::str::FromStr;

use regiface::{Command, NoParameters, ToByteArray};

use crate::board::Peripherals;
use crate::commands::Resolution;
use crate::error::{ConfigError, InvalidArgument};
use crate::protocol::{Argument, Reply};

/// Codes of the operations every ADC variant supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcCommands {
    /// Configure and power up
    pub start: u8,
    /// Power down
    pub stop: u8,
    /// Start conversions
    pub start_convert: u8,
    /// Stop conversions
    pub stop_convert: u8,
    /// Poll for the end of a conversion
    pub is_end_conversion: u8,
    /// Fetch the last conversion result
    pub get_result: u8,
    /// Set the offset used for voltage conversion
    pub set_offset: u8,
    /// Set the gain used for voltage conversion
    pub set_gain: u8,
    /// Convert counts to microvolts
    pub counts_to_volts: u8,
    /// Save configuration and stop
    pub sleep: u8,
    /// Restore configuration
    pub wakeup: u8,
}

/// Delta-sigma ADC command table
pub const DELSIG_COMMANDS: AdcCommands = AdcCommands {
    start: 0x00,
    stop: 0x01,
    start_convert: 0x03,
    stop_convert: 0x04,
    is_end_conversion: 0x07,
    get_result: 0x0A,
    set_offset: 0x0E,
    set_gain: 0x0F,
    counts_to_volts: 0x10,
    sleep: 0x14,
    wakeup: 0x15,
};

/// SAR ADC command table, shared by both SAR instances
pub const SAR_COMMANDS: AdcCommands = AdcCommands {
    start: 0x00,
    stop: 0x01,
    start_convert: 0x04,
    stop_convert: 0x05,
    is_end_conversion: 0x08,
    get_result: 0x0A,
    set_offset: 0x0B,
    set_gain: 0x0C,
    counts_to_volts: 0x0D,
    sleep: 0x10,
    wakeup: 0x11,
};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::DelSig {}
    impl Sealed for super::Sar {}
}

/// ADC design a shared command is addressed to
pub trait AdcVariant: sealed::Sealed {
    /// Command table of the design
    const COMMANDS: AdcCommands;
}

/// Delta-sigma ADC design
#[derive(Debug, Clone, Copy)]
pub enum DelSig {}

/// SAR ADC design
#[derive(Debug, Clone, Copy)]
pub enum Sar {}

impl AdcVariant for DelSig {
    const COMMANDS: AdcCommands = DELSIG_COMMANDS;
}

impl AdcVariant for Sar {
    const COMMANDS: AdcCommands = SAR_COMMANDS;
}

/// Declares a shared command without argument whose code comes from the
/// variant's table
macro_rules! variant_command {
    ($(#[$meta:meta])* $name:ident => $code:ident, $response:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<V>(PhantomData<V>);

        impl<V> $name<V> {
            /// Creates the command
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<V> Default for $name<V> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<V: AdcVariant> Command for $name<V> {
            type IdType = u8;
            type CommandParameters = NoParameters;
            type ResponseParameters = $response;

            fn id() -> Self::IdType {
                V::COMMANDS.$code
            }

            fn invoking_parameters(self) -> Self::CommandParameters {
                NoParameters::default()
            }
        }
    };
}

variant_command! {
    /// Start command
    ///
    /// Configures and powers up the ADC without starting conversions.
    Start => start, NoParameters
}

variant_command! {
    /// Stop command
    Stop => stop, NoParameters
}

variant_command! {
    /// StartConvert command
    StartConvert => start_convert, NoParameters
}

variant_command! {
    /// StopConvert command
    StopConvert => stop_convert, NoParameters
}

variant_command! {
    /// IsEndConversion command
    ///
    /// Replies 0 while a conversion is running, otherwise the result.
    IsEndConversion => is_end_conversion, Reply
}

variant_command! {
    /// GetResult command
    ///
    /// Replies with the last completed conversion in signed counts.
    GetResult => get_result, Reply
}

variant_command! {
    /// Sleep command
    Sleep => sleep, NoParameters
}

variant_command! {
    /// Wakeup command
    Wakeup => wakeup, NoParameters
}

/// SetOffset command
#[derive(Debug, Clone, Copy)]
pub struct SetOffset<V> {
    /// Offset in counts
    pub offset: Argument,
    variant: PhantomData<V>,
}

impl<V> SetOffset<V> {
    /// Creates the command
    pub const fn new(offset: Argument) -> Self {
        Self {
            offset,
            variant: PhantomData,
        }
    }
}

impl<V: AdcVariant> Command for SetOffset<V> {
    type IdType = u8;
    type CommandParameters = Argument;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        V::COMMANDS.set_offset
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.offset
    }
}

/// SetGain command
///
/// The delta-sigma firmware takes counts per volt, the SAR firmware counts
/// per 10 volts.
#[derive(Debug, Clone, Copy)]
pub struct SetGain<V> {
    /// Gain as the firmware expects it
    pub gain: Argument,
    variant: PhantomData<V>,
}

impl<V> SetGain<V> {
    /// Creates the command
    pub const fn new(gain: Argument) -> Self {
        Self {
            gain,
            variant: PhantomData,
        }
    }
}

impl<V: AdcVariant> Command for SetGain<V> {
    type IdType = u8;
    type CommandParameters = Argument;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        V::COMMANDS.set_gain
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.gain
    }
}

/// CountsToVolts command
///
/// Replies with the voltage of the given counts in microvolts, using the
/// offset and gain configured on the device.
#[derive(Debug, Clone, Copy)]
pub struct CountsToVolts<V> {
    /// Counts to convert
    pub counts: Argument,
    variant: PhantomData<V>,
}

impl<V> CountsToVolts<V> {
    /// Creates the command
    pub const fn new(counts: Argument) -> Self {
        Self {
            counts,
            variant: PhantomData,
        }
    }
}

impl<V: AdcVariant> Command for CountsToVolts<V> {
    type IdType = u8;
    type CommandParameters = Argument;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        V::COMMANDS.counts_to_volts
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.counts
    }
}

/// SetBufferGain command (0x02), delta-sigma only
#[derive(Debug, Clone, Copy)]
pub struct SetBufferGain {
    /// Input buffer gain
    pub gain: BufferGain,
}

impl Command for SetBufferGain {
    type IdType = u8;
    type CommandParameters = BufferGain;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x02
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.gain
    }
}

/// Read command (0x0D), delta-sigma only
///
/// Starts a conversion, waits for it, stops and replies with the counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Read;

impl Command for Read {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        0x0D
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SetResolution command (0x03), SAR only
#[derive(Debug, Clone, Copy)]
pub struct SetResolution {
    /// New resolution
    pub resolution: Resolution,
}

impl Command for SetResolution {
    type IdType = u8;
    type CommandParameters = Resolution;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x03
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.resolution
    }
}

/// ADC variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcKind {
    /// Delta-sigma ADC, fixed 16 bit resolution
    DelSig,
    /// First SAR ADC
    Sar0,
    /// Second SAR ADC
    Sar1,
}

impl AdcKind {
    /// Command table for this variant
    pub const fn commands(self) -> &'static AdcCommands {
        match self {
            Self::DelSig => &DELSIG_COMMANDS,
            Self::Sar0 | Self::Sar1 => &SAR_COMMANDS,
        }
    }

    /// Presence flag in the board configuration
    pub const fn peripheral(self) -> Peripherals {
        match self {
            Self::DelSig => Peripherals::DELSIG,
            Self::Sar0 => Peripherals::SAR0,
            Self::Sar1 => Peripherals::SAR1,
        }
    }

    /// Name used by the firmware build
    pub const fn name(self) -> &'static str {
        match self {
            Self::DelSig => "DELSIG",
            Self::Sar0 => "SAR0",
            Self::Sar1 => "SAR1",
        }
    }

    /// Human readable name, used in configuration errors
    pub const fn description(self) -> &'static str {
        match self {
            Self::DelSig => "Delta-Sigma ADC",
            Self::Sar0 => "SAR0 ADC",
            Self::Sar1 => "SAR1 ADC",
        }
    }

    /// Whether this is one of the SAR ADCs
    pub const fn is_sar(self) -> bool {
        matches!(self, Self::Sar0 | Self::Sar1)
    }
}

impl FromStr for AdcKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELSIG" => Ok(Self::DelSig),
            "SAR0" => Ok(Self::Sar0),
            "SAR1" => Ok(Self::Sar1),
            _ => Err(ConfigError::UnknownAdc),
        }
    }
}

/// Input buffer gain of the delta-sigma ADC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferGain {
    /// Unity gain
    X1 = 1,
    /// Gain of 2
    X2 = 2,
    /// Gain of 4
    X4 = 4,
    /// Gain of 8
    X8 = 8,
}

impl ToByteArray for BufferGain {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self as u8])
    }
}

impl TryFrom<u8> for BufferGain {
    type Error = InvalidArgument;

    fn try_from(gain: u8) -> Result<Self, Self::Error> {
        match gain {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            invalid => Err(InvalidArgument::BufferGain(invalid)),
        }
    }
}
