//! Analog input pin commands
//!
//! All analog input pins share one sequencing ADC on the device, so offset
//! and resolution apply to every pin.

use regiface::{Command, NoParameters};

use crate::commands::Resolution;
use crate::protocol::{Argument, Reply};

/// Read command (0x00)
///
/// Converts one pin and replies with counts at the current resolution.
#[derive(Debug, Clone, Copy)]
pub struct Read {
    /// Analog input index
    pub pin: u8,
}

impl Command for Read {
    type IdType = u8;
    type CommandParameters = u8;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        0x00
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.pin
    }
}

/// ReadVolts command (0x01)
///
/// Converts one pin and replies with microvolts.
#[derive(Debug, Clone, Copy)]
pub struct ReadVolts {
    /// Analog input index
    pub pin: u8,
}

impl Command for ReadVolts {
    type IdType = u8;
    type CommandParameters = u8;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        0x01
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.pin
    }
}

/// SetOffset command (0x02)
///
/// Sets the count offset subtracted before voltage conversion.
#[derive(Debug, Clone, Copy)]
pub struct SetOffset {
    /// Offset in counts, two's complement
    pub offset: Argument,
}

impl Command for SetOffset {
    type IdType = u8;
    type CommandParameters = Argument;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x02
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.offset
    }
}

/// SetResolution command (0x03)
///
/// Sets the resolution of the shared ADC.
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
