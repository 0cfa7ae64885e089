//! CapSense commands
//!
//! All buttons share the CapSense address; reads carry the sensor index as
//! argument. Both reads need the sensor scan to complete before a reply is
//! available, see [`SETTLE`].

use core::time::Duration;

use regiface::Command;

use crate::protocol::Reply;

/// Pause between a read request and its reply
pub const SETTLE: Duration = Duration::from_millis(30);

simple_command! {
    /// Start command (0x00)
    ///
    /// Initialises and enables the CapSense block.
    Start = 0x00
}

simple_command! {
    /// Stop command (0x01)
    ///
    /// Disables interrupts and clears all sensors.
    Stop = 0x01
}

simple_command! {
    /// Sleep command (0x02)
    ///
    /// Saves non-retention registers before low power mode.
    Sleep = 0x02
}

simple_command! {
    /// Wakeup command (0x03)
    ///
    /// Restores the configuration saved by [`Sleep`].
    Wakeup = 0x03
}

/// ReadRaw command (0x0F)
///
/// Replies with the 8 bit raw count of one sensor. Allow [`SETTLE`] before
/// reading the reply.
#[derive(Debug, Clone, Copy)]
pub struct ReadRaw {
    /// Sensor index
    pub sensor: u8,
}

impl Command for ReadRaw {
    type IdType = u8;
    type CommandParameters = u8;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        0x0F
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.sensor
    }
}

/// Read command (0x18)
///
/// Replies nonzero when the firmware considers the sensor touched. Allow
/// [`SETTLE`] before reading the reply.
#[derive(Debug, Clone, Copy)]
pub struct Read {
    /// Sensor index
    pub sensor: u8,
}

impl Command for Read {
    type IdType = u8;
    type CommandParameters = u8;
    type ResponseParameters = Reply;

    fn id() -> Self::IdType {
        0x18
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.sensor
    }
}
