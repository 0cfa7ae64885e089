//! 8 bit voltage DACs

use crate::board::Board;
use crate::commands::dac::{counts_for, vdac};
use crate::commands::{Speed, VdacChannel, VdacRange};
use crate::error::Error;
use crate::protocol::Address;
use crate::transport::Transport;

/// A voltage DAC
#[derive(Debug, Clone)]
pub struct Vdac {
    address: Address,
    channel: VdacChannel,
    full_range: f32,
}

impl Vdac {
    /// Binds to voltage DAC `channel`
    pub fn new(board: &mut Board, channel: VdacChannel) -> Result<Self, Error> {
        let config = board.config();
        config.require(channel.peripheral(), channel.name())?;

        let address = match channel {
            VdacChannel::Vdac0 => config.addresses.vdac0,
            VdacChannel::Vdac1 => config.addresses.vdac1,
        };
        let full_range = config.vdac_range[channel.index()];
        board.claim(address);

        Ok(Self {
            address,
            channel,
            full_range,
        })
    }

    /// Address the DAC is bound to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Channel the DAC is bound to
    pub fn channel(&self) -> VdacChannel {
        self.channel
    }

    /// Voltage produced by a count of 255
    pub fn full_range(&self) -> f32 {
        self.full_range
    }

    /// Enables and powers up the DAC
    pub fn start<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, vdac::Start)?;
        Ok(())
    }

    /// Powers down the DAC and disables its output
    pub fn stop<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, vdac::Stop)?;
        Ok(())
    }

    /// Selects the drive speed
    pub fn set_speed<T: Transport>(&mut self, bus: &mut T, speed: Speed) -> Result<(), Error> {
        bus.execute(self.address, vdac::SetSpeed { speed })?;
        Ok(())
    }

    /// Selects 1.020 V or 4.080 V full scale
    pub fn set_range<T: Transport>(&mut self, bus: &mut T, range: VdacRange) -> Result<(), Error> {
        bus.execute(self.address, vdac::SetRange { range })?;
        self.full_range = range.full_range_volts();
        Ok(())
    }

    /// Outputs a raw count; 255 is full scale
    pub fn set_value<T: Transport>(&mut self, bus: &mut T, value: u8) -> Result<(), Error> {
        bus.execute(self.address, vdac::SetValue { value })?;
        Ok(())
    }

    /// Outputs the count closest to `volts` in the current range.
    ///
    /// Voltages above the full-scale range saturate; negative voltages are
    /// rejected.
    pub fn set_voltage<T: Transport>(&mut self, bus: &mut T, volts: f32) -> Result<(), Error> {
        let value = counts_for(volts, self.full_range)?;
        self.set_value(bus, value)
    }

    /// Stops the DAC and saves its configuration
    pub fn sleep<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, vdac::Sleep)?;
        Ok(())
    }

    /// Restores the configuration saved by [`sleep`](Self::sleep)
    pub fn wakeup<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, vdac::Wakeup)?;
        Ok(())
    }
}
