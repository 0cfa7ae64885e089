//! 8 bit current DACs

use crate::board::Board;
use crate::commands::dac::{counts_for, idac};
use crate::commands::{IdacChannel, IdacPolarity, IdacRange, Speed};
use crate::error::Error;
use crate::protocol::Address;
use crate::transport::Transport;

/// A current DAC
#[derive(Debug, Clone)]
pub struct Idac {
    address: Address,
    channel: IdacChannel,
    full_range: f32,
}

impl Idac {
    /// Binds to current DAC `channel`.
    ///
    /// The full-scale range starts at the board's configured power-up range
    /// for that channel.
    pub fn new(board: &mut Board, channel: IdacChannel) -> Result<Self, Error> {
        let config = board.config();
        config.require(channel.peripheral(), channel.name())?;

        let address = match channel {
            IdacChannel::Idac0 => config.addresses.idac0,
            IdacChannel::Idac1 => config.addresses.idac1,
        };
        let full_range = config.idac_range[channel.index()];
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
    pub fn channel(&self) -> IdacChannel {
        self.channel
    }

    /// Current produced by a count of 255, in milliamps
    pub fn full_range(&self) -> f32 {
        self.full_range
    }

    /// Enables and powers up the DAC
    pub fn start<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, idac::Start)?;
        Ok(())
    }

    /// Powers down the DAC and disables its output
    pub fn stop<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, idac::Stop)?;
        Ok(())
    }

    /// Selects the drive speed
    pub fn set_speed<T: Transport>(&mut self, bus: &mut T, speed: Speed) -> Result<(), Error> {
        bus.execute(self.address, idac::SetSpeed { speed })?;
        Ok(())
    }

    /// Selects whether the DAC sources or sinks current
    pub fn set_polarity<T: Transport>(
        &mut self,
        bus: &mut T,
        polarity: IdacPolarity,
    ) -> Result<(), Error> {
        bus.execute(self.address, idac::SetPolarity { polarity })?;
        Ok(())
    }

    /// Selects the full-scale range used by the DAC and by
    /// [`set_current`](Self::set_current) from now on
    pub fn set_range<T: Transport>(&mut self, bus: &mut T, range: IdacRange) -> Result<(), Error> {
        bus.execute(self.address, idac::SetRange { range })?;
        self.full_range = range.full_range_ma();
        Ok(())
    }

    /// Outputs a raw count; 255 is full scale
    pub fn set_value<T: Transport>(&mut self, bus: &mut T, value: u8) -> Result<(), Error> {
        bus.execute(self.address, idac::SetValue { value })?;
        Ok(())
    }

    /// Outputs the count closest to `milliamps` in the current range.
    ///
    /// Currents above the full-scale range saturate; negative currents are
    /// rejected.
    pub fn set_current<T: Transport>(&mut self, bus: &mut T, milliamps: f32) -> Result<(), Error> {
        let value = counts_for(milliamps, self.full_range)?;
        self.set_value(bus, value)
    }

    /// Stops the DAC and saves its configuration
    pub fn sleep<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, idac::Sleep)?;
        Ok(())
    }

    /// Restores the configuration saved by [`sleep`](Self::sleep)
    pub fn wakeup<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, idac::Wakeup)?;
        Ok(())
    }
}
