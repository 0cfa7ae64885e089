//! CapSense buttons
//!
//! All buttons live behind one CapSense address; the sensor index travels as
//! the command argument.
//!
//! `start` calibrates a baseline from the untouched button. [`is_touched`]
//! compares fresh raw counts against that baseline plus a threshold, while
//! [`read`] asks the firmware for its own decision.
//!
//! [`is_touched`]: CapSense::is_touched
//! [`read`]: CapSense::read

use crate::board::Board;
use crate::commands::capsense;
use crate::error::{ConfigError, Error};
use crate::protocol::Address;
use crate::transport::Transport;

/// How long [`CapSense::start`] keeps trying to acquire a stable baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaselineRetry {
    /// Keep reading until two consecutive raw counts agree.
    ///
    /// Never returns if the signal does not settle, so only use this when
    /// something outside the driver can time out.
    Forever,
    /// Give up with [`Error::Unstable`] after this many pairs of reads
    AtMost(u32),
}

/// A CapSense button
#[derive(Debug, Clone)]
pub struct CapSense {
    address: Address,
    pin: u8,
    threshold: u8,
    baseline: Option<u8>,
}

impl CapSense {
    /// Binds to CapSense button `pin`.
    ///
    /// `threshold` is the number of counts above the baseline at which the
    /// button counts as touched. All buttons share the CapSense address, so
    /// binding one does not claim it.
    pub fn new(board: &Board, pin: u8, threshold: u8) -> Result<Self, Error> {
        let config = board.config();
        if config.capsense_sensors == 0 {
            return Err(ConfigError::NoCapSense.into());
        }
        if pin >= config.capsense_sensors {
            return Err(ConfigError::InvalidPin {
                pin,
                available: config.capsense_sensors,
            }
            .into());
        }

        let address = config.addresses.capsense;
        Ok(Self {
            address,
            pin,
            threshold,
            baseline: None,
        })
    }

    /// Shared CapSense address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sensor index
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Counts above the baseline that register a touch
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Changes the touch threshold; the baseline is kept
    pub fn set_threshold(&mut self, threshold: u8) {
        self.threshold = threshold;
    }

    /// Baseline acquired by the last successful [`start`](Self::start)
    pub fn baseline(&self) -> Option<u8> {
        self.baseline
    }

    /// Enables the CapSense block and calibrates the baseline.
    ///
    /// The button must not be touched meanwhile. Raw counts are read in
    /// pairs until both reads of a pair agree; that value becomes the
    /// baseline.
    pub fn start<T: Transport>(&mut self, bus: &mut T, retry: BaselineRetry) -> Result<(), Error> {
        bus.execute(self.address, capsense::Start)?;

        let mut attempts: u32 = 0;
        loop {
            if let BaselineRetry::AtMost(limit) = retry {
                if attempts >= limit {
                    return Err(Error::Unstable { attempts });
                }
            }
            attempts = attempts.saturating_add(1);

            let first = self.read_raw(bus)?;
            let second = self.read_raw(bus)?;
            if first == second {
                debug!("capsense pin {} baseline {} after {} pairs", self.pin, first, attempts);
                self.baseline = Some(first);
                return Ok(());
            }
        }
    }

    /// Disables the block and resets all sensors
    pub fn stop<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, capsense::Stop)?;
        Ok(())
    }

    /// Prepares the block for low power mode
    pub fn sleep<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, capsense::Sleep)?;
        Ok(())
    }

    /// Restores the block after low power mode
    pub fn wakeup<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        bus.execute(self.address, capsense::Wakeup)?;
        Ok(())
    }

    /// Touch state as decided by the firmware
    pub fn read<T: Transport>(&mut self, bus: &mut T) -> Result<bool, Error> {
        let reply = bus.execute_settled(
            self.address,
            capsense::Read { sensor: self.pin },
            Some(capsense::SETTLE),
        )?;
        Ok(reply.value() != 0)
    }

    /// 8 bit raw count of the button
    pub fn read_raw<T: Transport>(&mut self, bus: &mut T) -> Result<u8, Error> {
        let reply = bus.execute_settled(
            self.address,
            capsense::ReadRaw { sensor: self.pin },
            Some(capsense::SETTLE),
        )?;
        u8::try_from(reply.value()).map_err(|_| Error::UnexpectedReply(reply.value()))
    }

    /// Whether a fresh raw count exceeds baseline plus threshold
    pub fn is_touched<T: Transport>(&mut self, bus: &mut T) -> Result<bool, Error> {
        let baseline = self.baseline.ok_or(Error::Uncalibrated)?;
        let raw = self.read_raw(bus)?;
        Ok(u16::from(raw) > u16::from(baseline) + u16::from(self.threshold))
    }
}
