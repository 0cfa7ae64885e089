//! Delta-sigma and SAR ADCs
//!
//! One driver serves all three ADC instances. The variant is fixed at
//! construction; each operation resolves it once to the matching
//! [`AdcVariant`](crate::commands::AdcVariant) and executes the command
//! generic over it, so the codes come from that variant's table.
//!
//! # Polarity
//! Conversions return signed counts. The sign of the most recent conversion
//! is cached as the driver's polarity and applied by
//! [`counts_to_volts`](Adc::counts_to_volts), which hands the firmware a
//! non-negative magnitude and re-applies the sign to the voltage it returns.

use crate::board::Board;
use crate::commands::adc::{self, DelSig, Sar};
use crate::commands::{AdcKind, BufferGain, Resolution};
use crate::error::{Error, InvalidArgument};
use crate::protocol::{micros_to_unit, Address, Argument};
use crate::transport::Transport;

/// Evaluates `$body` with `$variant` naming the command variant of `$kind`
macro_rules! with_variant {
    ($kind:expr, $variant:ident => $body:expr) => {
        match $kind {
            AdcKind::DelSig => {
                type $variant = DelSig;
                $body
            }
            AdcKind::Sar0 | AdcKind::Sar1 => {
                type $variant = Sar;
                $body
            }
        }
    };
}

/// An ADC instance
#[derive(Debug, Clone)]
pub struct Adc {
    address: Address,
    kind: AdcKind,
    polarity: i8,
}

impl Adc {
    /// Binds to the ADC of the given variant.
    ///
    /// Fails when the firmware build does not include it.
    pub fn new(board: &mut Board, kind: AdcKind) -> Result<Self, Error> {
        let config = board.config();
        config.require(kind.peripheral(), kind.description())?;

        let address = match kind {
            AdcKind::DelSig => config.addresses.delsig,
            AdcKind::Sar0 => config.addresses.sar0,
            AdcKind::Sar1 => config.addresses.sar1,
        };
        board.claim(address);

        Ok(Self {
            address,
            kind,
            polarity: 1,
        })
    }

    /// Address the ADC is bound to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Variant the ADC is bound to
    pub fn kind(&self) -> AdcKind {
        self.kind
    }

    /// Sign of the most recent conversion, `1` or `-1`
    pub fn polarity(&self) -> i8 {
        self.polarity
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::Unsupported {
            kind: self.kind,
            operation,
        }
    }

    fn track_polarity(&mut self, counts: i32) {
        self.polarity = if counts < 0 { -1 } else { 1 };
    }

    /// Configures and powers up the ADC without starting conversions
    pub fn start<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        with_variant!(self.kind, V => bus.execute(self.address, adc::Start::<V>::new()))?;
        Ok(())
    }

    /// Disables and powers down the ADC
    pub fn stop<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        with_variant!(self.kind, V => bus.execute(self.address, adc::Stop::<V>::new()))?;
        Ok(())
    }

    /// Sets the input buffer gain: 1, 2, 4 or 8. Delta-sigma only.
    pub fn set_buffer_gain<T: Transport>(&mut self, bus: &mut T, gain: u8) -> Result<(), Error> {
        if self.kind != AdcKind::DelSig {
            return Err(self.unsupported("set_buffer_gain"));
        }
        let gain = BufferGain::try_from(gain)?;
        bus.execute(self.address, adc::SetBufferGain { gain })?;
        Ok(())
    }

    /// Sets the resolution: 8, 10 or 12 bits. SAR only; the delta-sigma ADC
    /// is fixed at 16 bits.
    pub fn set_resolution<T: Transport>(&mut self, bus: &mut T, bits: u8) -> Result<(), Error> {
        if !self.kind.is_sar() {
            return Err(self.unsupported("set_resolution"));
        }
        let resolution = Resolution::try_from(bits)?;
        bus.execute(self.address, adc::SetResolution { resolution })?;
        Ok(())
    }

    /// Starts conversions
    pub fn start_convert<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        with_variant!(self.kind, V => bus.execute(self.address, adc::StartConvert::<V>::new()))?;
        Ok(())
    }

    /// Stops conversions
    pub fn stop_convert<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        with_variant!(self.kind, V => bus.execute(self.address, adc::StopConvert::<V>::new()))?;
        Ok(())
    }

    /// Result of the last completed conversion, in counts.
    ///
    /// Call between [`start_convert`](Self::start_convert) and
    /// [`stop_convert`](Self::stop_convert).
    pub fn get_result<T: Transport>(&mut self, bus: &mut T) -> Result<i32, Error> {
        let counts =
            with_variant!(self.kind, V => bus.execute(self.address, adc::GetResult::<V>::new()))?
                .value();
        self.track_polarity(counts);
        Ok(counts)
    }

    /// Starts a conversion, waits for it, stops and returns the counts.
    /// Delta-sigma only.
    pub fn read<T: Transport>(&mut self, bus: &mut T) -> Result<i32, Error> {
        if self.kind != AdcKind::DelSig {
            return Err(self.unsupported("read"));
        }
        let counts = bus.execute(self.address, adc::Read)?.value();
        self.track_polarity(counts);
        Ok(counts)
    }

    /// Polls for the end of a conversion.
    ///
    /// Returns 0 while the ADC is busy, otherwise the conversion value.
    pub fn is_end_conversion<T: Transport>(&mut self, bus: &mut T) -> Result<i32, Error> {
        let reply = with_variant!(
            self.kind,
            V => bus.execute(self.address, adc::IsEndConversion::<V>::new())
        )?;
        Ok(reply.value())
    }

    /// Sets the offset in counts subtracted by [`counts_to_volts`](Self::counts_to_volts)
    pub fn set_offset<T: Transport>(&mut self, bus: &mut T, offset: i32) -> Result<(), Error> {
        let offset = Argument::signed(offset)?;
        with_variant!(self.kind, V => bus.execute(self.address, adc::SetOffset::<V>::new(offset)))?;
        Ok(())
    }

    /// Sets the gain in counts per volt used by [`counts_to_volts`](Self::counts_to_volts).
    ///
    /// The SAR firmware expects counts per 10 volts and receives the value
    /// scaled accordingly.
    pub fn set_gain<T: Transport>(&mut self, bus: &mut T, counts_per_volt: i32) -> Result<(), Error> {
        let gain = if self.kind.is_sar() {
            counts_per_volt
                .checked_mul(10)
                .ok_or(InvalidArgument::Overflow(counts_per_volt))?
        } else {
            counts_per_volt
        };
        let gain = Argument::signed(gain)?;
        with_variant!(self.kind, V => bus.execute(self.address, adc::SetGain::<V>::new(gain)))?;
        Ok(())
    }

    /// Converts counts to volts using the device's offset and gain.
    ///
    /// The counts are multiplied by the cached polarity before they are
    /// sent and the returned voltage is multiplied by it again.
    pub fn counts_to_volts<T: Transport>(&mut self, bus: &mut T, counts: i32) -> Result<f32, Error> {
        let polarity = i32::from(self.polarity);
        let magnitude = counts
            .checked_mul(polarity)
            .ok_or(InvalidArgument::Overflow(counts))?;
        let magnitude = Argument::signed(magnitude)?;

        let micros = with_variant!(
            self.kind,
            V => bus.execute(self.address, adc::CountsToVolts::<V>::new(magnitude))
        )?
        .value();
        Ok(f32::from(self.polarity) * micros_to_unit(micros))
    }

    /// Stops the ADC and saves its configuration
    pub fn sleep<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        with_variant!(self.kind, V => bus.execute(self.address, adc::Sleep::<V>::new()))?;
        Ok(())
    }

    /// Restores the configuration saved by [`sleep`](Self::sleep)
    pub fn wakeup<T: Transport>(&mut self, bus: &mut T) -> Result<(), Error> {
        with_variant!(self.kind, V => bus.execute(self.address, adc::Wakeup::<V>::new()))?;
        Ok(())
    }
}
