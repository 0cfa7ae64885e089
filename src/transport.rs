//! Transport to the companion microcontroller
//!
//! The drivers in this crate never touch a bus directly. They encode their
//! operation into a [`Frame`] and hand it to a [`Transport`], which performs
//! one blocking exchange.
//!
//! Two implementations over embedded-hal 1.0 are provided:
//! - [`SpiTransport`] for a device implementing `SpiDevice`
//! - [`I2cTransport`] for an `I2c` bus plus a `DelayNs` provider
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use psoc_analog::{Board, BoardConfig, Error, SpiTransport, Vdac, VdacChannel};
//!
//! fn half_scale<SPI: SpiDevice>(spi: SPI) -> Result<(), Error> {
//!     let mut bus = SpiTransport::new(spi);
//!     let mut board = Board::new(BoardConfig::default());
//!
//!     let mut dac = Vdac::new(&mut board, VdacChannel::Vdac0)?;
//!     dac.start(&mut bus)?;
//!     dac.set_voltage(&mut bus, 2.04)?;
//!     Ok(())
//! }
//! ```

use core::convert::Infallible;
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{errors::Error as RegifaceError, ByteArray, Command, FromByteArray, ToByteArray};

use crate::error::{Error, TransportError};
use crate::protocol::{Address, Frame, Reply};

/// Default 7 bit slave address of the companion microcontroller on I2C
pub const DEFAULT_I2C_ADDRESS: u8 = 0x08;

/// A blocking request/response channel to the device.
///
/// Only one exchange is ever in flight; taking `&mut self` lets the borrow
/// checker enforce that.
pub trait Transport {
    /// Sends a frame that produces no reply
    fn send(&mut self, frame: Frame) -> Result<(), Error>;

    /// Sends a frame and waits for the reply.
    ///
    /// `settle` is an optional pause between the request and reading the
    /// reply, used when the device needs time to finish a conversion.
    fn receive(&mut self, frame: Frame, settle: Option<Duration>) -> Result<Reply, Error>;

    /// Executes `command` on the peripheral at `address`.
    ///
    /// Commands without response parameters are sent; all others wait for
    /// the reply and decode it into the command's response type.
    ///
    /// # Errors
    /// * [`Error::Transport`] - the exchange failed or the reply could not be
    ///   decoded
    fn execute<C>(&mut self, address: Address, command: C) -> Result<C::ResponseParameters, Error>
    where
        Self: Sized,
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        self.execute_settled(address, command, None)
    }

    /// Like [`execute`](Transport::execute), pausing for `settle` between
    /// request and reply
    fn execute_settled<C>(
        &mut self,
        address: Address,
        command: C,
        settle: Option<Duration>,
    ) -> Result<C::ResponseParameters, Error>
    where
        Self: Sized,
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let frame = Frame::for_command(address, command);
        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();

        if raw_response.as_ref().is_empty() {
            self.send(frame)?;
        } else {
            let reply = self.receive(frame, settle)?.value().to_le_bytes();
            let len = raw_response.as_ref().len();
            let bytes = reply.get(..len).ok_or(TransportError::Decode)?;
            raw_response.as_mut().copy_from_slice(bytes);
        }

        C::ResponseParameters::from_bytes(raw_response)
            .map_err(|_| RegifaceError::DeserializationError.into())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, frame: Frame) -> Result<(), Error> {
        (**self).send(frame)
    }

    fn receive(&mut self, frame: Frame, settle: Option<Duration>) -> Result<Reply, Error> {
        (**self).receive(frame, settle)
    }
}

fn encode(frame: Frame) -> [u8; 4] {
    match frame.to_bytes() {
        Ok(bytes) => bytes,
        Err(never) => match never {},
    }
}

fn decode(raw: [u8; 4]) -> Reply {
    let reply: Result<Reply, Infallible> = Reply::from_bytes(raw);
    match reply {
        Ok(reply) => reply,
        Err(never) => match never {},
    }
}

fn settle_ns(settle: Duration) -> u32 {
    u32::try_from(settle.as_nanos()).unwrap_or(u32::MAX)
}

/// Transport over an SPI device.
///
/// Each exchange is a single SPI transaction so chip select stays asserted
/// between request and reply.
pub struct SpiTransport<SPI> {
    spi: SPI,
}

impl<SPI> SpiTransport<SPI> {
    /// Wraps the provided SPI device
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Transport for SpiTransport<SPI>
where
    SPI: SpiDevice,
{
    fn send(&mut self, frame: Frame) -> Result<(), Error> {
        trace!("spi send {}", frame);
        let request = encode(frame);

        self.spi
            .transaction(&mut [Operation::Write(request.as_slice())])
            .map_err(|_| RegifaceError::BusError)?;
        Ok(())
    }

    fn receive(&mut self, frame: Frame, settle: Option<Duration>) -> Result<Reply, Error> {
        trace!("spi receive {}", frame);
        let request = encode(frame);
        let mut raw_response = [0u8; 4];

        let result = match settle {
            Some(settle) => self.spi.transaction(&mut [
                Operation::Write(request.as_slice()),
                Operation::DelayNs(settle_ns(settle)),
                Operation::Read(raw_response.as_mut_slice()),
            ]),
            None => self.spi.transaction(&mut [
                Operation::Write(request.as_slice()),
                Operation::Read(raw_response.as_mut_slice()),
            ]),
        };
        result.map_err(|_| RegifaceError::BusError)?;

        Ok(decode(raw_response))
    }
}

/// Transport over an I2C bus.
///
/// The request is written to the slave, the optional settle delay elapses,
/// then the 4 byte reply is read back in a separate transfer.
pub struct I2cTransport<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> I2cTransport<I2C, D> {
    /// Wraps the bus, talking to [`DEFAULT_I2C_ADDRESS`]
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_I2C_ADDRESS)
    }

    /// Wraps the bus, talking to a custom slave address
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self { i2c, delay, address }
    }

    /// Releases the bus and delay provider
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> Transport for I2cTransport<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn send(&mut self, frame: Frame) -> Result<(), Error> {
        trace!("i2c send {}", frame);
        self.i2c
            .write(self.address, &encode(frame))
            .map_err(|_| RegifaceError::BusError)?;
        Ok(())
    }

    fn receive(&mut self, frame: Frame, settle: Option<Duration>) -> Result<Reply, Error> {
        trace!("i2c receive {}", frame);
        self.i2c
            .write(self.address, &encode(frame))
            .map_err(|_| RegifaceError::BusError)?;

        if let Some(settle) = settle {
            self.delay.delay_ns(settle_ns(settle));
        }

        let mut raw_response = [0u8; 4];
        self.i2c
            .read(self.address, &mut raw_response)
            .map_err(|_| RegifaceError::BusError)?;

        Ok(decode(raw_response))
    }
}
