#![no_std]
#![warn(missing_docs)]
//! PSoC Analog Peripheral Driver
//!
//! This crate lets a host controller drive the analog peripherals of a PSoC
//! companion microcontroller over a single shared SPI or I2C link. The
//! firmware on the PSoC exposes each peripheral at an address and interprets
//! small per-peripheral command codes; this crate encodes those commands and
//! keeps the calibration state needed to convert counts to physical units.
//!
//! # Peripherals
//! - CapSense buttons with host-side baseline calibration
//! - Analog input pins multiplexed onto one sequencing ADC
//! - Delta-sigma ADC and two SAR ADCs
//! - Two 8 bit current DACs and two 8 bit voltage DACs
//! - A waveform DAC (sine, square, triangle, sawtooth; 0.46 Hz to 2.5 kHz)
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`transport`]: the [`Transport`] trait and its SPI and I2C implementations
//!   - One blocking request/response exchange at a time
//!
//! - [`protocol`]: request [`Frame`]s and [`Reply`]s as they appear on the wire
//!
//! - [`board`]: which peripherals the firmware build contains, at which
//!   address, and which addresses are already bound to a driver
//!
//! - [`commands`]: per-family command codes and typed arguments
//!   - [`commands::capsense`], [`commands::analog`], [`commands::adc`],
//!     [`commands::dac`], [`commands::wavedac`]
//!
//! - [`peripherals`]: one driver per peripheral family
//!
//! # Usage
//! 1. Wrap the bus in a [`SpiTransport`] or [`I2cTransport`]
//! 2. Describe the firmware build with a [`BoardConfig`] and wrap it in a [`Board`]
//! 3. Construct drivers against the board; this validates that the
//!    peripheral exists but performs no bus traffic
//! 4. `start` each driver, then use it, passing the transport to every call
//!
//! # Important Notes
//! - Command codes are only meaningful per peripheral family, and for the
//!   ADC per variant
//! - Invalid arguments are rejected before anything is sent
//! - CapSense baseline acquisition can block for as long as the sensor is
//!   noisy; bound it with [`BaselineRetry::AtMost`]
//! - Analog input offset and resolution are shared by all analog pins
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use psoc_analog::{Board, BoardConfig, Error, SpiTransport, Vdac, VdacChannel, VdacRange};
//!
//! fn half_volt<SPI: SpiDevice>(spi: SPI) -> Result<(), Error> {
//!     let mut bus = SpiTransport::new(spi);
//!     let mut board = Board::new(BoardConfig::default());
//!
//!     let mut dac = Vdac::new(&mut board, VdacChannel::Vdac0)?;
//!     dac.start(&mut bus)?;
//!     dac.set_range(&mut bus, VdacRange::Low)?;
//!     dac.set_voltage(&mut bus, 0.51)?;
//!     Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

pub mod board;
pub mod commands;
pub mod error;
pub mod peripherals;
pub mod protocol;
pub mod transport;

pub use board::{AddressMap, Board, BoardConfig, Peripherals};
pub use commands::{
    AdcKind, BufferGain, IdacChannel, IdacPolarity, IdacRange, Resolution, Speed, VdacChannel,
    VdacRange, WaveType,
};
pub use error::{ConfigError, Error, InvalidArgument, TransportError};
pub use peripherals::{Adc, AnalogPin, BaselineRetry, CapSense, Idac, Vdac, WaveDac};
pub use protocol::{Address, Argument, Frame, Reply};
pub use transport::{I2cTransport, SpiTransport, Transport};
