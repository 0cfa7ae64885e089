//! Peripheral drivers
//!
//! One driver per peripheral family. A driver is bound to its address when
//! constructed against a [`Board`](crate::Board) and keeps whatever
//! calibration state is needed to convert between counts and physical units
//! locally. Drivers do not own the transport: every operation borrows it for
//! the length of one exchange, so several drivers can share one bus.
//!
//! - [`CapSense`]: capacitive touch buttons
//! - [`AnalogPin`]: analog input pins
//! - [`Adc`]: delta-sigma and SAR ADCs
//! - [`Idac`]: 8 bit current DACs
//! - [`Vdac`]: 8 bit voltage DACs
//! - [`WaveDac`]: waveform generator

pub mod adc;
pub mod analog_pin;
pub mod capsense;
pub mod idac;
pub mod vdac;
pub mod wavedac;

pub use adc::Adc;
pub use analog_pin::AnalogPin;
pub use capsense::{BaselineRetry, CapSense};
pub use idac::Idac;
pub use vdac::Vdac;
pub use wavedac::WaveDac;
