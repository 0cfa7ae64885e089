//! Bus level tests for the SPI and I2C transports

use core::time::Duration;

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use psoc_analog::{
    Address, Board, BoardConfig, CapSense, Error, Frame, I2cTransport, Reply, SpiTransport,
    Transport, TransportError, Vdac, VdacChannel,
};

// ============================================================================
// SPI
// ============================================================================

#[test]
fn test_spi_send_is_one_write() {
    let expectations = [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x04, 0x04, 0x80, 0x00]),
        SpiTransaction::transaction_end(),
    ];
    let mut spi = SpiMock::new(&expectations);
    let mut bus = SpiTransport::new(spi.clone());

    bus.send(Frame::with_argument(Address(0x04), 0x04, 0x80)).unwrap();

    spi.done();
}

#[test]
fn test_spi_receive_reads_signed_little_endian_reply() {
    let expectations = [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x02, 0x0D, 0xFF, 0xFF]),
        SpiTransaction::read_vec(vec![0x18, 0xFC, 0xFF, 0xFF]),
        SpiTransaction::transaction_end(),
    ];
    let mut spi = SpiMock::new(&expectations);
    let mut bus = SpiTransport::new(spi.clone());

    let reply = bus
        .receive(Frame::with_signed(Address(0x02), 0x0D, -1).unwrap(), None)
        .unwrap();

    assert_eq!(reply, Reply(-1000));
    spi.done();
}

#[test]
fn test_spi_settle_delay_sits_inside_the_transaction() {
    let expectations = [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x16, 0x18, 0x03, 0x00]),
        SpiTransaction::delay(30_000_000),
        SpiTransaction::read_vec(vec![0x01, 0x00, 0x00, 0x00]),
        SpiTransaction::transaction_end(),
    ];
    let mut spi = SpiMock::new(&expectations);
    let mut bus = SpiTransport::new(spi.clone());

    let reply = bus
        .receive(
            Frame::with_argument(Address(0x16), 0x18, 3),
            Some(Duration::from_millis(30)),
        )
        .unwrap();

    assert_eq!(reply.value(), 1);
    spi.done();
}

#[test]
fn test_spi_driver_end_to_end() {
    let expectations = [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x04, 0x00, 0x00, 0x00]),
        SpiTransaction::transaction_end(),
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x04, 0x03, 0x00, 0x00]),
        SpiTransaction::transaction_end(),
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![0x04, 0x04, 0x80, 0x00]),
        SpiTransaction::transaction_end(),
    ];
    let mut spi = SpiMock::new(&expectations);
    let mut bus = SpiTransport::new(spi.clone());
    let mut board = Board::new(BoardConfig::default());

    let mut dac = Vdac::new(&mut board, VdacChannel::Vdac0).unwrap();
    dac.start(&mut bus).unwrap();
    dac.set_range(&mut bus, "LOW".parse().unwrap()).unwrap();
    dac.set_voltage(&mut bus, 0.51).unwrap();

    spi.done();
}

// ============================================================================
// I2C
// ============================================================================

#[test]
fn test_i2c_send_writes_to_default_address() {
    let expectations = [I2cTransaction::write(0x08, vec![0x06, 0x04, 0x02, 0x00])];
    let mut i2c = I2cMock::new(&expectations);
    let mut bus = I2cTransport::new(i2c.clone(), NoopDelay);

    bus.send(Frame::with_argument(Address(0x06), 0x04, 2)).unwrap();

    i2c.done();
}

#[test]
fn test_i2c_receive_is_write_then_read() {
    let expectations = [
        I2cTransaction::write(0x42, vec![0x08, 0xFF, 0x1E, 0x00]),
        I2cTransaction::read(0x42, vec![0x1D, 0x00, 0x00, 0x00]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let mut bus = I2cTransport::with_address(i2c.clone(), NoopDelay, 0x42);

    let reply = bus
        .receive(Frame::with_argument(Address(0x08), 0xFF, 30), None)
        .unwrap();

    assert_eq!(reply, Reply(29));
    i2c.done();
}

#[test]
fn test_i2c_capsense_read_waits_between_write_and_read() {
    let expectations = [
        I2cTransaction::write(0x08, vec![0x16, 0x0F, 0x00, 0x00]),
        I2cTransaction::read(0x08, vec![0x2A, 0x00, 0x00, 0x00]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let mut bus = I2cTransport::new(i2c.clone(), NoopDelay);
    let board = Board::new(BoardConfig::default());

    let mut button = CapSense::new(&board, 0, 5).unwrap();
    assert_eq!(button.read_raw(&mut bus).unwrap(), 42);

    i2c.done();
}

#[test]
fn test_i2c_bus_failure_maps_to_transport_error() {
    let expectations = [I2cTransaction::write(0x08, vec![0x04, 0x00, 0x00, 0x00])
        .with_error(ErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);
    let mut bus = I2cTransport::new(i2c.clone(), NoopDelay);

    let result = bus.send(Frame::command(Address(0x04), 0x00));

    assert_eq!(result, Err(Error::Transport(TransportError::Bus)));
    i2c.done();
}
