//! ADC driver tests

mod common;

use common::{arg, cmd, Exchange, RecordingTransport};
use psoc_analog::{
    Adc, AdcKind, Board, BoardConfig, ConfigError, Error, InvalidArgument, Peripherals,
};

const DELSIG: u8 = 0x01;
const SAR0: u8 = 0x02;
const SAR1: u8 = 0x03;

fn board() -> Board {
    Board::new(
        BoardConfig::default()
            .with_peripherals(Peripherals::DELSIG | Peripherals::SAR0 | Peripherals::SAR1),
    )
}

fn adc(kind: AdcKind) -> Adc {
    Adc::new(&mut board(), kind).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_absent_variant_fails_without_bus_traffic() {
    let bus = RecordingTransport::new();
    let mut board = Board::new(BoardConfig::default().with_peripherals(Peripherals::SAR0));

    assert_eq!(
        Adc::new(&mut board, AdcKind::DelSig).unwrap_err(),
        Error::Config(ConfigError::NotPresent("Delta-Sigma ADC"))
    );
    assert_eq!(
        Adc::new(&mut board, AdcKind::Sar1).unwrap_err(),
        Error::Config(ConfigError::NotPresent("SAR1 ADC"))
    );
    assert!(board.claimed().is_empty());
    assert_eq!(bus.count(), 0);
}

#[test]
fn test_construction_from_name() {
    let mut board = board();
    let kind: AdcKind = "SAR1".parse().unwrap();
    let adc = Adc::new(&mut board, kind).unwrap();
    assert_eq!(adc.address().0, SAR1);
    assert_eq!("SAR3".parse::<AdcKind>(), Err(ConfigError::UnknownAdc));
}

#[test]
fn test_double_construction_is_only_advisory() {
    let mut board = board();
    let first = Adc::new(&mut board, AdcKind::Sar0).unwrap();
    let second = Adc::new(&mut board, AdcKind::Sar0).unwrap();
    assert_eq!(first.address(), second.address());
    assert_eq!(board.claimed().len(), 1);
}

// ============================================================================
// Per-variant command codes
// ============================================================================

#[test]
fn test_start_convert_code_depends_on_variant() {
    let mut bus = RecordingTransport::new();

    adc(AdcKind::DelSig).start_convert(&mut bus).unwrap();
    adc(AdcKind::Sar0).start_convert(&mut bus).unwrap();
    adc(AdcKind::DelSig).stop_convert(&mut bus).unwrap();
    adc(AdcKind::Sar1).stop_convert(&mut bus).unwrap();

    assert_eq!(
        bus.sent(),
        vec![
            cmd(DELSIG, 0x03),
            cmd(SAR0, 0x04),
            cmd(DELSIG, 0x04),
            cmd(SAR1, 0x05),
        ]
    );
}

#[test]
fn test_lifecycle_codes() {
    let mut bus = RecordingTransport::new();
    let mut delsig = adc(AdcKind::DelSig);
    let mut sar = adc(AdcKind::Sar0);

    delsig.start(&mut bus).unwrap();
    delsig.sleep(&mut bus).unwrap();
    delsig.wakeup(&mut bus).unwrap();
    delsig.stop(&mut bus).unwrap();
    sar.start(&mut bus).unwrap();
    sar.sleep(&mut bus).unwrap();
    sar.wakeup(&mut bus).unwrap();
    sar.stop(&mut bus).unwrap();

    assert_eq!(
        bus.sent(),
        vec![
            cmd(DELSIG, 0x00),
            cmd(DELSIG, 0x14),
            cmd(DELSIG, 0x15),
            cmd(DELSIG, 0x01),
            cmd(SAR0, 0x00),
            cmd(SAR0, 0x10),
            cmd(SAR0, 0x11),
            cmd(SAR0, 0x01),
        ]
    );
}

#[test]
fn test_is_end_conversion_polls() {
    let mut bus = RecordingTransport::with_replies(&[0, 1234]);
    let mut sar = adc(AdcKind::Sar0);

    assert_eq!(sar.is_end_conversion(&mut bus).unwrap(), 0);
    assert_eq!(sar.is_end_conversion(&mut bus).unwrap(), 1234);
    assert_eq!(bus.last(), Some(Exchange::Receive(cmd(SAR0, 0x08), None)));

    let mut bus = RecordingTransport::with_replies(&[0]);
    adc(AdcKind::DelSig).is_end_conversion(&mut bus).unwrap();
    assert_eq!(bus.last(), Some(Exchange::Receive(cmd(DELSIG, 0x07), None)));
}

// ============================================================================
// Variant-only operations
// ============================================================================

#[test]
fn test_buffer_gain_is_delsig_only() {
    let mut bus = RecordingTransport::new();

    adc(AdcKind::DelSig).set_buffer_gain(&mut bus, 8).unwrap();
    assert_eq!(bus.last(), Some(Exchange::Send(arg(DELSIG, 0x02, 8))));

    assert_eq!(
        adc(AdcKind::DelSig).set_buffer_gain(&mut bus, 3).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::BufferGain(3))
    );
    assert_eq!(
        adc(AdcKind::Sar0).set_buffer_gain(&mut bus, 2).unwrap_err(),
        Error::Unsupported {
            kind: AdcKind::Sar0,
            operation: "set_buffer_gain"
        }
    );
    assert_eq!(bus.count(), 1);
}

#[test]
fn test_resolution_is_sar_only() {
    let mut bus = RecordingTransport::new();
    let mut sar = adc(AdcKind::Sar1);

    for bits in [8u8, 10, 12] {
        sar.set_resolution(&mut bus, bits).unwrap();
        assert_eq!(bus.last(), Some(Exchange::Send(arg(SAR1, 0x03, bits.into()))));
    }
    assert_eq!(
        sar.set_resolution(&mut bus, 16).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::Resolution(16))
    );
    assert!(matches!(
        adc(AdcKind::DelSig).set_resolution(&mut bus, 12),
        Err(Error::Unsupported { kind: AdcKind::DelSig, .. })
    ));
    assert_eq!(bus.count(), 3);
}

#[test]
fn test_read_is_delsig_only() {
    let mut bus = RecordingTransport::with_replies(&[-321]);
    let mut delsig = adc(AdcKind::DelSig);

    assert_eq!(delsig.read(&mut bus).unwrap(), -321);
    assert_eq!(delsig.polarity(), -1);
    assert_eq!(bus.last(), Some(Exchange::Receive(cmd(DELSIG, 0x0D), None)));

    assert!(matches!(
        adc(AdcKind::Sar0).read(&mut bus),
        Err(Error::Unsupported { operation: "read", .. })
    ));
    assert_eq!(bus.count(), 1);
}

// ============================================================================
// Offset and gain
// ============================================================================

#[test]
fn test_offset_codes_and_signed_encoding() {
    let mut bus = RecordingTransport::new();

    adc(AdcKind::DelSig).set_offset(&mut bus, -5).unwrap();
    adc(AdcKind::Sar0).set_offset(&mut bus, 12).unwrap();

    assert_eq!(bus.sent(), vec![arg(DELSIG, 0x0E, 0xFFFB), arg(SAR0, 0x0B, 12)]);
}

#[test]
fn test_sar_gain_is_sent_per_ten_volts() {
    let mut bus = RecordingTransport::new();

    adc(AdcKind::DelSig).set_gain(&mut bus, 400).unwrap();
    adc(AdcKind::Sar0).set_gain(&mut bus, 400).unwrap();

    assert_eq!(bus.sent(), vec![arg(DELSIG, 0x0F, 400), arg(SAR0, 0x0C, 4000)]);
}

#[test]
fn test_gain_that_does_not_fit_is_rejected() {
    let mut bus = RecordingTransport::new();
    assert_eq!(
        adc(AdcKind::Sar0).set_gain(&mut bus, 7000).unwrap_err(),
        Error::InvalidArgument(InvalidArgument::Overflow(70_000))
    );
    assert_eq!(bus.count(), 0);
}

// ============================================================================
// Polarity and counts to volts
// ============================================================================

#[test]
fn test_get_result_tracks_polarity() {
    let mut bus = RecordingTransport::with_replies(&[-10, 0, 25]);
    let mut sar = adc(AdcKind::Sar0);
    assert_eq!(sar.polarity(), 1);

    assert_eq!(sar.get_result(&mut bus).unwrap(), -10);
    assert_eq!(sar.polarity(), -1);
    assert_eq!(sar.get_result(&mut bus).unwrap(), 0);
    assert_eq!(sar.polarity(), 1);
    assert_eq!(sar.get_result(&mut bus).unwrap(), 25);
    assert_eq!(sar.polarity(), 1);
    assert_eq!(bus.last(), Some(Exchange::Receive(cmd(SAR0, 0x0A), None)));
}

#[test]
fn test_counts_to_volts_positive_conversion() {
    let mut bus = RecordingTransport::with_replies(&[100, 500_000]);
    let mut delsig = adc(AdcKind::DelSig);

    let counts = delsig.get_result(&mut bus).unwrap();
    assert_eq!(delsig.counts_to_volts(&mut bus, counts).unwrap(), 0.5);
    assert_eq!(bus.last(), Some(Exchange::Receive(arg(DELSIG, 0x10, 100), None)));
}

#[test]
fn test_counts_to_volts_negative_conversion_sends_magnitude() {
    let mut bus = RecordingTransport::with_replies(&[-100, 500_000]);
    let mut sar = adc(AdcKind::Sar1);

    let counts = sar.get_result(&mut bus).unwrap();
    let volts = sar.counts_to_volts(&mut bus, counts).unwrap();

    // the device sees 100, the sign comes back from the cached polarity
    assert_eq!(bus.last(), Some(Exchange::Receive(arg(SAR1, 0x0D, 100), None)));
    assert_eq!(volts, -0.5);
}

#[test]
fn test_counts_to_volts_applies_polarity_twice() {
    // polarity is -1 from the last conversion, but a positive count is
    // converted: the device receives -100 and the result is re-signed
    let mut bus = RecordingTransport::with_replies(&[-1, -500_000]);
    let mut delsig = adc(AdcKind::DelSig);

    delsig.get_result(&mut bus).unwrap();
    let volts = delsig.counts_to_volts(&mut bus, 100).unwrap();

    assert_eq!(bus.last(), Some(Exchange::Receive(arg(DELSIG, 0x10, 0xFF9C), None)));
    assert_eq!(volts, 0.5);
}

#[test]
fn test_counts_to_volts_does_not_touch_polarity() {
    let mut bus = RecordingTransport::with_replies(&[-7, 1_000_000, 1_000_000]);
    let mut sar = adc(AdcKind::Sar0);

    sar.get_result(&mut bus).unwrap();
    assert_eq!(sar.counts_to_volts(&mut bus, -7).unwrap(), -1.0);
    assert_eq!(sar.counts_to_volts(&mut bus, -7).unwrap(), -1.0);
    assert_eq!(sar.polarity(), -1);
}
