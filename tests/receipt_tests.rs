//! # Receipt Tests
//!
//! End-to-end checks across the compiler, template context, BMP transcoder
//! and text simulator:
//!
//! - **Templates**: `for`/`if` scenarios produce exactly the expected bytes
//! - **Images**: a BMP on disk compiles to the reference stored-graphics bytes
//! - **Round trip**: compiled text survives decoding, whatever styles surround it
//! - **Synchronization**: the simulator consumes every builder's output whole

use pretty_assertions::assert_eq;
use std::fs;

use recibo::document::{CompileOptions, compile, compile_file, compile_with_context};
use recibo::preview::{self, TextPrinter};
use recibo::protocol::barcode::{barcode1d, qr};
use recibo::protocol::encoding::TextEncoding;
use recibo::protocol::{bmp, commands, graphics, text};
use recibo::template::{Record, TemplateContext, Value};
use recibo::ReciboError;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn items(names: &[&str]) -> Value {
    names
        .iter()
        .map(|n| Value::from(Record::new().with("Name", *n)))
        .collect::<Vec<_>>()
        .into()
}

/// A 1x1 bottom-up 24bpp BMP holding one pixel of the given BGR color.
fn one_pixel_bmp(bgr: [u8; 3]) -> Vec<u8> {
    let mut bmp = Vec::new();
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&58u32.to_le_bytes()); // file size
    bmp.extend_from_slice(&[0; 4]); // reserved
    bmp.extend_from_slice(&54u32.to_le_bytes()); // pixel offset
    bmp.extend_from_slice(&40u32.to_le_bytes()); // info header size
    bmp.extend_from_slice(&1i32.to_le_bytes()); // width
    bmp.extend_from_slice(&1i32.to_le_bytes()); // height (bottom-up)
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&24u16.to_le_bytes()); // bpp
    bmp.extend_from_slice(&0u32.to_le_bytes()); // compression
    bmp.extend_from_slice(&4u32.to_le_bytes()); // image size
    bmp.extend_from_slice(&[0; 16]); // resolution, palette counts
    bmp.extend_from_slice(&bgr);
    bmp.push(0); // row padding
    bmp
}

const REFERENCE_DOT: [u8; 23] = [
    0x1D, 0x28, 0x4C, 0x0B, 0x00, 0x30, 0x70, 0x30, 0x01, 0x01, 0x31, 0x01, 0x00, 0x01, 0x00,
    0x80, 0x1D, 0x28, 0x4C, 0x02, 0x00, 0x30, 0x32,
];

// ============================================================================
// TEMPLATE SCENARIOS
// ============================================================================

const LOOP_MARKUP: &str =
    r#"<receipt><for var="item" in="Items"><line>${item.Name}</line></for></receipt>"#;

#[test]
fn test_for_loop_emits_one_line_per_item() {
    let mut ctx = TemplateContext::new();
    ctx.add("Items", items(&["Burger", "Fries", "Shake"])).unwrap();

    let bytes = compile_with_context(LOOP_MARKUP, &mut ctx, &CompileOptions::default()).unwrap();

    let mut expected = text::print_line("Burger", TextEncoding::Ascii);
    expected.extend(text::print_line("Fries", TextEncoding::Ascii));
    expected.extend(text::print_line("Shake", TextEncoding::Ascii));
    assert_eq!(bytes, expected);
}

#[test]
fn test_for_loop_over_empty_list_emits_nothing() {
    let mut ctx = TemplateContext::new();
    ctx.add("Items", items(&[])).unwrap();
    let bytes = compile_with_context(LOOP_MARKUP, &mut ctx, &CompileOptions::default()).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn test_loop_variable_does_not_leak() {
    let mut ctx = TemplateContext::new();
    ctx.add("Items", items(&["a", "b"])).unwrap();
    let markup = r#"<receipt>
        <for var="item" in="Items"><line>${item.Name}</line></for>
        <line>[${item.Name}]</line>
    </receipt>"#;

    let bytes = compile_with_context(markup, &mut ctx, &CompileOptions::default()).unwrap();
    assert_eq!(bytes, b"a\nb\n[]\n".to_vec());
    assert!(!ctx.contains("item"));
    assert_eq!(ctx.scope_depth(), 0);
}

#[test]
fn test_if_scenario() {
    let markup = r#"<receipt><if condition="HasDiscount"><line>10% off</line></if></receipt>"#;

    let mut ctx = TemplateContext::new();
    ctx.add("HasDiscount", false).unwrap();
    let off = compile_with_context(markup, &mut ctx, &CompileOptions::default()).unwrap();
    assert!(off.is_empty());

    let mut ctx = TemplateContext::new();
    ctx.add("HasDiscount", true).unwrap();
    let on = compile_with_context(markup, &mut ctx, &CompileOptions::default()).unwrap();
    assert_eq!(on, text::print_line("10% off", TextEncoding::Ascii));
}

#[test]
fn test_json_bindings() {
    let mut ctx = TemplateContext::from_json(serde_json::json!({
        "Order": {"Number": 1234, "Total": 24.72},
        "Lines": [
            {"Qty": 1, "Name": "Burger", "Show": true},
            {"Qty": 2, "Name": "Fries", "Show": "false"}
        ]
    }));
    let markup = r#"<receipt>
        <line>Order #${Order.Number:D6}</line>
        <for var="l" in="Lines"><if condition="l.Show"><line>${l.Qty}x ${l.Name}</line></if></for>
        <line>Total: ${order.total:F2}</line>
    </receipt>"#;

    let bytes = compile_with_context(markup, &mut ctx, &CompileOptions::default()).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "Order #001234\n1x Burger\nTotal: 24.72\n"
    );
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn test_image_element_matches_reference_vector() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("dot.bmp"), one_pixel_bmp([0, 0, 0])).unwrap();
    let markup = dir.path().join("receipt.xml");
    fs::write(&markup, r#"<receipt><image path="dot.bmp"/></receipt>"#).unwrap();

    let bytes = compile_file(&markup, None, &CompileOptions::default()).unwrap();
    assert_eq!(bytes, REFERENCE_DOT.to_vec());
}

#[test]
fn test_image_path_is_substituted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("logo-7.bmp"), one_pixel_bmp([255, 255, 255])).unwrap();

    let mut ctx = TemplateContext::new();
    ctx.add("StoreId", 7).unwrap();
    let options = CompileOptions {
        base_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let bytes = compile_with_context(
        r#"<receipt><image path="logo-${StoreId}.bmp" fn="2"/></receipt>"#,
        &mut ctx,
        &options,
    )
    .unwrap();

    let mut expected = REFERENCE_DOT.to_vec();
    expected[15] = 0x00; // white pixel
    expected[22] = 0x02; // fn 2
    assert_eq!(bytes, expected);
}

#[test]
fn test_print_bmp_matches_reference_vector() {
    assert_eq!(bmp::print_bmp(&one_pixel_bmp([0, 0, 0]), 50).unwrap(), REFERENCE_DOT.to_vec());
}

#[test]
fn test_corrupt_image_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.bmp"), b"not a bitmap at all, sorry").unwrap();
    let options = CompileOptions {
        base_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let err = compile(r#"<receipt><image path="bad.bmp"/></receipt>"#, &options).unwrap_err();
    assert!(matches!(err, ReciboError::Bitmap(_)), "{err}");
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_text_survives_decoding() {
    let markup = r#"<receipt>
        <initialize/>
        <bold><text>Alpha</text></bold>
        <underline mode="2"><line> Beta</line></underline>
        <invert><line>Gamma</line></invert>
        <font name="B"><rotate90><line>Delta</line></rotate90></font>
        <spacing character="1" line="40"/>
        <codepage value="0"/>
        <line>Epsilon</line>
    </receipt>"#;

    let bytes = compile(markup, &CompileOptions::default()).unwrap();
    let text = preview::decode(&bytes, 48).unwrap();
    assert_eq!(text, "Alpha Beta\nGamma\nDelta\nEpsilon\n");
}

#[test]
fn test_restaurant_receipt_preview() {
    let markup = r#"<?xml version="1.0" encoding="utf-8"?>
<receipt xmlns="http://webefinity.com/escpos/receipt">
  <initialize/>
  <align value="center">
    <bold><line>MY RESTAURANT</line></bold>
    <line>123 Main Street</line>
  </align>
  <line>1x Burger.................$12.99</line>
  <align value="right">
    <line>Total: $24.72</line>
  </align>
  <barcode type="code39" data="1234" hri="below"/>
  <qrcode data="https://restaurant.com/order/1234" size="4" errorLevel="M"/>
  <feed lines="2"/>
  <cut type="partial"/>
</receipt>"#;

    let bytes = compile(markup, &CompileOptions::default()).unwrap();
    let text = preview::decode(&bytes, 40).unwrap();

    let expected = [
        "             MY RESTAURANT",
        "            123 Main Street",
        "1x Burger.................$12.99",
        "                           Total: $24.72",
        "[CODE39]",
        "1234",
        "[QRCode]",
        "https://restaurant.com/order/1234",
        "",
        "",
        "-< cut >-",
        "",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn test_validation_failure_emits_nothing() {
    let markup = r#"<receipt>
        <line>fine</line>
        <size width="12" height="0"><line>too big</line></size>
        <barcode type="qr"/>
    </receipt>"#;

    match compile(markup, &CompileOptions::default()) {
        Err(ReciboError::Validation(found)) => assert_eq!(found.len(), 4, "{found:?}"),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

// ============================================================================
// SYNCHRONIZATION
// ============================================================================

#[test]
fn test_simulator_consumes_every_builder() {
    let mut stream = Vec::new();
    stream.extend(commands::init());
    stream.extend(commands::line_feed(2));
    stream.extend(commands::horizontal_tab());
    stream.extend(commands::carriage_return());
    stream.extend(commands::form_feed());
    stream.extend(commands::print_and_line_feed());
    stream.extend(commands::absolute_position(0x1234));
    stream.extend(commands::relative_position(0x0A0B));
    stream.extend(commands::relative_position_signed(-4));
    stream.extend(commands::left_margin(513));
    stream.extend(commands::feed_lines(1));
    stream.extend(commands::feed_dots(24));
    stream.extend(commands::cut_full());
    stream.extend(commands::cut_partial());
    stream.extend(commands::cut_full_feed(0x1B));
    stream.extend(commands::cut_partial_feed(0x1D));
    stream.extend(commands::pulse_drawer(1, 0x1B, 0x1D));
    stream.extend(commands::beep(3, 0x1B));
    stream.extend(commands::request_status(1));
    stream.extend(commands::real_time_status(2));
    stream.extend(commands::real_time_request(1));
    stream.extend(text::bold(true));
    stream.extend(text::double_strike(true));
    stream.extend(text::underline_two_dot());
    stream.extend(text::invert(true));
    stream.extend(text::character_size(8, 8).unwrap());
    stream.extend(text::character_size_normal());
    stream.extend(text::font(text::Font::B));
    stream.extend(text::rotate90(true));
    stream.extend(text::align_center());
    stream.extend(text::right_side_character_spacing(0x0A));
    stream.extend(text::line_spacing_default());
    stream.extend(text::line_spacing(0x1B));
    stream.extend(text::set_print_mode(0x38));
    stream.extend(text::reset_print_mode());
    stream.extend(text::smoothing(true));
    stream.extend(text::select_code_page(text::CodePage::Cp437));
    stream.extend(text::international_character_set(0));
    stream.extend(barcode1d::set_height(0x1B));
    stream.extend(barcode1d::set_width(2));
    stream.extend(barcode1d::set_hri_position(barcode1d::HriPosition::Both));
    stream.extend(barcode1d::set_hri_font(1));
    stream.extend(barcode1d::print(barcode1d::BarcodeType::Code128, &[0x1B, 0x1D, 0x0A]).unwrap());
    stream.extend(barcode1d::print(2u8, b"4006381333931").unwrap());
    stream.extend(qr::generate(&[0x1D; 300], 16, qr::QrErrorLevel::H).unwrap());
    stream.extend(graphics::raster(&[0x1B; 6], 2, 3, graphics::RasterMode::Quadruple).unwrap());
    stream.extend(bmp::print_bmp(&one_pixel_bmp([0, 0, 0]), 2).unwrap());
    stream.extend(b"end\n");

    let mut printer = TextPrinter::default();
    assert_eq!(printer.feed(&stream), stream.len());
    let text = printer.finish();
    assert!(text.ends_with("end\n"), "{text}");
    assert_eq!(text.matches("[IMAGE]").count(), 2);
    assert_eq!(text.matches("[QRCode]").count(), 1);
    assert_eq!(text.matches("cut >-").count(), 4);
}
