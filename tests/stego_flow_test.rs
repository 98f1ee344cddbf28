//! Hiding and revealing messages through files on disk.

mod common;

use common::{fixtures, TestWorkspace};
use imagegene::raster_ops::{stego, OpError};
use pretty_assertions::assert_eq;

#[test]
fn test_message_survives_png() {
    let ws = TestWorkspace::new();
    let mut carrier = fixtures::rgb_pattern(16, 16);
    stego::encode(&mut carrier, fixtures::SECRET.as_bytes()).unwrap();
    ws.write_image("carrier.png", &carrier);

    let reloaded = ws.read_image("carrier.png");
    assert_eq!(stego::decode(&reloaded).unwrap(), fixtures::SECRET.as_bytes());
}

#[test]
fn test_message_survives_bmp() {
    let ws = TestWorkspace::new();
    let mut carrier = fixtures::rgb_pattern(12, 12);
    stego::encode(&mut carrier, b"bmp is lossless").unwrap();
    ws.write_image("carrier.bmp", &carrier);

    let reloaded = ws.read_image("carrier.bmp");
    assert_eq!(stego::decode(&reloaded).unwrap(), b"bmp is lossless");
}

#[test]
fn test_capacity_matches_what_fits() {
    let carrier = fixtures::gray_ramp(10, 10);
    // (100 - 32) / 8
    assert_eq!(stego::capacity(&carrier), 8);

    let mut fits = carrier.clone();
    stego::encode(&mut fits, b"8 bytes!").unwrap();

    let mut too_big = carrier.clone();
    let err = stego::encode(&mut too_big, b"9 bytes!!").unwrap_err();
    assert!(matches!(err, OpError::Capacity { .. }));
    assert_eq!(too_big, carrier);
}

#[test]
fn test_recipe_hide_then_reveal_from_file() {
    let ws = TestWorkspace::new();
    ws.write_image("in.png", &fixtures::rgb_pattern(12, 12));

    let (_, report) = ws.run_recipe(
        r#"
input: in.png
output: hidden.png
steps:
  - op: hide
    message: "pipeline secret"
"#,
    );
    assert_eq!(report.written, vec![ws.path("hidden.png")]);

    let (_, report) = ws.run_recipe(
        r#"
input: hidden.png
steps:
  - op: reveal
"#,
    );
    assert_eq!(report.revealed, vec!["pipeline secret".to_string()]);
}
