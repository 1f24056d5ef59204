use super::*;

#[test]
fn color_hex_roundtrip() {
    let c = Color::rgb(0x12, 0xab, 0xef);
    assert_eq!(c.to_hex(), "#12abef");
    assert_eq!(Color::from_hex("#12abef").unwrap(), c);

    let t = Color::rgba(1, 2, 3, 4);
    assert_eq!(t.to_hex(), "#01020304");
    assert_eq!(Color::from_hex("#01020304").unwrap(), t);
}

#[test]
fn color_rejects_malformed_hex() {
    assert!(Color::from_hex("ffffff").is_err());
    assert!(Color::from_hex("#fff").is_err());
    assert!(Color::from_hex("#zzzzzz").is_err());
}

#[test]
fn color_rejects_non_ascii_hex() {
    // "#☃☃" is 6 payload bytes but not 6 hex digits; slicing it byte-wise
    // must not panic mid-character.
    assert!(matches!(
        Color::from_hex("#\u{2603}\u{2603}"),
        Err(FlipbookError::InvalidArgument(_))
    ));
    let parsed: Result<Color, _> = serde_json::from_str("\"#\u{2603}\u{2603}\"");
    assert!(parsed.is_err());
}

#[test]
fn color_serializes_as_hex_string() {
    let json = serde_json::to_string(&Color::WHITE).unwrap();
    assert_eq!(json, "\"#ffffff\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::WHITE);
}

#[test]
fn export_safe_rounds_down_to_even() {
    assert_eq!(CanvasSize::new(3, 5).export_safe(), CanvasSize::new(2, 4));
    assert_eq!(CanvasSize::new(4, 6).export_safe(), CanvasSize::new(4, 6));
    assert_eq!(CanvasSize::new(0, 1).export_safe(), CanvasSize::new(0, 0));
}

#[test]
fn canvas_size_serializes_as_pair() {
    let json = serde_json::to_string(&CanvasSize::new(3, 4)).unwrap();
    assert_eq!(json, "[3,4]");
    let back: CanvasSize = serde_json::from_str(&json).unwrap();
    assert_eq!(back, CanvasSize::new(3, 4));
}

#[test]
fn image_data_validates_buffer_length() {
    let size = CanvasSize::new(2, 2);
    assert!(ImageData::new(size, vec![0; 16]).is_ok());
    assert!(ImageData::new(size, vec![0; 15]).is_err());
}

#[test]
fn solid_and_pixel_access() {
    let img = ImageData::solid(CanvasSize::new(2, 2), Color::rgb(9, 8, 7));
    assert_eq!(img.pixel(1, 1), Some([9, 8, 7, 255]));
    assert_eq!(img.pixel(2, 0), None);
}

#[test]
fn crop_keeps_top_left() {
    let size = CanvasSize::new(3, 2);
    let mut pixels = Vec::new();
    for i in 0..6u8 {
        pixels.extend_from_slice(&[i, i, i, 255]);
    }
    let img = ImageData::new(size, pixels).unwrap();
    let cropped = img.crop(CanvasSize::new(2, 2)).unwrap();
    assert_eq!(cropped.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(cropped.pixel(1, 0), Some([1, 1, 1, 255]));
    assert_eq!(cropped.pixel(0, 1), Some([3, 3, 3, 255]));
    assert!(img.crop(CanvasSize::new(4, 2)).is_err());
}

#[test]
fn image_ref_serde_delegates_to_payload() {
    let img = ImageData::solid(CanvasSize::new(1, 1), Color::TRANSPARENT);
    let direct = serde_json::to_string(&img).unwrap();
    let via_ref = serde_json::to_string(&ImageRef::new(img.clone())).unwrap();
    assert_eq!(direct, via_ref);
    let back: ImageRef = serde_json::from_str(&via_ref).unwrap();
    assert_eq!(back.data(), &img);
}
