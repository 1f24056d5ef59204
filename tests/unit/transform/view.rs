use super::*;

use crate::persist::storage::MemoryStore;

#[test]
fn default_view_matrix_uses_default_scale() {
    let mut view = ViewTransform::new();
    assert_eq!(
        view.matrix().as_coeffs(),
        [DEFAULT_SCALE, 0.0, 0.0, DEFAULT_SCALE, 0.0, 0.0]
    );
}

#[test]
fn pan_accumulates_translation() {
    let mut view = ViewTransform::new();
    view.pan(Vec2::new(3.0, -2.0));
    view.pan(Vec2::new(1.0, 1.0));
    let coeffs = view.matrix().as_coeffs();
    assert_eq!(coeffs[4], 4.0);
    assert_eq!(coeffs[5], -1.0);
    assert_eq!(coeffs[0], DEFAULT_SCALE);
}

#[test]
fn zoom_at_keeps_the_anchor_fixed() {
    let mut view = ViewTransform::new();
    view.pan(Vec2::new(5.0, 7.0));
    let anchor = Point::new(3.0, 4.0);

    // The anchor's pre-image maps to the same view point before and after.
    let before = view.matrix();
    let world = before.inverse() * anchor;
    view.zoom_at(anchor, 2.0).unwrap();
    let after = view.matrix() * world;
    assert!((after.x - anchor.x).abs() < 1e-9);
    assert!((after.y - anchor.y).abs() < 1e-9);
}

#[test]
fn inverse_zoom_factors_roundtrip_exactly() {
    let mut view = ViewTransform::new();
    view.pan(Vec2::new(5.25, 7.5));
    let scale_before = view.scale();
    let pos_before = view.translation();

    let anchor = Point::new(3.0, 4.0);
    view.zoom_at(anchor, 2.0).unwrap();
    view.zoom_at(anchor, 0.5).unwrap();

    assert_eq!(view.scale(), scale_before);
    assert_eq!(view.translation(), pos_before);
}

#[test]
fn zoom_rejects_non_positive_and_non_finite_factors() {
    let mut view = ViewTransform::new();
    let anchor = Point::new(0.0, 0.0);
    for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            view.zoom_at(anchor, factor),
            Err(FlipbookError::InvalidArgument(_))
        ));
    }
    // Rejected zooms leave the view untouched.
    assert_eq!(view.scale(), DEFAULT_SCALE);
}

#[test]
fn reset_restores_defaults() {
    let mut view = ViewTransform::new();
    view.pan(Vec2::new(10.0, 10.0));
    view.zoom_at(Point::new(1.0, 1.0), 3.0).unwrap();
    view.reset();
    assert_eq!(
        view.matrix().as_coeffs(),
        [DEFAULT_SCALE, 0.0, 0.0, DEFAULT_SCALE, 0.0, 0.0]
    );
}

#[test]
fn save_persists_recomputed_coefficients() {
    let mut kv = MemoryStore::new();
    let mut view = ViewTransform::new();
    view.pan(Vec2::new(2.0, 3.0));
    view.save(&mut kv).unwrap();

    let stored: [f64; 6] = serde_json::from_str(&kv.get(KEY_MATRIX).unwrap().unwrap()).unwrap();
    assert_eq!(stored, [DEFAULT_SCALE, 0.0, 0.0, DEFAULT_SCALE, 2.0, 3.0]);
    let pos: [f64; 2] = serde_json::from_str(&kv.get(KEY_POS).unwrap().unwrap()).unwrap();
    assert_eq!(pos, [2.0, 3.0]);
}

#[test]
fn load_roundtrips_saved_state() {
    let mut kv = MemoryStore::new();
    let mut view = ViewTransform::new();
    view.pan(Vec2::new(-4.0, 9.0));
    view.zoom_at(Point::new(1.0, 2.0), 2.0).unwrap();
    view.save(&mut kv).unwrap();

    let mut restored = ViewTransform::load(&kv).unwrap();
    assert_eq!(restored.matrix(), view.matrix());
}

#[test]
fn load_restores_from_matrix_alone() {
    let mut kv = MemoryStore::new();
    kv.set(KEY_MATRIX, "[2.0,0.0,0.0,2.0,10.0,20.0]").unwrap();
    let mut view = ViewTransform::load(&kv).unwrap();
    assert_eq!(view.scale(), 2.0);
    assert_eq!(view.translation(), Vec2::new(10.0, 20.0));
    assert_eq!(view.matrix().as_coeffs(), [2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);
}

#[test]
fn pos_and_scale_keys_override_the_stored_matrix() {
    let mut kv = MemoryStore::new();
    kv.set(KEY_MATRIX, "[2.0,0.0,0.0,2.0,10.0,20.0]").unwrap();
    kv.set(KEY_POS, "[1.0,1.0]").unwrap();
    kv.set(KEY_SCALE, "3.0").unwrap();
    let view = ViewTransform::load(&kv).unwrap();
    assert_eq!(view.scale(), 3.0);
    assert_eq!(view.translation(), Vec2::new(1.0, 1.0));
}

#[test]
fn malformed_stored_values_fall_back_to_defaults() {
    let mut kv = MemoryStore::new();
    kv.set(KEY_MATRIX, "not json").unwrap();
    kv.set(KEY_SCALE, "{\"oops\":1}").unwrap();
    let mut view = ViewTransform::load(&kv).unwrap();
    assert_eq!(
        view.matrix().as_coeffs(),
        [DEFAULT_SCALE, 0.0, 0.0, DEFAULT_SCALE, 0.0, 0.0]
    );
}
