use super::*;

use crate::export::sink::InMemorySink;
use crate::foundation::core::{CanvasSize, Color};
use crate::raster::context::RasterContext;

const BG: Color = Color::WHITE;

fn store_with_frames(size: CanvasSize, count: usize) -> FrameStore {
    let mut ctx = RasterContext::new(size);
    let mut store = FrameStore::new(size, BG);
    for _ in 0..count {
        store.create_frame(&mut ctx);
    }
    store
}

#[test]
fn frames_arrive_in_display_order_at_export_safe_size() {
    let store = store_with_frames(CanvasSize::new(5, 4), 3);
    let mut sink = InMemorySink::new();
    export_render(&store, 24, &mut sink).unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!(cfg.size, CanvasSize::new(4, 4));
    assert_eq!(cfg.fps, 24);

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);
    for (i, (index, frame)) in frames.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(frame.size, CanvasSize::new(4, 4));
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    }
}

#[test]
fn even_canvas_is_exported_unchanged() {
    let store = store_with_frames(CanvasSize::new(4, 4), 1);
    let mut sink = InMemorySink::new();
    export_render(&store, 12, &mut sink).unwrap();
    assert_eq!(sink.frames()[0].1.size, CanvasSize::new(4, 4));
}

#[test]
fn zero_fps_is_rejected() {
    let store = store_with_frames(CanvasSize::new(4, 4), 1);
    let mut sink = InMemorySink::new();
    assert!(matches!(
        export_render(&store, 0, &mut sink),
        Err(FlipbookError::InvalidArgument(_))
    ));
}

#[test]
fn empty_store_is_rejected() {
    let store = FrameStore::new(CanvasSize::new(4, 4), BG);
    let mut sink = InMemorySink::new();
    assert!(export_render(&store, 24, &mut sink).is_err());
}

#[test]
fn canvas_too_small_to_export_is_rejected() {
    let store = store_with_frames(CanvasSize::new(1, 4), 1);
    let mut sink = InMemorySink::new();
    assert!(matches!(
        export_render(&store, 24, &mut sink),
        Err(FlipbookError::InvalidArgument(_))
    ));
}
