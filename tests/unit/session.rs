use super::*;

use crate::export::sink::InMemorySink;
use crate::foundation::core::Rect;
use crate::foundation::error::FlipbookError;
use crate::persist::snapshot::SnapshotFrame;
use crate::persist::storage::{KEY_FRAMES, KEY_MATRIX, KEY_SCALE, MemoryStore};
use crate::raster::context::RasterContext;
use crate::transform::view::DEFAULT_SCALE;

const SIZE: CanvasSize = CanvasSize::new(4, 4);
const BG: Color = Color::WHITE;

fn rect_op(color: Color) -> Operation {
    Operation::draw(vec![Box::new(move |ctx: &mut dyn RenderContext| {
        ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), color);
    })])
}

fn open_editor(ctx: &mut RasterContext) -> Editor<MemoryStore> {
    Editor::open(MemoryStore::new(), ctx, SIZE, BG).unwrap()
}

// A durable store whose backend has gone away: writes always fail, reads
// optionally fail too.
#[derive(Debug)]
struct UnpluggedStore {
    fail_reads: bool,
}

impl KeyValueStore for UnpluggedStore {
    fn get(&self, _key: &str) -> FlipbookResult<Option<String>> {
        if self.fail_reads {
            Err(FlipbookError::storage_unavailable("backend is gone"))
        } else {
            Ok(None)
        }
    }

    fn set(&mut self, _key: &str, _value: &str) -> FlipbookResult<()> {
        Err(FlipbookError::storage_unavailable("backend is gone"))
    }
}

fn stored_frames(editor: &Editor<MemoryStore>) -> Vec<SnapshotFrame> {
    let raw = editor.storage().get(KEY_FRAMES).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn open_on_empty_storage_starts_with_one_frame() {
    let mut ctx = RasterContext::new(SIZE);
    let editor = open_editor(&mut ctx);
    assert_eq!(editor.store().len(), 1);
    assert_eq!(editor.store().active(), Some(0));
}

#[test]
fn every_edit_autosaves_the_frames() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);

    assert!(editor.execute(rect_op(Color::rgb(255, 0, 0)), &mut ctx).unwrap());
    let after_draw = stored_frames(&editor);
    assert_eq!(after_draw.len(), 1);
    assert_eq!(after_draw[0].render.pixel(0, 0), Some([255, 0, 0, 255]));

    assert!(editor.undo(&mut ctx).unwrap());
    let after_undo = stored_frames(&editor);
    assert_eq!(after_undo[0].render.pixel(0, 0), Some([255, 255, 255, 255]));

    assert!(editor.redo(&mut ctx).unwrap());
    let after_redo = stored_frames(&editor);
    assert_eq!(after_redo[0].render.pixel(0, 0), Some([255, 0, 0, 255]));
}

#[test]
fn noop_edits_do_not_write() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);
    assert!(!editor.undo(&mut ctx).unwrap());
    assert!(editor.storage().get(KEY_FRAMES).unwrap().is_none());
}

#[test]
fn frame_management_autosaves() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);

    let index = editor.create_frame(&mut ctx).unwrap();
    assert_eq!(index, 1);
    assert_eq!(stored_frames(&editor).len(), 2);

    editor.delete_frame(1).unwrap();
    assert_eq!(stored_frames(&editor).len(), 1);
    assert_eq!(editor.store().active(), Some(0));
}

#[test]
fn view_mutations_persist_the_transform() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);

    editor.pan(Vec2::new(2.0, 3.0)).unwrap();
    editor.zoom_at(Point::new(0.0, 0.0), 2.0).unwrap();
    let scale: f64 =
        serde_json::from_str(&editor.storage().get(KEY_SCALE).unwrap().unwrap()).unwrap();
    assert_eq!(scale, DEFAULT_SCALE * 2.0);

    editor.reset_view().unwrap();
    let coeffs: [f64; 6] =
        serde_json::from_str(&editor.storage().get(KEY_MATRIX).unwrap().unwrap()).unwrap();
    assert_eq!(coeffs, [DEFAULT_SCALE, 0.0, 0.0, DEFAULT_SCALE, 0.0, 0.0]);
}

#[test]
fn load_restores_latest_autosave_without_history() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);

    editor.execute(rect_op(Color::rgb(255, 0, 0)), &mut ctx).unwrap();
    editor.save().unwrap();
    editor.execute(rect_op(Color::rgb(0, 255, 0)), &mut ctx).unwrap();

    // The reloaded session has the autosaved pixels but no history.
    editor.load(&mut ctx).unwrap();
    let frame = editor.store().frame(0).unwrap();
    assert_eq!(frame.render_source().pixel(0, 0), Some([0, 255, 0, 255]));
    assert!(frame.history().is_empty());
    assert!(!editor.undo(&mut ctx).unwrap());
}

#[test]
fn selection_is_not_persisted() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);
    editor.create_frame(&mut ctx).unwrap();
    editor.select_frame(0).unwrap();
    assert!(editor.select_frame(5).is_err());
    assert_eq!(editor.store().active(), Some(0));
}

#[test]
fn export_streams_frames_through_the_sink() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);
    editor.create_frame(&mut ctx).unwrap();

    let mut sink = InMemorySink::new();
    editor.export(24, &mut sink).unwrap();
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config().unwrap().fps, 24);
}

#[test]
fn storage_write_failures_surface_from_autosave() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor =
        Editor::open(UnpluggedStore { fail_reads: false }, &mut ctx, SIZE, BG).unwrap();

    let err = editor
        .execute(rect_op(Color::rgb(255, 0, 0)), &mut ctx)
        .unwrap_err();
    assert!(matches!(err, FlipbookError::StorageUnavailable(_)));

    let err = editor.save().unwrap_err();
    assert!(matches!(err, FlipbookError::StorageUnavailable(_)));

    let err = editor.pan(Vec2::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, FlipbookError::StorageUnavailable(_)));
}

#[test]
fn storage_read_failures_surface_from_open() {
    let mut ctx = RasterContext::new(SIZE);
    let err = Editor::open(UnpluggedStore { fail_reads: true }, &mut ctx, SIZE, BG).unwrap_err();
    assert!(matches!(err, FlipbookError::StorageUnavailable(_)));
}

#[test]
fn preview_uses_the_active_frame() {
    let mut ctx = RasterContext::new(SIZE);
    let mut editor = open_editor(&mut ctx);
    editor.execute(rect_op(Color::rgb(255, 0, 0)), &mut ctx).unwrap();
    editor.create_frame(&mut ctx).unwrap();

    let preview = editor.preview(OnionSkinSettings::default()).unwrap();
    let px = preview.pixel(0, 0).unwrap();
    assert_eq!(px[0], 255);
    assert!(px[3] < 255);
}
