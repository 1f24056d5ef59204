use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::persist::storage::{KEY_MATRIX, KEY_POS, KEY_SCALE, KeyValueStore, read_json, to_json};

/// Default uniform zoom applied to a fresh (or reset) view.
///
/// Slightly under 1.0 so the whole canvas is visible with a margin when a
/// session starts.
pub const DEFAULT_SCALE: f64 = 0.9;

/// Pan/zoom view state exposed as a 2D affine matrix.
///
/// The matrix is `[scale, 0, 0, scale, tx, ty]` and is recomputed lazily: any
/// pan or zoom marks it stale, and the flag is cleared exactly when the
/// matrix is read or persisted. No stale coefficients ever escape this type.
///
/// One instance per editing session, explicitly constructed and owned by the
/// session controller; there is no hidden global.
#[derive(Clone, Debug)]
pub struct ViewTransform {
    scale: f64,
    pos: Vec2,
    mat: Affine,
    needs_recompute: bool,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    /// View at [`DEFAULT_SCALE`] with zero translation.
    pub fn new() -> Self {
        let mut view = Self {
            scale: DEFAULT_SCALE,
            pos: Vec2::ZERO,
            mat: Affine::IDENTITY,
            needs_recompute: true,
        };
        view.recompute();
        view
    }

    /// Restore the default scale and zero translation.
    pub fn reset(&mut self) {
        self.scale = DEFAULT_SCALE;
        self.pos = Vec2::ZERO;
        self.needs_recompute = true;
    }

    /// Pan the view by `delta`.
    pub fn pan(&mut self, delta: Vec2) {
        self.pos += delta;
        self.needs_recompute = true;
    }

    /// Zoom by `factor`, keeping `anchor` (in view space) fixed.
    ///
    /// Rejects zero, negative, or non-finite factors: they would produce a
    /// singular or flipped transform.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> FlipbookResult<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(FlipbookError::invalid_argument(format!(
                "zoom factor must be a positive finite number, got {factor}"
            )));
        }
        self.scale *= factor;
        self.pos = anchor.to_vec2() - (anchor.to_vec2() - self.pos) * factor;
        self.needs_recompute = true;
        Ok(())
    }

    /// The view matrix, recomputed first if a pan/zoom made it stale.
    pub fn matrix(&mut self) -> Affine {
        if self.needs_recompute {
            self.recompute();
        }
        self.mat
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation.
    pub fn translation(&self) -> Vec2 {
        self.pos
    }

    fn recompute(&mut self) {
        self.mat = Affine::new([self.scale, 0.0, 0.0, self.scale, self.pos.x, self.pos.y]);
        self.needs_recompute = false;
    }

    /// Persist the view under the `matrix`/`pos`/`scale` keys.
    ///
    /// Recomputes the matrix first, so persisted coefficients are never
    /// stale.
    pub fn save(&mut self, kv: &mut dyn KeyValueStore) -> FlipbookResult<()> {
        let coeffs = self.matrix().as_coeffs();
        kv.set(KEY_MATRIX, &to_json(&coeffs)?)?;
        kv.set(KEY_POS, &to_json(&[self.pos.x, self.pos.y])?)?;
        kv.set(KEY_SCALE, &to_json(&self.scale)?)?;
        Ok(())
    }

    /// Restore a view from storage.
    ///
    /// Every key is optional; `pos`/`scale` win over a stored `matrix`, and a
    /// `matrix` alone restores both from its coefficients. Malformed stored
    /// JSON is treated as absent (logged), never an error.
    pub fn load(kv: &dyn KeyValueStore) -> FlipbookResult<Self> {
        let mut view = Self::new();
        if let Some(coeffs) = read_json::<[f64; 6]>(kv, KEY_MATRIX)? {
            view.scale = coeffs[0];
            view.pos = Vec2::new(coeffs[4], coeffs[5]);
        }
        if let Some([x, y]) = read_json::<[f64; 2]>(kv, KEY_POS)? {
            view.pos = Vec2::new(x, y);
        }
        if let Some(scale) = read_json::<f64>(kv, KEY_SCALE)? {
            view.scale = scale;
        }
        view.needs_recompute = true;
        view.recompute();
        Ok(view)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/view.rs"]
mod tests;
