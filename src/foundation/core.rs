use std::sync::Arc;

use crate::foundation::error::{FlipbookError, FlipbookResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as a CSS-style hex string (`"#rrggbb"` or `"#rrggbbaa"`), the
/// form durable snapshots store background colors in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white, the default frame background.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from all four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#rrggbb` or `#rrggbbaa` hex string.
    pub fn from_hex(s: &str) -> FlipbookResult<Self> {
        let hex = s.strip_prefix('#').ok_or_else(|| {
            FlipbookError::invalid_argument(format!("color '{s}' must start with '#'"))
        })?;
        // Non-ASCII payloads would make byte-indexed slicing panic on a char
        // boundary; they are just invalid hex.
        if !hex.is_ascii() {
            return Err(FlipbookError::invalid_argument(format!(
                "invalid hex color '{s}'"
            )));
        }
        let channel = |i: usize| -> FlipbookResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| FlipbookError::invalid_argument(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(FlipbookError::invalid_argument(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            ))),
        }
    }

    /// Format as a hex string; alpha is included only when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Channels as a `[r, g, b, a]` array.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Canvas dimensions in pixels.
///
/// Serialized as a `[width, height]` pair, the form the durable `size` key
/// stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Build a size value.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (the canvas cannot hold pixels).
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Round each dimension down to the nearest even integer.
    ///
    /// yuv420p MP4 output rejects odd dimensions, so exported frames are
    /// cropped to this size. Pure; `(3, 5)` becomes `(2, 4)`.
    pub const fn export_safe(self) -> Self {
        Self {
            width: (self.width / 2) * 2,
            height: (self.height / 2) * 2,
        }
    }

    /// Byte length of a straight RGBA8 buffer of this size.
    pub const fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl From<[u32; 2]> for CanvasSize {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<CanvasSize> for [u32; 2] {
    fn from(size: CanvasSize) -> Self {
        [size.width, size.height]
    }
}

/// Owned straight RGBA8 pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageData {
    /// Pixel dimensions.
    pub size: CanvasSize,
    /// Row-major straight RGBA8 bytes (`size.byte_len()` long).
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap an existing buffer, validating its length against `size`.
    pub fn new(size: CanvasSize, pixels: Vec<u8>) -> FlipbookResult<Self> {
        if pixels.len() != size.byte_len() {
            return Err(FlipbookError::invalid_argument(format!(
                "pixel buffer length {} does not match {}x{} rgba8",
                pixels.len(),
                size.width,
                size.height
            )));
        }
        Ok(Self { size, pixels })
    }

    /// A buffer filled with one color.
    pub fn solid(size: CanvasSize, color: Color) -> Self {
        let mut pixels = Vec::with_capacity(size.byte_len());
        for _ in 0..(size.width as usize) * (size.height as usize) {
            pixels.extend_from_slice(&color.to_rgba8());
        }
        Self { size, pixels }
    }

    /// A fully transparent buffer.
    pub fn transparent(size: CanvasSize) -> Self {
        Self {
            size,
            pixels: vec![0; size.byte_len()],
        }
    }

    /// Read one pixel; `None` outside bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Top-left crop to `target`, which must not exceed this buffer's size.
    pub fn crop(&self, target: CanvasSize) -> FlipbookResult<ImageData> {
        if target.width > self.size.width || target.height > self.size.height {
            return Err(FlipbookError::invalid_argument(format!(
                "cannot crop {}x{} to larger {}x{}",
                self.size.width, self.size.height, target.width, target.height
            )));
        }
        let src_stride = (self.size.width as usize) * 4;
        let dst_stride = (target.width as usize) * 4;
        let mut pixels = Vec::with_capacity(target.byte_len());
        for row in 0..target.height as usize {
            let start = row * src_stride;
            pixels.extend_from_slice(&self.pixels[start..start + dst_stride]);
        }
        Ok(ImageData {
            size: target,
            pixels,
        })
    }
}

/// Cheap shared handle to an immutable [`ImageData`].
///
/// Frames hand these out as their render/overlay sources; cloning never
/// copies pixels. Serde delegates to the payload, so snapshots round-trip
/// through plain [`ImageData`] values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef(Arc<ImageData>);

impl ImageRef {
    /// Take ownership of a buffer.
    pub fn new(data: ImageData) -> Self {
        Self(Arc::new(data))
    }

    /// Borrow the underlying pixels.
    pub fn data(&self) -> &ImageData {
        &self.0
    }
}

impl std::ops::Deref for ImageRef {
    type Target = ImageData;

    fn deref(&self) -> &ImageData {
        &self.0
    }
}

impl From<ImageData> for ImageRef {
    fn from(data: ImageData) -> Self {
        Self::new(data)
    }
}

impl serde::Serialize for ImageRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(self.0.as_ref(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for ImageRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <ImageData as serde::Deserialize>::deserialize(deserializer).map(ImageRef::new)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
