use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Source-over blend of straight-alpha pixels with an extra `opacity` applied
/// to `src`.
pub fn over(dst: StraightRgba8, src: StraightRgba8, opacity: f32) -> StraightRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = u16::from(mul_div255_u8(u16::from(src[3]), op));
    if sa == 0 {
        return dst;
    }

    // Effective destination weight: da * (1 - sa).
    let dw = u16::from(mul_div255_u8(u16::from(dst[3]), 255 - sa));
    let oa = u16::from(add_sat_u8(sa as u8, dw as u8));
    if oa == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = oa as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(dw);
        out[i] = ((num + u32::from(oa) / 2) / u32::from(oa)) as u8;
    }
    out
}

/// Source-over blend of equal-length straight RGBA8 buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> FlipbookResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(FlipbookError::invalid_argument(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}
