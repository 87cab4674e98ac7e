use crate::foundation::math::{mul_div255_u8, mul_div255_u16};

pub type PremulRgba8 = [u8; 4];

/// How a layer combines with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Screen,
}

impl BlendMode {
    /// Combine one channel of an already-faded source with the destination. `sa` is the
    /// faded source alpha.
    fn channel(self, dst: u8, src: u8, sa: u8) -> u8 {
        let (d, s) = (u16::from(dst), u16::from(src));
        match self {
            Self::Normal => src.saturating_add(mul_div255_u8(d, 255 - u16::from(sa))),
            Self::Screen => (s + d - mul_div255_u16(s, d)).min(255) as u8,
        }
    }
}

/// Layer opacity as 8-bit coverage.
fn coverage(opacity: f32) -> u16 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u16
}

/// Scale every premultiplied channel by `coverage / 255`.
fn fade(px: PremulRgba8, coverage: u16) -> PremulRgba8 {
    px.map(|c| mul_div255_u8(u16::from(c), coverage))
}

/// Draw `src` at `opacity` onto `dst` with `mode`. A fully faded source leaves `dst` as is.
pub fn blend(mode: BlendMode, dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let src = fade(src, coverage(opacity));
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    std::array::from_fn(|i| mode.channel(dst[i], src[i], sa))
}

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    blend(BlendMode::Normal, dst, src, opacity)
}

/// Premultiplied screen: `s + d - s*d` per channel, alpha included.
pub fn screen(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    blend(BlendMode::Screen, dst, src, opacity)
}

/// Linear mix of two premultiplied pixels; `t = 0` is `a`, `t = 1` is `b`.
pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let tb = coverage(t);
    let (a, b) = (fade(a, 255 - tb), fade(b, tb));
    std::array::from_fn(|i| a[i].saturating_add(b[i]))
}

/// Blend a row (or any run) of packed pixels onto `dst`. Lengths must match.
pub(crate) fn blend_in_place(mode: BlendMode, dst: &mut [u8], src: &[u8], opacity: f32) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend(mode, [d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
}

/// Crossfade `a` into `b` by `t`, then composite the result over `dst`.
pub(crate) fn crossfade_over_in_place(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) {
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        let blended = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        let out = over([d[0], d[1], d[2], d[3]], blended, 1.0);
        d.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
