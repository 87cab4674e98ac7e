use std::sync::Arc;

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::{
    assets::store::{AssetSource, PreparedImage},
    config::model::CompositorConfig,
    foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul},
    frames::model::Frame,
    orbit::viewer::OrbitView,
    physics::state::PoseTransform,
    render::{
        blend::{BlendMode, blend_in_place, crossfade_over_in_place},
        blur::motion_blur_rgba8_premul,
        surface::Surface,
        transform::layer_affine,
    },
};

/// Role of a layer in the stack, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Ghost,
    Stutter,
    Echo,
    Current,
}

/// One planned draw.
#[derive(Clone, Debug)]
pub struct LayerDraw {
    pub kind: LayerKind,
    pub frame: Arc<Frame>,
    pub opacity: f64,
    /// Multiplier on top of the camera zoom.
    pub zoom: f64,
    pub blend: BlendMode,
    /// Horizontal smear radius in pixels; `0.0` draws crisp.
    pub blur_px: f64,
}

pub type LayerPlan = SmallVec<[LayerDraw; 4]>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    pub drawn: usize,
    /// Layers whose image was missing or whose transform was degenerate.
    pub skipped: usize,
}

/// Decide which layers to draw for the current pose state.
///
/// Nothing is planned without a current frame. Ghost and stutter layers need a previous
/// frame; the current frame is always last.
pub fn plan_layers(
    current: Option<&Arc<Frame>>,
    previous: Option<&Arc<Frame>>,
    pose: &PoseTransform,
    cfg: &CompositorConfig,
) -> LayerPlan {
    let mut plan = LayerPlan::new();
    let Some(current) = current else {
        return plan;
    };

    if let Some(previous) = previous {
        if pose.ghost > cfg.ghost_min_opacity {
            plan.push(LayerDraw {
                kind: LayerKind::Ghost,
                frame: Arc::clone(previous),
                opacity: pose.ghost,
                zoom: cfg.ghost_zoom,
                blend: BlendMode::Screen,
                blur_px: 0.0,
            });
        }
        if pose.stutter_blur > cfg.stutter_min_blur {
            plan.push(LayerDraw {
                kind: LayerKind::Stutter,
                frame: Arc::clone(previous),
                opacity: 1.0,
                zoom: 1.0,
                blend: BlendMode::Normal,
                blur_px: pose.stutter_blur * cfg.stutter_blur_px,
            });
        }
    }

    if pose.echo > 0.0 {
        plan.push(LayerDraw {
            kind: LayerKind::Echo,
            frame: Arc::clone(current),
            opacity: pose.echo,
            zoom: cfg.echo_zoom,
            blend: BlendMode::Normal,
            blur_px: 0.0,
        });
    }

    plan.push(LayerDraw {
        kind: LayerKind::Current,
        frame: Arc::clone(current),
        opacity: 1.0,
        zoom: 1.0,
        blend: BlendMode::Normal,
        blur_px: 0.0,
    });
    plan
}

fn clear(surface: &mut Surface, cfg: &CompositorConfig) {
    if let Some([r, g, b, a]) = cfg.clear_rgba {
        surface.clear(Rgba8Premul::from_straight_rgba(r, g, b, a));
    }
}

/// Rasterize `plan` into `surface`, back to front.
pub fn composite(
    plan: &[LayerDraw],
    pose: &PoseTransform,
    assets: &dyn AssetSource,
    surface: &mut Surface,
    cfg: &CompositorConfig,
) -> RenderStats {
    clear(surface, cfg);

    let canvas = surface.canvas();
    let row_bytes = surface.width as usize * 4;
    let mut layer = vec![0u8; surface.data.len()];
    let mut stats = RenderStats::default();

    for draw in plan {
        let Some(image) = assets.image(&draw.frame.image) else {
            tracing::debug!(
                layer = ?draw.kind,
                image = draw.frame.image.as_str(),
                "image not ready; layer skipped"
            );
            stats.skipped += 1;
            continue;
        };

        let affine = layer_affine(
            canvas,
            (image.width, image.height),
            &draw.frame,
            pose,
            draw.zoom,
            cfg.perspective_shear,
        );
        layer.fill(0);
        if !rasterize(image, affine, &mut layer, canvas) {
            tracing::debug!(layer = ?draw.kind, "degenerate layer transform; layer skipped");
            stats.skipped += 1;
            continue;
        }

        let radius = draw.blur_px.round();
        if radius >= 1.0
            && let Err(e) =
                motion_blur_rgba8_premul(&mut layer, canvas.width, canvas.height, radius as u32)
        {
            tracing::debug!(error = %e, "stutter blur skipped");
        }

        let opacity = draw.opacity as f32;
        surface
            .data
            .par_chunks_mut(row_bytes)
            .zip(layer.par_chunks(row_bytes))
            .for_each(|(dst, src)| blend_in_place(draw.blend, dst, src, opacity));
        stats.drawn += 1;
    }
    stats
}

/// Draw an orbit view with a neutral camera: a single frame, or a crossfade of two.
pub fn render_orbit_view(
    view: &OrbitView,
    assets: &dyn AssetSource,
    surface: &mut Surface,
    cfg: &CompositorConfig,
) -> RenderStats {
    let (a, b, t) = match view {
        OrbitView::Single(frame) => {
            let plan = plan_layers(Some(frame), None, &PoseTransform::default(), cfg);
            return composite(&plan, &PoseTransform::default(), assets, surface, cfg);
        }
        OrbitView::Blend(bracket) => (&bracket.a, &bracket.b, bracket.t),
    };

    let (img_a, img_b) = (assets.image(&a.image), assets.image(&b.image));
    let only = match (img_a, img_b) {
        (Some(_), None) => Some(a),
        (None, Some(_)) => Some(b),
        (None, None) => {
            tracing::debug!("orbit images not ready; nothing drawn");
            clear(surface, cfg);
            return RenderStats {
                drawn: 0,
                skipped: 2,
            };
        }
        (Some(_), Some(_)) => None,
    };
    if let Some(frame) = only {
        let plan = plan_layers(Some(frame), None, &PoseTransform::default(), cfg);
        let mut stats = composite(&plan, &PoseTransform::default(), assets, surface, cfg);
        stats.skipped += 1;
        return stats;
    }

    clear(surface, cfg);
    let canvas = surface.canvas();
    let pose = PoseTransform::default();
    let mut layers = [vec![0u8; surface.data.len()], vec![0u8; surface.data.len()]];
    let mut stats = RenderStats::default();
    for ((frame, image), buf) in [(a, img_a), (b, img_b)].into_iter().zip(layers.iter_mut()) {
        let Some(image) = image else {
            continue;
        };
        let affine = layer_affine(
            canvas,
            (image.width, image.height),
            frame,
            &pose,
            1.0,
            cfg.perspective_shear,
        );
        if rasterize(image, affine, buf, canvas) {
            stats.drawn += 1;
        } else {
            stats.skipped += 1;
        }
    }

    let row_bytes = surface.width as usize * 4;
    let [la, lb] = &layers;
    surface
        .data
        .par_chunks_mut(row_bytes)
        .zip(la.par_chunks(row_bytes).zip(lb.par_chunks(row_bytes)))
        .for_each(|(dst, (ra, rb))| crossfade_over_in_place(dst, ra, rb, t as f32));
    stats
}

/// Inverse-map every canvas pixel inside the transformed bounds and sample bilinearly.
///
/// Returns `false` for a non-invertible transform. `dst` must be cleared by the caller.
fn rasterize(image: &PreparedImage, affine: Affine, dst: &mut [u8], canvas: Canvas) -> bool {
    let det = affine.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return false;
    }
    let inv = affine.inverse();
    let bounds = affine.transform_rect_bbox(Rect::new(
        0.0,
        0.0,
        f64::from(image.width),
        f64::from(image.height),
    ));

    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let x0 = bounds.x0.floor().clamp(0.0, cw) as usize;
    let x1 = bounds.x1.ceil().clamp(0.0, cw) as usize;
    let y0 = bounds.y0.floor().clamp(0.0, ch) as usize;
    let y1 = bounds.y1.ceil().clamp(0.0, ch) as usize;
    if x0 >= x1 || y0 >= y1 {
        return true;
    }

    let row_bytes = canvas.width as usize * 4;
    dst.par_chunks_mut(row_bytes)
        .enumerate()
        .skip(y0)
        .take(y1 - y0)
        .for_each(|(y, row)| {
            for x in x0..x1 {
                let p = inv * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some(px) = sample_bilinear(image, p.x, p.y) {
                    row[x * 4..x * 4 + 4].copy_from_slice(&px);
                }
            }
        });
    true
}

/// Bilinear sample at image-space `(u, v)`; pixel centers sit at `+0.5`.
fn sample_bilinear(image: &PreparedImage, u: f64, v: f64) -> Option<[u8; 4]> {
    let (w, h) = (f64::from(image.width), f64::from(image.height));
    if !(u >= 0.0 && u < w && v >= 0.0 && v < h) {
        return None;
    }
    let sx = (u - 0.5).max(0.0);
    let sy = (v - 0.5).max(0.0);
    let fx = sx.fract();
    let fy = sy.fract();
    let ix0 = sx as u32;
    let iy0 = sy as u32;
    let ix1 = (ix0 + 1).min(image.width - 1);
    let iy1 = (iy0 + 1).min(image.height - 1);

    let p00 = image.pixel(ix0, iy0)?;
    let p10 = image.pixel(ix1, iy0)?;
    let p01 = image.pixel(ix0, iy1)?;
    let p11 = image.pixel(ix1, iy1)?;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
