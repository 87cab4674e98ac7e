use crate::{
    foundation::core::{Affine, Canvas, Vec2},
    frames::model::Frame,
    physics::state::PoseTransform,
};

/// Uniform scale that fits a `w`×`h` image inside `canvas`.
pub fn fit_scale(canvas: Canvas, w: u32, h: u32) -> f64 {
    if w == 0 || h == 0 {
        return 1.0;
    }
    (f64::from(canvas.width) / f64::from(w)).min(f64::from(canvas.height) / f64::from(h))
}

/// Image-space to canvas-space transform of one layer.
///
/// Applied to a point, right to left: center the image on the origin, mirror, virtual
/// vertical offset, uniform scale, skew, squash, perspective shear from x/y rotation,
/// roll (rotation z plus tilt), then move to the canvas center.
pub fn layer_affine(
    canvas: Canvas,
    image_size: (u32, u32),
    frame: &Frame,
    pose: &PoseTransform,
    layer_zoom: f64,
    perspective_shear: f64,
) -> Affine {
    let (w, h) = image_size;

    let t_center = Affine::translate(canvas.center());
    let t_roll = Affine::rotate((pose.rot_z_deg + pose.tilt_deg).to_radians());
    let shear_x = pose.rot_y_deg.to_radians().sin() * perspective_shear;
    let shear_y = pose.rot_x_deg.to_radians().sin() * perspective_shear;
    let t_perspective = Affine::new([1.0, shear_y, shear_x, 1.0, 0.0, 0.0]);
    let squash = pose.squash.max(f64::EPSILON);
    let t_squash = Affine::scale_non_uniform(1.0 / squash, squash);
    let t_skew = Affine::new([1.0, 0.0, pose.skew, 1.0, 0.0, 0.0]);

    let (virtual_zoom, offset_y) = frame
        .virtual_zoom
        .map_or((1.0, 0.0), |vz| (vz.zoom, vz.offset_y));
    let t_scale =
        Affine::scale(pose.zoom * layer_zoom * fit_scale(canvas, w, h) * virtual_zoom);
    let t_offset = Affine::translate(Vec2::new(0.0, offset_y));
    let t_mirror = if frame.mirrored {
        Affine::scale_non_uniform(-1.0, 1.0)
    } else {
        Affine::IDENTITY
    };
    let t_origin = Affine::translate(Vec2::new(-f64::from(w) * 0.5, -f64::from(h) * 0.5));

    t_center * t_roll * t_perspective * t_squash * t_skew * t_scale * t_offset * t_mirror * t_origin
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
