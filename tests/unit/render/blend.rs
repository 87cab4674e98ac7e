use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]));
}

#[test]
fn screen_never_darkens() {
    let dst = [100, 50, 10, 255];
    let src = [80, 80, 80, 255];
    let out = screen(dst, src, 1.0);
    for i in 0..4 {
        assert!(out[i] >= dst[i]);
    }
    assert_eq!(screen([0, 0, 0, 255], [255, 255, 255, 255], 1.0), [255, 255, 255, 255]);
    assert_eq!(screen(dst, src, 0.0), dst);
}

#[test]
fn screen_onto_black_equals_scaled_source() {
    let out = screen([0, 0, 0, 255], [200, 100, 50, 255], 1.0);
    assert_eq!(out, [200, 100, 50, 255]);
}

#[test]
fn crossfade_t_0_is_a_and_t_1_is_b() {
    let a = [10, 20, 30, 40];
    let b = [200, 210, 220, 230];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
}

#[test]
fn blend_in_place_dispatches_mode() {
    let mut dst = vec![0, 0, 0, 255, 50, 50, 50, 255];
    let src = vec![100, 100, 100, 255, 100, 100, 100, 255];
    blend_in_place(BlendMode::Screen, &mut dst, &src, 1.0);
    assert_eq!(&dst[..4], &[100, 100, 100, 255]);
    assert!(dst[4] > 100);
}

#[test]
fn crossfade_over_lands_on_dst() {
    let mut dst = vec![0, 0, 0, 255];
    crossfade_over_in_place(&mut dst, &[255, 0, 0, 255], &[0, 0, 255, 255], 1.0);
    assert_eq!(dst, vec![0, 0, 255, 255]);
    crossfade_over_in_place(&mut dst, &[255, 0, 0, 255], &[0, 0, 0, 0], 0.0);
    assert_eq!(dst, vec![255, 0, 0, 255]);
}

#[test]
fn faded_screen_lightens_less() {
    let dst = [40, 40, 40, 255];
    let full = screen(dst, [200, 200, 200, 255], 1.0);
    let half = screen(dst, [200, 200, 200, 255], 0.5);
    assert!(half[0] > dst[0] && half[0] < full[0]);
    assert_eq!(half[3], 255);
}

#[test]
fn crossfade_midpoint_halves_coverage() {
    let out = crossfade([0, 0, 0, 0], [255, 255, 255, 255], 0.5);
    assert_eq!(out, [128, 128, 128, 128]);
    assert_eq!(blend(BlendMode::Normal, [0, 0, 0, 0], out, 1.0), out);
}
