use super::*;
use crate::{
    assets::store::AssetStore,
    frames::model::{EnergyTier, ImageKey},
    orbit::quantize::Bracket,
};

fn frame(id: &str) -> Arc<Frame> {
    Arc::new(Frame::new(id, EnergyTier::Mid))
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    let [r, g, b, a] = rgba;
    PreparedImage::solid(w, h, Rgba8Premul::from_straight_rgba(r, g, b, a)).unwrap()
}

fn store(entries: &[(&str, PreparedImage)]) -> AssetStore {
    let mut s = AssetStore::new();
    for (k, img) in entries {
        s.insert(ImageKey::new(*k), img.clone());
    }
    s
}

fn kinds(plan: &LayerPlan) -> Vec<LayerKind> {
    plan.iter().map(|d| d.kind).collect()
}

#[test]
fn full_stack_is_ordered_back_to_front() {
    let cfg = CompositorConfig::default();
    let pose = PoseTransform {
        ghost: 0.5,
        stutter_blur: 0.5,
        echo: 0.3,
        ..PoseTransform::default()
    };
    let (cur, prev) = (frame("cur"), frame("prev"));
    let plan = plan_layers(Some(&cur), Some(&prev), &pose, &cfg);
    assert_eq!(
        kinds(&plan),
        [
            LayerKind::Ghost,
            LayerKind::Stutter,
            LayerKind::Echo,
            LayerKind::Current
        ]
    );
    assert_eq!(plan[0].blend, BlendMode::Screen);
    assert_eq!(plan[0].zoom, 1.2);
    assert_eq!(plan[0].frame.pose_id.as_str(), "prev");
    assert_eq!(plan[1].opacity, 1.0);
    assert_eq!(plan[1].blur_px, 6.0);
    assert_eq!(plan[2].zoom, 1.02);
    assert_eq!(plan[2].frame.pose_id.as_str(), "cur");
    assert_eq!(plan[3].opacity, 1.0);
}

#[test]
fn thresholds_gate_optional_layers() {
    let cfg = CompositorConfig::default();
    let pose = PoseTransform {
        ghost: 0.05,
        stutter_blur: 0.1,
        echo: 0.0,
        ..PoseTransform::default()
    };
    let (cur, prev) = (frame("cur"), frame("prev"));
    let plan = plan_layers(Some(&cur), Some(&prev), &pose, &cfg);
    assert_eq!(kinds(&plan), [LayerKind::Current]);
}

#[test]
fn previous_layers_need_a_previous_frame() {
    let cfg = CompositorConfig::default();
    let pose = PoseTransform {
        ghost: 1.0,
        stutter_blur: 1.0,
        echo: 1.0,
        ..PoseTransform::default()
    };
    let cur = frame("cur");
    assert_eq!(
        kinds(&plan_layers(Some(&cur), None, &pose, &cfg)),
        [LayerKind::Echo, LayerKind::Current]
    );
    assert!(plan_layers(None, Some(&cur), &pose, &cfg).is_empty());
}

#[test]
fn current_layer_covers_canvas() {
    let cfg = CompositorConfig::default();
    let assets = store(&[("cur", solid(10, 10, [255, 0, 0, 255]))]);
    let mut surface = Surface::new(10, 10).unwrap();
    let pose = PoseTransform::default();
    let plan = plan_layers(Some(&frame("cur")), None, &pose, &cfg);

    let stats = composite(&plan, &pose, &assets, &mut surface, &cfg);
    assert_eq!(stats, RenderStats { drawn: 1, skipped: 0 });
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(surface.pixel(x, y), Some([255, 0, 0, 255]));
        }
    }
}

#[test]
fn missing_image_skips_layer() {
    let cfg = CompositorConfig::default();
    let assets = AssetStore::new();
    let mut surface = Surface::new(4, 4).unwrap();
    let pose = PoseTransform::default();
    let plan = plan_layers(Some(&frame("cur")), None, &pose, &cfg);

    let stats = composite(&plan, &pose, &assets, &mut surface, &cfg);
    assert_eq!(stats, RenderStats { drawn: 0, skipped: 1 });
    assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn ghost_screens_onto_background() {
    let cfg = CompositorConfig::default();
    let assets = store(&[
        ("cur", solid(10, 10, [0, 0, 0, 0])),
        ("prev", solid(10, 10, [0, 0, 255, 255])),
    ]);
    let mut surface = Surface::new(10, 10).unwrap();
    let pose = PoseTransform {
        ghost: 0.5,
        ..PoseTransform::default()
    };
    let plan = plan_layers(Some(&frame("cur")), Some(&frame("prev")), &pose, &cfg);
    assert_eq!(kinds(&plan), [LayerKind::Ghost, LayerKind::Current]);

    let stats = composite(&plan, &pose, &assets, &mut surface, &cfg);
    assert_eq!(stats.drawn, 2);
    let px = surface.pixel(5, 5).unwrap();
    assert_eq!(px[0], 0);
    assert_eq!(px[3], 255);
    assert!((126..=130).contains(&px[2]), "{px:?}");
}

#[test]
fn stutter_layer_smears_sideways() {
    let cfg = CompositorConfig {
        clear_rgba: None,
        ..CompositorConfig::default()
    };
    let assets = store(&[
        ("cur", solid(10, 10, [0, 0, 0, 0])),
        ("prev", solid(10, 10, [255, 255, 255, 255])),
    ]);
    let mut surface = Surface::new(20, 10).unwrap();
    let pose = PoseTransform {
        stutter_blur: 1.0,
        ..PoseTransform::default()
    };
    let plan = plan_layers(Some(&frame("cur")), Some(&frame("prev")), &pose, &cfg);
    assert_eq!(kinds(&plan), [LayerKind::Stutter, LayerKind::Current]);

    composite(&plan, &pose, &assets, &mut surface, &cfg);
    // The 10x10 image covers x in 5..15 before the smear.
    assert!(surface.pixel(3, 5).unwrap()[3] > 0);
    assert!(surface.pixel(10, 5).unwrap()[3] > 0);
}

#[test]
fn orbit_blend_crossfades_neighbours() {
    let cfg = CompositorConfig::default();
    let assets = store(&[
        ("a", solid(8, 8, [255, 0, 0, 255])),
        ("b", solid(8, 8, [0, 0, 255, 255])),
    ]);
    let mut surface = Surface::new(8, 8).unwrap();
    let view = OrbitView::Blend(Bracket {
        a: frame("a"),
        b: frame("b"),
        t: 0.5,
    });
    let stats = render_orbit_view(&view, &assets, &mut surface, &cfg);
    assert_eq!(stats.drawn, 2);
    let px = surface.pixel(4, 4).unwrap();
    assert!((126..=129).contains(&px[0]), "{px:?}");
    assert!((126..=129).contains(&px[2]), "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn orbit_blend_with_one_missing_side_draws_the_other() {
    let cfg = CompositorConfig::default();
    let assets = store(&[("b", solid(8, 8, [0, 0, 255, 255]))]);
    let mut surface = Surface::new(8, 8).unwrap();
    let view = OrbitView::Blend(Bracket {
        a: frame("a"),
        b: frame("b"),
        t: 0.25,
    });
    let stats = render_orbit_view(&view, &assets, &mut surface, &cfg);
    assert_eq!(stats, RenderStats { drawn: 1, skipped: 1 });
    assert_eq!(surface.pixel(0, 0), Some([0, 0, 255, 255]));
}
