//! Geometry properties over wide input ranges.

use proptest::prelude::*;

use spark_channel_view::header::{
    GeometryInputs, HeaderConfig, HeaderGeometryEngine, HeaderMetrics, Platform, compute_geometry,
    container_height, height_offset, translate_y,
};

fn config() -> HeaderConfig {
    HeaderConfig {
        header_offset: 40.0,
        ..HeaderMetrics::for_platform(Platform::Ios, true)
    }
}

#[test]
fn rest_height_is_default_height() {
    let cfg = config();
    let h = container_height(&cfg, false, GeometryInputs::scrolled(0.0));
    assert_eq!(h.height, cfg.default_height);
}

#[test]
fn collapse_saturates_at_header_offset() {
    let cfg = config();
    assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(500.0)), -40.0);
    assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(501.0)), -40.0);
    assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(10_000.0)), -40.0);
}

#[test]
fn pull_down_saturates_at_header_offset() {
    let cfg = config();
    assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(-10.0)), 10.0);
    assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(-40.0)), 40.0);
    assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(-500.0)), 40.0);
}

#[test]
fn engine_matches_pure_formulas() {
    let cfg = config();
    let engine = HeaderGeometryEngine::new(cfg, true).expect("valid config");
    let geometry = engine.create_geometry_derived();

    for scroll in [-300.0, -10.0, 0.0, 12.5, 40.0, 900.0] {
        engine.set_scroll(scroll);
        assert_eq!(geometry.get(), compute_geometry(&cfg, true, GeometryInputs::scrolled(scroll)));
    }
}

fn lock_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (0.0f64..=10_000.0).prop_map(Some)]
}

proptest! {
    #[test]
    fn height_never_below_default(
        scroll in -10_000.0f64..=10_000.0,
        lock in lock_strategy(),
        is_large_title in any::<bool>(),
    ) {
        let cfg = config();
        let inputs = GeometryInputs { scroll: Some(scroll), lock };
        let h = container_height(&cfg, is_large_title, inputs);
        prop_assert!(h.height >= cfg.default_height);
        prop_assert_eq!(h.min_height, cfg.default_height);
        prop_assert_eq!(h.max_height, cfg.large_height + cfg.max_overscroll);
    }

    #[test]
    fn lock_wins_over_any_scroll(scroll in -10_000.0f64..=10_000.0, lock in 0.0f64..=10_000.0) {
        let cfg = config();
        let inputs = GeometryInputs { scroll: Some(scroll), lock: Some(lock) };
        prop_assert_eq!(height_offset(&cfg, inputs), lock);
        prop_assert_eq!(translate_y(&cfg, inputs), -lock);
    }

    #[test]
    fn pull_down_follows_min_of_scroll_and_offset(scroll in -10_000.0f64..=0.0) {
        let cfg = config();
        let t = translate_y(&cfg, GeometryInputs::scrolled(scroll));
        prop_assert_eq!(t, (-scroll).min(cfg.header_offset));
        prop_assert_eq!(height_offset(&cfg, GeometryInputs::scrolled(scroll)), cfg.header_offset);
    }

    #[test]
    fn collapse_stops_at_header_offset(scroll in 0.0f64..=10_000.0) {
        let cfg = config();
        let t = translate_y(&cfg, GeometryInputs::scrolled(scroll));
        prop_assert_eq!(t, (-scroll).max(-cfg.header_offset));
        prop_assert_eq!(height_offset(&cfg, GeometryInputs::scrolled(scroll)), cfg.header_offset);
    }

    #[test]
    fn outputs_share_one_snapshot(scroll in -500.0f64..=500.0, lock in lock_strategy()) {
        let cfg = config();
        let inputs = GeometryInputs { scroll: Some(scroll), lock };
        let g = compute_geometry(&cfg, true, inputs);
        let expected_margin = g.translate_y - cfg.search_input_height - cfg.search_input_margin;
        prop_assert!((g.search_top_margin - expected_margin).abs() < 1e-9);
    }
}
