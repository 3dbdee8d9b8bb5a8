//! Header geometry - pure scroll → layout mapping.
//!
//! Scroll offsets grow as content moves up, so the header uses the negated
//! offset: pulling down (negative scroll) stretches it, scrolling up
//! collapses it. A lock value, when present, replaces the scroll-derived
//! numbers entirely. Zero is a valid lock.

use super::config::HeaderConfig;

// =============================================================================
// Types
// =============================================================================

/// Inputs read in one evaluation. Absent scroll counts as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometryInputs {
    pub scroll: Option<f64>,
    pub lock: Option<f64>,
}

impl GeometryInputs {
    pub fn scrolled(scroll: f64) -> Self {
        Self {
            scroll: Some(scroll),
            lock: None,
        }
    }

    pub fn locked(lock: f64) -> Self {
        Self {
            scroll: None,
            lock: Some(lock),
        }
    }

    fn scroll_or_zero(&self) -> f64 {
        self.scroll.unwrap_or(0.0)
    }
}

/// Height bounds of the header container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerHeight {
    pub height: f64,
    pub min_height: f64,
    pub max_height: f64,
}

/// All four outputs, computed from one snapshot of the inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderGeometry {
    pub container_height: ContainerHeight,
    pub translate_y: f64,
    pub search_top_margin: f64,
    pub height_offset: f64,
}

// =============================================================================
// Formulas
// =============================================================================

/// `lo` below the range, `hi` above it, `x` otherwise.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Container height. Never below `default_height`; the upper bound is
/// reported, not enforced.
pub fn container_height(config: &HeaderConfig, is_large_title: bool, inputs: GeometryInputs) -> ContainerHeight {
    let min_height = config.default_height;
    let base = if is_large_title {
        config.large_height
    } else {
        config.default_height
    };
    let calculated = base - inputs.scroll_or_zero();
    let height = inputs.lock.unwrap_or(calculated);

    ContainerHeight {
        height: height.max(min_height),
        min_height,
        max_height: config.max_height(),
    }
}

/// Vertical translation of the large title, `-scroll` clamped to
/// `[-header_offset, header_offset]`.
///
/// The upper bound caps pull-down: scrolling to `-500` with an offset of 40
/// gives `+40`. The lower bound stops the collapse once the scroll has
/// covered the collapse distance: `500` gives `-40`.
pub fn translate_y(config: &HeaderConfig, inputs: GeometryInputs) -> f64 {
    match inputs.lock {
        Some(lock) => -lock,
        None => clamp(-inputs.scroll_or_zero(), -config.header_offset, config.header_offset),
    }
}

/// Top margin of the search bar.
pub fn search_top_margin(config: &HeaderConfig, inputs: GeometryInputs) -> f64 {
    let offset = match inputs.lock {
        Some(lock) => -lock,
        None => clamp(-inputs.scroll_or_zero(), -config.header_offset, config.header_offset),
    };
    offset - config.search_input_height - config.search_input_margin
}

/// Collapse distance handed to child elements.
pub fn height_offset(config: &HeaderConfig, inputs: GeometryInputs) -> f64 {
    inputs.lock.unwrap_or(config.header_offset)
}

pub fn compute_geometry(config: &HeaderConfig, is_large_title: bool, inputs: GeometryInputs) -> HeaderGeometry {
    HeaderGeometry {
        container_height: container_height(config, is_large_title, inputs),
        translate_y: translate_y(config, inputs),
        search_top_margin: search_top_margin(config, inputs),
        height_offset: height_offset(config, inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HeaderConfig {
        HeaderConfig {
            default_height: 44.0,
            large_height: 104.0,
            header_offset: 40.0,
            max_overscroll: 80.0,
            search_input_height: 36.0,
            search_input_margin: 5.0,
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(7.5, 0.0, 10.0), 7.5);
    }

    #[test]
    fn test_rest_height_is_default() {
        let h = container_height(&config(), false, GeometryInputs::default());
        assert_eq!(h.height, 44.0);
        assert_eq!(h.min_height, 44.0);
        assert_eq!(h.max_height, 184.0);
    }

    #[test]
    fn test_large_title_collapses_to_default() {
        let cfg = config();
        assert_eq!(container_height(&cfg, true, GeometryInputs::default()).height, 104.0);
        assert_eq!(container_height(&cfg, true, GeometryInputs::scrolled(30.0)).height, 74.0);
        assert_eq!(container_height(&cfg, true, GeometryInputs::scrolled(500.0)).height, 44.0);
    }

    #[test]
    fn test_overscroll_stretches() {
        let h = container_height(&config(), true, GeometryInputs::scrolled(-50.0));
        assert_eq!(h.height, 154.0);
    }

    #[test]
    fn test_lock_overrides_height_but_not_minimum() {
        let cfg = config();
        let locked = GeometryInputs {
            scroll: Some(300.0),
            lock: Some(120.0),
        };
        assert_eq!(container_height(&cfg, false, locked).height, 120.0);
        assert_eq!(container_height(&cfg, true, GeometryInputs::locked(0.0)).height, 44.0);
    }

    #[test]
    fn test_translate_y_saturates() {
        let cfg = config();
        assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(500.0)), -40.0);
        assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(5000.0)), -40.0);
        assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(-500.0)), 40.0);
        assert_eq!(translate_y(&cfg, GeometryInputs::scrolled(-10.0)), 10.0);
        assert_eq!(translate_y(&cfg, GeometryInputs::locked(120.0)), -120.0);
    }

    #[test]
    fn test_search_top_margin_clamped_both_ways() {
        let cfg = config();
        assert_eq!(search_top_margin(&cfg, GeometryInputs::default()), -41.0);
        assert_eq!(search_top_margin(&cfg, GeometryInputs::scrolled(500.0)), -40.0 - 41.0);
        assert_eq!(search_top_margin(&cfg, GeometryInputs::scrolled(-500.0)), 40.0 - 41.0);
        assert_eq!(search_top_margin(&cfg, GeometryInputs::locked(10.0)), -10.0 - 41.0);
    }

    #[test]
    fn test_height_offset() {
        let cfg = config();
        assert_eq!(height_offset(&cfg, GeometryInputs::scrolled(12.0)), 40.0);
        assert_eq!(height_offset(&cfg, GeometryInputs::locked(120.0)), 120.0);
        assert_eq!(height_offset(&cfg, GeometryInputs::locked(0.0)), 0.0);
    }

    #[test]
    fn test_zero_lock_wins() {
        let cfg = config();
        let inputs = GeometryInputs {
            scroll: Some(-30.0),
            lock: Some(0.0),
        };
        let g = compute_geometry(&cfg, false, inputs);
        assert_eq!(g.translate_y, 0.0);
        assert_eq!(g.height_offset, 0.0);
        assert_eq!(g.search_top_margin, -41.0);
    }
}
