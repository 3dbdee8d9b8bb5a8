//! Header Geometry Engine - reactive header geometry.
//!
//! Holds the scroll and lock signals of one header and exposes the geometry
//! as deriveds that re-run whenever either signal changes:
//!
//! ```text
//! scroll ─┬─► container_height
//! lock ───┼─► translate_y
//!         ├─► search_top_margin
//!         └─► height_offset
//! ```
//!
//! Every derived reads both signals in the same evaluation, so the four
//! values always come from one snapshot of the inputs.

use spark_signals::{Derived, Signal, derived, effect, signal};

use crate::error::ConfigError;
use crate::handle::{WatchHandle, Watchers};

use super::config::HeaderConfig;
use super::geometry::{
    ContainerHeight, GeometryInputs, HeaderGeometry, compute_geometry, container_height, height_offset,
    search_top_margin, translate_y,
};

// =============================================================================
// Engine
// =============================================================================

pub struct HeaderGeometryEngine {
    config: HeaderConfig,
    is_large_title: bool,
    scroll: Signal<Option<f64>>,
    lock: Signal<Option<f64>>,
    watchers: Watchers,
}

impl HeaderGeometryEngine {
    /// Create an engine with its own scroll and lock signals, both absent.
    pub fn new(config: HeaderConfig, is_large_title: bool) -> Result<Self, ConfigError> {
        Self::with_signals(config, is_large_title, signal(None), signal(None))
    }

    /// Create an engine over signals owned by the caller, e.g. the scroll
    /// position of a list.
    pub fn with_signals(
        config: HeaderConfig,
        is_large_title: bool,
        scroll: Signal<Option<f64>>,
        lock: Signal<Option<f64>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(?config, is_large_title, "header geometry engine created");
        Ok(Self {
            config,
            is_large_title,
            scroll,
            lock,
            watchers: Watchers::default(),
        })
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn is_large_title(&self) -> bool {
        self.is_large_title
    }

    pub fn scroll_signal(&self) -> Signal<Option<f64>> {
        self.scroll.clone()
    }

    pub fn lock_signal(&self) -> Signal<Option<f64>> {
        self.lock.clone()
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    pub fn set_scroll(&self, offset: f64) {
        self.scroll.set(Some(offset));
    }

    /// Forget the scroll position. Treated as 0.
    pub fn clear_scroll(&self) {
        self.scroll.set(None);
    }

    /// Drive the geometry from `value` instead of the scroll position.
    pub fn lock(&self, value: f64) {
        tracing::trace!(value, "header locked");
        self.lock.set(Some(value));
    }

    pub fn unlock(&self) {
        self.lock.set(None);
    }

    pub fn is_locked(&self) -> bool {
        self.lock.get().is_some()
    }

    // -------------------------------------------------------------------------
    // Outputs
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> GeometryInputs {
        GeometryInputs {
            scroll: self.scroll.get(),
            lock: self.lock.get(),
        }
    }

    /// Geometry for the current inputs.
    pub fn geometry(&self) -> HeaderGeometry {
        compute_geometry(&self.config, self.is_large_title, self.snapshot())
    }

    pub fn create_container_height_derived(&self) -> Derived<ContainerHeight> {
        let (config, is_large_title) = (self.config, self.is_large_title);
        let (scroll, lock) = (self.scroll.clone(), self.lock.clone());
        derived(move || container_height(&config, is_large_title, read(&scroll, &lock)))
    }

    pub fn create_translate_y_derived(&self) -> Derived<f64> {
        let config = self.config;
        let (scroll, lock) = (self.scroll.clone(), self.lock.clone());
        derived(move || translate_y(&config, read(&scroll, &lock)))
    }

    pub fn create_search_top_margin_derived(&self) -> Derived<f64> {
        let config = self.config;
        let (scroll, lock) = (self.scroll.clone(), self.lock.clone());
        derived(move || search_top_margin(&config, read(&scroll, &lock)))
    }

    /// Only depends on the lock; scrolling never changes the offset.
    pub fn create_height_offset_derived(&self) -> Derived<f64> {
        let config = self.config;
        let lock = self.lock.clone();
        derived(move || {
            height_offset(
                &config,
                GeometryInputs {
                    scroll: None,
                    lock: lock.get(),
                },
            )
        })
    }

    /// All four outputs in one derived.
    pub fn create_geometry_derived(&self) -> Derived<HeaderGeometry> {
        let (config, is_large_title) = (self.config, self.is_large_title);
        let (scroll, lock) = (self.scroll.clone(), self.lock.clone());
        derived(move || compute_geometry(&config, is_large_title, read(&scroll, &lock)))
    }

    /// Run `f` with the current geometry now and after every input change.
    ///
    /// Stops when the handle is stopped or dropped, or when the engine is
    /// dropped, whichever comes first.
    pub fn watch(&self, mut f: impl FnMut(HeaderGeometry) + 'static) -> WatchHandle {
        let (config, is_large_title) = (self.config, self.is_large_title);
        let (scroll, lock) = (self.scroll.clone(), self.lock.clone());
        let stop = effect(move || {
            let geometry = compute_geometry(&config, is_large_title, read(&scroll, &lock));
            f(geometry);
        });
        self.watchers.register(stop)
    }
}

impl Drop for HeaderGeometryEngine {
    fn drop(&mut self) {
        self.watchers.stop_all();
    }
}

/// Read both inputs in one place so every output sees the same pair.
fn read(scroll: &Signal<Option<f64>>, lock: &Signal<Option<f64>>) -> GeometryInputs {
    GeometryInputs {
        scroll: scroll.get(),
        lock: lock.get(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

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
    fn test_new_rejects_invalid_config() {
        let bad = HeaderConfig {
            header_offset: -5.0,
            ..config()
        };
        assert!(HeaderGeometryEngine::new(bad, false).is_err());
    }

    #[test]
    fn test_rest_geometry() {
        let engine = HeaderGeometryEngine::new(config(), false).unwrap();
        let g = engine.geometry();

        assert_eq!(g.container_height.height, 44.0);
        assert_eq!(g.translate_y, 0.0);
        assert_eq!(g.height_offset, 40.0);
    }

    #[test]
    fn test_derived_follows_scroll() {
        let engine = HeaderGeometryEngine::new(config(), true).unwrap();
        let height = engine.create_container_height_derived();
        let translate = engine.create_translate_y_derived();

        assert_eq!(height.get().height, 104.0);

        engine.set_scroll(20.0);
        assert_eq!(height.get().height, 84.0);
        assert_eq!(translate.get(), -20.0);

        engine.set_scroll(500.0);
        assert_eq!(height.get().height, 44.0);
        assert_eq!(translate.get(), -40.0);

        engine.set_scroll(900.0);
        assert_eq!(translate.get(), -40.0);
    }

    #[test]
    fn test_lock_overrides_scroll() {
        let engine = HeaderGeometryEngine::new(config(), false).unwrap();
        let offset = engine.create_height_offset_derived();
        let margin = engine.create_search_top_margin_derived();
        let all = engine.create_geometry_derived();

        engine.set_scroll(15.0);
        engine.lock(120.0);
        assert!(engine.is_locked());
        assert_eq!(offset.get(), 120.0);
        assert_eq!(margin.get(), -120.0 - 41.0);
        assert_eq!(all.get().translate_y, -120.0);
        assert_eq!(all.get().container_height.height, 120.0);

        engine.unlock();
        assert_eq!(offset.get(), 40.0);
        assert_eq!(all.get().translate_y, -15.0);
    }

    #[test]
    fn test_clear_scroll_is_zero() {
        let engine = HeaderGeometryEngine::new(config(), true).unwrap();
        engine.set_scroll(30.0);
        engine.clear_scroll();
        assert_eq!(engine.snapshot(), GeometryInputs::default());
        assert_eq!(engine.geometry().container_height.height, 104.0);
    }

    #[test]
    fn test_watch_sees_consistent_snapshots() {
        let engine = HeaderGeometryEngine::new(config(), true).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let watch = engine.watch(move |g| seen_clone.borrow_mut().push(g));

        engine.set_scroll(10.0);
        engine.lock(60.0);

        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 3);
            let last = seen[2];
            assert_eq!(last.translate_y, -60.0);
            assert_eq!(last.height_offset, 60.0);
            assert_eq!(last.container_height.height, 60.0);
        }

        watch.stop();
        engine.set_scroll(20.0);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_with_signals_rejects_non_finite() {
        let bad = HeaderConfig {
            large_height: f64::INFINITY,
            ..config()
        };
        let result = HeaderGeometryEngine::with_signals(bad, true, signal(Some(0.0)), signal(None));
        assert!(matches!(
            result,
            Err(ConfigError::NotFinite {
                field: "large_height",
                ..
            })
        ));
    }

    #[test]
    fn test_watch_stop_is_idempotent() {
        let engine = HeaderGeometryEngine::new(config(), false).unwrap();
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let watch = engine.watch(move |_| runs_clone.set(runs_clone.get() + 1));
        assert_eq!(runs.get(), 1);

        watch.stop();
        watch.stop();
        assert!(!watch.is_active());

        engine.set_scroll(30.0);
        engine.lock(10.0);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_dropping_engine_stops_watches() {
        let scroll = signal(None);
        let engine = HeaderGeometryEngine::with_signals(config(), true, scroll.clone(), signal(None)).unwrap();

        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let watch = engine.watch(move |_| runs_clone.set(runs_clone.get() + 1));

        scroll.set(Some(10.0));
        assert_eq!(runs.get(), 2);

        drop(engine);
        assert!(!watch.is_active());

        scroll.set(Some(20.0));
        assert_eq!(runs.get(), 2);

        // Stopping after the engine already did is a no-op.
        watch.stop();
        drop(watch);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_external_signals() {
        let scroll = signal(Some(25.0));
        let lock = signal(None);
        let engine = HeaderGeometryEngine::with_signals(config(), false, scroll.clone(), lock).unwrap();

        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let _stop = engine.watch(move |_| runs_clone.set(runs_clone.get() + 1));
        assert_eq!(runs.get(), 1);

        scroll.set(Some(-25.0));
        assert_eq!(runs.get(), 2);
        assert_eq!(engine.geometry().translate_y, 25.0);
    }
}
