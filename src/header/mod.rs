//! Header Module - collapsing navigation header
//!
//! - [`config`] - layout constants and platform metrics
//! - [`geometry`] - pure scroll → geometry formulas
//! - [`engine`] - [`HeaderGeometryEngine`], the formulas over reactive
//!   scroll/lock signals
//! - [`search`] - focus/selection forwarding to the search element
//!
//! # Example
//!
//! ```ignore
//! use spark_channel_view::header::{HeaderGeometryEngine, HeaderMetrics, Platform};
//!
//! let config = HeaderMetrics::for_platform(Platform::Ios, true);
//! let engine = HeaderGeometryEngine::new(config, true)?;
//! let height = engine.create_container_height_derived();
//!
//! engine.set_scroll(24.0);
//! println!("header height: {}", height.get().height);
//! ```

pub mod config;
pub mod engine;
pub mod geometry;
pub mod search;

pub use config::{
    HeaderConfig, HeaderMetrics, LARGE_HEADER_TITLE_HEIGHT, MAX_OVERSCROLL, Platform,
    SEARCH_INPUT_MARGIN,
};
pub use engine::HeaderGeometryEngine;
pub use geometry::{
    ContainerHeight, GeometryInputs, HeaderGeometry, clamp, compute_geometry, container_height,
    height_offset, search_top_margin, translate_y,
};
pub use search::{SearchCapability, SearchRef, SelectionChange};
