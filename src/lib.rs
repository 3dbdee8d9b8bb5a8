//! # spark-channel-view
//!
//! Reactive state for a channel screen, built on
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals).
//!
//! ## Architecture
//!
//! Two independent pieces:
//!
//! ```text
//! call/channel stores → CallStateComposer → banner booleans
//! scroll + lock signals → HeaderGeometryEngine → header geometry
//! ```
//!
//! Both are spark-signals graphs. The composer's inputs carry
//! `Result<T, SourceError>` so a failed store reaches exactly the outputs
//! that read it. The header engine is a set of deriveds over two signals.
//! Effects are handed out as [`WatchHandle`]s.
//!
//! ## Modules
//!
//! - [`types`] - Channel, user, and call records
//! - [`error`] - Source failures and configuration errors
//! - [`handle`] - Idempotent stop handles for effects
//! - [`calls`] - Call state sources and the composer
//! - [`header`] - Header config, geometry, engine, search forwarding

pub mod calls;
pub mod error;
pub mod handle;
pub mod header;
pub mod types;

pub use types::*;

pub use error::{ConfigError, SourceError};

pub use handle::WatchHandle;

pub use calls::{
    CallInput, CallResult, CallStateComposer, CallStateSnapshot, CallStateSources, ChangedOutputs,
    ChannelScreenState, MemorySources, Observed, on_change,
};

pub use header::{
    ContainerHeight, GeometryInputs, HeaderConfig, HeaderGeometry, HeaderGeometryEngine,
    HeaderMetrics, Platform, SearchCapability, SearchRef, SelectionChange,
};
