//! Calls Module - call banner signals for a channel screen
//!
//! - [`sources`] - the store-facing contracts ([`CallStateSources`]) and an
//!   in-memory producer ([`MemorySources`]).
//! - [`composer`] - [`CallStateComposer`], which turns the inputs into the
//!   deduplicated booleans the channel screen renders from, and [`on_change`]
//!   for reacting to one output.
//!
//! # Example
//!
//! ```ignore
//! use spark_channel_view::calls::{CallStateComposer, MemorySources};
//!
//! let sources = MemorySources::new("me");
//! let composer = CallStateComposer::new(&sources, "https://chat.example.com");
//! let _watch = composer.watch(|screen| println!("{screen:?}"));
//!
//! sources.set_current_channel_id(Some("town-square".into()));
//! ```

mod composer;
mod sources;

pub use composer::{CallStateComposer, ChangedOutputs, ChannelScreenState, on_change};
pub use sources::{
    CallInput, CallResult, CallStateSnapshot, CallStateSources, MemorySources, Observed,
};
