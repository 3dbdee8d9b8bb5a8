//! Call-State Composer - derives the channel screen's call signals.
//!
//! ```text
//! channel_id ─┬─────────────► is_call_in_current_channel ─┐
//! calls ──────┘                                           │
//! channel_id ─┬─────────────► dismissed ──────────────────┼─► show_join_call_banner
//! calls_state ┘                                           │
//! current_call ─► cc_channel_id ─┬► is_in_current_channel_call
//!              └► is_in_a_call   │
//! channel_id ────────────────────┘
//! incoming_calls ─► show_incoming_calls
//! ```
//!
//! Every output is a spark-signals derived over [`CallResult`] values, so a
//! failed input flows through `?` into exactly the outputs that read it.
//! Deriveds are pulled on read, so a channel switch is never combined with
//! the previous channel's dismissal map.

use std::cell::Cell;
use std::rc::Rc;

use bitflags::bitflags;
use spark_signals::{derived, effect};

use crate::handle::{WatchHandle, Watchers};
use crate::types::ChannelId;

use super::sources::{CallResult, CallStateSources, Observed};

// =============================================================================
// Output flags
// =============================================================================

bitflags! {
    /// Outputs that changed since the last [`CallStateComposer::take_changes`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChangedOutputs: u8 {
        const CHANNEL_ID = 1 << 0;
        const SHOW_JOIN_CALL_BANNER = 1 << 1;
        const IS_IN_A_CALL = 1 << 2;
        const SHOW_INCOMING_CALLS = 1 << 3;
        const IS_CALLS_ENABLED_IN_CHANNEL = 1 << 4;
    }
}

/// What the channel screen renders from, read at one instant.
///
/// Errored outputs read as `false`: the feature is unavailable, so its
/// banner stays hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelScreenState {
    pub channel_id: Option<ChannelId>,
    pub show_join_call_banner: bool,
    pub is_in_a_call: bool,
    pub show_incoming_calls: bool,
    pub is_calls_enabled_in_channel: bool,
}

/// The five outputs a screen consumes.
#[derive(Clone)]
struct ScreenOutputs {
    channel_id: Observed<Option<ChannelId>>,
    show_join_call_banner: Observed<bool>,
    is_in_a_call: Observed<bool>,
    show_incoming_calls: Observed<bool>,
    is_calls_enabled_in_channel: Observed<bool>,
}

impl ScreenOutputs {
    fn read(&self) -> ChannelScreenState {
        ChannelScreenState {
            channel_id: self.channel_id.get().ok().flatten(),
            show_join_call_banner: self.show_join_call_banner.get().unwrap_or(false),
            is_in_a_call: self.is_in_a_call.get().unwrap_or(false),
            show_incoming_calls: self.show_incoming_calls.get().unwrap_or(false),
            is_calls_enabled_in_channel: self.is_calls_enabled_in_channel.get().unwrap_or(false),
        }
    }
}

// =============================================================================
// Composer
// =============================================================================

pub struct CallStateComposer {
    screen: ScreenOutputs,
    is_call_in_current_channel: Observed<bool>,
    cc_channel_id: Observed<Option<ChannelId>>,
    dismissed: Observed<bool>,
    is_in_current_channel_call: Observed<bool>,
    changes: Rc<Cell<ChangedOutputs>>,
    trackers: Vec<WatchHandle>,
    watchers: Watchers,
}

impl CallStateComposer {
    /// Wire the derivation graph for `server_url` on top of `sources`.
    pub fn new(sources: &impl CallStateSources, server_url: &str) -> Self {
        let channel_id = sources.observe_current_channel_id();
        let calls = sources.observe_channels_with_calls(server_url);
        let current_call = sources.observe_current_call();
        let calls_state = sources.observe_calls_state(server_url);
        let incoming_calls = sources.observe_incoming_calls();

        let is_call_in_current_channel = {
            let (channel_id, calls) = (channel_id.clone(), calls.clone());
            derived(move || -> CallResult<bool> {
                let id = channel_id.get()?;
                let calls = calls.get()?;
                Ok(id.is_some_and(|id| calls.has_call(&id)))
            })
        };

        let cc_channel_id = {
            let current_call = current_call.clone();
            derived(move || -> CallResult<Option<ChannelId>> {
                Ok(current_call.get()?.map(|call| call.channel_id))
            })
        };

        let is_in_a_call = {
            let current_call = current_call.clone();
            derived(move || -> CallResult<bool> {
                Ok(current_call.get()?.is_some_and(|call| call.connected))
            })
        };

        let dismissed = {
            let (channel_id, calls_state) = (channel_id.clone(), calls_state.clone());
            derived(move || -> CallResult<bool> {
                let id = channel_id.get()?;
                let state = calls_state.get()?;
                Ok(id.is_some_and(|id| state.is_dismissed(&id)))
            })
        };

        // Two absent ids are not "the same channel".
        let is_in_current_channel_call = {
            let (channel_id, cc_channel_id) = (channel_id.clone(), cc_channel_id.clone());
            derived(move || -> CallResult<bool> {
                let id = channel_id.get()?;
                let cc_id = cc_channel_id.get()?;
                Ok(matches!((id, cc_id), (Some(id), Some(cc_id)) if id == cc_id))
            })
        };

        let show_join_call_banner = {
            let is_call = is_call_in_current_channel.clone();
            let dismissed = dismissed.clone();
            let in_current_call = is_in_current_channel_call.clone();
            derived(move || -> CallResult<bool> {
                Ok(is_call.get()? && !dismissed.get()? && !in_current_call.get()?)
            })
        };

        let show_incoming_calls = derived(move || -> CallResult<bool> {
            Ok(!incoming_calls.get()?.is_empty())
        });

        let is_calls_enabled_in_channel =
            sources.observe_is_calls_enabled_in_channel(server_url, &channel_id);

        let screen = ScreenOutputs {
            channel_id,
            show_join_call_banner,
            is_in_a_call,
            show_incoming_calls,
            is_calls_enabled_in_channel,
        };

        let changes = Rc::new(Cell::new(ChangedOutputs::empty()));
        let trackers = vec![
            track(&screen.channel_id, "channel_id", ChangedOutputs::CHANNEL_ID, &changes),
            track(
                &screen.show_join_call_banner,
                "show_join_call_banner",
                ChangedOutputs::SHOW_JOIN_CALL_BANNER,
                &changes,
            ),
            track(&screen.is_in_a_call, "is_in_a_call", ChangedOutputs::IS_IN_A_CALL, &changes),
            track(
                &screen.show_incoming_calls,
                "show_incoming_calls",
                ChangedOutputs::SHOW_INCOMING_CALLS,
                &changes,
            ),
            track(
                &screen.is_calls_enabled_in_channel,
                "is_calls_enabled_in_channel",
                ChangedOutputs::IS_CALLS_ENABLED_IN_CHANNEL,
                &changes,
            ),
        ];

        tracing::debug!(server_url, "call state composer wired");

        Self {
            screen,
            is_call_in_current_channel,
            cc_channel_id,
            dismissed,
            is_in_current_channel_call,
            changes,
            trackers,
            watchers: Watchers::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Outputs
    // -------------------------------------------------------------------------

    pub fn channel_id(&self) -> &Observed<Option<ChannelId>> {
        &self.screen.channel_id
    }

    pub fn is_call_in_current_channel(&self) -> &Observed<bool> {
        &self.is_call_in_current_channel
    }

    pub fn cc_channel_id(&self) -> &Observed<Option<ChannelId>> {
        &self.cc_channel_id
    }

    pub fn is_in_a_call(&self) -> &Observed<bool> {
        &self.screen.is_in_a_call
    }

    pub fn dismissed(&self) -> &Observed<bool> {
        &self.dismissed
    }

    pub fn is_in_current_channel_call(&self) -> &Observed<bool> {
        &self.is_in_current_channel_call
    }

    pub fn show_join_call_banner(&self) -> &Observed<bool> {
        &self.screen.show_join_call_banner
    }

    pub fn show_incoming_calls(&self) -> &Observed<bool> {
        &self.screen.show_incoming_calls
    }

    pub fn is_calls_enabled_in_channel(&self) -> &Observed<bool> {
        &self.screen.is_calls_enabled_in_channel
    }

    // -------------------------------------------------------------------------
    // Consumers
    // -------------------------------------------------------------------------

    /// Read every output at once.
    pub fn outputs(&self) -> ChannelScreenState {
        self.screen.read()
    }

    /// Run `f` with the screen state now and every time it changes.
    ///
    /// Stops when the handle is stopped or dropped, or when the composer is
    /// disposed.
    pub fn watch(&self, mut f: impl FnMut(&ChannelScreenState) + 'static) -> WatchHandle {
        let screen = self.screen.clone();
        let mut last: Option<ChannelScreenState> = None;
        let stop = effect(move || {
            let state = screen.read();
            if last.as_ref() != Some(&state) {
                f(&state);
                last = Some(state);
            }
        });
        self.watchers.register(stop)
    }

    /// Outputs that changed since the previous call. Clears the set.
    pub fn take_changes(&self) -> ChangedOutputs {
        self.changes.replace(ChangedOutputs::empty())
    }

    /// Stop change tracking and every watch. Inputs are left untouched.
    /// Idempotent.
    pub fn dispose(&mut self) {
        if self.trackers.is_empty() {
            return;
        }
        self.trackers.clear();
        self.watchers.stop_all();
        tracing::debug!("call state composer disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.trackers.is_empty()
    }
}

impl Drop for CallStateComposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Call `f` every time `output` moves to a different value.
///
/// Unlike a bare effect, `f` is not called for the value current at
/// registration, and a recompute that lands on the same value is not
/// reported.
pub fn on_change<T>(output: &Observed<T>, mut f: impl FnMut(&CallResult<T>) + 'static) -> WatchHandle
where
    T: Clone + PartialEq + 'static,
{
    let output = output.clone();
    let mut last: Option<CallResult<T>> = None;
    WatchHandle::new(effect(move || {
        let value = output.get();
        match &last {
            None => {}
            Some(previous) if *previous == value => return,
            Some(_) => f(&value),
        }
        last = Some(value);
    }))
}

/// Record changes of `output` into `changes`; warn once if it errors.
fn track<T: Clone + PartialEq + 'static>(
    output: &Observed<T>,
    name: &'static str,
    flag: ChangedOutputs,
    changes: &Rc<Cell<ChangedOutputs>>,
) -> WatchHandle {
    if let Err(err) = output.get() {
        tracing::warn!(output = name, error = %err, "call output unavailable");
    }
    let changes = Rc::clone(changes);
    on_change(output, move |value| {
        changes.set(changes.get() | flag);
        if let Err(err) = value {
            tracing::warn!(output = name, error = %err, "call output unavailable");
        }
    })
}
