//! Call state sources.
//!
//! [`CallStateSources`] is what the composer needs from the outside world:
//! the current channel, call records, dismissal state, and incoming calls.
//! Persistence and querying stay behind it.
//!
//! Every input is an [`Observed`] value: a spark-signals derived holding
//! either the latest value or the error the input terminated with.
//!
//! [`MemorySources`] is a producer that keeps every input in a signal.
//! Server-scoped inputs are created on first use, one per server URL.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{Derived, Signal, batch, derived, signal, untrack};

use crate::error::SourceError;
use crate::types::{
    CallsByChannel, CallsEnabled, CallsState, ChannelId, CurrentCall, IncomingCalls, UserId,
};

/// Latest value of an input, or the error it terminated with.
pub type CallResult<T> = Result<T, SourceError>;

/// Read-only reactive view of an input or a derived output.
pub type Observed<T> = Derived<CallResult<T>>;

// =============================================================================
// Contract
// =============================================================================

/// Inputs consumed by [`CallStateComposer`](super::CallStateComposer).
pub trait CallStateSources {
    /// The channel the user is viewing, if any.
    fn observe_current_channel_id(&self) -> Observed<Option<ChannelId>>;

    /// Channels of `server_url` that have an active call.
    fn observe_channels_with_calls(&self, server_url: &str) -> Observed<CallsByChannel>;

    /// The call the user is part of, on any server.
    fn observe_current_call(&self) -> Observed<Option<CurrentCall>>;

    /// Dismissal state of `server_url` for the local user.
    fn observe_calls_state(&self, server_url: &str) -> Observed<CallsState>;

    /// Pending incoming call notifications.
    fn observe_incoming_calls(&self) -> Observed<IncomingCalls>;

    /// Whether calls can be started in the channel carried by `channel_id`.
    fn observe_is_calls_enabled_in_channel(
        &self,
        server_url: &str,
        channel_id: &Observed<Option<ChannelId>>,
    ) -> Observed<bool>;
}

// =============================================================================
// Snapshot
// =============================================================================

/// Every input of one server at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStateSnapshot {
    pub server_url: String,
    pub current_channel_id: Option<ChannelId>,
    pub channels_with_calls: CallsByChannel,
    pub current_call: Option<CurrentCall>,
    pub calls_state: CallsState,
    pub incoming_calls: IncomingCalls,
}

impl CallStateSnapshot {
    /// Empty snapshot: no channel, no calls.
    pub fn new(server_url: impl Into<String>, my_user_id: impl Into<UserId>) -> Self {
        Self {
            server_url: server_url.into(),
            current_channel_id: None,
            channels_with_calls: CallsByChannel::new(),
            current_call: None,
            calls_state: CallsState::new(my_user_id),
            incoming_calls: IncomingCalls::default(),
        }
    }
}

/// Names one input of [`MemorySources`], for [`MemorySources::fail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallInput {
    CurrentChannelId,
    ChannelsWithCalls(String),
    CurrentCall,
    CallsState(String),
    IncomingCalls,
    CallsEnabled(String),
}

// =============================================================================
// Input
// =============================================================================

/// One producer-owned input. Failing it is terminal: later writes are
/// dropped.
struct Input<T> {
    name: String,
    signal: Signal<CallResult<T>>,
}

impl<T: Clone> Clone for Input<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            signal: self.signal.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Input<T> {
    fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            signal: signal(Ok(value)),
        }
    }

    /// Equal values do not notify.
    fn set(&self, value: T) {
        if self.is_failed() {
            tracing::debug!(input = %self.name, "write after failure ignored");
            return;
        }
        self.signal.set(Ok(value));
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        match untrack(|| self.signal.get()) {
            Ok(mut value) => {
                f(&mut value);
                self.signal.set(Ok(value));
            }
            Err(_) => tracing::debug!(input = %self.name, "update after failure ignored"),
        }
    }

    fn fail(&self, err: SourceError) {
        if self.is_failed() {
            tracing::debug!(input = %self.name, error = %err, "input already failed");
            return;
        }
        self.signal.set(Err(err));
    }

    fn is_failed(&self) -> bool {
        untrack(|| self.signal.with(|value| value.is_err()))
    }

    fn observe(&self) -> Observed<T> {
        let signal = self.signal.clone();
        derived(move || signal.get())
    }
}

// =============================================================================
// MemorySources
// =============================================================================

/// In-memory producer for every call input.
pub struct MemorySources {
    my_user_id: UserId,
    current_channel_id: Input<Option<ChannelId>>,
    current_call: Input<Option<CurrentCall>>,
    incoming_calls: Input<IncomingCalls>,
    channels_with_calls: RefCell<HashMap<String, Input<CallsByChannel>>>,
    calls_state: RefCell<HashMap<String, Input<CallsState>>>,
    calls_enabled: RefCell<HashMap<String, Input<CallsEnabled>>>,
}

impl MemorySources {
    pub fn new(my_user_id: impl Into<UserId>) -> Self {
        Self {
            my_user_id: my_user_id.into(),
            current_channel_id: Input::new("current_channel_id", None),
            current_call: Input::new("current_call", None),
            incoming_calls: Input::new("incoming_calls", IncomingCalls::default()),
            channels_with_calls: RefCell::new(HashMap::new()),
            calls_state: RefCell::new(HashMap::new()),
            calls_enabled: RefCell::new(HashMap::new()),
        }
    }

    pub fn my_user_id(&self) -> &UserId {
        &self.my_user_id
    }

    pub fn set_current_channel_id(&self, channel_id: Option<ChannelId>) {
        self.current_channel_id.set(channel_id);
    }

    pub fn set_current_call(&self, call: Option<CurrentCall>) {
        self.current_call.set(call);
    }

    pub fn set_incoming_calls(&self, incoming: IncomingCalls) {
        self.incoming_calls.set(incoming);
    }

    pub fn set_channels_with_calls(&self, server_url: &str, calls: CallsByChannel) {
        self.channels_with_calls_input(server_url).set(calls);
    }

    pub fn set_calls_state(&self, server_url: &str, state: CallsState) {
        self.calls_state_input(server_url).set(state);
    }

    pub fn set_calls_enabled(&self, server_url: &str, enabled: CallsEnabled) {
        self.calls_enabled_input(server_url).set(enabled);
    }

    /// Mark the local user as having dismissed (or restored) the join banner
    /// of `channel_id` on `server_url`.
    pub fn set_dismissed(&self, server_url: &str, channel_id: ChannelId, dismissed: bool) {
        let user = self.my_user_id.clone();
        self.calls_state_input(server_url).update(|state| {
            state
                .calls
                .entry(channel_id)
                .or_default()
                .dismissed
                .insert(user, dismissed);
        });
    }

    /// Write every input of `snapshot` as one atomic update.
    pub fn apply(&self, snapshot: CallStateSnapshot) {
        let CallStateSnapshot {
            server_url,
            current_channel_id,
            channels_with_calls,
            current_call,
            calls_state,
            incoming_calls,
        } = snapshot;

        batch(|| {
            self.set_current_channel_id(current_channel_id);
            self.set_channels_with_calls(&server_url, channels_with_calls);
            self.set_current_call(current_call);
            self.set_calls_state(&server_url, calls_state);
            self.set_incoming_calls(incoming_calls);
        });
    }

    /// Terminate `input` with `err`.
    pub fn fail(&self, input: CallInput, err: SourceError) {
        tracing::debug!(?input, error = %err, "failing call input");
        match input {
            CallInput::CurrentChannelId => self.current_channel_id.fail(err),
            CallInput::ChannelsWithCalls(server) => self.channels_with_calls_input(&server).fail(err),
            CallInput::CurrentCall => self.current_call.fail(err),
            CallInput::CallsState(server) => self.calls_state_input(&server).fail(err),
            CallInput::IncomingCalls => self.incoming_calls.fail(err),
            CallInput::CallsEnabled(server) => self.calls_enabled_input(&server).fail(err),
        }
    }

    fn channels_with_calls_input(&self, server_url: &str) -> Input<CallsByChannel> {
        self.channels_with_calls
            .borrow_mut()
            .entry(server_url.to_string())
            .or_insert_with(|| Input::new(format!("channels_with_calls[{server_url}]"), CallsByChannel::new()))
            .clone()
    }

    fn calls_state_input(&self, server_url: &str) -> Input<CallsState> {
        self.calls_state
            .borrow_mut()
            .entry(server_url.to_string())
            .or_insert_with(|| {
                Input::new(
                    format!("calls_state[{server_url}]"),
                    CallsState::from(self.my_user_id.clone()),
                )
            })
            .clone()
    }

    fn calls_enabled_input(&self, server_url: &str) -> Input<CallsEnabled> {
        self.calls_enabled
            .borrow_mut()
            .entry(server_url.to_string())
            .or_insert_with(|| Input::new(format!("calls_enabled[{server_url}]"), CallsEnabled::default()))
            .clone()
    }
}

impl CallStateSources for MemorySources {
    fn observe_current_channel_id(&self) -> Observed<Option<ChannelId>> {
        self.current_channel_id.observe()
    }

    fn observe_channels_with_calls(&self, server_url: &str) -> Observed<CallsByChannel> {
        self.channels_with_calls_input(server_url).observe()
    }

    fn observe_current_call(&self) -> Observed<Option<CurrentCall>> {
        self.current_call.observe()
    }

    fn observe_calls_state(&self, server_url: &str) -> Observed<CallsState> {
        self.calls_state_input(server_url).observe()
    }

    fn observe_incoming_calls(&self) -> Observed<IncomingCalls> {
        self.incoming_calls.observe()
    }

    fn observe_is_calls_enabled_in_channel(
        &self,
        server_url: &str,
        channel_id: &Observed<Option<ChannelId>>,
    ) -> Observed<bool> {
        let enabled = self.calls_enabled_input(server_url).observe();
        let channel_id = channel_id.clone();
        derived(move || -> CallResult<bool> {
            let id = channel_id.get()?;
            Ok(enabled.get()?.is_enabled_in(id.as_ref()))
        })
    }
}
