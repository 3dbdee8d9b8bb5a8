//! Core types for spark-channel-view.
//!
//! Records produced by the external call/channel stores. Only the fields the
//! derivations read are modelled; everything else stays with the stores.

use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// Call records
// =============================================================================

/// Channels that currently have an active call, per server.
///
/// A missing key and a `false` value mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallsByChannel(HashMap<ChannelId, bool>);

impl CallsByChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, channel: impl Into<ChannelId>, has_call: bool) -> Self {
        self.0.insert(channel.into(), has_call);
        self
    }

    pub fn insert(&mut self, channel: ChannelId, has_call: bool) {
        self.0.insert(channel, has_call);
    }

    pub fn has_call(&self, channel: &ChannelId) -> bool {
        self.0.get(channel).copied().unwrap_or(false)
    }
}

/// The call the local user is part of, on any channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCall {
    pub server_url: String,
    pub channel_id: ChannelId,
    pub connected: bool,
}

impl CurrentCall {
    pub fn new(server_url: impl Into<String>, channel_id: impl Into<ChannelId>, connected: bool) -> Self {
        Self {
            server_url: server_url.into(),
            channel_id: channel_id.into(),
            connected,
        }
    }
}

/// Per-channel call state. `dismissed` is keyed by the user who dismissed the
/// join banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelCallState {
    pub dismissed: HashMap<UserId, bool>,
}

/// Server-scoped call state plus the identity it is read for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsState {
    pub calls: HashMap<ChannelId, ChannelCallState>,
    pub my_user_id: UserId,
}

impl CallsState {
    pub fn new(my_user_id: impl Into<UserId>) -> Self {
        Self {
            calls: HashMap::new(),
            my_user_id: my_user_id.into(),
        }
    }

    /// Builder-style dismissal flag for `user` on `channel`.
    pub fn with_dismissed(mut self, channel: impl Into<ChannelId>, user: impl Into<UserId>, dismissed: bool) -> Self {
        self.calls
            .entry(channel.into())
            .or_default()
            .dismissed
            .insert(user.into(), dismissed);
        self
    }

    /// Whether the local user dismissed the join banner for `channel`.
    pub fn is_dismissed(&self, channel: &ChannelId) -> bool {
        self.calls
            .get(channel)
            .and_then(|state| state.dismissed.get(&self.my_user_id))
            .copied()
            .unwrap_or(false)
    }
}

impl From<UserId> for CallsState {
    fn from(my_user_id: UserId) -> Self {
        Self {
            calls: HashMap::new(),
            my_user_id,
        }
    }
}

/// A pending incoming call notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCall {
    pub server_url: String,
    pub channel_id: ChannelId,
    pub caller_id: UserId,
}

/// Ordered pending incoming calls. Only the length is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncomingCalls {
    pub incoming_calls: Vec<IncomingCall>,
}

impl IncomingCalls {
    pub fn len(&self) -> usize {
        self.incoming_calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incoming_calls.is_empty()
    }
}

/// Server-scoped calls availability: a server-wide default plus explicit
/// per-channel overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsEnabled {
    pub default_enabled: bool,
    pub channels: HashMap<ChannelId, bool>,
}

impl CallsEnabled {
    pub fn new(default_enabled: bool) -> Self {
        Self {
            default_enabled,
            channels: HashMap::new(),
        }
    }

    pub fn with_channel(mut self, channel: impl Into<ChannelId>, enabled: bool) -> Self {
        self.channels.insert(channel.into(), enabled);
        self
    }

    /// No channel means nothing to enable calls in.
    pub fn is_enabled_in(&self, channel: Option<&ChannelId>) -> bool {
        match channel {
            Some(id) => self.channels.get(id).copied().unwrap_or(self.default_enabled),
            None => false,
        }
    }
}

impl Default for CallsEnabled {
    fn default() -> Self {
        Self::new(true)
    }
}
