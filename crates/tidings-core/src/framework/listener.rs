//! Listener entries and handles.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::{Channel, Liveness, Message, PayloadType};

/// A type-erased listener callback.
///
/// Receives the channel the payload was originally broadcast on, the
/// payload's type identity and the payload itself.
pub type Callback = Arc<dyn Fn(&Channel, PayloadType, &dyn Message) + Send + Sync>;

/// Which broadcasts a listener is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Only broadcasts on exactly the registered channel.
    ///
    /// Registering for `A.B` matches a broadcast on `A.B` but not `A.B.C`.
    #[default]
    Exact,
    /// Broadcasts on the registered channel or any channel beneath it.
    ///
    /// Registering for `A.B` matches `A.B` as well as `A.B.C`.
    Partial,
}

/// Token used to remove a listener.
///
/// Handles carry no ownership; dropping one does not unregister anything.
/// The default handle is invalid (id 0).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ListenerHandle {
    channel: Channel,
    id: u64,
}

impl ListenerHandle {
    pub(crate) fn new(channel: Channel, id: u64) -> Self {
        Self { channel, id }
    }

    /// Returns `false` for the default, unbound handle.
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// The channel the listener was registered on.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// The listener id, unique within its channel.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// One registration within a channel bucket.
///
/// Cloning is cheap: the callback and owner are shared.
#[derive(Clone)]
pub struct ListenerEntry {
    id: u64,
    callback: Callback,
    expected: Option<PayloadType>,
    mode: MatchMode,
    owner: Option<Arc<dyn Liveness>>,
}

impl ListenerEntry {
    pub(crate) fn new(
        id: u64,
        callback: Callback,
        expected: Option<PayloadType>,
        mode: MatchMode,
        owner: Option<Arc<dyn Liveness>>,
    ) -> Self {
        Self {
            id,
            callback,
            expected,
            mode,
            owner,
        }
    }

    /// Handle id of this entry.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The payload type this listener expects, if it filters by type.
    pub fn expected_type(&self) -> Option<PayloadType> {
        self.expected
    }

    /// The match mode.
    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns `true` if the entry is bound to an owner that no longer exists.
    pub fn is_dead(&self) -> bool {
        self.owner.as_ref().is_some_and(|owner| !owner.is_alive())
    }

    /// Eligibility at one level of the ancestor walk.
    ///
    /// Listeners on the root channel observe everything.
    pub(crate) fn is_eligible(&self, exact_level: bool, level: &Channel) -> bool {
        exact_level || self.mode == MatchMode::Partial || level.is_root()
    }

    /// Returns `true` if a payload of type `sent` may be delivered.
    pub(crate) fn accepts(&self, sent: &PayloadType) -> bool {
        self.expected
            .as_ref()
            .is_none_or(|expected| sent.is_child_of(expected))
    }

    pub(crate) fn invoke(&self, channel: &Channel, sent: PayloadType, payload: &dyn Message) {
        (self.callback)(channel, sent, payload);
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("expected", &self.expected)
            .field("mode", &self.mode)
            .field("has_owner", &self.owner.is_some())
            .finish()
    }
}
