//! Channel registry.
//!
//! The [`Registry`] maps each channel to the bucket of listeners registered
//! exactly on it. A bucket exists only while it holds at least one listener,
//! so channels nobody listens to leave no trace.
//!
//! The registry itself is plain data; [`Bus`](crate::Bus) layers the dispatch
//! walk and reentrancy handling on top of it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::listener::{Callback, ListenerEntry, ListenerHandle, MatchMode};
use crate::foundation::{Channel, Liveness, PayloadType};

/// Listeners registered on a single channel.
#[derive(Debug, Default)]
pub(crate) struct ChannelBucket {
    listeners: Vec<ListenerEntry>,
    /// Last id handed out. Ids are never reused within a bucket.
    last_handle_id: u64,
}

impl ChannelBucket {
    fn push(
        &mut self,
        callback: Callback,
        expected: Option<PayloadType>,
        mode: MatchMode,
        owner: Option<Arc<dyn Liveness>>,
    ) -> u64 {
        self.last_handle_id += 1;
        let id = self.last_handle_id;
        self.listeners
            .push(ListenerEntry::new(id, callback, expected, mode, owner));
        id
    }

    /// Removes by id with swap-remove; order of the remaining entries is not kept.
    fn remove(&mut self, id: u64) -> Option<ListenerEntry> {
        let index = self.listeners.iter().position(|entry| entry.id() == id)?;
        Some(self.listeners.swap_remove(index))
    }

    fn drain_dead(&mut self) -> Vec<ListenerEntry> {
        let (dead, alive) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(ListenerEntry::is_dead);
        self.listeners = alive;
        dead
    }
}

/// Mapping from channel to the listeners registered on it.
#[derive(Debug, Default)]
pub struct Registry {
    buckets: HashMap<Channel, ChannelBucket>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener to the bucket for `channel`, creating it if needed.
    pub fn insert(
        &mut self,
        channel: Channel,
        callback: Callback,
        expected: Option<PayloadType>,
        mode: MatchMode,
        owner: Option<Arc<dyn Liveness>>,
    ) -> ListenerHandle {
        let bucket = self.buckets.entry(channel.clone()).or_default();
        let id = bucket.push(callback, expected, mode, owner);
        ListenerHandle::new(channel, id)
    }

    /// Removes listener `id` from `channel`, dropping the bucket once empty.
    ///
    /// Returns the removed entry so the caller controls where it is dropped.
    /// Unknown channels or ids yield `None`.
    pub fn remove(&mut self, channel: &Channel, id: u64) -> Option<ListenerEntry> {
        let bucket = self.buckets.get_mut(channel)?;
        let removed = bucket.remove(id);

        if bucket.listeners.is_empty() {
            self.buckets.remove(channel);
            debug!(channel = %channel, "Dropped empty channel bucket");
        }

        removed
    }

    /// Copies the listeners registered exactly on `channel`.
    pub fn snapshot(&self, channel: &Channel) -> Option<Vec<ListenerEntry>> {
        self.buckets
            .get(channel)
            .map(|bucket| bucket.listeners.clone())
    }

    /// Returns `true` if any listener is registered exactly on `channel`.
    pub fn contains_channel(&self, channel: &Channel) -> bool {
        self.buckets.contains_key(channel)
    }

    /// Number of listeners registered exactly on `channel`.
    pub fn listener_count(&self, channel: &Channel) -> usize {
        self.buckets
            .get(channel)
            .map_or(0, |bucket| bucket.listeners.len())
    }

    /// Number of channels with at least one listener.
    pub fn channel_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of listeners across all channels.
    pub fn total_listeners(&self) -> usize {
        self.buckets.values().map(|b| b.listeners.len()).sum()
    }

    /// Channels with at least one listener, in no particular order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.buckets.keys()
    }

    /// Removes every listener whose owner is gone, across all buckets.
    pub fn drain_dead(&mut self) -> Vec<ListenerEntry> {
        let mut dead = Vec::new();
        self.buckets.retain(|_, bucket| {
            dead.extend(bucket.drain_dead());
            !bucket.listeners.is_empty()
        });
        dead
    }

    /// Takes every bucket out of the registry, leaving it empty.
    pub fn take_all(&mut self) -> Registry {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Lifeline;

    fn noop() -> Callback {
        Arc::new(|_, _, _| {})
    }

    fn ch(path: &str) -> Channel {
        Channel::new(path).unwrap()
    }

    #[test]
    fn test_ids_increase_and_are_never_reused() {
        let mut registry = Registry::new();
        let first = registry.insert(ch("Y"), noop(), None, MatchMode::Exact, None);
        let second = registry.insert(ch("Y"), noop(), None, MatchMode::Exact, None);
        assert_eq!((first.id(), second.id()), (1, 2));

        registry.remove(&ch("Y"), second.id());
        let third = registry.insert(ch("Y"), noop(), None, MatchMode::Exact, None);
        assert_eq!(third.id(), 3);
    }

    #[test]
    fn test_ids_are_per_channel() {
        let mut registry = Registry::new();
        let a = registry.insert(ch("A"), noop(), None, MatchMode::Exact, None);
        let b = registry.insert(ch("B"), noop(), None, MatchMode::Exact, None);
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_last_removal_prunes_bucket() {
        let mut registry = Registry::new();
        let handle = registry.insert(ch("C"), noop(), None, MatchMode::Exact, None);
        assert!(registry.contains_channel(&ch("C")));

        assert!(registry.remove(&ch("C"), handle.id()).is_some());
        assert!(!registry.contains_channel(&ch("C")));
        assert_eq!(registry.channel_count(), 0);
    }

    #[test]
    fn test_removing_unknown_is_noop() {
        let mut registry = Registry::new();
        let handle = registry.insert(ch("C"), noop(), None, MatchMode::Exact, None);

        assert!(registry.remove(&ch("C"), 99).is_none());
        assert!(registry.remove(&ch("Other"), handle.id()).is_none());
        assert_eq!(registry.listener_count(&ch("C")), 1);

        assert!(registry.remove(&ch("C"), handle.id()).is_some());
        assert!(registry.remove(&ch("C"), handle.id()).is_none());
    }

    #[test]
    fn test_swap_remove_keeps_other_entries() {
        let mut registry = Registry::new();
        let handles: Vec<_> = (0..4)
            .map(|_| registry.insert(ch("S"), noop(), None, MatchMode::Exact, None))
            .collect();

        registry.remove(&ch("S"), handles[0].id());

        let mut ids: Vec<u64> = registry
            .snapshot(&ch("S"))
            .unwrap()
            .iter()
            .map(ListenerEntry::id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_drain_dead_prunes_empty_buckets() {
        let mut registry = Registry::new();
        let lifeline = Lifeline::new();
        registry.insert(
            ch("Dead"),
            noop(),
            None,
            MatchMode::Exact,
            Some(Arc::new(lifeline.clone())),
        );
        registry.insert(ch("Alive"), noop(), None, MatchMode::Exact, None);

        lifeline.sever();
        let dead = registry.drain_dead();

        assert_eq!(dead.len(), 1);
        assert!(!registry.contains_channel(&ch("Dead")));
        assert!(registry.contains_channel(&ch("Alive")));
    }

    #[test]
    fn test_take_all_empties_registry() {
        let mut registry = Registry::new();
        registry.insert(ch("A"), noop(), None, MatchMode::Exact, None);
        registry.insert(ch("B"), noop(), None, MatchMode::Partial, None);

        let taken = registry.take_all();
        assert_eq!(taken.total_listeners(), 2);
        assert_eq!(registry.channel_count(), 0);
    }
}
