//! Message bus: registration and dispatch.
//!
//! The [`Bus`] owns one [`Registry`] and delivers broadcasts to the listeners
//! in it. A broadcast walks from the broadcast channel up through every
//! ancestor to the root:
//!
//! ```text
//! broadcast("Game.Damage.Fire")
//!
//!   Game.Damage.Fire   exact level    Exact + Partial listeners
//!   Game.Damage        ancestor       Partial listeners
//!   Game               ancestor       Partial listeners
//!   <root>             ancestor       all listeners
//! ```
//!
//! At every level, each eligible listener is type-checked: it runs only if the
//! broadcast payload type is the type it expects or a subtype of it.
//!
//! # Reentrancy
//!
//! Callbacks may register, unregister or broadcast on the same bus. Each
//! level's listeners are copied before any of them run, and the registry lock
//! is never held while a callback executes. Changes made by a callback take
//! effect from the next broadcast on. A callback that broadcasts to its own
//! channel recurses without bound.
//!
//! # Ordering
//!
//! Listeners sharing a channel run in an unspecified order that may change
//! between broadcasts.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{Level, debug, error, span, trace, warn};

use super::config::BusConfig;
use super::listener::{Callback, ListenerEntry, ListenerHandle, MatchMode};
use super::registry::Registry;
use super::stats::{Counters, DispatchStats};
use crate::foundation::{Channel, DispatchError, Liveness, Message, PayloadType};

struct Shared {
    registry: Mutex<Registry>,
    config: BusConfig,
    counters: Counters,
}

/// Handle to a message registry and its dispatch engine.
///
/// Cloning is cheap; all clones share the same registry. Pass the bus
/// explicitly to every producer and consumer.
///
/// A callback that captures a `Bus` clone keeps the registry alive through a
/// reference cycle until [`clear`](Self::clear) runs. Capture a [`WeakBus`]
/// instead when that matters.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates a bus with default configuration.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: Mutex::new(Registry::new()),
                config,
                counters: Counters::default(),
            }),
        }
    }

    /// The configuration this bus was created with.
    pub fn config(&self) -> &BusConfig {
        &self.shared.config
    }

    /// Returns a non-owning handle to this bus.
    pub fn downgrade(&self) -> WeakBus {
        WeakBus {
            shared: Arc::downgrade(&self.shared),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a type-erased callback.
    ///
    /// With `expected` set to `None` the listener accepts every payload type.
    pub fn register_raw<F>(
        &self,
        channel: Channel,
        callback: F,
        expected: Option<PayloadType>,
        mode: MatchMode,
    ) -> ListenerHandle
    where
        F: Fn(&Channel, PayloadType, &dyn Message) + Send + Sync + 'static,
    {
        self.insert(channel, Arc::new(callback), expected, mode, None)
    }

    /// Registers a type-erased callback bound to an owner.
    ///
    /// Once `owner` reports that it is gone, the next broadcast that reaches
    /// this listener removes it instead of invoking it.
    pub fn register_with_owner<F>(
        &self,
        channel: Channel,
        owner: Arc<dyn Liveness>,
        callback: F,
        expected: Option<PayloadType>,
        mode: MatchMode,
    ) -> ListenerHandle
    where
        F: Fn(&Channel, PayloadType, &dyn Message) + Send + Sync + 'static,
    {
        self.insert(channel, Arc::new(callback), expected, mode, Some(owner))
    }

    /// Registers a callback for payloads of type `T` (or subtypes of `T`).
    ///
    /// ```rust,ignore
    /// bus.register(channel, |channel, damage: &Damage| {
    ///     println!("{channel}: {}", damage.amount);
    /// }, MatchMode::Exact);
    /// ```
    pub fn register<T, F>(&self, channel: Channel, callback: F, mode: MatchMode) -> ListenerHandle
    where
        T: Message,
        F: Fn(&Channel, &T) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(
            move |channel: &Channel, _: PayloadType, payload: &dyn Message| {
                if let Some(message) = payload.view::<T>() {
                    callback(channel, message);
                }
            },
        );
        self.insert(channel, callback, Some(T::static_type()), mode, None)
    }

    /// Registers a method of `listener` for payloads of type `T`.
    ///
    /// Only a weak reference to `listener` is kept. After the last strong
    /// reference is dropped the method is no longer called and the listener is
    /// pruned on the next broadcast that reaches it.
    ///
    /// ```rust,ignore
    /// let hud = Arc::new(Hud::default());
    /// bus.register_method(channel, &hud, Hud::on_damage, MatchMode::Partial);
    /// ```
    pub fn register_method<L, T, F>(
        &self,
        channel: Channel,
        listener: &Arc<L>,
        method: F,
        mode: MatchMode,
    ) -> ListenerHandle
    where
        L: Send + Sync + 'static,
        T: Message,
        F: Fn(&L, &Channel, &T) + Send + Sync + 'static,
    {
        let weak: Weak<L> = Arc::downgrade(listener);
        let owner: Arc<dyn Liveness> = Arc::new(weak.clone());

        let callback: Callback = Arc::new(
            move |channel: &Channel, _: PayloadType, payload: &dyn Message| {
                let Some(strong) = weak.upgrade() else {
                    return;
                };
                if let Some(message) = payload.view::<T>() {
                    method(&*strong, channel, message);
                }
            },
        );
        self.insert(channel, callback, Some(T::static_type()), mode, Some(owner))
    }

    fn insert(
        &self,
        channel: Channel,
        callback: Callback,
        expected: Option<PayloadType>,
        mode: MatchMode,
        owner: Option<Arc<dyn Liveness>>,
    ) -> ListenerHandle {
        let handle = self
            .shared
            .registry
            .lock()
            .insert(channel, callback, expected, mode, owner);

        debug!(
            channel = %handle.channel(),
            id = handle.id(),
            expected = expected.map_or("<any>", |ty| ty.name()),
            mode = ?mode,
            "Registered listener"
        );
        handle
    }

    /// Removes a listener.
    ///
    /// Invalid handles are reported and ignored. Removing a listener that is
    /// already gone is a no-op.
    pub fn unregister(&self, handle: &ListenerHandle) {
        if !handle.is_valid() {
            warn!("Trying to unregister an invalid listener handle");
            return;
        }

        if self.remove(handle.channel(), handle.id()) {
            debug!(channel = %handle.channel(), id = handle.id(), "Unregistered listener");
        }
    }

    /// Removes an entry, dropping it only after the lock is released.
    fn remove(&self, channel: &Channel, id: u64) -> bool {
        let removed = self.shared.registry.lock().remove(channel, id);
        removed.is_some()
    }

    fn snapshot(&self, channel: &Channel) -> Option<Vec<ListenerEntry>> {
        self.shared.registry.lock().snapshot(channel)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Broadcasts a payload on `channel`.
    ///
    /// Returns once every eligible listener at every level has run or been
    /// skipped. Failures are logged and counted, never returned.
    pub fn broadcast<M: Message>(&self, channel: &Channel, payload: &M) {
        self.broadcast_dyn(channel, payload);
    }

    /// Broadcasts a type-erased payload on `channel`.
    pub fn broadcast_dyn(&self, channel: &Channel, payload: &dyn Message) {
        let sent = payload.payload_type();
        let span = span!(Level::DEBUG, "broadcast", channel = %channel, payload = %sent);
        let _enter = span.enter();

        self.shared.counters.broadcast();

        if self.shared.config.trace_payloads && tracing::enabled!(Level::TRACE) {
            trace!(
                session = %self.shared.config.session_name,
                channel = %channel,
                payload = ?payload,
                "Broadcasting message"
            );
        }

        let mut exact_level = true;
        for level in channel.lineage() {
            if let Some(listeners) = self.snapshot(&level) {
                for listener in &listeners {
                    self.deliver(listener, &level, exact_level, channel, sent, payload);
                }
            }
            exact_level = false;
        }
    }

    fn deliver(
        &self,
        listener: &ListenerEntry,
        level: &Channel,
        exact_level: bool,
        channel: &Channel,
        sent: PayloadType,
        payload: &dyn Message,
    ) {
        if listener.is_dead() {
            warn!(
                channel = %channel,
                level = %level,
                id = listener.id(),
                "Listener owner has gone away, removing listener"
            );
            if self.remove(level, listener.id()) {
                self.shared.counters.pruned(1);
            }
            return;
        }

        if !listener.is_eligible(exact_level, level) {
            return;
        }

        if listener.accepts(&sent) {
            listener.invoke(channel, sent, payload);
            self.shared.counters.delivered();
        } else if let Some(expected) = listener.expected_type() {
            let err = DispatchError::TypeMismatch {
                channel: channel.clone(),
                level: level.clone(),
                sent,
                expected,
            };
            error!(error = %err, id = listener.id(), "Dropping message for listener");
            self.shared.counters.type_mismatch();
        }
    }

    // =========================================================================
    // Maintenance & Probes
    // =========================================================================

    /// Removes every listener whose owner is gone, across all channels.
    ///
    /// Broadcasts already prune dead listeners they reach; this also covers
    /// channels that are never broadcast to again.
    pub fn sweep_dead_listeners(&self) -> usize {
        let dead = self.shared.registry.lock().drain_dead();
        let count = dead.len();
        drop(dead);

        if count > 0 {
            warn!(count, "Swept listeners whose owner has gone away");
            self.shared.counters.pruned(count);
        }
        count
    }

    /// Drops every listener without invoking or notifying any of them.
    pub fn clear(&self) {
        let registry = self.shared.registry.lock().take_all();
        debug!(
            session = %self.shared.config.session_name,
            channels = registry.channel_count(),
            listeners = registry.total_listeners(),
            "Cleared message registry"
        );
        drop(registry);
    }

    /// Returns `true` if any listener is registered exactly on `channel`.
    pub fn is_channel_tracked(&self, channel: &Channel) -> bool {
        self.shared.registry.lock().contains_channel(channel)
    }

    /// Number of listeners registered exactly on `channel`.
    pub fn listener_count(&self, channel: &Channel) -> usize {
        self.shared.registry.lock().listener_count(channel)
    }

    /// Number of channels with at least one listener.
    pub fn channel_count(&self) -> usize {
        self.shared.registry.lock().channel_count()
    }

    /// Current dispatch statistics.
    pub fn stats(&self) -> DispatchStats {
        self.shared.counters.snapshot()
    }

    pub(crate) fn record_rejected(&self) {
        self.shared.counters.rejected();
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.lock();
        f.debug_struct("Bus")
            .field("session", &self.shared.config.session_name)
            .field("channels", &registry.channel_count())
            .field("listeners", &registry.total_listeners())
            .finish()
    }
}

/// Non-owning handle to a [`Bus`].
#[derive(Clone, Debug)]
pub struct WeakBus {
    shared: Weak<Shared>,
}

impl WeakBus {
    /// Returns the bus if it still exists.
    pub fn upgrade(&self) -> Option<Bus> {
        self.shared.upgrade().map(|shared| Bus { shared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Lifeline;
    use crate::foundation::payload::fixtures::{Damage, FireDamage, Heal};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ch(path: &str) -> Channel {
        Channel::new(path).unwrap()
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn counting<T: Message>(
        bus: &Bus,
        channel: &str,
        mode: MatchMode,
    ) -> (ListenerHandle, Arc<AtomicUsize>) {
        let hits = counter();
        let hits_clone = Arc::clone(&hits);
        let handle = bus.register(
            ch(channel),
            move |_, _: &T| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            },
            mode,
        );
        (handle, hits)
    }

    #[test]
    fn test_exact_listener_ignores_ancestors_and_descendants() {
        let bus = Bus::new();
        let (_, hits) = counting::<Damage>(&bus, "A.B", MatchMode::Exact);

        bus.broadcast(&ch("A.B"), &Damage { amount: 1 });
        bus.broadcast(&ch("A.B.C"), &Damage { amount: 1 });
        bus.broadcast(&ch("A"), &Damage { amount: 1 });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_partial_listener_receives_descendants_only() {
        let bus = Bus::new();
        let (_, hits) = counting::<Damage>(&bus, "A.B", MatchMode::Partial);

        bus.broadcast(&ch("A.B"), &Damage { amount: 1 });
        bus.broadcast(&ch("A.B.C"), &Damage { amount: 1 });
        bus.broadcast(&ch("A.B.C.D"), &Damage { amount: 1 });
        bus.broadcast(&ch("A"), &Damage { amount: 1 });
        bus.broadcast(&ch("A.X"), &Damage { amount: 1 });

        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_root_listener_receives_everything() {
        let bus = Bus::new();
        let hits = counter();
        let hits_clone = Arc::clone(&hits);
        bus.register_raw(
            Channel::root(),
            move |_, _, _| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            },
            None,
            MatchMode::Exact,
        );

        bus.broadcast(&ch("A"), &Damage { amount: 1 });
        bus.broadcast(&ch("B.C"), &Heal { amount: 1 });
        bus.broadcast(&Channel::root(), &Heal { amount: 1 });

        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_scenario_exact_and_partial_on_game_channels() {
        let bus = Bus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let l1 = Arc::clone(&seen);
        bus.register(
            ch("Game.Damage"),
            move |channel, damage: &Damage| {
                l1.lock().push(("L1", channel.to_string(), damage.amount));
            },
            MatchMode::Exact,
        );
        let l2 = Arc::clone(&seen);
        bus.register(
            ch("Game"),
            move |channel, damage: &Damage| {
                l2.lock().push(("L2", channel.to_string(), damage.amount));
            },
            MatchMode::Partial,
        );

        bus.broadcast(&ch("Game.Damage"), &Damage { amount: 5 });
        {
            let mut seen = seen.lock();
            seen.sort();
            assert_eq!(
                *seen,
                vec![
                    ("L1", "Game.Damage".to_string(), 5),
                    ("L2", "Game.Damage".to_string(), 5),
                ]
            );
            seen.clear();
        }

        bus.broadcast(&ch("Game"), &Damage { amount: 5 });
        assert_eq!(*seen.lock(), vec![("L2", "Game".to_string(), 5)]);
    }

    #[test]
    fn test_type_gating_accepts_subtypes() {
        let bus = Bus::new();
        let amounts = Arc::new(Mutex::new(Vec::new()));
        let amounts_clone = Arc::clone(&amounts);
        bus.register(
            ch("X"),
            move |_, damage: &Damage| amounts_clone.lock().push(damage.amount),
            MatchMode::Exact,
        );

        bus.broadcast(
            &ch("X"),
            &FireDamage {
                base: Damage { amount: 9 },
                burn_ticks: 2,
            },
        );

        assert_eq!(*amounts.lock(), vec![9]);
        assert_eq!(bus.stats().type_mismatches, 0);
    }

    #[test]
    fn test_type_mismatch_is_reported_not_delivered() {
        let bus = Bus::new();
        let (_, damage_hits) = counting::<Damage>(&bus, "X", MatchMode::Exact);
        let (_, heal_hits) = counting::<Heal>(&bus, "X", MatchMode::Exact);

        bus.broadcast(&ch("X"), &Heal { amount: 3 });

        assert_eq!(damage_hits.load(Ordering::SeqCst), 0);
        assert_eq!(heal_hits.load(Ordering::SeqCst), 1);
        let stats = bus.stats();
        assert_eq!(stats.type_mismatches, 1);
        assert_eq!(stats.deliveries, 1);
    }

    #[test]
    fn test_subtype_listener_rejects_parent_payload() {
        let bus = Bus::new();
        let (_, hits) = counting::<FireDamage>(&bus, "X", MatchMode::Exact);

        bus.broadcast(&ch("X"), &Damage { amount: 1 });

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.stats().type_mismatches, 1);
    }

    #[test]
    fn test_raw_listener_receives_broadcast_channel_and_type() {
        let bus = Bus::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        bus.register_raw(
            ch("A"),
            move |channel, ty, payload| {
                let amount = payload.view::<Damage>().map(|d| d.amount);
                *seen_clone.lock() = Some((channel.clone(), ty, amount));
            },
            None,
            MatchMode::Partial,
        );

        bus.broadcast(&ch("A.B"), &Damage { amount: 4 });

        let seen = seen.lock().clone();
        assert_eq!(
            seen,
            Some((ch("A.B"), PayloadType::of::<Damage>(), Some(4)))
        );
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let bus = Bus::new();
        let (handle, hits) = counting::<Damage>(&bus, "Y", MatchMode::Exact);

        bus.unregister(&handle);
        bus.unregister(&handle);
        bus.unregister(&ListenerHandle::default());

        bus.broadcast(&ch("Y"), &Damage { amount: 1 });
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!bus.is_channel_tracked(&ch("Y")));
    }

    #[test]
    fn test_last_unregister_untracks_channel() {
        let bus = Bus::new();
        let (first, _) = counting::<Damage>(&bus, "C", MatchMode::Exact);
        let (second, _) = counting::<Damage>(&bus, "C", MatchMode::Exact);

        bus.unregister(&first);
        assert!(bus.is_channel_tracked(&ch("C")));
        assert_eq!(bus.listener_count(&ch("C")), 1);

        bus.unregister(&second);
        assert!(!bus.is_channel_tracked(&ch("C")));
        assert_eq!(bus.channel_count(), 0);
    }

    #[test]
    fn test_unregister_inside_callback_uses_snapshot() {
        let bus = Bus::new();
        let (l1, l1_hits) = counting::<Damage>(&bus, "Y", MatchMode::Exact);

        let l2_hits = counter();
        let l2_hits_clone = Arc::clone(&l2_hits);
        let weak_bus = bus.downgrade();
        bus.register(
            ch("Y"),
            move |_, _: &Damage| {
                l2_hits_clone.fetch_add(1, Ordering::SeqCst);
                if let Some(bus) = weak_bus.upgrade() {
                    bus.unregister(&l1);
                }
            },
            MatchMode::Exact,
        );

        bus.broadcast(&ch("Y"), &Damage { amount: 1 });
        assert_eq!(l1_hits.load(Ordering::SeqCst), 1);
        assert_eq!(l2_hits.load(Ordering::SeqCst), 1);

        bus.broadcast(&ch("Y"), &Damage { amount: 1 });
        assert_eq!(l1_hits.load(Ordering::SeqCst), 1);
        assert_eq!(l2_hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_register_inside_callback_applies_to_next_broadcast() {
        let bus = Bus::new();
        let late_hits = counter();

        let weak_bus = bus.downgrade();
        let late_hits_clone = Arc::clone(&late_hits);
        let registered = Arc::new(AtomicUsize::new(0));
        bus.register(
            ch("Z"),
            move |_, _: &Damage| {
                if registered.fetch_add(1, Ordering::SeqCst) > 0 {
                    return;
                }
                let Some(bus) = weak_bus.upgrade() else {
                    return;
                };
                let hits = Arc::clone(&late_hits_clone);
                bus.register(
                    ch("Z"),
                    move |_, _: &Damage| {
                        hits.fetch_add(1, Ordering::SeqCst);
                    },
                    MatchMode::Exact,
                );
            },
            MatchMode::Exact,
        );

        bus.broadcast(&ch("Z"), &Damage { amount: 1 });
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        bus.broadcast(&ch("Z"), &Damage { amount: 1 });
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_broadcast_from_callback() {
        let bus = Bus::new();
        let (_, child_hits) = counting::<Heal>(&bus, "Child", MatchMode::Exact);

        let weak_bus = bus.downgrade();
        bus.register(
            ch("Parent"),
            move |_, damage: &Damage| {
                if let Some(bus) = weak_bus.upgrade() {
                    bus.broadcast(&ch("Child"), &Heal { amount: damage.amount });
                }
            },
            MatchMode::Exact,
        );

        bus.broadcast(&ch("Parent"), &Damage { amount: 2 });
        assert_eq!(child_hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.stats().broadcasts, 2);
    }

    struct Hud {
        hits: AtomicUsize,
    }

    impl Hud {
        fn on_damage(&self, _channel: &Channel, damage: &Damage) {
            self.hits.fetch_add(damage.amount as usize, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_method_listener_pruned_after_owner_drops() {
        let bus = Bus::new();
        let hud = Arc::new(Hud {
            hits: AtomicUsize::new(0),
        });
        bus.register_method(ch("Game.Damage"), &hud, Hud::on_damage, MatchMode::Exact);

        bus.broadcast(&ch("Game.Damage"), &Damage { amount: 3 });
        assert_eq!(hud.hits.load(Ordering::SeqCst), 3);

        drop(hud);
        assert!(bus.is_channel_tracked(&ch("Game.Damage")));

        bus.broadcast(&ch("Game.Damage"), &Damage { amount: 3 });
        assert!(!bus.is_channel_tracked(&ch("Game.Damage")));
        let stats = bus.stats();
        assert_eq!(stats.pruned, 1);
        assert_eq!(stats.deliveries, 1);
    }

    #[test]
    fn test_dead_listener_pruned_from_its_own_level() {
        let bus = Bus::new();
        let lifeline = Lifeline::new();
        bus.register_with_owner(
            ch("Game"),
            Arc::new(lifeline.clone()),
            |_, _, _| panic!("dead listener must not run"),
            None,
            MatchMode::Partial,
        );
        let (_, survivor_hits) = counting::<Damage>(&bus, "Game", MatchMode::Partial);

        lifeline.sever();
        bus.broadcast(&ch("Game.Damage.Fire"), &Damage { amount: 1 });

        assert_eq!(bus.listener_count(&ch("Game")), 1);
        assert_eq!(survivor_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sweep_covers_unvisited_channels() {
        let bus = Bus::new();
        let lifeline = Lifeline::new();
        for path in ["Quiet.A", "Quiet.B"] {
            bus.register_with_owner(
                ch(path),
                Arc::new(lifeline.clone()),
                |_, _, _| {},
                None,
                MatchMode::Exact,
            );
        }
        counting::<Damage>(&bus, "Quiet.A", MatchMode::Exact);

        lifeline.sever();
        assert_eq!(bus.sweep_dead_listeners(), 2);
        assert!(bus.is_channel_tracked(&ch("Quiet.A")));
        assert!(!bus.is_channel_tracked(&ch("Quiet.B")));
        assert_eq!(bus.sweep_dead_listeners(), 0);
    }

    #[test]
    fn test_clear_invokes_nothing() {
        let bus = Bus::new();
        let (_, hits) = counting::<Damage>(&bus, "A", MatchMode::Partial);
        counting::<Heal>(&bus, "B", MatchMode::Exact);

        bus.clear();
        assert_eq!(bus.channel_count(), 0);

        bus.broadcast(&ch("A"), &Damage { amount: 1 });
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.stats().deliveries, 0);
    }

    #[test]
    fn test_clones_share_registry() {
        let bus = Bus::new();
        let other = bus.clone();
        let (_, hits) = counting::<Damage>(&bus, "Shared", MatchMode::Exact);

        other.broadcast(&ch("Shared"), &Damage { amount: 1 });
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let weak = bus.downgrade();
        drop(bus);
        drop(other);
        assert!(weak.upgrade().is_none());
    }
}
