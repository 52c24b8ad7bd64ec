//! Framework layer - registration, registry and dispatch.
//!
//! This module contains the message processing pipeline:
//! - Listener entries, match modes and removal handles
//! - The channel registry and its per-channel buckets
//! - The bus, which walks channel ancestors and delivers payloads
//! - Dispatch statistics and bus configuration

pub mod bus;
pub mod config;
pub mod listener;
pub mod registry;
pub mod stats;

pub use bus::{Bus, WeakBus};
pub use config::BusConfig;
pub use listener::{Callback, ListenerEntry, ListenerHandle, MatchMode};
pub use registry::Registry;
pub use stats::DispatchStats;
