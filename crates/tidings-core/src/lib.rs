//! # Tidings Core
//!
//! The core engine of the Tidings message bus.
//!
//! This crate provides hierarchical channels, the payload type system, the
//! listener registry and the synchronous dispatcher that ties them together.
//!
//! ## Architecture Layers
//!
//! Tidings Core is organized into three architectural layers:
//!
//! ### Foundation Layer
//!
//! Keys and the type system:
//! - **Channels**: Dotted hierarchical keys with parent derivation ([`Channel`])
//! - **Payloads**: Typed payloads with a subtype relation ([`Message`], [`PayloadType`])
//! - **Liveness**: Owner checks for automatic listener pruning ([`Liveness`], [`Lifeline`])
//!
//! ### Framework Layer
//!
//! Registration and dispatch:
//! - **Listeners**: Callbacks with match modes and removal handles ([`ListenerHandle`], [`MatchMode`])
//! - **Registry**: Per-channel listener buckets ([`Registry`])
//! - **Bus**: Hierarchical broadcast with type gating ([`Bus`])
//!
//! ### Integration Layer
//!
//! Interfaces for untyped callers:
//! - **Catalog**: Name-based payload lookup and decoding ([`PayloadCatalog`])
//! - **Bridge**: Validated broadcasts from a marshaling boundary ([`ScriptBridge`])
//!
//! ## Hierarchical Dispatch
//!
//! A broadcast travels from its channel up to the root:
//!
//! ```text
//! broadcast ──▶ Game.Damage.Fire ──▶ Game.Damage ──▶ Game ──▶ <root>
//!                 │ exact+partial      │ partial        │ partial  │ all
//!                 ▼                    ▼                ▼          ▼
//!             listeners            listeners        listeners  listeners
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tidings_core::{Bus, Channel, MatchMode};
//!
//! let bus = Bus::new();
//! let game = Channel::new("Game")?;
//!
//! bus.register(game, |channel, damage: &Damage| {
//!     println!("{channel}: {} damage", damage.amount);
//! }, MatchMode::Partial);
//!
//! bus.broadcast(&Channel::new("Game.Damage.Fire")?, &Damage { amount: 5 });
//! ```

// Architectural layers
pub mod foundation;
pub mod framework;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    BridgeError, BridgeResult, Channel, ChannelError, DispatchError, Lifeline, LifelineGuard,
    Lineage, Liveness, Message, PayloadType,
};

// Re-export framework types
pub use framework::{
    Bus, BusConfig, Callback, DispatchStats, ListenerEntry, ListenerHandle, MatchMode, Registry,
    WeakBus,
};

// Re-export integration types
pub use integration::{PayloadCatalog, ScriptBridge};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::{Channel, Lifeline, Liveness, Message, PayloadType};
    pub use super::framework::{Bus, ListenerHandle, MatchMode, WeakBus};
    pub use super::integration::{PayloadCatalog, ScriptBridge};
}
