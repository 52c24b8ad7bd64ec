//! # Tidings
//!
//! A hierarchical, type-checked publish/subscribe message bus for Rust.
//!
//! ## Overview
//!
//! Producers broadcast typed payloads on dotted channels such as
//! `Game.Damage.Fire`. Listeners subscribe to a channel either exactly or as a
//! prefix, and declare the payload type they accept. A broadcast reaches every
//! listener registered on the channel or on any of its ancestors whose match
//! mode and payload type fit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  broadcast   ┌─────────────────────────────┐
//! │   Producer   │─────────────▶│ Bus (one per Session)       │
//! └──────────────┘              │  Game.Damage.Fire  ──▶ L1   │
//! ┌──────────────┐  validated   │  Game.Damage       ──▶ L2   │
//! │ ScriptBridge │─────────────▶│  Game              ──▶ L3   │
//! └──────────────┘              │  <root>            ──▶ L4   │
//!                               └─────────────────────────────┘
//! ```
//!
//! - **Core**: Channels, payload types, the registry and the bus
//! - **Macros**: `#[derive(Message)]` for payload hierarchies
//! - **Runtime**: Configuration, logging and the session that owns the bus
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tidings::prelude::*;
//!
//! #[derive(Debug, Clone, Message)]
//! struct Damage {
//!     amount: u32,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::builder().build()?;
//!     let bus = session.bus();
//!
//!     bus.register(Channel::new("Game")?, |channel, damage: &Damage| {
//!         info!(%channel, amount = damage.amount, "Took damage");
//!     }, MatchMode::Partial);
//!
//!     bus.broadcast(&Channel::new("Game.Damage")?, &Damage { amount: 5 });
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `macros`: Enable the Message derive macro (default)
//! - `toml-config`: Load `tidings.toml` configuration files (default)
//! - `json-log`: Enable JSON log output

pub use tidings_core as core;
pub use tidings_runtime as runtime;

#[cfg(feature = "macros")]
pub use tidings_macros::Message;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tidings::prelude::*;
/// ```
pub mod prelude {
    // Session - owner of the bus
    pub use tidings_runtime::{Session, TidingsConfig};

    // Bus and registration
    pub use tidings_core::{Bus, ListenerHandle, MatchMode, WeakBus};

    // Keys and payloads
    pub use tidings_core::{Channel, Message, PayloadType};

    // Owner liveness for bound listeners
    pub use tidings_core::{Lifeline, Liveness};

    // Untyped callers
    pub use tidings_core::{PayloadCatalog, ScriptBridge};

    #[cfg(feature = "macros")]
    pub use tidings_macros::Message;

    // Logging macros
    pub use tidings_runtime::prelude::*;
}
