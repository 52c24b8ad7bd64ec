//! Foundation layer - channel keys and the payload type system.
//!
//! This module contains the building blocks the registry is keyed on:
//! - Hierarchical channel keys with parent derivation
//! - Payload type identity with a subtype relation
//! - Owner liveness checks for listeners bound to an owner
//! - Error types shared across the crate

pub mod channel;
pub mod error;
pub mod liveness;
pub mod payload;

pub use channel::{Channel, Lineage};
pub use error::{BridgeError, BridgeResult, ChannelError, DispatchError};
pub use liveness::{Lifeline, LifelineGuard, Liveness};
pub use payload::{Message, PayloadType};
