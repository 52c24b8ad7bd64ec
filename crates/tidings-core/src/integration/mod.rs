//! Integration layer - interfaces for untyped callers.
//!
//! This module lets code that cannot name payload types statically take part
//! in messaging:
//! - Payload catalog for name-based type lookup and JSON decoding
//! - Script bridge that validates untyped broadcasts before forwarding them

pub mod bridge;
pub mod catalog;

pub use bridge::ScriptBridge;
pub use catalog::PayloadCatalog;
