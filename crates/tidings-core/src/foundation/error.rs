//! Error types for the tidings core.
//!
//! Broadcasting never returns an error to the caller. [`DispatchError`] exists
//! so that dispatch failures are logged with a consistent shape; the other
//! errors are returned from fallible entry points.

use thiserror::Error;

use super::channel::Channel;
use super::payload::PayloadType;

// =============================================================================
// Channel Errors
// =============================================================================

/// Errors produced while parsing a channel path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// A segment between separators is empty (`"A..B"`, `".A"`, `"A."`).
    #[error("empty segment {index} in channel path '{path}'")]
    EmptySegment {
        /// The offending path.
        path: String,
        /// Zero-based index of the empty segment.
        index: usize,
    },

    /// A segment contains a character outside `[A-Za-z0-9_-]`.
    #[error("invalid character {ch:?} in channel path '{path}'")]
    InvalidCharacter {
        /// The offending path.
        path: String,
        /// The first invalid character.
        ch: char,
    },
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Failures observed while delivering a single broadcast.
///
/// These are reported through `tracing` and counted in the bus statistics.
/// They never abort the broadcast.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The broadcast type is neither the expected type nor a subtype of it.
    #[error(
        "payload type mismatch on channel {channel}: broadcast type {sent}, \
         listener at {level} expected {expected}"
    )]
    TypeMismatch {
        /// The channel the payload was broadcast on.
        channel: Channel,
        /// The channel the listener is registered on.
        level: Channel,
        /// The broadcast payload type.
        sent: PayloadType,
        /// The type the listener expects.
        expected: PayloadType,
    },
}

// =============================================================================
// Bridge Errors
// =============================================================================

/// Errors produced at the untyped marshaling boundary.
///
/// When any of these is returned, nothing was broadcast.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No type descriptor accompanied the payload.
    #[error("broadcast rejected: missing payload type descriptor")]
    MissingDescriptor,

    /// No payload accompanied the descriptor.
    #[error("broadcast rejected: missing payload for type {descriptor}")]
    MissingPayload {
        /// The descriptor that was supplied.
        descriptor: PayloadType,
    },

    /// The payload's concrete type differs from the supplied descriptor.
    #[error("broadcast rejected: descriptor {descriptor} does not describe payload of type {actual}")]
    DescriptorMismatch {
        /// The descriptor that was supplied.
        descriptor: PayloadType,
        /// The payload's actual type.
        actual: PayloadType,
    },

    /// The named payload type is not registered in the catalog.
    #[error("broadcast rejected: unknown payload type '{0}'")]
    UnknownType(String),

    /// The payload body could not be decoded into the named type.
    #[error("broadcast rejected: failed to decode payload as '{type_name}': {source}")]
    Decode {
        /// The requested type name.
        type_name: String,
        /// The decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The channel path is malformed.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for marshaling boundary operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
