//! Procedural macros for the Tidings message bus.
//!
//! This crate provides:
//!
//! - `#[derive(Message)]` - Generates the payload type identity and the
//!   subtype relation for broadcast payloads
//!
//! # Message Derive Macro
//!
//! ```rust,ignore
//! use tidings::prelude::*;
//!
//! #[derive(Debug, Clone, Message)]
//! pub struct Damage {
//!     pub amount: u32,
//! }
//!
//! // FireDamage is a subtype of Damage: listeners expecting Damage receive it.
//! #[derive(Debug, Clone, Message)]
//! #[message(name = "FireDamage")]
//! pub struct FireDamage {
//!     #[message(parent)]
//!     pub base: Damage,
//!     pub burn_ticks: u8,
//! }
//! ```

mod message;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `tidings_core::Message` for structs and enums.
///
/// # Attributes
///
/// - `#[message(name = "...")]` - Override the payload type name
/// - `#[message(parent)]` - On a field: the embedded parent payload. The
///   deriving type becomes a subtype of the field's type and gets
///   `Deref`/`DerefMut` to it.
///
/// Generic types are not supported.
#[proc_macro_derive(Message, attributes(message))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match message::derive_message(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
