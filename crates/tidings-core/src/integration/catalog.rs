//! Name-addressable payload types.
//!
//! Callers outside Rust (scripting layers, consoles, config-driven triggers)
//! cannot name a payload type statically. A [`PayloadCatalog`] maps a type name
//! to its [`PayloadType`] and a JSON decoder so such callers can still build a
//! strongly typed payload.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::foundation::{BridgeError, BridgeResult, Message, PayloadType};

type Decoder = fn(serde_json::Value) -> Result<Box<dyn Message>, serde_json::Error>;

#[derive(Clone, Copy)]
struct CatalogEntry {
    ty: PayloadType,
    decode: Decoder,
}

fn decode_as<T: Message + DeserializeOwned>(
    value: serde_json::Value,
) -> Result<Box<dyn Message>, serde_json::Error> {
    Ok(Box::new(serde_json::from_value::<T>(value)?))
}

/// Registry of payload types that can be decoded by name.
#[derive(Clone, Default)]
pub struct PayloadCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl PayloadCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its payload type name.
    pub fn register<T: Message + DeserializeOwned>(&mut self) -> &mut Self {
        let ty = T::static_type();
        self.register_as::<T>(ty.name())
    }

    /// Registers `T` under an explicit name.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_as<T: Message + DeserializeOwned>(
        &mut self,
        name: impl Into<String>,
    ) -> &mut Self {
        self.entries.insert(
            name.into(),
            CatalogEntry {
                ty: T::static_type(),
                decode: decode_as::<T>,
            },
        );
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T: Message + DeserializeOwned>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Looks up a payload type by name.
    pub fn resolve(&self, name: &str) -> Option<PayloadType> {
        self.entries.get(name).map(|entry| entry.ty)
    }

    /// Decodes `body` into the payload type registered as `name`.
    pub fn decode(&self, name: &str, body: serde_json::Value) -> BridgeResult<Box<dyn Message>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| BridgeError::UnknownType(name.to_string()))?;

        (entry.decode)(body).map_err(|source| BridgeError::Decode {
            type_name: name.to_string(),
            source,
        })
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PayloadCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
