//! Payload type system.
//!
//! Payloads are plain structs implementing [`Message`]. Each payload type has a
//! runtime identity, [`PayloadType`], which also records the type's parent so
//! that a subtype relation can be checked at dispatch time:
//!
//! ```text
//! Damage                  PayloadType { name: "Damage",     parent: None }
//! └── FireDamage          PayloadType { name: "FireDamage", parent: Damage }
//!     └── Burn            PayloadType { name: "Burn",       parent: FireDamage }
//! ```
//!
//! Subtypes embed their parent payload as a field (parent-in-child). This lets
//! a listener that expects `Damage` view a broadcast `Burn` as a `Damage`
//! without copying, through [`Message::ancestor_any`].
//!
//! # Derive Macro
//!
//! ```rust,ignore
//! #[derive(Debug, Clone, Message)]
//! pub struct Damage {
//!     pub amount: u32,
//! }
//!
//! #[derive(Debug, Clone, Message)]
//! pub struct FireDamage {
//!     #[message(parent)]
//!     pub base: Damage,
//!     pub burn_ticks: u8,
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// Core Message Trait
// ============================================================================

/// The base trait for all broadcast payloads.
///
/// Implemented by `#[derive(Message)]`. Manual implementations must keep
/// [`Message::static_type`], [`Message::payload_type`] and
/// [`Message::ancestor_any`] consistent with each other: every type reachable
/// through `ancestor_any` must appear in the parent chain of `payload_type`.
pub trait Message: Any + Send + Sync + fmt::Debug {
    /// The identity of this payload type.
    fn static_type() -> PayloadType
    where
        Self: Sized;

    /// The identity of this payload's concrete type.
    fn payload_type(&self) -> PayloadType;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Views this payload as one of its ancestor types (or itself).
    ///
    /// Returns `None` when `type_id` is not in this payload's lineage.
    fn ancestor_any(&self, type_id: TypeId) -> Option<&dyn Any> {
        if type_id == self.as_any().type_id() {
            Some(self.as_any())
        } else {
            None
        }
    }
}

impl<'a> dyn Message + 'a {
    /// Returns `true` if the payload is `T` or a subtype of `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.payload_type().is_child_of(&T::static_type())
    }

    /// Views the payload as `T`, walking up the embedded parent chain.
    pub fn view<T: Message>(&self) -> Option<&T> {
        self.ancestor_any(TypeId::of::<T>())?.downcast_ref::<T>()
    }
}

// ============================================================================
// Payload Type Identity
// ============================================================================

/// Runtime identity of a payload type.
///
/// Equality and hashing consider only the underlying [`TypeId`]; the name is
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct PayloadType {
    id: TypeId,
    name: &'static str,
    parent: Option<fn() -> PayloadType>,
}

impl PayloadType {
    /// Identity for a payload type without a parent.
    pub fn root<M: 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<M>(),
            name,
            parent: None,
        }
    }

    /// Identity for a payload type deriving from the type returned by `parent`.
    pub fn child<M: 'static>(name: &'static str, parent: fn() -> PayloadType) -> Self {
        Self {
            id: TypeId::of::<M>(),
            name,
            parent: Some(parent),
        }
    }

    /// Shorthand for `M::static_type()`.
    pub fn of<M: Message>() -> Self {
        M::static_type()
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type path.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The direct parent type, if any.
    pub fn parent(&self) -> Option<PayloadType> {
        self.parent.map(|parent| parent())
    }

    /// Iterates from this type up through all of its ancestors.
    pub fn ancestors(&self) -> impl Iterator<Item = PayloadType> {
        std::iter::successors(Some(*self), PayloadType::parent)
    }

    /// Returns `true` if `self` equals `other` or descends from it.
    pub fn is_child_of(&self, other: &PayloadType) -> bool {
        self.ancestors().any(|ty| ty == *other)
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl Hash for PayloadType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PayloadType").field(&self.name).finish()
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Hand-written payload hierarchy shared by the core tests.

    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Damage {
        pub amount: u32,
    }

    impl Message for Damage {
        fn static_type() -> PayloadType {
            PayloadType::root::<Self>("fixtures::Damage")
        }

        fn payload_type(&self) -> PayloadType {
            Self::static_type()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct FireDamage {
        pub base: Damage,
        pub burn_ticks: u8,
    }

    impl Message for FireDamage {
        fn static_type() -> PayloadType {
            PayloadType::child::<Self>("fixtures::FireDamage", Damage::static_type)
        }

        fn payload_type(&self) -> PayloadType {
            Self::static_type()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn ancestor_any(&self, type_id: TypeId) -> Option<&dyn Any> {
            if type_id == TypeId::of::<Self>() {
                return Some(self);
            }
            self.base.ancestor_any(type_id)
        }
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Heal {
        pub amount: u32,
    }

    impl Message for Heal {
        fn static_type() -> PayloadType {
            PayloadType::root::<Self>("fixtures::Heal")
        }

        fn payload_type(&self) -> PayloadType {
            Self::static_type()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }
}
