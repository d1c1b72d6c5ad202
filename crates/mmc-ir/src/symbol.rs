//! Identities of the symbols owned by a [`SymbolTable`](crate::SymbolTable).
//!
//! Symbols live in per-kind arenas of the table. An ID is an index into the
//! arena of its kind, so it is only meaningful for the table that issued it.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the index into the arena
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(
    /// Identity of an abstract or a concrete class
    ClassId
);
arena_id!(
    /// Identity of an enumeration
    EnumerationId
);
arena_id!(
    /// Identity of a primitive type narrowed by invariants
    ConstrainedPrimitiveId
);
arena_id!(
    /// Identity of a module-level verification function
    VerificationId
);

/// A top-level named symbol of the meta-model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Enumeration(EnumerationId),
    ConstrainedPrimitive(ConstrainedPrimitiveId),
    Class(ClassId),
}

impl Symbol {
    #[must_use]
    pub const fn as_class(self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_class(self) -> bool {
        matches!(self, Self::Class(_))
    }
}
