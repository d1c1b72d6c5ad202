//! Intermediate representation of a meta-model.
//!
//! The [`SymbolTable`] is the validated, read-only model every backend
//! consumes. It is produced by [`build`] from the raw declarations of
//! `mmc-ast`:
//!
//! - all names resolve and none collide, also not after projecting them into
//!   the naming conventions of the backends
//! - the inheritance is acyclic, ancestors and descendants are complete
//! - constructors are flat lists of argument-to-property assignments
//! - verification functions are classified as patterns or
//!   implementation-specific
//!
//! # Example
//!
//! ```rust
//! use mmc_ast::MetaModelDecl;
//! use mmc_ir::{build, BuildOptions};
//!
//! let table = build(&MetaModelDecl::default(), &BuildOptions::default()).unwrap();
//! assert_eq!(table.classes().count(), 0);
//! ```

mod builder;
mod descendability;
mod naming;
mod pattern;
mod symbol;
mod table;
mod types;

pub use builder::{build, BuildOptions};
pub use descendability::{
    is_descendable, map_class_descendability, map_descendability, DescendabilityMap,
};
pub use naming::NamingConvention;
pub use pattern::{reconstruct_pattern, PatternOutcome};
pub use symbol::{ClassId, ConstrainedPrimitiveId, EnumerationId, Symbol, VerificationId};
pub use table::SymbolTable;
pub use types::{
    Argument, AssignArgument, Class, ClassKind, ConstrainedPrimitive, Constructor, Contract,
    Contracts, DefaultValue, Enumeration, EnumerationLiteral, Interface, Invariant, Method,
    PrimitiveType, Property, Serialization, Snapshot, TypeAnnotation, Verification,
    VerificationFunction,
};
