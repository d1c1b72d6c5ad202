//! Semantic analysis of the expressions of a meta-model.
//!
//! Invariants and functions are analysed against a built
//! [`SymbolTable`](mmc_ir::SymbolTable) in two steps:
//!
//! 1. the [`TypeInferrer`] records an [`InferredType`] for every node
//! 2. the [`NullabilityInferrer`] decides per node whether the value may be
//!    absent, once with the [`OptionalPolicy`] and once with the
//!    [`PointerPolicy`]
//!
//! [`annotate_invariants`] runs both steps over all invariants of a table.
//!
//! # Example
//!
//! ```rust
//! use mmc_ast::MetaModelDecl;
//! use mmc_ir::{build, BuildOptions};
//! use mmc_semantic::annotate_invariants;
//!
//! let table = build(&MetaModelDecl::default(), &BuildOptions::default()).unwrap();
//! let annotations = annotate_invariants(&table).unwrap();
//! assert!(annotations.type_map.is_empty());
//! ```

mod annotate;
mod environment;
mod inference;
mod nullability;
mod types;

pub use annotate::{annotate_expression, annotate_invariants, InvariantAnnotations};
pub use environment::{populate_base_environment, Environment};
pub use inference::{Canonicalizer, TypeInferrer};
pub use nullability::{NullabilityInferrer, NullabilityPolicy, OptionalPolicy, PointerPolicy};
pub use types::{assignable, BuiltinFunction, DisplayType, InferredPrimitive, InferredType};
