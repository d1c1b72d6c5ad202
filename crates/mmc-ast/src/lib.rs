//! Parse-tree model of the meta-model compiler.
//!
//! This crate defines the closed set of expression and statement nodes that
//! invariants, constructors and verification functions are written in, the
//! raw declarations the external parser hands over, and the dispatch traits
//! every consumer of the tree implements.

pub mod builder;
pub mod decl;
pub mod tree;
pub mod visitor;

pub use builder::TreeBuilder;
pub use decl::{
    ArgumentDecl, ClassDecl, ConstructorDecl, ConstructorStatementDecl, ConstructorValue,
    ContractDecl, ContractsDecl, DefaultDecl, EnumerationDecl, EnumerationLiteralDecl,
    FunctionDecl, InvariantDecl, MetaModelDecl, MethodDecl, PropertyDecl, RawTypeAnnotation,
    SerializationDecl, SnapshotDecl, SymbolDecl,
};
pub use tree::{
    Add, All, Any, And, Assignment, Comparator, Comparison, Constant, ConstantValue, Expression,
    ForEach, ForRange, FormattedValue, FunctionCall, Generator, Implication, Index, IsIn, IsNone,
    IsNotNone, JoinedStr, JoinedStrValue, Member, MethodCall, Name, Not, Or, Return,
    Statement, Sub,
};
pub use visitor::{Transformer, Visitor};
