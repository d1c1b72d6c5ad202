//! Raw declarations of a meta-model.
//!
//! These are what the external parser hands over: names and type annotations
//! are still unresolved strings, constructors are unflattened and nothing has
//! been validated yet. The symbol table builder in `mmc-ir` consumes them.

use crate::tree::{ConstantValue, Expression, Statement};
use mmc_core::{Identifier, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// All declarations of a meta-model in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaModelDecl {
    pub symbols: Vec<SymbolDecl>,
    pub verification_functions: Vec<FunctionDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SymbolDecl {
    Class(ClassDecl),
    Enumeration(EnumerationDecl),
}

impl SymbolDecl {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Class(decl) => decl.id,
            Self::Enumeration(decl) => decl.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Class(decl) => &decl.name,
            Self::Enumeration(decl) => &decl.name,
        }
    }
}

/// A type annotation as written: `Name` or `Name[Sub, ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawTypeAnnotation {
    Atomic {
        id: NodeId,
        name: Identifier,
    },
    Subscripted {
        id: NodeId,
        name: Identifier,
        subscripts: Vec<RawTypeAnnotation>,
    },
}

impl RawTypeAnnotation {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Atomic { id, .. } | Self::Subscripted { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &Identifier {
        match self {
            Self::Atomic { name, .. } | Self::Subscripted { name, .. } => name,
        }
    }
}

impl fmt::Display for RawTypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic { name, .. } => write!(f, "{name}"),
            Self::Subscripted {
                name, subscripts, ..
            } => {
                write!(f, "{name}[")?;
                for (i, subscript) in subscripts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{subscript}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub type_annotation: RawTypeAnnotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub type_annotation: RawTypeAnnotation,
}

/// A pre- or postcondition, `@require(lambda x: ...)` or `@ensure(...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDecl {
    pub id: NodeId,
    /// Arguments of the lambda. Postconditions may also take `OLD` and
    /// `result`.
    pub args: Vec<Identifier>,
    pub description: Option<String>,
    pub body: Expression,
}

/// A value captured before the execution, `@snapshot(lambda x: ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDecl {
    pub id: NodeId,
    pub args: Vec<Identifier>,
    pub name: Identifier,
    pub body: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractsDecl {
    pub preconditions: Vec<ContractDecl>,
    pub snapshots: Vec<SnapshotDecl>,
    pub postconditions: Vec<ContractDecl>,
}

impl ContractsDecl {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preconditions.is_empty() && self.snapshots.is_empty() && self.postconditions.is_empty()
    }
}

/// A method of a class. The implicit `self` is not listed in `arguments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub arguments: Vec<ArgumentDecl>,
    pub returns: Option<RawTypeAnnotation>,
    #[serde(default)]
    pub contracts: ContractsDecl,
    pub body: Vec<Statement>,
}

/// A module-level function, used as a verification function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub arguments: Vec<ArgumentDecl>,
    pub returns: Option<RawTypeAnnotation>,
    #[serde(default)]
    pub contracts: ContractsDecl,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantDecl {
    pub id: NodeId,
    pub description: Option<String>,
    pub body: Expression,
}

/// Fallback of a constructor argument when it is not given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultDecl {
    EmptyList,
    EnumLiteral {
        enumeration: Identifier,
        literal: Identifier,
    },
    Constant(ConstantValue),
}

/// Right-hand side of a property assignment in a constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstructorValue {
    /// `self.prop = arg`
    Argument(Identifier),
    /// `self.prop = arg if arg is not None else default`
    ArgumentOrDefault {
        argument: Identifier,
        default: DefaultDecl,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstructorStatementDecl {
    /// `Parent.__init__(self, ...)`, forwarding the arguments by name.
    CallSuper { id: NodeId, super_name: Identifier },
    Assign {
        id: NodeId,
        property: Identifier,
        value: ConstructorValue,
    },
}

impl ConstructorStatementDecl {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::CallSuper { id, .. } | Self::Assign { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub id: NodeId,
    pub arguments: Vec<ArgumentDecl>,
    #[serde(default)]
    pub contracts: ContractsDecl,
    pub body: Vec<ConstructorStatementDecl>,
}

/// `@serialization(with_model_type=...)` on a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializationDecl {
    pub id: NodeId,
    pub with_model_type: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub is_abstract: bool,
    /// Parents in declaration order. A primitive type name here makes the
    /// class a constrained primitive.
    pub inheritances: Vec<Identifier>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub invariants: Vec<InvariantDecl>,
    pub constructor: Option<ConstructorDecl>,
    #[serde(default)]
    pub serialization: Option<SerializationDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationLiteralDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationDecl {
    pub id: NodeId,
    pub name: Identifier,
    pub literals: Vec<EnumerationLiteralDecl>,
    /// Enumerations whose literals this one repeats, name and value alike.
    #[serde(default)]
    pub is_superset_of: Vec<Identifier>,
}
