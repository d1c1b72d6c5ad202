//! Resolved types of the intermediate representation.

use crate::symbol::{ClassId, ConstrainedPrimitiveId, EnumerationId, Symbol, VerificationId};
use indexmap::IndexMap;
use mmc_ast::{ConstantValue, Expression, Statement};
use mmc_core::{Identifier, NodeId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Int,
    Float,
    Str,
    Bytearray,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 5] = [
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::Str,
        Self::Bytearray,
    ];

    /// Parses the name a primitive is written with in the meta-model
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "str" => Some(Self::Str),
            "bytearray" => Some(Self::Bytearray),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytearray => "bytearray",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved type annotation.
///
/// Optional never nests directly inside Optional, and every symbol referenced
/// exists in the table the annotation was resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeAnnotation {
    Primitive(PrimitiveType),
    OurType(Symbol),
    List(Box<TypeAnnotation>),
    Optional(Box<TypeAnnotation>),
    /// Association by reference, never by ownership. The value is a class.
    Ref(Box<TypeAnnotation>),
}

impl TypeAnnotation {
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Strips one level of `Optional`, if any
    #[must_use]
    pub fn beneath_optional(&self) -> &TypeAnnotation {
        match self {
            Self::Optional(value) => value,
            other => other,
        }
    }
}

/// A property of a class, tagged with the class that declared it.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    pub specified_for: ClassId,
    pub node: NodeId,
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    pub node: NodeId,
}

/// A pre- or postcondition of a signature.
#[derive(Debug, Clone)]
pub struct Contract {
    pub args: Vec<Identifier>,
    pub description: Option<String>,
    pub body: Expression,
    pub node: NodeId,
}

/// A value captured before the execution, available as `OLD.name` in the
/// postconditions.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub args: Vec<Identifier>,
    pub name: Identifier,
    pub body: Expression,
    pub node: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct Contracts {
    pub preconditions: Vec<Contract>,
    pub snapshots: Vec<Snapshot>,
    pub postconditions: Vec<Contract>,
}

impl Contracts {
    /// Appends the contracts of `other` after these.
    pub fn extend(&mut self, other: Contracts) {
        self.preconditions.extend(other.preconditions);
        self.snapshots.extend(other.snapshots);
        self.postconditions.extend(other.postconditions);
    }

    /// Bodies of all contracts and snapshots.
    pub fn bodies(&self) -> impl Iterator<Item = &Expression> {
        self.preconditions
            .iter()
            .map(|contract| &contract.body)
            .chain(self.snapshots.iter().map(|snapshot| &snapshot.body))
            .chain(self.postconditions.iter().map(|contract| &contract.body))
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub returns: Option<TypeAnnotation>,
    pub contracts: Contracts,
    pub body: Vec<Statement>,
    pub specified_for: ClassId,
    pub node: NodeId,
}

/// Value a constructor falls back to when an optional argument is not given.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    EmptyList,
    EnumLiteral {
        enumeration: EnumerationId,
        literal: Identifier,
    },
    Constant(ConstantValue),
}

/// Assignment of a constructor argument to a property, after in-lining.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignArgument {
    pub property: Identifier,
    pub argument: Identifier,
    pub default: Option<DefaultValue>,
    pub node: NodeId,
}

/// The constructor of a class with the calls to the ancestor constructors
/// in-lined.
#[derive(Debug, Clone, Default)]
pub struct Constructor {
    pub arguments: Vec<Argument>,
    /// Contracts of the ancestor constructors first, then the own ones.
    pub contracts: Contracts,
    pub statements: Vec<AssignArgument>,
    pub node: Option<NodeId>,
}

impl Constructor {
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

/// A boolean expression that must hold for every instance.
#[derive(Debug, Clone)]
pub struct Invariant {
    pub description: Option<String>,
    pub body: Expression,
    /// The class or the constrained primitive that declared the invariant.
    pub specified_for: Symbol,
    pub node: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Abstract,
    Concrete,
}

/// The interface generated for an abstract class or a concrete class with
/// descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub base: ClassId,
    /// Classes whose interfaces this one extends, in declaration order.
    pub inheritances: Vec<ClassId>,
    /// Concrete classes implementing this interface, the base first if it is
    /// concrete.
    pub implementers: Vec<ClassId>,
}

/// General settings of the de/serialization of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serialization {
    /// The serialized instances carry a discriminator of their concrete class.
    pub with_model_type: bool,
}

#[derive(Debug, Clone)]
pub struct Class {
    pub name: Identifier,
    pub kind: ClassKind,
    pub node: NodeId,
    pub inheritances: Vec<ClassId>,
    /// All ancestors in topological order, the most general first.
    pub ancestors: Vec<ClassId>,
    /// All descendants, abstract and concrete.
    pub descendants: Vec<ClassId>,
    pub concrete_descendants: Vec<ClassId>,
    pub interface: Option<Interface>,
    /// Inherited properties first, then the own ones.
    pub properties: IndexMap<Identifier, Property>,
    pub methods: IndexMap<Identifier, Method>,
    pub constructor: Constructor,
    /// Inherited invariants first, then the own ones.
    pub invariants: Vec<Invariant>,
    /// Set on the class or inherited from any ancestor.
    pub serialization: Serialization,
}

impl Class {
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        matches!(self.kind, ClassKind::Abstract)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumerationLiteral {
    pub name: Identifier,
    pub value: String,
    pub node: NodeId,
}

/// An enumeration with a non-empty list of uniquely valued literals.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub name: Identifier,
    pub literals: Vec<EnumerationLiteral>,
    /// Enumerations whose literals are all contained in this one.
    pub is_superset_of: Vec<EnumerationId>,
    pub node: NodeId,
}

impl Enumeration {
    #[must_use]
    pub fn literal(&self, name: &str) -> Option<&EnumerationLiteral> {
        self.literals.iter().find(|literal| literal.name == name)
    }
}

/// A primitive type narrowed by invariants, e.g. a non-empty string.
#[derive(Debug, Clone)]
pub struct ConstrainedPrimitive {
    pub name: Identifier,
    pub constrainee: PrimitiveType,
    pub inheritances: Vec<ConstrainedPrimitiveId>,
    pub descendants: Vec<ConstrainedPrimitiveId>,
    pub invariants: Vec<Invariant>,
    pub node: NodeId,
}

/// What a verification function was recognised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The function matches its argument against a regular expression.
    Pattern { pattern: String },
    /// Every backend provides its own implementation.
    ImplementationSpecific,
}

#[derive(Debug, Clone)]
pub struct VerificationFunction {
    pub id: VerificationId,
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub returns: Option<TypeAnnotation>,
    pub contracts: Contracts,
    pub body: Vec<Statement>,
    pub verification: Verification,
    pub node: NodeId,
}
