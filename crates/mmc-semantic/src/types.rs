//! Types inferred for the nodes of invariants and functions.
//!
//! These extend the [`TypeAnnotation`]s of the symbol table with the types
//! that only exist inside expressions: the length of a collection, the
//! absence of a value, functions, methods and enumerations used as a type
//! (as in `Kind.Leaf`).

use mmc_core::Identifier;
use mmc_ir::{
    ClassId, EnumerationId, PrimitiveType, Symbol, SymbolTable, TypeAnnotation, VerificationId,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferredPrimitive {
    Bool,
    Int,
    Float,
    Str,
    Bytearray,
    /// Result of `len(...)`. Backends usually map it to an unsigned size.
    Length,
    None,
}

impl InferredPrimitive {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytearray => "bytearray",
            Self::Length => "Length",
            Self::None => "None",
        }
    }
}

impl From<PrimitiveType> for InferredPrimitive {
    fn from(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::Bool => Self::Bool,
            PrimitiveType::Int => Self::Int,
            PrimitiveType::Float => Self::Float,
            PrimitiveType::Str => Self::Str,
            PrimitiveType::Bytearray => Self::Bytearray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Len,
}

impl BuiltinFunction {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Len => "len",
        }
    }

    #[must_use]
    pub const fn returns(self) -> InferredType {
        match self {
            Self::Len => InferredType::Primitive(InferredPrimitive::Length),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InferredType {
    Primitive(InferredPrimitive),
    OurType(Symbol),
    Verification(VerificationId),
    Builtin(BuiltinFunction),
    Method { class: ClassId, name: Identifier },
    List(Box<InferredType>),
    Optional(Box<InferredType>),
    EnumerationAsType(EnumerationId),
}

impl InferredType {
    pub const BOOL: Self = Self::Primitive(InferredPrimitive::Bool);
    pub const INT: Self = Self::Primitive(InferredPrimitive::Int);
    pub const STR: Self = Self::Primitive(InferredPrimitive::Str);
    pub const NONE: Self = Self::Primitive(InferredPrimitive::None);

    /// Converts an annotation of the symbol table.
    ///
    /// A `Ref[X]` is typed as `X` since an expression reads through the
    /// reference.
    #[must_use]
    pub fn from_annotation(annotation: &TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::Primitive(primitive) => Self::Primitive((*primitive).into()),
            TypeAnnotation::OurType(symbol) => Self::OurType(*symbol),
            TypeAnnotation::List(items) => Self::List(Box::new(Self::from_annotation(items))),
            TypeAnnotation::Optional(value) => {
                Self::Optional(Box::new(Self::from_annotation(value)))
            }
            TypeAnnotation::Ref(value) => Self::from_annotation(value),
        }
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Strips all the levels of `Optional`
    #[must_use]
    pub fn beneath_optional(&self) -> &InferredType {
        let mut current = self;
        while let Self::Optional(value) = current {
            current = value;
        }
        current
    }

    /// Renders the type with the names of the symbols in `table`.
    #[must_use]
    pub fn display<'a>(&'a self, table: &'a SymbolTable) -> DisplayType<'a> {
        DisplayType { ty: self, table }
    }
}

/// See [`InferredType::display`].
pub struct DisplayType<'a> {
    ty: &'a InferredType,
    table: &'a SymbolTable,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table;
        match self.ty {
            InferredType::Primitive(primitive) => f.write_str(primitive.name()),
            InferredType::OurType(symbol) => write!(f, "{}", table.symbol_name(*symbol)),
            InferredType::Verification(id) => write!(
                f,
                "verification function {}",
                table.verification_function(*id).name
            ),
            InferredType::Builtin(function) => write!(f, "built-in function {}", function.name()),
            InferredType::Method { class, name } => {
                write!(f, "method {}.{}", table.class(*class).name, name)
            }
            InferredType::List(items) => write!(f, "List[{}]", items.display(table)),
            InferredType::Optional(value) => write!(f, "Optional[{}]", value.display(table)),
            InferredType::EnumerationAsType(id) => {
                write!(f, "enumeration-as-type {}", table.enumeration(*id).name)
            }
        }
    }
}

/// Checks whether a value of the type `value` can be assigned to a variable
/// of the type `target`.
///
/// Lists are invariant, optionals and our types covariant. A constrained
/// primitive without invariants accepts the bare primitive it narrows.
#[must_use]
pub fn assignable(target: &InferredType, value: &InferredType, table: &SymbolTable) -> bool {
    use InferredType as T;

    match (target, value) {
        (T::Optional(target), T::Optional(value)) => assignable(target, value, table),
        (T::Optional(target), value) => assignable(target, value, table),

        (T::Primitive(target), T::Primitive(value)) => target == value,
        (T::Primitive(target), T::OurType(symbol)) => table
            .constrainee(*symbol)
            .is_some_and(|constrainee| InferredPrimitive::from(constrainee) == *target),

        (T::OurType(Symbol::Enumeration(target)), T::OurType(Symbol::Enumeration(value))) => {
            target == value
        }
        (
            T::OurType(Symbol::ConstrainedPrimitive(target)),
            T::OurType(Symbol::ConstrainedPrimitive(value)),
        ) => {
            target == value
                || table
                    .constrained_primitive(*target)
                    .descendants
                    .contains(value)
        }
        (T::OurType(Symbol::ConstrainedPrimitive(target)), T::Primitive(value)) => {
            let target = table.constrained_primitive(*target);
            target.invariants.is_empty() && InferredPrimitive::from(target.constrainee) == *value
        }
        (T::OurType(Symbol::Class(target)), T::OurType(Symbol::Class(value))) => {
            table.is_subclass_of(*value, *target)
        }

        (T::Verification(target), T::Verification(value)) => target == value,
        (T::Builtin(target), T::Builtin(value)) => target == value,
        (
            T::Method { class, name },
            T::Method {
                class: other_class,
                name: other_name,
            },
        ) => class == other_class && name == other_name,

        (T::List(target), T::List(value)) => target == value,

        // Assigning an enumeration-as-type has no use in a meta-model yet.
        (T::EnumerationAsType(_), _) => false,

        _ => false,
    }
}
