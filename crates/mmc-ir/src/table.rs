//! The symbol table, the root aggregate of the intermediate representation.

use crate::symbol::{ClassId, ConstrainedPrimitiveId, EnumerationId, Symbol, VerificationId};
use crate::types::{
    Class, ConstrainedPrimitive, Enumeration, PrimitiveType, TypeAnnotation, VerificationFunction,
};
use indexmap::IndexMap;
use mmc_core::Identifier;

/// Owns all the symbols of a validated meta-model.
///
/// Once built the table is read-only. Every type annotation in it resolves,
/// every inheritance chain is acyclic and all descendant sets are complete.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub(crate) symbols: IndexMap<Identifier, Symbol>,
    pub(crate) classes: Vec<Class>,
    pub(crate) enumerations: Vec<Enumeration>,
    pub(crate) constrained_primitives: Vec<ConstrainedPrimitive>,
    pub(crate) verification_functions: Vec<VerificationFunction>,
    pub(crate) concrete_classes: Vec<ClassId>,
    pub(crate) ref_association: Option<Symbol>,
}

impl SymbolTable {
    /// Looks up a symbol by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    /// All symbols in declaration order
    pub fn symbols(&self) -> impl Iterator<Item = (&Identifier, Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name, *symbol))
    }

    #[must_use]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[must_use]
    pub fn enumeration(&self, id: EnumerationId) -> &Enumeration {
        &self.enumerations[id.index()]
    }

    #[must_use]
    pub fn constrained_primitive(&self, id: ConstrainedPrimitiveId) -> &ConstrainedPrimitive {
        &self.constrained_primitives[id.index()]
    }

    #[must_use]
    pub fn verification_function(&self, id: VerificationId) -> &VerificationFunction {
        &self.verification_functions[id.index()]
    }

    /// Classes by their identity order
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, class)| (ClassId::new(i as u32), class))
    }

    pub fn enumerations(&self) -> impl Iterator<Item = (EnumerationId, &Enumeration)> {
        self.enumerations
            .iter()
            .enumerate()
            .map(|(i, enumeration)| (EnumerationId::new(i as u32), enumeration))
    }

    pub fn constrained_primitives(
        &self,
    ) -> impl Iterator<Item = (ConstrainedPrimitiveId, &ConstrainedPrimitive)> {
        self.constrained_primitives
            .iter()
            .enumerate()
            .map(|(i, primitive)| (ConstrainedPrimitiveId::new(i as u32), primitive))
    }

    pub fn verification_functions(&self) -> impl Iterator<Item = &VerificationFunction> {
        self.verification_functions.iter()
    }

    #[must_use]
    pub fn find_verification_function(&self, name: &str) -> Option<&VerificationFunction> {
        self.verification_functions
            .iter()
            .find(|function| function.name == name)
    }

    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.find(name)
            .and_then(Symbol::as_class)
            .map(|id| self.class(id))
    }

    /// All concrete classes in topological order.
    ///
    /// These are the concrete descendants of the implicit root every class
    /// without parents hangs under.
    #[must_use]
    pub fn concrete_classes(&self) -> &[ClassId] {
        &self.concrete_classes
    }

    /// The symbol that models references across aggregates, if the
    /// meta-model defines it
    #[must_use]
    pub fn ref_association(&self) -> Option<Symbol> {
        self.ref_association
    }

    #[must_use]
    pub fn symbol_name(&self, symbol: Symbol) -> &Identifier {
        match symbol {
            Symbol::Class(id) => &self.class(id).name,
            Symbol::Enumeration(id) => &self.enumeration(id).name,
            Symbol::ConstrainedPrimitive(id) => &self.constrained_primitive(id).name,
        }
    }

    /// The primitive type behind `symbol`, if it is a constrained primitive
    #[must_use]
    pub fn constrainee(&self, symbol: Symbol) -> Option<PrimitiveType> {
        match symbol {
            Symbol::ConstrainedPrimitive(id) => Some(self.constrained_primitive(id).constrainee),
            _ => None,
        }
    }

    /// Checks whether `descendant` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_subclass_of(&self, descendant: ClassId, ancestor: ClassId) -> bool {
        descendant == ancestor || self.class(descendant).ancestors.contains(&ancestor)
    }

    /// Renders `annotation` the way it is written in the meta-model
    #[must_use]
    pub fn type_name(&self, annotation: &TypeAnnotation) -> String {
        match annotation {
            TypeAnnotation::Primitive(primitive) => primitive.to_string(),
            TypeAnnotation::OurType(symbol) => self.symbol_name(*symbol).to_string(),
            TypeAnnotation::List(items) => format!("List[{}]", self.type_name(items)),
            TypeAnnotation::Optional(value) => format!("Optional[{}]", self.type_name(value)),
            TypeAnnotation::Ref(value) => format!("Ref[{}]", self.type_name(value)),
        }
    }
}
