//! Lexical scopes mapping names to inferred types.

use crate::types::{BuiltinFunction, InferredType};
use mmc_core::Identifier;
use mmc_ir::{Symbol, SymbolTable};
use std::collections::HashMap;
use tracing::trace;

/// A scope of bindings with an optional enclosing scope.
///
/// Lookups walk outward from this scope to the outermost one. Mutations only
/// ever touch this scope, so the bindings a loop or a quantifier introduces
/// can be removed once its sub-expression has been processed.
#[derive(Debug, Default)]
pub struct Environment<'p> {
    mapping: HashMap<Identifier, InferredType>,
    parent: Option<&'p Environment<'p>>,
}

impl<'p> Environment<'p> {
    /// Creates an empty, outermost scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an outermost scope with the given bindings.
    pub fn with_mapping(mapping: HashMap<Identifier, InferredType>) -> Self {
        Self {
            mapping,
            parent: None,
        }
    }

    /// Creates an empty scope nested in `parent`.
    pub fn child(parent: &'p Environment<'p>) -> Self {
        Self {
            mapping: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Searches for the type of `name`, all the way to the outermost scope.
    pub fn find(&self, name: &str) -> Option<&InferredType> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(found) = current.mapping.get(name) {
                return Some(found);
            }
            scope = current.parent;
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Binds `identifier` in this scope, replacing a previous binding of this
    /// scope.
    pub fn set(&mut self, identifier: Identifier, ty: InferredType) {
        trace!(name = %identifier, "binding");
        self.mapping.insert(identifier, ty);
    }

    /// Removes the binding of `name` from this scope.
    ///
    /// Bindings of the enclosing scopes are never touched.
    pub fn remove(&mut self, name: &str) -> Option<InferredType> {
        trace!(name, "unbinding");
        self.mapping.remove(name)
    }
}

/// Creates the outermost scope of a symbol table: the built-in `len`, the
/// verification functions and the enumerations as types.
pub fn populate_base_environment(table: &SymbolTable) -> Environment<'static> {
    let mut mapping = HashMap::new();

    if let Ok(len) = Identifier::new(BuiltinFunction::Len.name()) {
        mapping.insert(len, InferredType::Builtin(BuiltinFunction::Len));
    }

    for function in table.verification_functions() {
        mapping.insert(
            function.name.clone(),
            InferredType::Verification(function.id),
        );
    }

    for (name, symbol) in table.symbols() {
        if let Symbol::Enumeration(id) = symbol {
            mapping.insert(name.clone(), InferredType::EnumerationAsType(id));
        }
    }

    Environment::with_mapping(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Identifier {
        Identifier::new(name).unwrap()
    }

    #[test]
    fn test_find_walks_outward() {
        let mut outer = Environment::new();
        outer.set(ident("x"), InferredType::INT);
        let mut inner = Environment::child(&outer);
        inner.set(ident("y"), InferredType::STR);

        assert_eq!(inner.find("x"), Some(&InferredType::INT));
        assert_eq!(inner.find("y"), Some(&InferredType::STR));
        assert_eq!(outer.find("y"), None);
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let mut outer = Environment::new();
        outer.set(ident("x"), InferredType::INT);
        let mut inner = Environment::child(&outer);
        inner.set(ident("x"), InferredType::BOOL);

        assert_eq!(inner.find("x"), Some(&InferredType::BOOL));
    }

    #[test]
    fn test_remove_affects_innermost_scope_only() {
        let mut outer = Environment::new();
        outer.set(ident("x"), InferredType::INT);
        let mut inner = Environment::child(&outer);

        assert_eq!(inner.remove("x"), None);
        assert!(inner.contains("x"));

        inner.set(ident("x"), InferredType::BOOL);
        assert_eq!(inner.remove("x"), Some(InferredType::BOOL));
        assert_eq!(inner.find("x"), Some(&InferredType::INT));
    }
}
