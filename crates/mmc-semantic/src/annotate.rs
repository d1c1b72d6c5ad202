//! Annotates the invariants of a symbol table with the side maps backends
//! read instead of re-deriving the semantics of the expressions.

use crate::environment::{populate_base_environment, Environment};
use crate::inference::{Canonicalizer, TypeInferrer};
use crate::nullability::{NullabilityInferrer, OptionalPolicy, PointerPolicy};
use crate::types::InferredType;
use mmc_ast::visitor::Transformer;
use mmc_ast::Expression;
use mmc_core::{Errors, Identifier, NodeId};
use mmc_ir::{Invariant, Symbol, SymbolTable};
use std::collections::HashMap;
use tracing::debug;

/// Per-node side maps of analysed expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvariantAnnotations {
    pub type_map: HashMap<NodeId, InferredType>,
    pub is_optional_map: HashMap<NodeId, bool>,
    pub is_pointer_map: HashMap<NodeId, bool>,
}

impl InvariantAnnotations {
    fn extend(&mut self, other: InvariantAnnotations) {
        self.type_map.extend(other.type_map);
        self.is_optional_map.extend(other.is_optional_map);
        self.is_pointer_map.extend(other.is_pointer_map);
    }
}

/// Infers the types and both nullabilities of the nodes of `expr`.
///
/// The nullability is only inferred if all the types could be.
pub fn annotate_expression<'e>(
    table: &SymbolTable,
    environment: &'e Environment<'e>,
    expr: &Expression,
) -> Result<InvariantAnnotations, Errors> {
    let mut canonicalizer = Canonicalizer::new();
    canonicalizer.transform_expression(expr);
    let representations = canonicalizer.representations;

    let type_map = {
        let mut inferrer = TypeInferrer::new(table, environment, &representations);
        inferrer.transform_expression(expr);
        if !inferrer.errors.is_empty() {
            return Err(inferrer.errors);
        }
        inferrer.type_map
    };

    let mut errors = Vec::new();

    let is_optional_map = {
        let mut inferrer = NullabilityInferrer::new(table, environment, &type_map, OptionalPolicy);
        // The first error is also part of the accumulated ones.
        let _ = inferrer.transform_expression(expr);
        errors.append(&mut inferrer.errors);
        inferrer.nullability
    };

    let is_pointer_map = {
        let policy = PointerPolicy::new(table);
        let mut inferrer = NullabilityInferrer::new(table, environment, &type_map, policy);
        let _ = inferrer.transform_expression(expr);
        errors.append(&mut inferrer.errors);
        inferrer.nullability
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(InvariantAnnotations {
        type_map,
        is_optional_map,
        is_pointer_map,
    })
}

/// Annotates the invariants of all classes and constrained primitives.
///
/// Each invariant is annotated once, for the symbol that declared it, with
/// `self` bound to that symbol. Errors of all invariants are reported
/// together.
pub fn annotate_invariants(table: &SymbolTable) -> Result<InvariantAnnotations, Errors> {
    let base = populate_base_environment(table);
    let this = Identifier::new("self").map_err(|error| vec![error])?;

    let classes = table
        .classes()
        .map(|(id, class)| (Symbol::Class(id), class.invariants.as_slice()));
    let constrained_primitives = table
        .constrained_primitives()
        .map(|(id, primitive)| (Symbol::ConstrainedPrimitive(id), primitive.invariants.as_slice()));

    let mut annotations = InvariantAnnotations::default();
    let mut errors = Vec::new();

    for (symbol, invariants) in classes.chain(constrained_primitives) {
        let mut scope = Environment::child(&base);
        scope.set(this.clone(), InferredType::OurType(symbol));

        for invariant in own(invariants, symbol) {
            match annotate_expression(table, &scope, &invariant.body) {
                Ok(annotated) => annotations.extend(annotated),
                Err(mut failed) => errors.append(&mut failed),
            }
        }
    }

    debug!(
        nodes = annotations.type_map.len(),
        errors = errors.len(),
        "annotated the invariants"
    );

    if errors.is_empty() {
        Ok(annotations)
    } else {
        Err(errors)
    }
}

fn own(invariants: &[Invariant], symbol: Symbol) -> impl Iterator<Item = &Invariant> {
    invariants
        .iter()
        .filter(move |invariant| invariant.specified_for == symbol)
}
