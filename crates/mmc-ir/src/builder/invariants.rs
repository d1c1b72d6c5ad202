//! Invariants of classes and constrained primitives.

use crate::symbol::Symbol;
use crate::types::Invariant;
use mmc_ast::visitor::walk_function_call;
use mmc_ast::{Expression, FunctionCall, InvariantDecl, Visitor};
use mmc_core::{Error, Errors};
use std::collections::HashMap;

/// Converts the declared invariants, tagging each with its declarer.
pub(super) fn own(decls: &[InvariantDecl], specified_for: Symbol) -> Vec<Invariant> {
    decls
        .iter()
        .map(|decl| Invariant {
            description: decl.description.clone(),
            body: decl.body.clone(),
            specified_for,
            node: decl.id,
        })
        .collect()
}

/// The invariants of the ancestors in the given order, then the own ones.
pub(super) fn stack<'a>(
    ancestors: impl IntoIterator<Item = &'a [Invariant]>,
    own: &'a [Invariant],
) -> Vec<Invariant> {
    ancestors
        .into_iter()
        .flatten()
        .chain(own)
        .cloned()
        .collect()
}

/// Checks that invariants only call the functions backends know how to
/// transpile: the verification functions and `len`.
pub(super) struct CallChecker<'a> {
    arities: HashMap<&'a str, usize>,
    errors: &'a mut Errors,
}

impl<'a> CallChecker<'a> {
    pub fn new(arities: HashMap<&'a str, usize>, errors: &'a mut Errors) -> Self {
        Self { arities, errors }
    }

    pub fn check(&mut self, body: &Expression) {
        self.visit_expression(body);
    }
}

impl Visitor for CallChecker<'_> {
    fn visit_function_call(&mut self, node: &FunctionCall) {
        let name = node.name.identifier.as_str();
        let expected = if name == "len" {
            Some(1)
        } else {
            self.arities.get(name).copied()
        };

        match expected {
            None => self.errors.push(Error::at(
                node.id,
                format!("The handling of the function is not implemented: {name}"),
            )),
            Some(expected) if expected != node.args.len() => self.errors.push(Error::at(
                node.id,
                format!(
                    "The function {name} expects {expected} argument(s), but got {}",
                    node.args.len()
                ),
            )),
            Some(_) => {}
        }

        walk_function_call(self, node);
    }
}
