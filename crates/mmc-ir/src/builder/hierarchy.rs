//! Inheritance resolution: parent checks, topological order, ancestors,
//! descendants and the classification of constrained primitives.

use super::names::{Declared, Registry};
use crate::types::PrimitiveType;
use mmc_ast::ClassDecl;
use mmc_core::{Error, Errors};
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub(super) struct Hierarchy<'a> {
    /// Class declarations in topological order, parents before children.
    pub order: Vec<&'a ClassDecl>,
    ancestors: HashMap<&'a str, Vec<&'a ClassDecl>>,
    descendants: HashMap<&'a str, Vec<&'a ClassDecl>>,
    constrainees: HashMap<&'a str, PrimitiveType>,
}

impl<'a> Hierarchy<'a> {
    /// Ancestors of `name` in topological order
    pub fn ancestors(&self, name: &str) -> &[&'a ClassDecl] {
        self.ancestors.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Descendants of `name` in topological order
    pub fn descendants(&self, name: &str) -> &[&'a ClassDecl] {
        self.descendants.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The primitive `name` narrows, if it is a constrained primitive
    pub fn constrainee(&self, name: &str) -> Option<PrimitiveType> {
        self.constrainees.get(name).copied()
    }
}

/// The parents of `decl` which are classes, not primitive types.
pub(super) fn class_parents(decl: &ClassDecl) -> impl Iterator<Item = &str> {
    decl.inheritances
        .iter()
        .map(|parent| parent.as_str())
        .filter(|parent| PrimitiveType::from_name(parent).is_none())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Temporary,
    Permanent,
}

struct Sorter<'r, 'a> {
    registry: &'r Registry<'a>,
    marks: HashMap<&'a str, Mark>,
    stack: Vec<&'a ClassDecl>,
    order: Vec<&'a ClassDecl>,
}

impl<'a> Sorter<'_, 'a> {
    fn visit(&mut self, decl: &'a ClassDecl) -> Result<(), Error> {
        match self.marks.get(decl.name.as_str()) {
            Some(Mark::Permanent) => return Ok(()),
            Some(Mark::Temporary) => return Err(self.cycle(decl)),
            None => {}
        }

        self.marks.insert(decl.name.as_str(), Mark::Temporary);
        self.stack.push(decl);

        for parent in class_parents(decl) {
            if let Some(parent) = self.registry.class(parent) {
                self.visit(parent)?;
            }
        }

        self.stack.pop();
        self.marks.insert(decl.name.as_str(), Mark::Permanent);
        self.order.push(decl);
        Ok(())
    }

    fn cycle(&self, closing: &'a ClassDecl) -> Error {
        let start = self
            .stack
            .iter()
            .position(|decl| decl.name == closing.name)
            .unwrap_or(0);
        let path: Vec<&str> = self.stack[start..]
            .iter()
            .map(|decl| decl.name.as_str())
            .chain(std::iter::once(closing.name.as_str()))
            .collect();
        Error::at(
            closing.id,
            format!(
                "Expected no cycles in the inheritance, but found: {}",
                path.join(" -> ")
            ),
        )
    }
}

/// Resolves the inheritance of all classes.
///
/// Unknown parents are reported all together; a cycle stops the resolution
/// since nothing after it can be ordered.
pub(super) fn resolve<'a>(registry: &Registry<'a>) -> Result<Hierarchy<'a>, Errors> {
    let classes: Vec<&'a ClassDecl> = registry
        .symbols
        .values()
        .filter_map(|declared| match declared {
            Declared::Class(decl) => Some(*decl),
            Declared::Enumeration(_) => None,
        })
        .collect();

    check_parents(registry, &classes)?;

    let mut sorter = Sorter {
        registry,
        marks: HashMap::new(),
        stack: Vec::new(),
        order: Vec::new(),
    };
    for &decl in &classes {
        sorter.visit(decl).map_err(|error| vec![error])?;
    }
    let order = sorter.order;

    let rank: HashMap<&'a str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, decl)| (decl.name.as_str(), i))
        .collect();

    let mut ancestors: HashMap<&'a str, Vec<&'a ClassDecl>> = HashMap::new();
    for &decl in &order {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut own: Vec<&'a ClassDecl> = Vec::new();
        for parent in class_parents(decl) {
            let Some(parent_decl) = registry.class(parent) else {
                continue;
            };
            let inherited = ancestors.get(parent).cloned().unwrap_or_default();
            for ancestor in inherited.into_iter().chain(std::iter::once(parent_decl)) {
                if seen.insert(ancestor.name.as_str()) {
                    own.push(ancestor);
                }
            }
        }
        own.sort_by_key(|ancestor| rank[ancestor.name.as_str()]);
        ancestors.insert(decl.name.as_str(), own);
    }

    let mut descendants: HashMap<&'a str, Vec<&'a ClassDecl>> = HashMap::new();
    for &decl in &order {
        for &ancestor in &ancestors[decl.name.as_str()] {
            descendants
                .entry(ancestor.name.as_str())
                .or_default()
                .push(decl);
        }
    }

    let constrainees = classify_constrained_primitives(registry, &order)?;

    tracing::debug!(
        classes = order.len(),
        constrained_primitives = constrainees.len(),
        "resolved inheritance"
    );

    Ok(Hierarchy {
        order,
        ancestors,
        descendants,
        constrainees,
    })
}

fn check_parents(registry: &Registry<'_>, classes: &[&ClassDecl]) -> Result<(), Errors> {
    let mut errors = Errors::new();

    for decl in classes {
        let mut seen = HashSet::new();
        for parent in &decl.inheritances {
            if !seen.insert(parent.as_str()) {
                errors.push(Error::at(
                    decl.id,
                    format!("The class {} inherits from {parent} more than once", decl.name),
                ));
                continue;
            }

            if PrimitiveType::from_name(parent.as_str()).is_some() {
                continue;
            }

            match registry.symbols.get(parent.as_str()) {
                Some(Declared::Class(_)) => {}
                Some(Declared::Enumeration(_)) => errors.push(Error::at(
                    decl.id,
                    format!(
                        "The class {} can not inherit from the enumeration {parent}",
                        decl.name
                    ),
                )),
                None => errors.push(Error::at(
                    decl.id,
                    format!(
                        "The parent {parent} of the class {} is not defined",
                        decl.name
                    ),
                )),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A class is a constrained primitive if it inherits from a primitive type,
/// directly or through another constrained primitive.
fn classify_constrained_primitives<'a>(
    registry: &Registry<'a>,
    order: &[&'a ClassDecl],
) -> Result<HashMap<&'a str, PrimitiveType>, Errors> {
    let mut errors = Errors::new();
    let mut constrainees: HashMap<&'a str, PrimitiveType> = HashMap::new();

    for &decl in order {
        let mut primitives: Vec<PrimitiveType> = decl
            .inheritances
            .iter()
            .filter_map(|parent| PrimitiveType::from_name(parent.as_str()))
            .collect();
        let mut plain_parents = Vec::new();
        for parent in class_parents(decl) {
            match constrainees.get(parent) {
                Some(primitive) => primitives.push(*primitive),
                None => plain_parents.push(parent),
            }
        }

        let Some(&constrainee) = primitives.first() else {
            continue;
        };

        if primitives.iter().any(|primitive| *primitive != constrainee) {
            let names: Vec<&str> = primitives.iter().map(|p| p.name()).collect();
            errors.push(Error::at(
                decl.id,
                format!(
                    "The constrained primitive {} narrows more than one primitive type: {}",
                    decl.name,
                    names.join(", ")
                ),
            ));
            continue;
        }

        for parent in &plain_parents {
            if registry.class(parent).is_some() {
                errors.push(Error::at(
                    decl.id,
                    format!(
                        "The constrained primitive {} can not inherit from the class {parent}",
                        decl.name
                    ),
                ));
            }
        }

        if !decl.properties.is_empty() || !decl.methods.is_empty() || decl.constructor.is_some()
        {
            errors.push(Error::at(
                decl.id,
                format!(
                    "The constrained primitive {} can only declare invariants",
                    decl.name
                ),
            ));
        }

        if let Some(serialization) = &decl.serialization {
            errors.push(Error::at(
                serialization.id,
                format!(
                    "The constrained primitive {} is serialized as its primitive type, \
                     so it can not specify serialization settings",
                    decl.name
                ),
            ));
        }

        constrainees.insert(decl.name.as_str(), constrainee);
    }

    if errors.is_empty() {
        Ok(constrainees)
    } else {
        Err(errors)
    }
}
