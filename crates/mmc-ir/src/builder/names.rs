//! Name registration and collision checks.

use super::BuildOptions;
use indexmap::IndexMap;
use mmc_ast::{ClassDecl, EnumerationDecl, MetaModelDecl, SymbolDecl};
use mmc_core::{Error, Errors, Identifier, NodeId};
use std::collections::{HashMap, HashSet};

/// Names that can not be declared since type annotations and invariants
/// already give them a meaning.
const RESERVED: &[&str] = &[
    "bool", "int", "float", "str", "bytearray", "List", "Optional", "Ref", "len", "match",
    "self",
];

#[derive(Debug, Clone, Copy)]
pub(super) enum Declared<'a> {
    Class(&'a ClassDecl),
    Enumeration(&'a EnumerationDecl),
}

/// All top-level symbol declarations by name, in declaration order.
#[derive(Debug)]
pub(super) struct Registry<'a> {
    pub symbols: IndexMap<&'a str, Declared<'a>>,
}

impl<'a> Registry<'a> {
    pub fn class(&self, name: &str) -> Option<&'a ClassDecl> {
        match self.symbols.get(name) {
            Some(Declared::Class(decl)) => Some(*decl),
            _ => None,
        }
    }
}

/// A named declaration site.
#[derive(Debug, Clone, Copy)]
pub(super) struct Site<'a> {
    pub name: &'a Identifier,
    pub node: NodeId,
    pub kind: &'static str,
}

/// Reports two declarations whose names collide. The error points at both
/// sites.
pub(super) fn collision(first: Site<'_>, second: Site<'_>, message: String) -> Error {
    Error::with_underlying(
        None,
        message,
        vec![
            Error::at(
                first.node,
                format!("The {} {} is declared here", first.kind, first.name),
            ),
            Error::at(
                second.node,
                format!("The {} {} is declared here", second.kind, second.name),
            ),
        ],
    )
}

/// Reports every pair of `sites` whose names are equal or become equal in
/// one of the naming conventions.
///
/// A pair is reported once, even if it collides in several conventions.
/// Pairs that lie entirely before `fresh_from` are assumed to be reported
/// elsewhere and are skipped.
pub(super) fn check_collisions(
    sites: &[Site<'_>],
    fresh_from: usize,
    options: &BuildOptions,
    what: &str,
    errors: &mut Errors,
) {
    let mut reported: HashSet<(usize, usize)> = HashSet::new();

    let mut first_by_name: HashMap<&str, usize> = HashMap::new();
    for (i, site) in sites.iter().enumerate() {
        if let Some(&first) = first_by_name.get(site.name.as_str()) {
            reported.insert((first, i));
            if i < fresh_from {
                continue;
            }
            errors.push(collision(
                sites[first],
                *site,
                format!("The {what} name {} has been declared more than once", site.name),
            ));
        } else {
            first_by_name.insert(site.name.as_str(), i);
        }
    }

    for convention in &options.naming_conventions {
        let mut first_by_projection: HashMap<String, usize> = HashMap::new();
        for (i, site) in sites.iter().enumerate() {
            let projected = convention.project(site.name.as_str());
            match first_by_projection.get(&projected) {
                Some(&first) => {
                    if i >= fresh_from && reported.insert((first, i)) {
                        errors.push(collision(
                            sites[first],
                            *site,
                            format!(
                                "The {what} names {} and {} both map to {projected} \
                                 in {convention}",
                                sites[first].name, site.name
                            ),
                        ));
                    }
                }
                None => {
                    first_by_projection.insert(projected, i);
                }
            }
        }
    }
}

/// Registers every top-level name and checks the enumerations.
///
/// All problems found are reported together.
pub(super) fn register<'a>(
    meta_model: &'a MetaModelDecl,
    options: &BuildOptions,
) -> Result<Registry<'a>, Errors> {
    let mut errors = Errors::new();
    let mut symbols = IndexMap::new();
    let mut sites = Vec::new();

    for symbol in &meta_model.symbols {
        let (declared, kind) = match symbol {
            SymbolDecl::Class(decl) => (Declared::Class(decl), "class"),
            SymbolDecl::Enumeration(decl) => (Declared::Enumeration(decl), "enumeration"),
        };
        sites.push(Site {
            name: symbol.name(),
            node: symbol.id(),
            kind,
        });
        symbols.entry(symbol.name().as_str()).or_insert(declared);
    }

    for function in &meta_model.verification_functions {
        sites.push(Site {
            name: &function.name,
            node: function.id,
            kind: "verification function",
        });
    }

    for site in &sites {
        if RESERVED.contains(&site.name.as_str()) {
            errors.push(Error::at(
                site.node,
                format!("The name {} of the {} is reserved", site.name, site.kind),
            ));
        }
    }

    check_collisions(&sites, 0, options, "symbol", &mut errors);

    for symbol in &meta_model.symbols {
        if let SymbolDecl::Enumeration(decl) = symbol {
            check_enumeration(decl, &mut errors);
        }
    }

    tracing::debug!(
        symbols = symbols.len(),
        errors = errors.len(),
        "registered names"
    );

    if errors.is_empty() {
        Ok(Registry { symbols })
    } else {
        Err(errors)
    }
}

fn check_enumeration(decl: &EnumerationDecl, errors: &mut Errors) {
    if decl.literals.is_empty() {
        errors.push(Error::at(
            decl.id,
            format!("The enumeration {} has no literals", decl.name),
        ));
        return;
    }

    let mut names: HashMap<&str, NodeId> = HashMap::new();
    let mut values: HashMap<&str, &Identifier> = HashMap::new();
    for literal in &decl.literals {
        if names.insert(literal.name.as_str(), literal.id).is_some() {
            errors.push(Error::at(
                literal.id,
                format!(
                    "The literal {} has been declared more than once in the enumeration {}",
                    literal.name, decl.name
                ),
            ));
        }

        if let Some(previous) = values.insert(literal.value.as_str(), &literal.name) {
            errors.push(Error::at(
                literal.id,
                format!(
                    "The value {:?} of the literal {} has already been used by the literal \
                     {} in the enumeration {}",
                    literal.value, literal.name, previous, decl.name
                ),
            ));
        }
    }
}
