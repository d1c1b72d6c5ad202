//! Symbol table builder - turns raw declarations into a validated
//! [`SymbolTable`].
//!
//! The builder runs in passes. Each pass reports every problem it finds, but
//! a pass only runs if the passes it depends on succeeded:
//!
//! 1. names: reserved names, collisions and the enumerations
//! 2. hierarchy: parents, acyclicity and the constrained primitives
//! 3. type annotations of all members and signatures
//! 4. inheritance of members, constructors, invariants and serialization
//!    settings, enumeration supersets, and the calls in invariants and
//!    contracts

mod annotations;
mod constructor;
mod contracts;
mod hierarchy;
mod interfaces;
mod invariants;
mod members;
mod names;
mod serialization;
mod supersets;
mod verification;

use crate::naming::NamingConvention;
use crate::symbol::{ClassId, ConstrainedPrimitiveId, EnumerationId, Symbol, VerificationId};
use crate::table::SymbolTable;
use crate::types::{
    Class, ClassKind, ConstrainedPrimitive, Constructor, Contracts, Enumeration,
    EnumerationLiteral, Invariant, PrimitiveType, Serialization, Verification,
    VerificationFunction,
};
use annotations::AnnotationResolver;
use hierarchy::Hierarchy;
use indexmap::IndexMap;
use mmc_ast::{ClassDecl, EnumerationDecl, MetaModelDecl};
use mmc_core::{Error, Errors};
use names::{Declared, Registry};
use std::collections::HashMap;

/// Options of the symbol table builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Name of the class that models references, required once a property
    /// is annotated with `Ref`.
    pub ref_association: String,
    /// Conventions of the backends; names must not collide in any of them.
    pub naming_conventions: Vec<NamingConvention>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ref_association: "Reference".to_string(),
            naming_conventions: NamingConvention::ALL.to_vec(),
        }
    }
}

/// Identities handed out to the declarations, in declaration order.
struct Allocation<'a> {
    symbols: IndexMap<&'a str, Symbol>,
    classes: Vec<&'a ClassDecl>,
    constrained_primitives: Vec<(&'a ClassDecl, PrimitiveType)>,
    enumerations: Vec<&'a EnumerationDecl>,
}

impl<'a> Allocation<'a> {
    fn new(registry: &Registry<'a>, hierarchy: &Hierarchy<'a>) -> Self {
        let mut allocation = Self {
            symbols: IndexMap::new(),
            classes: Vec::new(),
            constrained_primitives: Vec::new(),
            enumerations: Vec::new(),
        };

        for (&name, declared) in &registry.symbols {
            let symbol = match *declared {
                Declared::Class(decl) => match hierarchy.constrainee(name) {
                    Some(constrainee) => {
                        let id = ConstrainedPrimitiveId::new(
                            allocation.constrained_primitives.len() as u32,
                        );
                        allocation.constrained_primitives.push((decl, constrainee));
                        Symbol::ConstrainedPrimitive(id)
                    }
                    None => {
                        let id = ClassId::new(allocation.classes.len() as u32);
                        allocation.classes.push(decl);
                        Symbol::Class(id)
                    }
                },
                Declared::Enumeration(decl) => {
                    let id = EnumerationId::new(allocation.enumerations.len() as u32);
                    allocation.enumerations.push(decl);
                    Symbol::Enumeration(id)
                }
            };
            allocation.symbols.insert(name, symbol);
        }

        allocation
    }

    fn class_id(&self, name: &str) -> Option<ClassId> {
        self.symbols.get(name).copied().and_then(Symbol::as_class)
    }

    fn constrained_primitive_id(&self, name: &str) -> Option<ConstrainedPrimitiveId> {
        match self.symbols.get(name) {
            Some(Symbol::ConstrainedPrimitive(id)) => Some(*id),
            _ => None,
        }
    }

    fn class_ids(&self, decls: &[&ClassDecl]) -> Vec<ClassId> {
        decls
            .iter()
            .filter_map(|decl| self.class_id(decl.name.as_str()))
            .collect()
    }

    fn constrained_primitive_ids(&self, decls: &[&ClassDecl]) -> Vec<ConstrainedPrimitiveId> {
        decls
            .iter()
            .filter_map(|decl| self.constrained_primitive_id(decl.name.as_str()))
            .collect()
    }
}

/// Builds the symbol table of `meta_model`.
///
/// # Errors
/// Returns all the errors of the first pass that failed.
pub fn build(meta_model: &MetaModelDecl, options: &BuildOptions) -> Result<SymbolTable, Errors> {
    let registry = names::register(meta_model, options)?;
    let hierarchy = hierarchy::resolve(&registry)?;
    let allocation = Allocation::new(&registry, &hierarchy);

    let class_order: Vec<ClassId> = allocation.class_ids(&hierarchy.order);

    let mut errors = Errors::new();
    let mut resolver = AnnotationResolver::new(&allocation.symbols);

    let mut classes: Vec<Class> = Vec::with_capacity(allocation.classes.len());
    for (i, &decl) in allocation.classes.iter().enumerate() {
        let class = skeleton(
            decl,
            ClassId::new(i as u32),
            &allocation,
            &hierarchy,
            &mut resolver,
            &mut errors,
        );
        classes.push(class);
    }

    let mut verification_functions = Vec::with_capacity(meta_model.verification_functions.len());
    for (i, function) in meta_model.verification_functions.iter().enumerate() {
        let owner = format!("the verification function {}", function.name);
        let arguments = resolver.resolve_arguments(&function.arguments, &owner, &mut errors);
        let returns = match function.returns.as_ref().map(|raw| resolver.resolve(raw)) {
            Some(Ok(returns)) => Some(returns),
            Some(Err(error)) => {
                errors.push(error);
                None
            }
            None => None,
        };
        let verification = verification::classify(function).unwrap_or_else(|error| {
            errors.push(error);
            Verification::ImplementationSpecific
        });

        verification_functions.push(VerificationFunction {
            id: VerificationId::new(i as u32),
            name: function.name.clone(),
            arguments,
            returns,
            contracts: contracts::convert(&function.contracts),
            body: function.body.clone(),
            verification,
            node: function.id,
        });
    }

    if !resolver.ref_sites.is_empty()
        && !matches!(
            allocation.symbols.get(options.ref_association.as_str()),
            Some(Symbol::Class(_))
        )
    {
        for &site in &resolver.ref_sites {
            errors.push(Error::at(
                site,
                format!(
                    "References are modeled with the class {}, but it is not defined",
                    options.ref_association
                ),
            ));
        }
    }

    tracing::debug!(
        classes = classes.len(),
        verification_functions = verification_functions.len(),
        errors = errors.len(),
        "resolved type annotations"
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    members::inherit(&mut classes, &class_order, options, &mut errors);
    constructor::resolve(&mut classes, &class_order, &allocation, &mut errors);
    serialization::resolve(&mut classes, &class_order, &allocation);
    serialization::check_model_types(&classes, &mut errors);
    let supersets = supersets::resolve(&allocation, &mut errors);

    let own: Vec<Vec<Invariant>> = classes
        .iter_mut()
        .map(|class| std::mem::take(&mut class.invariants))
        .collect();
    for (i, class) in classes.iter_mut().enumerate() {
        class.invariants = invariants::stack(
            class.ancestors.iter().map(|ancestor| own[ancestor.index()].as_slice()),
            &own[i],
        );
    }

    let constrained_primitives = constrained_primitives(&allocation, &hierarchy);

    {
        let arities: HashMap<&str, usize> = meta_model
            .verification_functions
            .iter()
            .map(|function| (function.name.as_str(), function.arguments.len()))
            .collect();
        let mut checker = invariants::CallChecker::new(arities, &mut errors);
        let declarers = allocation
            .classes
            .iter()
            .copied()
            .chain(allocation.constrained_primitives.iter().map(|(decl, _)| *decl));
        for decl in declarers {
            for invariant in &decl.invariants {
                checker.check(&invariant.body);
            }
        }

        for decl in &allocation.classes {
            for method in &decl.methods {
                contracts::bodies(&method.contracts).for_each(|body| checker.check(body));
            }
            if let Some(constructor) = &decl.constructor {
                contracts::bodies(&constructor.contracts).for_each(|body| checker.check(body));
            }
        }
        for function in &meta_model.verification_functions {
            contracts::bodies(&function.contracts).for_each(|body| checker.check(body));
        }
    }

    for decl in &allocation.classes {
        for method in &decl.methods {
            contracts::check_arguments(
                &method.contracts,
                &method.arguments,
                &format!("the method {}.{}", decl.name, method.name),
                &mut errors,
            );
        }
        if let Some(constructor) = &decl.constructor {
            contracts::check_arguments(
                &constructor.contracts,
                &constructor.arguments,
                &format!("the constructor of the class {}", decl.name),
                &mut errors,
            );
        }
    }
    for function in &meta_model.verification_functions {
        contracts::check_arguments(
            &function.contracts,
            &function.arguments,
            &format!("the verification function {}", function.name),
            &mut errors,
        );
    }

    interfaces::attach(&mut classes);

    tracing::debug!(errors = errors.len(), "resolved members, constructors and invariants");

    if !errors.is_empty() {
        return Err(errors);
    }

    let enumerations = allocation
        .enumerations
        .iter()
        .zip(supersets)
        .map(|(decl, is_superset_of)| Enumeration {
            name: decl.name.clone(),
            literals: decl
                .literals
                .iter()
                .map(|literal| EnumerationLiteral {
                    name: literal.name.clone(),
                    value: literal.value.clone(),
                    node: literal.id,
                })
                .collect(),
            is_superset_of,
            node: decl.id,
        })
        .collect();

    let concrete_classes = class_order
        .iter()
        .copied()
        .filter(|id| !classes[id.index()].is_abstract())
        .collect();

    let symbols = meta_model
        .symbols
        .iter()
        .filter_map(|symbol| {
            allocation
                .symbols
                .get(symbol.name().as_str())
                .map(|id| (symbol.name().clone(), *id))
        })
        .collect();

    let ref_association = allocation
        .symbols
        .get(options.ref_association.as_str())
        .copied();

    tracing::debug!(
        classes = classes.len(),
        enumerations = allocation.enumerations.len(),
        constrained_primitives = constrained_primitives.len(),
        "built the symbol table"
    );

    Ok(SymbolTable {
        symbols,
        classes,
        enumerations,
        constrained_primitives,
        verification_functions,
        concrete_classes,
        ref_association,
    })
}

/// A class with its own members resolved; inheritance comes later.
fn skeleton(
    decl: &ClassDecl,
    id: ClassId,
    allocation: &Allocation<'_>,
    hierarchy: &Hierarchy<'_>,
    resolver: &mut AnnotationResolver<'_, '_>,
    errors: &mut Errors,
) -> Class {
    let name = decl.name.as_str();
    let descendants = allocation.class_ids(hierarchy.descendants(name));
    let concrete_descendants = descendants
        .iter()
        .copied()
        .filter(|descendant| !allocation.classes[descendant.index()].is_abstract)
        .collect();

    let ancestors = allocation.class_ids(hierarchy.ancestors(name));

    let mut constructor = match &decl.constructor {
        Some(constructor) => Constructor {
            arguments: resolver.resolve_arguments(
                &constructor.arguments,
                &format!("the constructor of the class {name}"),
                errors,
            ),
            contracts: Contracts::default(),
            statements: Vec::new(),
            node: Some(constructor.id),
        },
        None => Constructor::default(),
    };

    // The contracts of the ancestor constructors hold for this one as well.
    let stacked = ancestors
        .iter()
        .map(|ancestor| allocation.classes[ancestor.index()])
        .chain(std::iter::once(decl))
        .filter_map(|decl| decl.constructor.as_ref());
    for declared in stacked {
        constructor
            .contracts
            .extend(contracts::convert(&declared.contracts));
    }

    Class {
        name: decl.name.clone(),
        kind: if decl.is_abstract {
            ClassKind::Abstract
        } else {
            ClassKind::Concrete
        },
        node: decl.id,
        inheritances: hierarchy::class_parents(decl)
            .filter_map(|parent| allocation.class_id(parent))
            .collect(),
        ancestors,
        descendants,
        concrete_descendants,
        interface: None,
        properties: members::own_properties(decl, id, resolver, errors),
        methods: members::own_methods(decl, id, resolver, errors),
        constructor,
        invariants: invariants::own(&decl.invariants, Symbol::Class(id)),
        serialization: Serialization::default(),
    }
}

fn constrained_primitives(
    allocation: &Allocation<'_>,
    hierarchy: &Hierarchy<'_>,
) -> Vec<ConstrainedPrimitive> {
    let own: Vec<Vec<Invariant>> = allocation
        .constrained_primitives
        .iter()
        .enumerate()
        .map(|(i, (decl, _))| {
            let id = ConstrainedPrimitiveId::new(i as u32);
            invariants::own(&decl.invariants, Symbol::ConstrainedPrimitive(id))
        })
        .collect();

    allocation
        .constrained_primitives
        .iter()
        .enumerate()
        .map(|(i, &(decl, constrainee))| {
            let name = decl.name.as_str();
            let ancestors = allocation.constrained_primitive_ids(hierarchy.ancestors(name));
            ConstrainedPrimitive {
                name: decl.name.clone(),
                constrainee,
                inheritances: decl
                    .inheritances
                    .iter()
                    .filter_map(|parent| allocation.constrained_primitive_id(parent.as_str()))
                    .collect(),
                descendants: allocation.constrained_primitive_ids(hierarchy.descendants(name)),
                invariants: invariants::stack(
                    ancestors.iter().map(|ancestor| own[ancestor.index()].as_slice()),
                    &own[i],
                ),
                node: decl.id,
            }
        })
        .collect()
}
