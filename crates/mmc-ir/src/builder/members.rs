//! Properties and methods of classes, own and inherited.

use super::annotations::AnnotationResolver;
use super::names::{check_collisions, Site};
use super::BuildOptions;
use crate::symbol::ClassId;
use crate::types::{Class, Method, Property};
use indexmap::IndexMap;
use mmc_ast::ClassDecl;
use mmc_core::{Error, Errors, Identifier};

/// Resolves the properties declared by the class itself.
pub(super) fn own_properties(
    decl: &ClassDecl,
    id: ClassId,
    resolver: &mut AnnotationResolver<'_, '_>,
    errors: &mut Errors,
) -> IndexMap<Identifier, Property> {
    let mut properties = IndexMap::new();
    for property in &decl.properties {
        if properties.contains_key(&property.name) {
            errors.push(Error::at(
                property.id,
                format!(
                    "The property {} has been declared more than once in the class {}",
                    property.name, decl.name
                ),
            ));
            continue;
        }

        match resolver.resolve(&property.type_annotation) {
            Ok(type_annotation) => {
                properties.insert(
                    property.name.clone(),
                    Property {
                        name: property.name.clone(),
                        type_annotation,
                        specified_for: id,
                        node: property.id,
                    },
                );
            }
            Err(error) => errors.push(error),
        }
    }
    properties
}

/// Resolves the methods declared by the class itself.
pub(super) fn own_methods(
    decl: &ClassDecl,
    id: ClassId,
    resolver: &mut AnnotationResolver<'_, '_>,
    errors: &mut Errors,
) -> IndexMap<Identifier, Method> {
    let mut methods = IndexMap::new();
    for method in &decl.methods {
        if methods.contains_key(&method.name) {
            errors.push(Error::at(
                method.id,
                format!(
                    "The method {} has been declared more than once in the class {}",
                    method.name, decl.name
                ),
            ));
            continue;
        }

        if decl.properties.iter().any(|property| property.name == method.name) {
            errors.push(Error::at(
                method.id,
                format!(
                    "The method {} of the class {} has the same name as a property",
                    method.name, decl.name
                ),
            ));
            continue;
        }

        let owner = format!("the method {}.{}", decl.name, method.name);
        let arguments = resolver.resolve_arguments(&method.arguments, &owner, errors);
        let returns = match method.returns.as_ref().map(|raw| resolver.resolve(raw)) {
            Some(Ok(returns)) => Some(returns),
            Some(Err(error)) => {
                errors.push(error);
                continue;
            }
            None => None,
        };

        methods.insert(
            method.name.clone(),
            Method {
                name: method.name.clone(),
                arguments,
                returns,
                contracts: super::contracts::convert(&method.contracts),
                body: method.body.clone(),
                specified_for: id,
                node: method.id,
            },
        );
    }
    methods
}

/// Prepends the inherited members to the own members of every class.
///
/// `order` lists the classes parents first so that each ancestor is complete
/// when its descendants are processed. Among ancestors the first definition
/// in topological order wins; re-declaring an inherited member is an error.
pub(super) fn inherit(
    classes: &mut [Class],
    order: &[ClassId],
    options: &BuildOptions,
    errors: &mut Errors,
) {
    for &id in order {
        let own_properties = std::mem::take(&mut classes[id.index()].properties);
        let own_methods = std::mem::take(&mut classes[id.index()].methods);

        let class = &classes[id.index()];
        let mut properties: IndexMap<Identifier, Property> = IndexMap::new();
        let mut methods: IndexMap<Identifier, Method> = IndexMap::new();

        for &ancestor in &class.ancestors {
            let ancestor_class = &classes[ancestor.index()];
            for property in ancestor_class.properties.values() {
                if property.specified_for == ancestor {
                    properties
                        .entry(property.name.clone())
                        .or_insert_with(|| property.clone());
                }
            }
            for method in ancestor_class.methods.values() {
                if method.specified_for == ancestor {
                    methods
                        .entry(method.name.clone())
                        .or_insert_with(|| method.clone());
                }
            }
        }

        let inherited = properties.len();

        for (name, property) in own_properties {
            if let Some(previous) = properties.get(&name) {
                errors.push(Error::at(
                    property.node,
                    format!(
                        "The property has already been defined in the ancestor class {}: {name}",
                        classes[previous.specified_for.index()].name
                    ),
                ));
            } else {
                properties.insert(name, property);
            }
        }

        for (name, method) in own_methods {
            if let Some(previous) = methods.get(&name) {
                errors.push(Error::at(
                    method.node,
                    format!(
                        "The method has already been defined in the ancestor class {}: {name}",
                        classes[previous.specified_for.index()].name
                    ),
                ));
            } else {
                methods.insert(name, method);
            }
        }

        let sites: Vec<Site<'_>> = properties
            .values()
            .map(|property| Site {
                name: &property.name,
                node: property.node,
                kind: "property",
            })
            .collect();
        check_collisions(&sites, inherited, options, "property", errors);

        let class = &mut classes[id.index()];
        class.properties = properties;
        class.methods = methods;
    }
}
