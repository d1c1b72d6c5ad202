//! Constructor resolution.
//!
//! Calls to ancestor constructors are in-lined so that every class ends up
//! with a flat list of argument-to-property assignments. Classes are
//! processed parents first, hence the constructor of an ancestor is already
//! flat when it is in-lined.

use super::Allocation;
use crate::symbol::{ClassId, Symbol};
use crate::types::{AssignArgument, Class, DefaultValue, Property, TypeAnnotation};
use mmc_ast::{ClassDecl, ConstructorDecl, ConstructorStatementDecl, ConstructorValue, DefaultDecl};
use mmc_core::{Error, Errors, NodeId};
use std::collections::HashSet;

pub(super) fn resolve(
    classes: &mut [Class],
    order: &[ClassId],
    allocation: &Allocation<'_>,
    errors: &mut Errors,
) {
    for &id in order {
        let decl = allocation.classes[id.index()];
        let statements = match &decl.constructor {
            Some(constructor) => inline(constructor, id, classes, allocation, errors),
            None => {
                check_parent_constructors(decl, &classes[id.index()], classes, errors);
                Vec::new()
            }
        };

        let class = &classes[id.index()];
        if !class.is_abstract() {
            check_initialization(class, &statements, errors);
        }

        classes[id.index()].constructor.statements = statements;
    }
}

fn inline(
    constructor: &ConstructorDecl,
    id: ClassId,
    classes: &[Class],
    allocation: &Allocation<'_>,
    errors: &mut Errors,
) -> Vec<AssignArgument> {
    let class = &classes[id.index()];
    let mut statements = Vec::new();
    let mut consumed: HashSet<&str> = HashSet::new();

    for statement in &constructor.body {
        match statement {
            ConstructorStatementDecl::CallSuper { id: node, super_name } => {
                let Some(ancestor) = allocation
                    .class_id(super_name.as_str())
                    .filter(|ancestor| class.ancestors.contains(ancestor))
                else {
                    errors.push(Error::at(
                        *node,
                        format!(
                            "The constructor of the class {} calls the constructor of {super_name}, \
                             but {super_name} is not an ancestor of {}",
                            class.name, class.name
                        ),
                    ));
                    continue;
                };

                let ancestor_constructor = &classes[ancestor.index()].constructor;
                let mut forwarded = true;
                for argument in &ancestor_constructor.arguments {
                    match class.constructor.argument(argument.name.as_str()) {
                        None => {
                            forwarded = false;
                            errors.push(Error::at(
                                *node,
                                format!(
                                    "The constructor of {super_name} expects the argument {}, \
                                     but it is not an argument of the constructor of the class {}",
                                    argument.name, class.name
                                ),
                            ));
                        }
                        Some(own) if own.type_annotation != argument.type_annotation => {
                            forwarded = false;
                            errors.push(Error::at(
                                own.node,
                                format!(
                                    "The argument {} of the constructor of the class {} does \
                                     not have the same type as in the constructor of {super_name}",
                                    argument.name, class.name
                                ),
                            ));
                        }
                        Some(_) => {}
                    }
                }

                consumed.extend(
                    ancestor_constructor
                        .arguments
                        .iter()
                        .map(|argument| argument.name.as_str()),
                );
                if forwarded {
                    statements.extend(ancestor_constructor.statements.iter().cloned());
                }
            }
            ConstructorStatementDecl::Assign {
                id: node,
                property,
                value,
            } => {
                let Some(target) = class.property(property.as_str()) else {
                    errors.push(Error::at(
                        *node,
                        format!(
                            "The property {property} assigned in the constructor of the class {} \
                             is not defined",
                            class.name
                        ),
                    ));
                    continue;
                };

                let (argument, default) = match value {
                    ConstructorValue::Argument(argument) => (argument, None),
                    ConstructorValue::ArgumentOrDefault { argument, default } => {
                        (argument, Some(default))
                    }
                };

                let Some(source) = class.constructor.argument(argument.as_str()) else {
                    errors.push(Error::at(
                        *node,
                        format!(
                            "The constructor of the class {} assigns {argument} to the property \
                             {property}, but {argument} is not an argument of the constructor",
                            class.name
                        ),
                    ));
                    continue;
                };
                consumed.insert(source.name.as_str());

                if argument != property {
                    errors.push(Error::at(
                        *node,
                        format!(
                            "Expected the property {property} to be assigned exactly the \
                             argument with the same name, but got: {argument}"
                        ),
                    ));
                    continue;
                }

                // A default covers the absent value, so only the value types must agree.
                let matches = if default.is_some() {
                    source.type_annotation.beneath_optional()
                        == target.type_annotation.beneath_optional()
                } else {
                    source.type_annotation == target.type_annotation
                };
                if !matches {
                    errors.push(Error::at(
                        source.node,
                        format!(
                            "The argument {argument} of the constructor of the class {} does \
                             not have the same type as the property {property}",
                            class.name
                        ),
                    ));
                    continue;
                }

                let default = match default {
                    Some(default) => match resolve_default(default, target, *node, allocation) {
                        Ok(default) => Some(default),
                        Err(error) => {
                            errors.push(error);
                            continue;
                        }
                    },
                    None => None,
                };

                statements.push(AssignArgument {
                    property: property.clone(),
                    argument: argument.clone(),
                    default,
                    node: *node,
                });
            }
        }
    }

    for argument in &class.constructor.arguments {
        if !consumed.contains(argument.name.as_str()) {
            errors.push(Error::at(
                argument.node,
                format!(
                    "The argument {} of the constructor of the class {} is neither assigned \
                     to a property nor passed to a super constructor",
                    argument.name, class.name
                ),
            ));
        }
    }

    statements
}

fn resolve_default(
    default: &DefaultDecl,
    property: &Property,
    node: NodeId,
    allocation: &Allocation<'_>,
) -> Result<DefaultValue, Error> {
    match default {
        DefaultDecl::EmptyList => {
            if matches!(
                property.type_annotation.beneath_optional(),
                TypeAnnotation::List(_)
            ) {
                Ok(DefaultValue::EmptyList)
            } else {
                Err(Error::at(
                    node,
                    format!(
                        "The default value of the property {} is an empty list, but the \
                         property is not a list",
                        property.name
                    ),
                ))
            }
        }
        DefaultDecl::EnumLiteral {
            enumeration,
            literal,
        } => {
            let Some(Symbol::Enumeration(enumeration_id)) =
                allocation.symbols.get(enumeration.as_str()).copied()
            else {
                return Err(Error::at(
                    node,
                    format!(
                        "The default value {enumeration}.{literal} of the property {} does not \
                         refer to an enumeration",
                        property.name
                    ),
                ));
            };

            let decl = allocation.enumerations[enumeration_id.index()];
            if !decl.literals.iter().any(|candidate| candidate.name == *literal) {
                return Err(Error::at(
                    node,
                    format!("The enumeration {enumeration} has no literal {literal}"),
                ));
            }

            Ok(DefaultValue::EnumLiteral {
                enumeration: enumeration_id,
                literal: literal.clone(),
            })
        }
        DefaultDecl::Constant(value) => Ok(DefaultValue::Constant(value.clone())),
    }
}

/// A class without a constructor can only be instantiated if none of its
/// parents expects constructor arguments.
fn check_parent_constructors(
    decl: &ClassDecl,
    class: &Class,
    classes: &[Class],
    errors: &mut Errors,
) {
    for &parent in &class.inheritances {
        let parent_class = &classes[parent.index()];
        if !parent_class.constructor.arguments.is_empty() {
            errors.push(Error::at(
                decl.id,
                format!(
                    "The class {} does not define a constructor, but its parent {} has a \
                     constructor with arguments",
                    class.name, parent_class.name
                ),
            ));
        }
    }
}

fn check_initialization(class: &Class, statements: &[AssignArgument], errors: &mut Errors) {
    for property in class.properties.values() {
        if property.type_annotation.is_optional() {
            continue;
        }
        if !statements
            .iter()
            .any(|statement| statement.property == property.name)
        {
            errors.push(Error::at(
                class.node,
                format!(
                    "The property {} is not properly initialized in the constructor of the \
                     class {}",
                    property.name, class.name
                ),
            ));
        }
    }
}
