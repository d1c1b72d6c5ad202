//! Serialization settings of classes.

use super::Allocation;
use crate::symbol::{ClassId, Symbol};
use crate::types::{Class, Serialization, TypeAnnotation};
use mmc_core::{Error, Errors};
use std::collections::HashSet;

/// Stacks `with_model_type` through the hierarchy: a class serializes its
/// model type if it or any of its ancestors says so.
pub(super) fn resolve(classes: &mut [Class], order: &[ClassId], allocation: &Allocation<'_>) {
    for &id in order {
        let own = allocation.classes[id.index()]
            .serialization
            .as_ref()
            .is_some_and(|serialization| serialization.with_model_type);
        let inherited = classes[id.index()]
            .inheritances
            .iter()
            .any(|parent| classes[parent.index()].serialization.with_model_type);

        classes[id.index()].serialization = Serialization {
            with_model_type: own || inherited,
        };
    }
}

/// A property of a class with concrete descendants may hold any of them, so
/// the de-serialization needs to discriminate on the model type.
pub(super) fn check_model_types(classes: &[Class], errors: &mut Errors) {
    let mut in_properties = HashSet::new();
    for class in classes {
        for property in class.properties.values() {
            collect_classes(&property.type_annotation, &mut in_properties);
        }
    }

    for (i, class) in classes.iter().enumerate() {
        if !in_properties.contains(&ClassId::new(i as u32))
            || class.concrete_descendants.is_empty()
        {
            continue;
        }

        if !class.serialization.with_model_type {
            let descendants = class
                .concrete_descendants
                .iter()
                .map(|descendant| classes[descendant.index()].name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(Error::at(
                class.node,
                format!(
                    "The class {} has one or more concrete descendants ({descendants}), but \
                     its serialization setting with_model_type has not been set. We need to \
                     discriminate on model type at the de-serialization.",
                    class.name
                ),
            ));
        }

        for &descendant in &class.concrete_descendants {
            let descendant = &classes[descendant.index()];
            if !descendant.serialization.with_model_type {
                errors.push(Error::at(
                    descendant.node,
                    format!(
                        "The class {} needs to have serialization setting with_model_type set \
                         since it is among the concrete descendant classes of the class {}",
                        descendant.name, class.name
                    ),
                ));
            }
        }
    }
}

/// References are serialized as such, not as the referenced instance.
fn collect_classes(annotation: &TypeAnnotation, found: &mut HashSet<ClassId>) {
    match annotation {
        TypeAnnotation::OurType(Symbol::Class(id)) => {
            found.insert(*id);
        }
        TypeAnnotation::List(items) | TypeAnnotation::Optional(items) => {
            collect_classes(items, found);
        }
        TypeAnnotation::Primitive(_) | TypeAnnotation::OurType(_) | TypeAnnotation::Ref(_) => {}
    }
}
