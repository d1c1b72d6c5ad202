//! Descendability of type annotations.
//!
//! An annotation is descendable if generated "visit all reachable instances"
//! code must recurse into it, i.e. if it can reach an instance of a modeled
//! class. Backends skip traversal branches of non-descendable properties.

use crate::symbol::Symbol;
use crate::table::SymbolTable;
use crate::types::{Class, TypeAnnotation};
use std::collections::HashMap;

/// Descendability of every annotation nested in a type annotation.
///
/// The map is keyed structurally: equal sub-annotations share an entry,
/// which is sound since descendability depends only on the structure.
pub type DescendabilityMap<'a> = HashMap<&'a TypeAnnotation, bool>;

/// Maps `annotation` and all of its subscripts to their descendability.
///
/// `ref_association` is the symbol references are modeled with; a `Ref` is
/// descendable iff that symbol is a class.
#[must_use]
pub fn map_descendability(
    annotation: &TypeAnnotation,
    ref_association: Option<Symbol>,
) -> DescendabilityMap<'_> {
    let mut mapping = HashMap::new();
    recurse(annotation, ref_association, &mut mapping);
    mapping
}

/// Checks whether `annotation` is descendable.
#[must_use]
pub fn is_descendable(annotation: &TypeAnnotation, ref_association: Option<Symbol>) -> bool {
    let mut mapping = HashMap::new();
    recurse(annotation, ref_association, &mut mapping)
}

/// Descendability of every property annotation of `class`, subscripts
/// included.
#[must_use]
pub fn map_class_descendability<'a>(
    class: &'a Class,
    table: &SymbolTable,
) -> DescendabilityMap<'a> {
    let mut mapping = HashMap::new();
    for property in class.properties.values() {
        recurse(
            &property.type_annotation,
            table.ref_association(),
            &mut mapping,
        );
    }
    mapping
}

fn recurse<'a>(
    annotation: &'a TypeAnnotation,
    ref_association: Option<Symbol>,
    mapping: &mut DescendabilityMap<'a>,
) -> bool {
    if let Some(known) = mapping.get(annotation) {
        return *known;
    }

    let result = match annotation {
        TypeAnnotation::Primitive(_) => false,
        TypeAnnotation::OurType(symbol) => match symbol {
            Symbol::Enumeration(_) | Symbol::ConstrainedPrimitive(_) => false,
            Symbol::Class(_) => true,
        },
        TypeAnnotation::List(items) => recurse(items, ref_association, mapping),
        TypeAnnotation::Optional(value) => recurse(value, ref_association, mapping),
        TypeAnnotation::Ref(_) => ref_association.is_some_and(Symbol::is_class),
    };

    mapping.insert(annotation, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{ClassId, ConstrainedPrimitiveId, EnumerationId};
    use crate::types::PrimitiveType;

    fn class() -> TypeAnnotation {
        TypeAnnotation::OurType(Symbol::Class(ClassId::new(0)))
    }

    fn list(items: TypeAnnotation) -> TypeAnnotation {
        TypeAnnotation::List(Box::new(items))
    }

    fn optional(value: TypeAnnotation) -> TypeAnnotation {
        TypeAnnotation::Optional(Box::new(value))
    }

    #[test]
    fn test_terminals() {
        for primitive in PrimitiveType::ALL {
            assert!(!is_descendable(&TypeAnnotation::Primitive(primitive), None));
        }
        let enumeration = TypeAnnotation::OurType(Symbol::Enumeration(EnumerationId::new(0)));
        assert!(!is_descendable(&enumeration, None));
        let constrained =
            TypeAnnotation::OurType(Symbol::ConstrainedPrimitive(ConstrainedPrimitiveId::new(0)));
        assert!(!is_descendable(&constrained, None));
        assert!(is_descendable(&class(), None));
    }

    #[test]
    fn test_wrappers_follow_the_wrapped_annotation() {
        let terminal = TypeAnnotation::Primitive(PrimitiveType::Str);
        for inner in [terminal, class()] {
            let expected = is_descendable(&inner, None);
            assert_eq!(is_descendable(&list(inner.clone()), None), expected);
            assert_eq!(is_descendable(&optional(inner.clone()), None), expected);
            assert_eq!(is_descendable(&optional(list(inner)), None), expected);
        }
    }

    #[test]
    fn test_ref_depends_on_the_association() {
        let reference = TypeAnnotation::Ref(Box::new(class()));
        assert!(is_descendable(&reference, Some(Symbol::Class(ClassId::new(3)))));
        assert!(!is_descendable(
            &reference,
            Some(Symbol::Enumeration(EnumerationId::new(0)))
        ));
    }

    #[test]
    fn test_map_covers_every_level() {
        let annotation = optional(list(class()));
        let mapping = map_descendability(&annotation, None);
        assert_eq!(mapping.len(), 3);
        assert!(mapping.values().all(|descendable| *descendable));
    }
}
