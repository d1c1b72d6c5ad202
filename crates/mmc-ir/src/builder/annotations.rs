//! Resolution of raw type annotations against the registered symbols.

use crate::symbol::Symbol;
use crate::types::{Argument, PrimitiveType, TypeAnnotation};
use indexmap::IndexMap;
use mmc_ast::{ArgumentDecl, RawTypeAnnotation};
use mmc_core::{Error, Errors, NodeId};
use std::collections::HashSet;

pub(super) struct AnnotationResolver<'t, 'a> {
    symbols: &'t IndexMap<&'a str, Symbol>,
    /// Annotations which use `Ref`, for checking the reference association.
    pub ref_sites: Vec<NodeId>,
}

impl<'t, 'a> AnnotationResolver<'t, 'a> {
    pub fn new(symbols: &'t IndexMap<&'a str, Symbol>) -> Self {
        Self {
            symbols,
            ref_sites: Vec::new(),
        }
    }

    pub fn resolve(&mut self, raw: &RawTypeAnnotation) -> Result<TypeAnnotation, Error> {
        match raw {
            RawTypeAnnotation::Atomic { id, name } => {
                if let Some(primitive) = PrimitiveType::from_name(name.as_str()) {
                    return Ok(TypeAnnotation::Primitive(primitive));
                }
                if matches!(name.as_str(), "List" | "Optional" | "Ref") {
                    return Err(Error::at(
                        *id,
                        format!("The type annotation {name} expects a subscript"),
                    ));
                }
                self.symbols
                    .get(name.as_str())
                    .map(|symbol| TypeAnnotation::OurType(*symbol))
                    .ok_or_else(|| {
                        Error::at(
                            *id,
                            format!("The type annotation {name} does not refer to a defined symbol"),
                        )
                    })
            }
            RawTypeAnnotation::Subscripted {
                id,
                name,
                subscripts,
            } => {
                if !matches!(name.as_str(), "List" | "Optional" | "Ref") {
                    return Err(Error::at(
                        *id,
                        format!(
                            "Unexpected subscripted type annotation {raw}; only List, \
                             Optional and Ref take a subscript"
                        ),
                    ));
                }

                let [subscript] = subscripts.as_slice() else {
                    return Err(Error::at(
                        *id,
                        format!(
                            "The type annotation {name} expects exactly one subscript, \
                             but got {}",
                            subscripts.len()
                        ),
                    ));
                };

                let inner = self.resolve(subscript)?;
                match name.as_str() {
                    "List" => Ok(TypeAnnotation::List(Box::new(inner))),
                    "Optional" => {
                        if inner.is_optional() {
                            return Err(Error::at(
                                *id,
                                format!("Nested optional type annotations are not supported: {raw}"),
                            ));
                        }
                        Ok(TypeAnnotation::Optional(Box::new(inner)))
                    }
                    _ => {
                        if !matches!(inner, TypeAnnotation::OurType(Symbol::Class(_))) {
                            return Err(Error::at(
                                subscript.id(),
                                format!("A reference can only point to a class, but got: {subscript}"),
                            ));
                        }
                        self.ref_sites.push(*id);
                        Ok(TypeAnnotation::Ref(Box::new(inner)))
                    }
                }
            }
        }
    }

    /// Resolves the arguments of `owner`, e.g. "the method foo". Arguments
    /// that do not resolve are reported and left out.
    pub fn resolve_arguments(
        &mut self,
        arguments: &[ArgumentDecl],
        owner: &str,
        errors: &mut Errors,
    ) -> Vec<Argument> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(arguments.len());
        for argument in arguments {
            if !seen.insert(argument.name.as_str()) {
                errors.push(Error::at(
                    argument.id,
                    format!(
                        "The argument {} has been declared more than once in {owner}",
                        argument.name
                    ),
                ));
                continue;
            }

            match self.resolve(&argument.type_annotation) {
                Ok(type_annotation) => resolved.push(Argument {
                    name: argument.name.clone(),
                    type_annotation,
                    node: argument.id,
                }),
                Err(error) => errors.push(error),
            }
        }
        resolved
    }
}
