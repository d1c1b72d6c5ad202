//! Supersets of enumerations.

use super::Allocation;
use crate::symbol::{EnumerationId, Symbol};
use mmc_core::{Error, Errors};

/// Resolves `is_superset_of` of every enumeration, indexed like the
/// enumerations of `allocation`.
///
/// Each literal of a subset has to appear in the superset with the same
/// value.
pub(super) fn resolve(
    allocation: &Allocation<'_>,
    errors: &mut Errors,
) -> Vec<Vec<EnumerationId>> {
    let mut resolved = Vec::with_capacity(allocation.enumerations.len());

    for &decl in &allocation.enumerations {
        let mut subsets = Vec::new();
        for name in &decl.is_superset_of {
            match allocation.symbols.get(name.as_str()) {
                Some(Symbol::Enumeration(id)) => subsets.push(*id),
                Some(_) => errors.push(Error::at(
                    decl.id,
                    format!(
                        "An element, {name}, of is_superset_of of the enumeration {} is not \
                         an enumeration",
                        decl.name
                    ),
                )),
                None => errors.push(Error::at(
                    decl.id,
                    format!(
                        "The subset enumeration in is_superset_of of the enumeration {} has \
                         not been defined: {name}",
                        decl.name
                    ),
                )),
            }
        }

        for &subset in &subsets {
            let subset = allocation.enumerations[subset.index()];
            for subset_literal in &subset.literals {
                let Some(literal) = decl
                    .literals
                    .iter()
                    .find(|literal| literal.name == subset_literal.name)
                else {
                    errors.push(Error::at(
                        decl.id,
                        format!(
                            "The literal {} from the subset enumeration {} is missing in the \
                             enumeration {}",
                            subset_literal.name, subset.name, decl.name
                        ),
                    ));
                    continue;
                };

                if literal.value != subset_literal.value {
                    errors.push(Error::at(
                        literal.id,
                        format!(
                            "The value {:?} of the literal {} from the subset enumeration {} \
                             does not equal the value {:?} of the literal {} in the \
                             enumeration {}",
                            subset_literal.value,
                            subset_literal.name,
                            subset.name,
                            literal.value,
                            literal.name,
                            decl.name
                        ),
                    ));
                }
            }
        }

        resolved.push(subsets);
    }

    resolved
}
