use crate::symbol::ClassId;
use crate::types::{Class, Interface};

/// Attaches an interface to every abstract class and every concrete class
/// that has descendants.
pub(super) fn attach(classes: &mut [Class]) {
    let has_interface: Vec<bool> = classes
        .iter()
        .map(|class| class.is_abstract() || !class.descendants.is_empty())
        .collect();

    for (i, class) in classes.iter_mut().enumerate() {
        if !has_interface[i] {
            continue;
        }

        let base = ClassId::new(i as u32);
        let inheritances = class
            .inheritances
            .iter()
            .copied()
            .filter(|parent| has_interface[parent.index()])
            .collect();
        let implementers = (!class.is_abstract())
            .then_some(base)
            .into_iter()
            .chain(class.concrete_descendants.iter().copied())
            .collect();

        class.interface = Some(Interface {
            base,
            inheritances,
            implementers,
        });
    }
}
