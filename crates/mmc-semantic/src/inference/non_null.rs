//! Values known to be present in the current sub-expression.

use std::collections::HashMap;

/// Counts how many enclosing antecedents assume a value to be not `None`.
///
/// Keys are canonical representations. The same value may be assumed
/// non-null by nested implications, hence counts instead of a set.
#[derive(Debug, Default)]
pub(crate) struct NonNull {
    counts: HashMap<String, usize>,
}

impl NonNull {
    pub(crate) fn increment(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_default() += 1;
    }

    /// Drops one assumption of `key`. Unknown keys are ignored.
    pub(crate) fn decrement(&mut self, key: &str) {
        if let Some(count) = self.counts.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(key);
            }
        }
    }

    pub(crate) fn at_least_once(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }
}
