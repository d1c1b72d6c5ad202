//! Projection of meta-model names into the naming conventions of backends.
//!
//! Two different meta-model names may end up as the same name in a target
//! language, e.g. `Data_type` and `DataType` both become `DataType` in
//! upper camel case. The builder projects all names through every configured
//! convention to catch such collisions before any backend runs.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `DataType`
    UpperCamel,
    /// `dataType`
    LowerCamel,
    /// `data_type`
    Snake,
}

impl NamingConvention {
    pub const ALL: [NamingConvention; 3] = [Self::UpperCamel, Self::LowerCamel, Self::Snake];

    /// Projects `name` into this convention.
    #[must_use]
    pub fn project(self, name: &str) -> String {
        let words = words(name);
        match self {
            Self::UpperCamel => words.iter().map(|word| capitalize(word)).collect(),
            Self::LowerCamel => words
                .iter()
                .enumerate()
                .map(|(i, word)| if i == 0 { word.clone() } else { capitalize(word) })
                .collect(),
            Self::Snake => words.join("_"),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpperCamel => "upper camel case",
            Self::LowerCamel => "lower camel case",
            Self::Snake => "snake case",
        };
        f.write_str(name)
    }
}

/// Splits a name into lowercase words at underscores and at lowercase to
/// uppercase transitions. Digits stick to the preceding word.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in name.chars() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }

        if c.is_ascii_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c.to_ascii_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
