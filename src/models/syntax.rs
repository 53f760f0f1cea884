use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named highlighting style: a handle into the external highlighting
/// engine plus the keyword list it colors. Ordered case-insensitively by
/// name so style pickers list "java" and "Javascript" together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Syntax {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Syntax {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keywords,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn keywords_as_string(&self) -> String {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for Syntax {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Syntax {}

impl Ord for Syntax {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Syntax {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
