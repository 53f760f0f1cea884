use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A (category, tag-name) pair. The `selected` flag is view state only: it
/// is excluded from equality, ordering and serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub category: String,
    pub name: String,
    #[serde(skip)]
    pub selected: bool,
}

impl Tag {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            selected: false,
        }
    }

    pub fn selected(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            selected: true,
            ..Self::new(category, name)
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.hash(state);
        self.name.hash(state);
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .to_lowercase()
            .cmp(&other.category.to_lowercase())
            .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
