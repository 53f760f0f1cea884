use serde::{Deserialize, Serialize};
use std::fmt;

/// Id carried by a snippet that has never been written to the store.
/// The store assigns the real id on insert.
pub const UNSAVED_ID: i64 = -1;

/// One stored code sample. The name is the primary key: the store rejects
/// any insert or update that would duplicate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub tags: Vec<String>,
    pub code: String,
    pub comment: String,
    /// Name of the highlighting style. Empty means "no style", never absent.
    pub syntax: String,
    pub locked: bool,
}

impl Snippet {
    /// Creates a not-yet-persisted snippet. The store assigns the id.
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        tags: Vec<String>,
        code: impl Into<String>,
        comment: impl Into<String>,
        syntax: impl Into<String>,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            category: category.into(),
            name: name.into(),
            tags,
            code: code.into(),
            comment: comment.into(),
            syntax: syntax.into(),
            locked: false,
        }
    }

    /// Copy of this snippet re-homed to another category. The tag list is
    /// cloned so the copy and the original never share it; the copy is
    /// unsaved and unlocked, leaving the original usable for rollback and
    /// identity comparisons by listeners.
    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            category: category.into(),
            name: self.name.clone(),
            tags: self.tags.clone(),
            code: self.code.clone(),
            comment: self.comment.clone(),
            syntax: self.syntax.clone(),
            locked: false,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != UNSAVED_ID
    }

    /// Tags joined for display, comma separated.
    pub fn tags_as_string(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.category, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snippet {
        let mut snippet = Snippet::new(
            "Sorting",
            "QuickSort",
            vec!["algorithm".into(), "recursion".into()],
            "fn quicksort() {}",
            "classic pivot version",
            "Rust",
        );
        snippet.id = 7;
        snippet.locked = true;
        snippet
    }

    #[test]
    fn with_category_deep_copies_tags() {
        let original = sample();
        let mut moved = original.with_category("Archive");

        moved.tags.push("extra".to_string());

        assert_eq!(moved.category, "Archive");
        assert_eq!(moved.id, UNSAVED_ID);
        assert!(!moved.locked);
        assert_eq!(original.tags, vec!["algorithm", "recursion"]);
        assert_eq!(original.category, "Sorting");
    }

    #[test]
    fn tags_as_string_skips_blank_entries() {
        let mut snippet = sample();
        snippet.tags = vec!["a".into(), "  ".into(), "b".into()];
        assert_eq!(snippet.tags_as_string(), "a, b");

        snippet.tags.clear();
        assert_eq!(snippet.tags_as_string(), "");
    }

    #[test]
    fn display_is_category_comma_name() {
        assert_eq!(sample().to_string(), "Sorting,QuickSort");
    }
}
