use crate::models::{Snippet, SnippetStore};
use std::collections::{BTreeMap, BTreeSet};

/// The overlay holding the last search's matches as a sorted mapping from
/// category name to sorted snippet names. While a search is active every
/// read goes through this set and every mutation is mirrored to the store
/// in the same call, so the two never diverge. A new search replaces the
/// whole data set; cancelling the search clears it.
#[derive(Debug, Default)]
pub struct SearchResults {
    data: BTreeMap<String, BTreeSet<String>>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the result set of a fresh search, replacing any previous
    /// one outright.
    pub fn set_data(&mut self, data: BTreeMap<String, BTreeSet<String>>) {
        self.data = data;
    }

    /// Category names present in the result set, in natural sort order.
    pub fn get_categories(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Snippet names under `category`, sorted. An absent category is an
    /// empty list, not an error.
    pub fn get_snippets(&self, category: &str) -> Vec<String> {
        self.data
            .get(category)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Deletes a whole category worth of matches: the store removes the
    /// snippets as a batch first, and only on success does the category
    /// leave the overlay: it must never show a category the store failed
    /// to delete.
    pub fn remove_category(&mut self, store: &mut SnippetStore, category: &str) -> bool {
        if !self.data.contains_key(category) {
            return false;
        }

        let names = self.get_snippets(category);
        if !store.remove_snippets(&names) {
            return false;
        }

        self.data.remove(category);
        true
    }

    /// Renames a category within the result set. If the new name already
    /// exists the two entries merge under it. The store re-homes every
    /// snippet that ends up under the new name; the overlay is only
    /// touched once that succeeds.
    pub fn rename_category(&mut self, store: &mut SnippetStore, old: &str, new: &str) -> bool {
        let Some(old_names) = self.data.get(old) else {
            return false;
        };

        let mut merged = old_names.clone();
        if let Some(existing) = self.data.get(new) {
            merged.extend(existing.iter().cloned());
        }

        let names: Vec<String> = merged.iter().cloned().collect();
        if !store.rename_category_of(&names, new) {
            return false;
        }

        self.data.remove(old);
        self.data.insert(new.to_string(), merged);
        true
    }

    /// Removes one snippet from whichever category holds it, mirroring the
    /// delete to the store. Unknown names return false without touching
    /// the store.
    pub fn remove_snippet(&mut self, store: &mut SnippetStore, name: &str) -> bool {
        for names in self.data.values_mut() {
            if names.remove(name) {
                return store.remove_snippet(name);
            }
        }

        false
    }

    /// Applies an edit: the old entry leaves its category's set, the new
    /// entry joins its category's set (created on demand), and the store
    /// persists the update. Category and name may both change in one call.
    pub fn update_snippet(
        &mut self,
        store: &mut SnippetStore,
        old: &Snippet,
        new: &Snippet,
    ) -> bool {
        if let Some(names) = self.data.get_mut(&old.category) {
            names.remove(&old.name);
        }

        self.data
            .entry(new.category.clone())
            .or_default()
            .insert(new.name.clone());

        store.update_snippet(old, new)
    }

    /// Applies `syntax` to every matched snippet of `category` except
    /// `excluded` (the snippet currently open, saved separately).
    pub fn set_syntax(
        &mut self,
        store: &mut SnippetStore,
        syntax: &str,
        category: &str,
        excluded: Option<&str>,
    ) -> bool {
        let Some(names) = self.data.get(category) else {
            return false;
        };

        let names: Vec<String> = names
            .iter()
            .filter(|n| excluded != Some(n.as_str()))
            .cloned()
            .collect();

        store.set_syntax_to_snippets(syntax, &names)
    }

    pub fn count_categories(&self) -> usize {
        self.data.len()
    }

    pub fn count_snippets(&self) -> usize {
        self.data.values().map(|names| names.len()).sum()
    }

    /// Drops the whole result set; the overlay goes back to inactive.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(category: &str, name: &str) -> Snippet {
        Snippet::new(category, name, Vec::new(), "", "", "")
    }

    /// Store seeded with the given snippets, plus an overlay holding all
    /// of them, as if a search had just matched everything.
    fn searched(entries: &[(&str, &str)]) -> (tempfile::TempDir, SnippetStore, SearchResults) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnippetStore::open(dir.path()).unwrap();
        let mut data: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (category, name) in entries {
            assert!(store.insert_new_snippet(&snippet(category, name)));
            data.entry(category.to_string())
                .or_default()
                .insert(name.to_string());
        }

        let mut results = SearchResults::new();
        results.set_data(data);
        (dir, store, results)
    }

    #[test]
    fn get_snippets_returns_the_installed_set_sorted() {
        let (_dir, _store, results) = searched(&[
            ("Sorting", "QuickSort"),
            ("Sorting", "BubbleSort"),
            ("Web", "css-reset"),
        ]);

        assert_eq!(results.get_categories(), vec!["Sorting", "Web"]);
        assert_eq!(
            results.get_snippets("Sorting"),
            vec!["BubbleSort", "QuickSort"]
        );
        assert!(results.get_snippets("Ghost").is_empty());
    }

    #[test]
    fn remove_category_on_absent_name_is_a_no_op() {
        let (_dir, mut store, mut results) = searched(&[("Sorting", "QuickSort")]);

        assert!(!results.remove_category(&mut store, "Ghost"));
        assert_eq!(results.count_categories(), 1);
        assert_eq!(store.count_snippets(), 1);
    }

    #[test]
    fn remove_category_deletes_from_store_then_overlay() {
        let (_dir, mut store, mut results) =
            searched(&[("Sorting", "QuickSort"), ("Sorting", "BubbleSort"), ("Web", "css-reset")]);

        assert!(results.remove_category(&mut store, "Sorting"));
        assert_eq!(results.get_categories(), vec!["Web"]);
        assert!(store.get_snippet("QuickSort").is_none());
        assert!(store.get_snippet("BubbleSort").is_none());
        assert!(store.get_snippet("css-reset").is_some());
    }

    #[test]
    fn rename_category_moves_the_set_when_target_is_new() {
        let (_dir, mut store, mut results) =
            searched(&[("Sorting", "QuickSort"), ("Sorting", "BubbleSort")]);

        assert!(results.rename_category(&mut store, "Sorting", "Algorithms"));
        assert_eq!(results.get_categories(), vec!["Algorithms"]);
        assert_eq!(
            results.get_snippets("Algorithms"),
            vec!["BubbleSort", "QuickSort"]
        );
        assert_eq!(store.get_category_of("QuickSort").unwrap(), "Algorithms");
    }

    #[test]
    fn rename_category_merges_into_an_existing_target() {
        let (_dir, mut store, mut results) =
            searched(&[("Sorting", "QuickSort"), ("Algorithms", "Dijkstra")]);

        assert!(results.rename_category(&mut store, "Sorting", "Algorithms"));
        assert_eq!(results.get_categories(), vec!["Algorithms"]);
        assert_eq!(
            results.get_snippets("Algorithms"),
            vec!["Dijkstra", "QuickSort"]
        );
        assert_eq!(store.get_category_of("Dijkstra").unwrap(), "Algorithms");
        assert_eq!(store.get_category_of("QuickSort").unwrap(), "Algorithms");
    }

    #[test]
    fn rename_category_on_absent_name_fails() {
        let (_dir, mut store, mut results) = searched(&[("Sorting", "QuickSort")]);
        assert!(!results.rename_category(&mut store, "Ghost", "Algorithms"));
        assert_eq!(results.get_categories(), vec!["Sorting"]);
    }

    #[test]
    fn remove_snippet_mirrors_the_store_delete() {
        let (_dir, mut store, mut results) =
            searched(&[("Sorting", "QuickSort"), ("Sorting", "BubbleSort")]);

        assert!(results.remove_snippet(&mut store, "BubbleSort"));
        assert_eq!(results.get_snippets("Sorting"), vec!["QuickSort"]);
        assert!(store.get_snippet("BubbleSort").is_none());

        assert!(!results.remove_snippet(&mut store, "BubbleSort"));
        assert_eq!(store.count_snippets(), 1);
    }

    #[test]
    fn update_snippet_moves_between_categories() {
        let (_dir, mut store, mut results) = searched(&[("Sorting", "QuickSort")]);

        let old = store.get_snippet("QuickSort").unwrap();
        let new = old.with_category("Algorithms");
        assert!(results.update_snippet(&mut store, &old, &new));

        assert!(!results.get_snippets("Sorting").contains(&"QuickSort".to_string()));
        assert_eq!(results.get_snippets("Algorithms"), vec!["QuickSort"]);
        assert_eq!(store.get_category_of("QuickSort").unwrap(), "Algorithms");
    }

    #[test]
    fn count_snippets_sums_every_category() {
        let (_dir, _store, results) = searched(&[
            ("Sorting", "QuickSort"),
            ("Sorting", "BubbleSort"),
            ("Web", "css-reset"),
        ]);

        let by_hand: usize = results
            .get_categories()
            .iter()
            .map(|c| results.get_snippets(c).len())
            .sum();
        assert_eq!(results.count_snippets(), by_hand);
        assert_eq!(results.count_snippets(), 3);
    }

    #[test]
    fn set_syntax_skips_the_excluded_snippet() {
        let (_dir, mut store, mut results) =
            searched(&[("Sorting", "QuickSort"), ("Sorting", "BubbleSort")]);

        assert!(results.set_syntax(&mut store, "Rust", "Sorting", Some("QuickSort")));
        assert_eq!(store.get_snippet("QuickSort").unwrap().syntax, "");
        assert_eq!(store.get_snippet("BubbleSort").unwrap().syntax, "Rust");

        assert!(!results.set_syntax(&mut store, "Rust", "Ghost", None));
    }

    #[test]
    fn clear_empties_the_overlay_but_not_the_store() {
        let (_dir, store, mut results) = searched(&[("Sorting", "QuickSort")]);

        results.clear();
        assert_eq!(results.count_categories(), 0);
        assert_eq!(results.count_snippets(), 0);
        assert_eq!(store.count_snippets(), 1);
    }
}
