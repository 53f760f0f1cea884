use crate::models::{Snippet, SnippetStore};
use crate::search::{SearchFilter, SearchResults};
use crate::state::State;
use std::collections::{BTreeMap, BTreeSet};

/// Where a routed operation lands: the persistent store, or the overlay
/// holding the last search's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataSource {
    Store,
    Overlay,
}

/// Routing facade in front of the store and the search overlay. Every
/// query or mutation that is meaningful against a search result set is
/// dispatched by the search-active flag; insertion and locking always hit
/// the store, since new snippets land in the real database and lock state
/// is a persisted property independent of any search. Results are passed
/// through uninterpreted.
pub struct Controller {
    store: SnippetStore,
    results: SearchResults,
    filter: SearchFilter,
}

impl Controller {
    pub fn new(store: SnippetStore, filter: SearchFilter) -> Self {
        Self {
            store,
            results: SearchResults::new(),
            filter,
        }
    }

    /// The one place that maps the search-active flag to a data source;
    /// both the routed operations below and the count refresh in
    /// [`State`] resolve through here.
    fn source(&self, state: &State) -> DataSource {
        if state.is_search_active() {
            DataSource::Overlay
        } else {
            DataSource::Store
        }
    }

    pub fn remove_snippet(&mut self, state: &State, name: &str) -> bool {
        match self.source(state) {
            DataSource::Overlay => self.results.remove_snippet(&mut self.store, name),
            DataSource::Store => self.store.remove_snippet(name),
        }
    }

    pub fn update_snippet(&mut self, state: &State, old: &Snippet, new: &Snippet) -> bool {
        match self.source(state) {
            DataSource::Overlay => self.results.update_snippet(&mut self.store, old, new),
            DataSource::Store => self.store.update_snippet(old, new),
        }
    }

    pub fn remove_category(&mut self, state: &State, name: &str) -> bool {
        match self.source(state) {
            DataSource::Overlay => self.results.remove_category(&mut self.store, name),
            DataSource::Store => self.store.remove_category(name),
        }
    }

    pub fn rename_category(&mut self, state: &State, old: &str, new: &str) -> bool {
        match self.source(state) {
            DataSource::Overlay => self.results.rename_category(&mut self.store, old, new),
            DataSource::Store => self.store.rename_category(old, new),
        }
    }

    pub fn update_syntax(
        &mut self,
        state: &State,
        syntax: &str,
        category: &str,
        excluded: Option<&str>,
    ) -> bool {
        match self.source(state) {
            DataSource::Overlay => {
                self.results
                    .set_syntax(&mut self.store, syntax, category, excluded)
            }
            DataSource::Store => self.store.set_syntax_to_category(syntax, category, excluded),
        }
    }

    /// Every category in the database, regardless of any active search.
    pub fn get_all_categories(&self) -> Vec<String> {
        self.store.get_categories()
    }

    pub fn get_categories(&self, state: &State) -> Vec<String> {
        match self.source(state) {
            DataSource::Overlay => self.results.get_categories(),
            DataSource::Store => self.store.get_categories(),
        }
    }

    pub fn get_category_of(&self, name: &str) -> Option<String> {
        self.store.get_category_of(name)
    }

    pub fn get_snippet(&self, name: &str) -> Option<Snippet> {
        self.store.get_snippet(name)
    }

    pub fn snippet_names(&self, state: &State, category: &str) -> Vec<String> {
        match self.source(state) {
            DataSource::Overlay => self.results.get_snippets(category),
            DataSource::Store => self.store.get_snippets_names(category),
        }
    }

    pub fn insert_new_snippet(&mut self, snippet: &Snippet) -> bool {
        self.store.insert_new_snippet(snippet)
    }

    pub fn lock_snippet(&mut self, name: &str, locked: bool) -> bool {
        self.store.lock_snippet(name, locked)
    }

    pub fn count_categories(&self, state: &State) -> usize {
        match self.source(state) {
            DataSource::Overlay => self.results.count_categories(),
            DataSource::Store => self.store.count_categories(),
        }
    }

    pub fn count_snippets(&self, state: &State) -> usize {
        match self.source(state) {
            DataSource::Overlay => self.results.count_snippets(),
            DataSource::Store => self.store.count_snippets(),
        }
    }

    /// Number of enabled search scopes while a search is active, `-1`
    /// otherwise ("not applicable").
    pub fn active_filter_count(&self, state: &State) -> i32 {
        if state.is_search_active() {
            self.filter.count_enabled() as i32
        } else {
            -1
        }
    }

    /// Queries the store with the current scope filter. The caller
    /// decides whether to install the result as the active overlay.
    pub fn search(&self, keywords: &[String]) -> BTreeMap<String, BTreeSet<String>> {
        self.store.search(keywords, &self.filter)
    }

    /// Installs a fresh search's result set into the overlay.
    pub fn set_search_data(&mut self, data: BTreeMap<String, BTreeSet<String>>) {
        self.results.set_data(data);
    }

    /// Discards the overlay when a search is cancelled.
    pub fn clear_search(&mut self) {
        self.results.clear();
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: SearchFilter) {
        self.filter = filter;
    }

    pub fn store(&self) -> &SnippetStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(category: &str, name: &str) -> Snippet {
        Snippet::new(category, name, Vec::new(), "", "", "")
    }

    fn controller_with(entries: &[(&str, &str)]) -> (tempfile::TempDir, Controller) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnippetStore::open(dir.path()).unwrap();
        for (category, name) in entries {
            assert!(store.insert_new_snippet(&snippet(category, name)));
        }
        (dir, Controller::new(store, SearchFilter::default()))
    }

    #[test]
    fn filter_count_is_minus_one_outside_a_search() {
        let (_dir, controller) = controller_with(&[]);
        let mut state = State::new();

        assert_eq!(controller.active_filter_count(&state), -1);

        state.start_search();
        let value = controller.active_filter_count(&state);
        assert!((0..=4).contains(&value));
        assert_eq!(value, controller.filter().count_enabled() as i32);
    }

    #[test]
    fn reads_route_to_the_overlay_only_while_searching() {
        let (_dir, mut controller) =
            controller_with(&[("Sorting", "QuickSort"), ("Web", "css-reset")]);
        let mut state = State::new();

        let mut data = BTreeMap::new();
        data.insert(
            "Sorting".to_string(),
            BTreeSet::from(["QuickSort".to_string()]),
        );
        controller.set_search_data(data);

        // flag off: the stale overlay is invisible
        assert_eq!(controller.get_categories(&state), vec!["Sorting", "Web"]);
        assert_eq!(controller.count_snippets(&state), 2);

        state.start_search();
        assert_eq!(controller.get_categories(&state), vec!["Sorting"]);
        assert_eq!(controller.count_snippets(&state), 1);
        assert_eq!(controller.snippet_names(&state, "Sorting"), vec!["QuickSort"]);
        assert!(controller.snippet_names(&state, "Web").is_empty());

        // the full category list ignores the overlay by definition
        assert_eq!(controller.get_all_categories(), vec!["Sorting", "Web"]);
    }

    #[test]
    fn insert_targets_the_store_even_with_a_stale_overlay() {
        let (_dir, mut controller) = controller_with(&[("Sorting", "QuickSort")]);
        let state = State::new();

        let mut data = BTreeMap::new();
        data.insert(
            "Sorting".to_string(),
            BTreeSet::from(["QuickSort".to_string()]),
        );
        controller.set_search_data(data);

        assert!(controller.insert_new_snippet(&snippet("Web", "css-reset")));
        assert_eq!(controller.store().count_snippets(), 2);
        assert_eq!(controller.get_category_of("css-reset").unwrap(), "Web");
        // overlay untouched
        assert_eq!(controller.count_snippets(&state), 2);
    }

    #[test]
    fn mutations_route_by_the_search_flag() {
        let (_dir, mut controller) =
            controller_with(&[("Sorting", "QuickSort"), ("Sorting", "BubbleSort")]);
        let mut state = State::new();

        let mut data = BTreeMap::new();
        data.insert(
            "Sorting".to_string(),
            BTreeSet::from(["QuickSort".to_string(), "BubbleSort".to_string()]),
        );
        controller.set_search_data(data);
        state.start_search();

        assert!(controller.remove_snippet(&state, "BubbleSort"));
        assert_eq!(controller.snippet_names(&state, "Sorting"), vec!["QuickSort"]);
        assert!(controller.store().get_snippet("BubbleSort").is_none());

        state.stop_search();
        controller.clear_search();
        assert!(controller.remove_snippet(&state, "QuickSort"));
        assert_eq!(controller.store().count_snippets(), 0);
    }

    #[test]
    fn lock_always_hits_the_store() {
        let (_dir, mut controller) = controller_with(&[("Sorting", "QuickSort")]);
        let mut state = State::new();
        state.start_search();

        assert!(controller.lock_snippet("QuickSort", true));
        assert!(controller.store().get_snippet("QuickSort").unwrap().locked);
        assert!(!controller.lock_snippet("Ghost", true));
    }
}
