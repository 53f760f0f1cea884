use crate::controller::Controller;
use crate::listener::{
    CategoryListener, CountListener, MenuListener, SearchListener, SnippetListener, WindowListener,
};
use crate::models::{Snippet, SnippetStore};
use std::rc::Rc;

/// The coordination hub: current selection, the editor status triple, the
/// search-active flag, the previously selected snippet, and the dispatch
/// point for all six listener capabilities. It holds bookkeeping and
/// fan-out only, no business logic.
///
/// The application builds exactly one `State` at its composition point
/// and threads it through whichever component needs the current
/// selection or status.
#[derive(Default)]
pub struct State {
    selected_category: Option<String>,
    selected_snippet: Option<String>,
    previous_snippet: Option<Snippet>,

    snippet_validated: bool,
    snippet_saved: bool,
    snippet_locked: bool,

    search_active: bool,

    snippet_listeners: Vec<Rc<dyn SnippetListener>>,
    category_listeners: Vec<Rc<dyn CategoryListener>>,
    count_listeners: Vec<Rc<dyn CountListener>>,
    menu_listeners: Vec<Rc<dyn MenuListener>>,
    window_listeners: Vec<Rc<dyn WindowListener>>,
    search_listeners: Vec<Rc<dyn SearchListener>>,
}

/// Removes `listener` from `registry`, reporting whether it was present.
fn remove_listener<T: ?Sized>(registry: &mut Vec<Rc<T>>, listener: &Rc<T>) -> bool {
    let before = registry.len();
    registry.retain(|l| !Rc::ptr_eq(l, listener));
    registry.len() != before
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_snippet_listener(&mut self, listener: Rc<dyn SnippetListener>) {
        self.snippet_listeners.push(listener);
    }

    pub fn remove_snippet_listener(&mut self, listener: &Rc<dyn SnippetListener>) -> bool {
        remove_listener(&mut self.snippet_listeners, listener)
    }

    pub fn add_category_listener(&mut self, listener: Rc<dyn CategoryListener>) {
        self.category_listeners.push(listener);
    }

    pub fn remove_category_listener(&mut self, listener: &Rc<dyn CategoryListener>) -> bool {
        remove_listener(&mut self.category_listeners, listener)
    }

    pub fn add_count_listener(&mut self, listener: Rc<dyn CountListener>) {
        self.count_listeners.push(listener);
    }

    pub fn remove_count_listener(&mut self, listener: &Rc<dyn CountListener>) -> bool {
        remove_listener(&mut self.count_listeners, listener)
    }

    pub fn add_menu_listener(&mut self, listener: Rc<dyn MenuListener>) {
        self.menu_listeners.push(listener);
    }

    pub fn remove_menu_listener(&mut self, listener: &Rc<dyn MenuListener>) -> bool {
        remove_listener(&mut self.menu_listeners, listener)
    }

    pub fn add_window_listener(&mut self, listener: Rc<dyn WindowListener>) {
        self.window_listeners.push(listener);
    }

    pub fn remove_window_listener(&mut self, listener: &Rc<dyn WindowListener>) -> bool {
        remove_listener(&mut self.window_listeners, listener)
    }

    pub fn add_search_listener(&mut self, listener: Rc<dyn SearchListener>) {
        self.search_listeners.push(listener);
    }

    pub fn remove_search_listener(&mut self, listener: &Rc<dyn SearchListener>) -> bool {
        remove_listener(&mut self.search_listeners, listener)
    }

    pub fn categories_updated(&self, selected: &str) {
        for listener in &self.category_listeners {
            listener.categories_updated(selected);
        }
    }

    pub fn category_removed(&self, name: &str) {
        for listener in &self.category_listeners {
            listener.category_removed(name);
        }
    }

    pub fn category_renamed(&self, old_name: &str, new_name: &str) {
        for listener in &self.category_listeners {
            listener.category_renamed(old_name, new_name);
        }
    }

    pub fn snippet_removed(&self, snippet: &Snippet) {
        for listener in &self.snippet_listeners {
            listener.snippet_removed(snippet);
        }
    }

    pub fn snippet_renamed(&self, old_name: &str, new_name: &str) {
        for listener in &self.snippet_listeners {
            listener.snippet_renamed(old_name, new_name);
        }
    }

    pub fn snippet_edited(&self, snippet: &Snippet) {
        for listener in &self.snippet_listeners {
            listener.snippet_edited(snippet);
        }
    }

    pub fn syntax_renamed(&self, syntax: &str, category: &str) {
        for listener in &self.snippet_listeners {
            listener.syntax_renamed(syntax, category);
        }
    }

    /// Recomputes the category/snippet totals and fans them out. The
    /// controller is the single place that knows whether the counts come
    /// from the store or from the search overlay, so the decision is
    /// delegated there rather than duplicated here.
    pub fn refresh_counts(&self, controller: &Controller) {
        let categories = controller.count_categories(self);
        let snippets = controller.count_snippets(self);
        self.count_updated(categories, snippets);
    }

    pub fn count_updated(&self, categories: usize, snippets: usize) {
        for listener in &self.count_listeners {
            listener.count_updated(categories, snippets);
        }
    }

    /// Stores the status triple and always notifies, even when nothing
    /// changed; listeners are required to be idempotent.
    pub fn update_snippet_status(&mut self, validated: bool, saved: bool, locked: bool) {
        self.snippet_validated = validated;
        self.snippet_saved = saved;
        self.snippet_locked = locked;

        for listener in &self.snippet_listeners {
            listener.snippet_status_changed(validated, saved, locked);
        }
    }

    pub fn update_menu(&self, enabled: bool, reset_export_submenu: bool) {
        for listener in &self.menu_listeners {
            listener.menu_updated(enabled, reset_export_submenu);
        }
    }

    pub fn update_window_status(&self, document_modified: bool) {
        for listener in &self.window_listeners {
            listener.window_status_changed(document_modified);
        }
    }

    pub fn update_line_numbers(&self, enabled: bool) {
        for listener in &self.window_listeners {
            listener.line_numbers_toggled(enabled);
        }
    }

    /// Flips search mode and notifies the search listeners with the
    /// PREVIOUS status (the negation of `active`). Existing callers read
    /// the argument as "was a search active before this change", so the
    /// inversion is contractual; do not "fix" it.
    pub fn update_search(&mut self, active: bool) {
        self.search_active = active;

        for listener in &self.search_listeners {
            listener.search_toggled(!active);
        }
    }

    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    /// Enters search mode without notifying anyone.
    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    /// Leaves search mode without notifying anyone.
    pub fn stop_search(&mut self) {
        self.search_active = false;
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        self.selected_category = category;
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn set_selected_snippet(&mut self, snippet: Option<String>) {
        self.selected_snippet = snippet;
    }

    pub fn selected_snippet(&self) -> Option<&str> {
        self.selected_snippet.as_deref()
    }

    pub fn set_previous_snippet(&mut self, snippet: Option<Snippet>) {
        self.previous_snippet = snippet;
    }

    pub fn previous_snippet(&self) -> Option<&Snippet> {
        self.previous_snippet.as_ref()
    }

    pub fn set_snippet_locked(&mut self, locked: bool) {
        self.snippet_locked = locked;
    }

    pub fn is_snippet_validated(&self) -> bool {
        self.snippet_validated
    }

    pub fn is_snippet_saved(&self) -> bool {
        self.snippet_saved
    }

    pub fn is_snippet_locked(&self) -> bool {
        self.snippet_locked
    }

    /// Empty means the store holds no categories at all. An empty search
    /// result set does not make the database empty, so the overlay is
    /// deliberately ignored here.
    pub fn is_database_empty(&self, store: &SnippetStore) -> bool {
        store.count_categories() == 0
    }
}
