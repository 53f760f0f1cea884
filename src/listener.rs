//! Listener capabilities dispatched by [`State`](crate::state::State).
//! Every callback is delivered synchronously, on the calling thread, in
//! registration order. All methods default to no-ops so a view only
//! implements the events it cares about; implementations must be
//! idempotent, since a notification can repeat an unchanged value.

use crate::models::Snippet;

/// Events about a single snippet: edits, renames, removal, the
/// (validated, saved, locked) status triple and syntax changes.
pub trait SnippetListener {
    fn snippet_edited(&self, _snippet: &Snippet) {}

    fn snippet_renamed(&self, _old_name: &str, _new_name: &str) {}

    fn snippet_removed(&self, _snippet: &Snippet) {}

    /// The editor status triple changed (or was re-asserted unchanged).
    /// `locked` disables the editor regardless of the other two flags.
    fn snippet_status_changed(&self, _validated: bool, _saved: bool, _locked: bool) {}

    fn syntax_renamed(&self, _syntax: &str, _category: &str) {}
}

/// Events about the category list.
pub trait CategoryListener {
    fn category_renamed(&self, _old_name: &str, _new_name: &str) {}

    fn category_removed(&self, _name: &str) {}

    /// The set of categories changed; `selected` is the category that
    /// should stay selected afterwards.
    fn categories_updated(&self, _selected: &str) {}
}

/// Category/snippet totals changed.
pub trait CountListener {
    fn count_updated(&self, _categories: usize, _snippets: usize) {}
}

/// Menu enablement must be recomputed.
pub trait MenuListener {
    fn menu_updated(&self, _enabled: bool, _reset_export_submenu: bool) {}
}

/// Window-level chrome events.
pub trait WindowListener {
    fn window_status_changed(&self, _document_modified: bool) {}

    fn line_numbers_toggled(&self, _enabled: bool) {}
}

/// Search mode was entered or left. The argument is the PREVIOUS
/// search-active status, not the new one; callers are written against
/// that inversion, so it is part of the contract.
pub trait SearchListener {
    fn search_toggled(&self, _was_active: bool) {}
}
