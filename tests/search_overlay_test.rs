use snipkeep::controller::Controller;
use snipkeep::listener::CountListener;
use snipkeep::models::{Snippet, SnippetStore};
use snipkeep::search::SearchFilter;
use snipkeep::state::State;
use std::cell::RefCell;
use std::rc::Rc;

fn snippet(category: &str, name: &str, code: &str) -> Snippet {
    Snippet::new(category, name, Vec::new(), code, "", "")
}

/// Controller over a temp-dir store seeded with a few snippets spread
/// over two categories.
fn seeded() -> (tempfile::TempDir, Controller) {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SnippetStore::open(dir.path()).unwrap();

    assert!(store.insert_new_snippet(&snippet("Sorting", "QuickSort", "fn sort() {}")));
    assert!(store.insert_new_snippet(&snippet("Sorting", "BubbleSort", "fn sort_slowly() {}")));
    assert!(store.insert_new_snippet(&snippet("Web", "css-reset", "* { margin: 0; }")));

    (dir, Controller::new(store, SearchFilter::default()))
}

/// Runs a search and installs the result as the active overlay, the way
/// the search command does.
fn activate_search(controller: &mut Controller, state: &mut State, keywords: &[&str]) {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
    let data = controller.search(&keywords);
    controller.set_search_data(data);
    state.update_search(true);
}

#[test]
fn removing_a_matched_snippet_updates_overlay_and_store() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    activate_search(&mut controller, &mut state, &["sort"]);
    assert_eq!(controller.get_categories(&state), vec!["Sorting"]);
    assert_eq!(
        controller.snippet_names(&state, "Sorting"),
        vec!["BubbleSort", "QuickSort"]
    );

    assert!(controller.remove_snippet(&state, "BubbleSort"));

    assert_eq!(controller.snippet_names(&state, "Sorting"), vec!["QuickSort"]);
    assert!(controller.store().get_snippet("BubbleSort").is_none());
    assert!(controller.store().get_snippet("css-reset").is_some());
}

#[test]
fn cancelling_the_search_routes_reads_back_to_the_store() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    activate_search(&mut controller, &mut state, &["sort"]);
    assert_eq!(controller.count_snippets(&state), 2);

    state.update_search(false);
    controller.clear_search();

    assert_eq!(controller.count_snippets(&state), 3);
    assert_eq!(controller.get_categories(&state), vec!["Sorting", "Web"]);
}

#[test]
fn renaming_a_matched_category_rehomes_snippets_in_the_store() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    activate_search(&mut controller, &mut state, &["sort"]);
    assert!(controller.rename_category(&state, "Sorting", "Algorithms"));

    assert_eq!(controller.get_categories(&state), vec!["Algorithms"]);
    assert_eq!(
        controller.store().get_category_of("QuickSort").unwrap(),
        "Algorithms"
    );
    assert_eq!(
        controller.store().get_category_of("BubbleSort").unwrap(),
        "Algorithms"
    );
    // the unmatched category is untouched
    assert_eq!(controller.store().get_category_of("css-reset").unwrap(), "Web");
}

#[test]
fn overlay_counts_always_agree_with_the_routed_listing() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    activate_search(&mut controller, &mut state, &["sort"]);

    let by_hand: usize = controller
        .get_categories(&state)
        .iter()
        .map(|c| controller.snippet_names(&state, c).len())
        .sum();
    assert_eq!(controller.count_snippets(&state), by_hand);
    assert_eq!(controller.count_categories(&state), 1);
}

#[test]
fn count_refresh_fans_out_the_overlay_counts_while_searching() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    struct Recorder(RefCell<Vec<(usize, usize)>>);
    impl CountListener for Recorder {
        fn count_updated(&self, categories: usize, snippets: usize) {
            self.0.borrow_mut().push((categories, snippets));
        }
    }

    let recorder = Rc::new(Recorder(RefCell::new(Vec::new())));
    state.add_count_listener(recorder.clone());

    state.refresh_counts(&controller);
    activate_search(&mut controller, &mut state, &["sort"]);
    state.refresh_counts(&controller);

    assert_eq!(*recorder.0.borrow(), vec![(2, 3), (1, 2)]);
}

#[test]
fn an_empty_search_result_does_not_make_the_database_empty() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    activate_search(&mut controller, &mut state, &["no-such-keyword"]);
    assert_eq!(controller.count_snippets(&state), 0);
    assert!(!state.is_database_empty(controller.store()));
}

#[test]
fn inserting_during_a_search_lands_in_the_store_not_the_overlay() {
    let (_dir, mut controller) = seeded();
    let mut state = State::new();

    activate_search(&mut controller, &mut state, &["sort"]);
    assert!(controller.insert_new_snippet(&snippet("Sorting", "HeapSort", "fn heapify() {}")));

    // the overlay keeps showing only what the search matched
    assert_eq!(
        controller.snippet_names(&state, "Sorting"),
        vec!["BubbleSort", "QuickSort"]
    );
    assert!(controller.store().get_snippet("HeapSort").is_some());
}
