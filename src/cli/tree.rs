use crate::controller::Controller;
use crate::state::State;
use colored::Colorize;
use std::error::Error;

/// Displays categories and their snippets as a tree. When a search is
/// active on `state` the tree shows the overlay instead of the full
/// database, because every read goes through the controller.
pub fn display_tree(
    controller: &Controller,
    state: &State,
    category: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let categories = match category {
        Some(name) => vec![name.to_string()],
        None => controller.get_categories(state),
    };

    if categories.is_empty() {
        println!("{}  No categories found in database.", "┃".bright_magenta());
        return Ok(());
    }

    for name in &categories {
        println!(
            "{}  {} {}",
            "┃".bright_magenta(),
            "󰉋".bright_blue(),
            name.bold()
        );
        print_category_contents(controller, state, name);
    }

    Ok(())
}

/// Prints the snippets of one category with tree connectors.
fn print_category_contents(controller: &Controller, state: &State, category: &str) {
    let names = controller.snippet_names(state, category);
    let count = names.len();

    for (idx, name) in names.iter().enumerate() {
        let is_last = idx == count - 1;
        let connector = if is_last { "└── " } else { "├── " };

        let snippet = controller.get_snippet(name);
        let locked = snippet.as_ref().map(|s| s.locked).unwrap_or(false);
        let syntax = snippet
            .as_ref()
            .map(|s| s.syntax.clone())
            .unwrap_or_default();

        let lock_marker = if locked { " ".yellow() } else { "".normal() };
        let syntax_label = if syntax.is_empty() {
            String::new()
        } else {
            format!(" [{}]", syntax)
        };

        println!(
            "{}  {}{}{}{}",
            "┃".bright_magenta(),
            connector,
            lock_marker,
            name.bright_white(),
            syntax_label.bright_black()
        );
    }
}

/// Finds a category by name, case insensitive; exact match wins over the
/// first partial match.
pub fn find_category(controller: &Controller, state: &State, name: &str) -> Option<String> {
    let wanted = name.to_lowercase();
    let categories = controller.get_categories(state);

    if let Some(exact) = categories.iter().find(|c| c.to_lowercase() == wanted) {
        return Some(exact.clone());
    }

    categories
        .iter()
        .find(|c| c.to_lowercase().contains(&wanted))
        .cloned()
}

/// Lists every category with its snippet count.
pub fn list_categories(controller: &Controller, state: &State) -> Result<(), Box<dyn Error>> {
    let categories = controller.get_categories(state);

    if categories.is_empty() {
        println!("{}  No categories found in database.", "┃".bright_magenta());
        return Ok(());
    }

    for (idx, category) in categories.iter().enumerate() {
        let count = controller.snippet_names(state, category).len();
        println!(
            "{}  {}. {} {}",
            "┃".bright_magenta(),
            (idx + 1).to_string().bright_yellow(),
            category.bright_white().bold(),
            format!("({} snippets)", count).bright_black()
        );
    }

    Ok(())
}
