use crate::controller::Controller;
use crate::listener::CountListener;
use crate::models::{Snippet, SnippetStore, package};
use crate::search::SearchFilter;
use crate::settings::Settings;
use crate::state::State;
use colored::Colorize;
use std::error::Error;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;
use tracing::warn;

/// Everything a command needs: settings, the state hub and the controller
/// in front of the store and the search overlay. This is the composition
/// point: each component is built exactly once per invocation and handed
/// to whoever needs it.
pub(crate) struct Session {
    pub settings: Settings,
    pub state: State,
    pub controller: Controller,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let settings = Settings::load_default();
        let store = SnippetStore::open_default()?;
        let filter = SearchFilter::from_settings(&settings);
        let controller = Controller::new(store, filter);

        let mut state = State::new();
        state.add_count_listener(Rc::new(StatusLine));

        Ok(Self {
            settings,
            state,
            controller,
        })
    }

    /// Persists the settings, logging instead of failing the command.
    fn save_settings(&self) {
        if let Err(err) = self.settings.save_default() {
            warn!("settings not saved: {err:#}");
        }
    }
}

/// Count listener that prints the totals line shown after mutations,
/// standing in for the status bar of the desktop incarnation.
struct StatusLine;

impl CountListener for StatusLine {
    fn count_updated(&self, categories: usize, snippets: usize) {
        println!(
            "{}  {}",
            "┃".bright_magenta(),
            format!("{} categories, {} snippets", categories, snippets).bright_black()
        );
    }
}

/// Shows a snippet by name (exact first, then partial match) and records
/// it as the current selection.
pub fn show_snippet(name: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let resolved = match session.controller.get_snippet(name) {
        Some(snippet) => Some(snippet),
        None => {
            let wanted = name.to_lowercase();
            session
                .controller
                .store()
                .get_all_snippets()
                .into_iter()
                .find(|s| s.name.to_lowercase().contains(&wanted))
        }
    };

    let Some(snippet) = resolved else {
        println!(
            "{}  No snippet found with name: {}",
            "┃".bright_magenta(),
            name
        );
        return Ok(());
    };

    display_snippet(&snippet);

    session
        .state
        .set_selected_category(Some(snippet.category.clone()));
    session
        .state
        .set_selected_snippet(Some(snippet.name.clone()));
    session
        .state
        .update_snippet_status(true, true, snippet.locked);

    session.settings.selected_snippet = Some(snippet.name.clone());
    session.save_settings();

    Ok(())
}

fn display_snippet(snippet: &Snippet) {
    println!(
        "{}  {} {}{}",
        "┃".bright_magenta(),
        "SNIPPET".bright_green().bold(),
        snippet.name.bold(),
        if snippet.locked {
            "  (locked)".yellow()
        } else {
            "".normal()
        }
    );
    println!("{}", "─".repeat(60).bright_magenta());

    println!(
        "{}  {}: {}",
        "┃".bright_magenta(),
        "Category".bright_blue(),
        snippet.category
    );
    if !snippet.tags.is_empty() {
        println!(
            "{}  {}: {}",
            "┃".bright_magenta(),
            "Tags".bright_cyan(),
            snippet.tags_as_string()
        );
    }
    if !snippet.syntax.is_empty() {
        println!(
            "{}  {}: {}",
            "┃".bright_magenta(),
            "Syntax".bright_yellow(),
            snippet.syntax
        );
    }
    if !snippet.comment.is_empty() {
        println!(
            "{}  {}: {}",
            "┃".bright_magenta(),
            "Comment".bright_cyan(),
            snippet.comment
        );
    }
    println!("{}", "─".repeat(60).bright_magenta());

    for line in snippet.code.lines() {
        println!("{}  {}", "┃".bright_magenta(), line);
    }
}

/// Runs a search with the persisted scope filter and shows the matches
/// grouped by category. The result set is installed as the active
/// overlay for the lifetime of the command, so the listing below goes
/// through exactly the same routed reads the desktop views use.
pub fn search_snippets(terms: &[String]) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let filter = *session.controller.filter();
    if filter.count_enabled() == 0 {
        println!(
            "{}  All search scopes are disabled; enable one with: snipkeep filter <scope> on",
            "┃".bright_magenta()
        );
        return Ok(());
    }

    let data = session.controller.search(terms);
    session.controller.set_search_data(data);
    session.state.update_search(true);

    println!(
        "{}  {} '{}' {}",
        "┃".bright_magenta(),
        "SEARCH RESULTS FOR".bold(),
        terms.join(" ").bright_white(),
        format!(
            "({} of 4 scopes)",
            session.controller.active_filter_count(&session.state)
        )
        .bright_black()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    let categories = session.controller.get_categories(&session.state);
    if categories.is_empty() {
        println!("{}  No snippets matched.", "┃".bright_magenta());
    } else {
        super::tree::display_tree(&session.controller, &session.state, None)?;
        session.state.refresh_counts(&session.controller);
    }

    // the process ends here, which cancels the search
    session.state.update_search(false);
    session.controller.clear_search();

    Ok(())
}

/// Inserts a new snippet. Usage:
/// `add <category> <name> [--file F] [--tags a,b] [--syntax S] [--comment C]`;
/// without `--file` the code is read from stdin.
pub fn add_snippet(args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.len() < 2 {
        println!(
            "{}  Usage: snipkeep add <CATEGORY> <NAME> [--file F] [--tags a,b] [--syntax S] [--comment C]",
            "┃".bright_magenta()
        );
        return Ok(());
    }

    let category = &args[0];
    let name = &args[1];

    let mut file: Option<&str> = None;
    let mut tags: Vec<String> = Vec::new();
    let mut syntax = String::new();
    let mut comment = String::new();

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let value = rest.next();
        match (flag.as_str(), value) {
            ("--file", Some(v)) => file = Some(v.as_str()),
            ("--tags", Some(v)) => {
                tags = v
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            ("--syntax", Some(v)) => syntax = v.clone(),
            ("--comment", Some(v)) => comment = v.clone(),
            _ => {
                println!("{}  Unknown option: {}", "┃".bright_magenta(), flag);
                return Ok(());
            }
        }
    }

    let code = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            println!(
                "{}  Reading code from stdin (end with Ctrl-D)...",
                "┃".bright_magenta()
            );
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut session = Session::open()?;
    let snippet = Snippet::new(category, name, tags, code, comment, syntax);

    if session.controller.insert_new_snippet(&snippet) {
        println!(
            "{}  Added {} to {}",
            "┃".bright_magenta(),
            name.bright_white().bold(),
            category.bright_blue()
        );
        session.state.snippet_edited(&snippet);
        session.state.refresh_counts(&session.controller);
    } else {
        println!(
            "{}  A snippet named {} already exists (names are unique).",
            "┃".bright_magenta(),
            name.bright_white().bold()
        );
    }

    Ok(())
}

pub fn remove_snippet(name: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let Some(snippet) = session.controller.get_snippet(name) else {
        println!(
            "{}  No snippet found with name: {}",
            "┃".bright_magenta(),
            name
        );
        return Ok(());
    };

    if session.controller.remove_snippet(&session.state, name) {
        println!(
            "{}  Removed {}",
            "┃".bright_magenta(),
            name.bright_white().bold()
        );
        session.state.snippet_removed(&snippet);
        session.state.refresh_counts(&session.controller);
    } else {
        println!("{}  Could not remove {}", "┃".bright_magenta(), name);
    }

    Ok(())
}

pub fn remove_category(name: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    if session.controller.remove_category(&session.state, name) {
        println!(
            "{}  Removed category {}",
            "┃".bright_magenta(),
            name.bright_white().bold()
        );
        session.state.category_removed(name);
        session.state.refresh_counts(&session.controller);
    } else {
        println!(
            "{}  No category found with name: {}",
            "┃".bright_magenta(),
            name
        );
    }

    Ok(())
}

pub fn rename_category(old: &str, new: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    if session.controller.rename_category(&session.state, old, new) {
        println!(
            "{}  Renamed category {} to {}",
            "┃".bright_magenta(),
            old.bright_white(),
            new.bright_white().bold()
        );
        session.state.category_renamed(old, new);
        session.state.categories_updated(new);
        session.state.refresh_counts(&session.controller);
    } else {
        println!(
            "{}  No category found with name: {}",
            "┃".bright_magenta(),
            old
        );
    }

    Ok(())
}

/// Moves one snippet to another category via an explicit re-homed copy,
/// so the original stays intact if the update fails.
pub fn move_snippet(name: &str, category: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let Some(snippet) = session.controller.get_snippet(name) else {
        println!(
            "{}  No snippet found with name: {}",
            "┃".bright_magenta(),
            name
        );
        return Ok(());
    };

    let moved = snippet.with_category(category);
    session.state.set_previous_snippet(Some(snippet.clone()));

    if session
        .controller
        .update_snippet(&session.state, &snippet, &moved)
    {
        println!(
            "{}  Moved {} to {}",
            "┃".bright_magenta(),
            name.bright_white().bold(),
            category.bright_blue()
        );
        session.state.snippet_edited(&moved);
        session.state.refresh_counts(&session.controller);
    } else {
        println!("{}  Could not move {}", "┃".bright_magenta(), name);
    }

    Ok(())
}

pub fn lock_snippet(name: &str, locked: bool) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    if session.controller.lock_snippet(name, locked) {
        println!(
            "{}  {} {}",
            "┃".bright_magenta(),
            if locked { "Locked" } else { "Unlocked" },
            name.bright_white().bold()
        );
        session.state.update_snippet_status(true, true, locked);
    } else {
        println!(
            "{}  No snippet found with name: {}",
            "┃".bright_magenta(),
            name
        );
    }

    Ok(())
}

/// Applies a highlighting style to every snippet of a category (minus the
/// current selection, which the editor saves on its own).
pub fn set_syntax(category: &str, syntax: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let excluded = session.state.selected_snippet().map(str::to_owned);
    if session
        .controller
        .update_syntax(&session.state, syntax, category, excluded.as_deref())
    {
        println!(
            "{}  Set syntax of {} to {}",
            "┃".bright_magenta(),
            category.bright_blue(),
            syntax.bright_yellow()
        );
        session.state.syntax_renamed(syntax, category);
    } else {
        println!(
            "{}  No category found with name: {}",
            "┃".bright_magenta(),
            category
        );
    }

    Ok(())
}

/// Shows or flips the search scope toggles. The "at least one scope
/// enabled" rule lives here, in the command layer, not in the filter.
pub fn filter_command(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;
    let mut filter = *session.controller.filter();

    if args.is_empty() {
        let onoff = |enabled: bool| if enabled { "on".green() } else { "off".red() };
        println!("{}  {}", "┃".bright_magenta(), "SEARCH SCOPES".bold());
        println!("{}  name:    {}", "┃".bright_magenta(), onoff(filter.in_name));
        println!("{}  tags:    {}", "┃".bright_magenta(), onoff(filter.in_tags));
        println!("{}  code:    {}", "┃".bright_magenta(), onoff(filter.in_code));
        println!("{}  comment: {}", "┃".bright_magenta(), onoff(filter.in_comment));
        println!(
            "{}  case:    {}",
            "┃".bright_magenta(),
            onoff(filter.case_sensitive)
        );
        return Ok(());
    }

    if args.len() != 2 {
        println!(
            "{}  Usage: snipkeep filter <name|tags|code|comment|case> <on|off>",
            "┃".bright_magenta()
        );
        return Ok(());
    }

    let enabled = match args[1].as_str() {
        "on" => true,
        "off" => false,
        other => {
            println!("{}  Expected on/off, got: {}", "┃".bright_magenta(), other);
            return Ok(());
        }
    };

    match args[0].as_str() {
        "name" => filter.in_name = enabled,
        "tags" => filter.in_tags = enabled,
        "code" => filter.in_code = enabled,
        "comment" => filter.in_comment = enabled,
        "case" => filter.case_sensitive = enabled,
        other => {
            println!("{}  Unknown scope: {}", "┃".bright_magenta(), other);
            return Ok(());
        }
    }

    if filter.count_enabled() == 0 {
        println!(
            "{}  At least one search scope must stay enabled.",
            "┃".bright_magenta()
        );
        return Ok(());
    }

    filter.apply(&mut session.settings);
    session.settings.save_default()?;
    session.controller.set_filter(filter);

    println!(
        "{}  Search scope {} is now {}",
        "┃".bright_magenta(),
        args[0].bright_white(),
        args[1].bright_white().bold()
    );

    Ok(())
}

/// Exports the whole database (or one category) as an XML package.
pub fn export_package(path: &str, category: Option<&str>) -> Result<(), Box<dyn Error>> {
    let session = Session::open()?;

    let snippets = match category {
        Some(name) => session.controller.store().get_snippets(name),
        None => session.controller.store().get_all_snippets(),
    };

    if snippets.is_empty() {
        println!("{}  Nothing to export.", "┃".bright_magenta());
        return Ok(());
    }

    package::export_snippets(Path::new(path), &snippets)?;
    println!(
        "{}  Exported {} snippets to {}",
        "┃".bright_magenta(),
        snippets.len().to_string().bright_yellow(),
        path.bright_white()
    );

    Ok(())
}

/// Imports an XML package, skipping snippets whose names are taken.
pub fn import_package(path: &str) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let snippets = package::read_package(Path::new(path))?;
    let mut imported = 0;
    let mut skipped = 0;

    for snippet in &snippets {
        if session.controller.insert_new_snippet(snippet) {
            imported += 1;
        } else {
            skipped += 1;
        }
    }

    println!(
        "{}  Imported {} snippets from {}{}",
        "┃".bright_magenta(),
        imported.to_string().bright_yellow(),
        path.bright_white(),
        if skipped > 0 {
            format!(" ({} skipped: names already taken)", skipped)
        } else {
            String::new()
        }
    );
    session.state.refresh_counts(&session.controller);

    Ok(())
}

pub fn backup_database() -> Result<(), Box<dyn Error>> {
    let session = Session::open()?;
    let backup = session.controller.store().backup()?;
    println!(
        "{}  Database backed up to {}",
        "┃".bright_magenta(),
        backup.display().to_string().bright_white()
    );
    Ok(())
}
