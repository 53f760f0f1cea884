//! Command-line interface for snipkeep. Every invocation builds the full
//! composition (settings, store, filter, overlay, controller, state) and
//! runs one command against it.

pub mod commands;
pub mod tree;

use colored::Colorize;
use std::error::Error;

/// Executes one CLI command based on the provided arguments.
pub fn execute_cli(args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    match args[0].as_str() {
        "list" | "ls" => {
            let session = commands::Session::open()?;

            let category = if args.len() > 1 {
                match tree::find_category(&session.controller, &session.state, &args[1]) {
                    Some(category) => Some(category),
                    None => {
                        println!(
                            "{}  No category found with name: {}",
                            "┃".bright_magenta(),
                            args[1]
                        );
                        tree::list_categories(&session.controller, &session.state)?;
                        return Ok(());
                    }
                }
            } else {
                None
            };

            tree::display_tree(&session.controller, &session.state, category.as_deref())?;
        }
        "categories" => {
            let session = commands::Session::open()?;
            tree::list_categories(&session.controller, &session.state)?;
        }
        "show" | "view" | "cat" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet name", "┃".bright_magenta());
                println!("{}  Usage: snipkeep show <NAME>", "┃".bright_magenta());
                return Ok(());
            }
            commands::show_snippet(&args[1])?;
        }
        "search" | "find" => {
            if args.len() < 2 {
                println!("{}  Error: Missing search query", "┃".bright_magenta());
                println!("{}  Usage: snipkeep search <KEYWORDS...>", "┃".bright_magenta());
                return Ok(());
            }
            commands::search_snippets(&args[1..])?;
        }
        "add" | "new" => {
            commands::add_snippet(&args[1..])?;
        }
        "rm" | "remove" => {
            if args.len() < 2 {
                println!("{}  Usage: snipkeep rm <NAME>", "┃".bright_magenta());
                return Ok(());
            }
            commands::remove_snippet(&args[1])?;
        }
        "rm-category" => {
            if args.len() < 2 {
                println!("{}  Usage: snipkeep rm-category <NAME>", "┃".bright_magenta());
                return Ok(());
            }
            commands::remove_category(&args[1])?;
        }
        "mv" | "rename" => {
            if args.len() < 3 {
                println!(
                    "{}  Usage: snipkeep mv <OLD_CATEGORY> <NEW_CATEGORY>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::rename_category(&args[1], &args[2])?;
        }
        "mv-snippet" => {
            if args.len() < 3 {
                println!(
                    "{}  Usage: snipkeep mv-snippet <NAME> <CATEGORY>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::move_snippet(&args[1], &args[2])?;
        }
        "lock" | "unlock" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: snipkeep {} <NAME>",
                    "┃".bright_magenta(),
                    args[0]
                );
                return Ok(());
            }
            commands::lock_snippet(&args[1], args[0] == "lock")?;
        }
        "syntax" => {
            if args.len() < 3 {
                println!(
                    "{}  Usage: snipkeep syntax <CATEGORY> <STYLE>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::set_syntax(&args[1], &args[2])?;
        }
        "filter" | "filters" => {
            commands::filter_command(&args[1..])?;
        }
        "export" => {
            if args.len() < 2 {
                println!(
                    "{}  Usage: snipkeep export <FILE> [CATEGORY]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }
            commands::export_package(&args[1], args.get(2).map(String::as_str))?;
        }
        "import" => {
            if args.len() < 2 {
                println!("{}  Usage: snipkeep import <FILE>", "┃".bright_magenta());
                return Ok(());
            }
            commands::import_package(&args[1])?;
        }
        "backup" => {
            commands::backup_database()?;
        }
        "help" => {
            print_help();
        }
        _ => {
            println!("{}  Unknown command: {}", "┃".bright_magenta(), args[0]);
            print_help();
        }
    }

    Ok(())
}

/// Prints the help message with available commands.
fn print_help() {
    let margin = "┃".bright_magenta();

    println!("{}  {}", margin, "SNIPKEEP - SNIPPET COLLECTOR".bold());
    println!("{}  {}", margin, "USAGE:".bright_yellow());
    println!("{}  snipkeep [COMMAND] [ARGS]", margin);
    println!("{}  {}", margin, "COMMANDS:".bright_yellow());

    let commands: &[(&str, &str)] = &[
        ("list, ls [CATEGORY]", "List categories and snippets as a tree"),
        ("categories", "List all categories with snippet counts"),
        ("show, view <NAME>", "Display a snippet (partial name works)"),
        ("search, find <KEYWORDS>", "Search snippets in the enabled scopes"),
        ("add <CATEGORY> <NAME>", "Add a snippet (code from --file or stdin)"),
        ("rm <NAME>", "Remove a snippet"),
        ("rm-category <NAME>", "Remove a category and all its snippets"),
        ("mv <OLD> <NEW>", "Rename (or merge) a category"),
        ("mv-snippet <NAME> <CAT>", "Move a snippet to another category"),
        ("lock, unlock <NAME>", "Mark a snippet read-only, or undo that"),
        ("syntax <CATEGORY> <STYLE>", "Set the highlight style of a category"),
        ("filter [SCOPE on|off]", "Show or change the search scopes"),
        ("export <FILE> [CATEGORY]", "Export snippets as an XML package"),
        ("import <FILE>", "Import an XML snippet package"),
        ("backup", "Copy the database to a timestamped backup"),
        ("help", "Display this help message"),
    ];

    for (command, description) in commands {
        println!(
            "{}  {:<27} {}",
            margin,
            command.bright_white(),
            description
        );
    }
}
