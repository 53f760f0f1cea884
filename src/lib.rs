//! snipkeep - Terminal Snippet Collector
//!
//! A small tool for storing, organizing and retrieving short source-code
//! snippets. Snippets live in user-defined categories, carry tags, an
//! optional comment and a named highlighting style, and can be searched
//! over a configurable set of fields. Whole categories (or the entire
//! collection) travel between machines as XML snippet packages.
//!
//! The crate is organized around a small coordination core:
//! - [`models`]: the snippet/syntax/tag value types and the file-backed
//!   snippet store
//! - [`search`]: the scope filter and the overlay holding the last
//!   search's results
//! - [`controller`]: the facade routing every operation to the store or
//!   the overlay, depending on whether a search is active
//! - [`state`] and [`listener`]: the hub broadcasting selection, status
//!   and count changes to registered views

pub mod cli;
pub mod controller;
pub mod listener;
pub mod models;
pub mod search;
pub mod settings;
pub mod state;
