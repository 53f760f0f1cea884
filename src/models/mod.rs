pub mod package;
pub mod snippet;
pub mod storage;
pub mod syntax;
pub mod tags;

pub use snippet::{Snippet, UNSAVED_ID};
pub use storage::SnippetStore;
pub use syntax::Syntax;
pub use tags::Tag;
