use crate::models::Snippet;
use crate::search::SearchFilter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// On-disk shape of the database file: the id counter plus every snippet,
/// keyed by its unique name.
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    next_id: i64,
    snippets: BTreeMap<String, Snippet>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            next_id: 1,
            snippets: BTreeMap::new(),
        }
    }
}

/// The persistence gateway: CRUD and search over snippets, backed by a
/// single JSON database file. Categories are not a separate entity; they
/// are derived from the snippets' category field.
///
/// Mutating operations report success as a plain bool: a failed
/// precondition (missing name, duplicate name) returns false with no side
/// effects, and an I/O failure is logged and also surfaced as false.
#[derive(Debug)]
pub struct SnippetStore {
    data_dir: PathBuf,
    database_file: PathBuf,
    data: StoreData,
}

impl SnippetStore {
    /// Opens the store under the platform data directory,
    /// e.g. `~/.local/share/snipkeep`.
    pub fn open_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join("snipkeep");
        Self::open(data_dir)
    }

    /// Opens (creating if necessary) the store rooted at `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let database_file = data_dir.join("database.json");
        let data = if database_file.exists() {
            let content = fs::read_to_string(&database_file)
                .with_context(|| format!("Failed to read {}", database_file.display()))?;
            serde_json::from_str(&content).context("Failed to parse database file")?
        } else {
            StoreData::default()
        };

        debug!(
            "opened snippet database at {} ({} snippets)",
            database_file.display(),
            data.snippets.len()
        );

        Ok(Self {
            data_dir,
            database_file,
            data,
        })
    }

    pub fn database_file(&self) -> &Path {
        &self.database_file
    }

    fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.data)
            .context("Failed to serialize database")?;
        fs::write(&self.database_file, content)
            .with_context(|| format!("Failed to write {}", self.database_file.display()))
    }

    fn persist(&self) -> bool {
        match self.flush() {
            Ok(()) => true,
            Err(err) => {
                error!("snippet database not saved: {err:#}");
                false
            }
        }
    }

    pub fn count_categories(&self) -> usize {
        self.data
            .snippets
            .values()
            .map(|s| s.category.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn count_snippets(&self) -> usize {
        self.data.snippets.len()
    }

    /// Distinct category names in natural sort order.
    pub fn get_categories(&self) -> Vec<String> {
        self.data
            .snippets
            .values()
            .map(|s| s.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn get_category_of(&self, name: &str) -> Option<String> {
        self.data.snippets.get(name).map(|s| s.category.clone())
    }

    pub fn get_snippet(&self, name: &str) -> Option<Snippet> {
        self.data.snippets.get(name).cloned()
    }

    /// Names of the snippets in `category`, sorted. An unknown category is
    /// an empty list, not an error.
    pub fn get_snippets_names(&self, category: &str) -> Vec<String> {
        self.data
            .snippets
            .values()
            .filter(|s| s.category == category)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn get_snippets(&self, category: &str) -> Vec<Snippet> {
        self.data
            .snippets
            .values()
            .filter(|s| s.category == category)
            .cloned()
            .collect()
    }

    pub fn get_all_snippets(&self) -> Vec<Snippet> {
        self.data.snippets.values().cloned().collect()
    }

    /// Inserts a new snippet, assigning its id. Fails on a blank name or
    /// category and on a name already taken.
    pub fn insert_new_snippet(&mut self, snippet: &Snippet) -> bool {
        if snippet.name.trim().is_empty() || snippet.category.trim().is_empty() {
            return false;
        }
        if self.data.snippets.contains_key(&snippet.name) {
            return false;
        }

        let mut stored = snippet.clone();
        stored.id = self.data.next_id;
        self.data.next_id += 1;
        self.data.snippets.insert(stored.name.clone(), stored);

        self.persist()
    }

    /// Replaces `old` with `new`, keeping the persisted id. Category and
    /// name may both change in one call; a rename onto a taken name fails.
    pub fn update_snippet(&mut self, old: &Snippet, new: &Snippet) -> bool {
        let Some(current) = self.data.snippets.get(&old.name) else {
            return false;
        };
        if new.name.trim().is_empty() || new.category.trim().is_empty() {
            return false;
        }
        if new.name != old.name && self.data.snippets.contains_key(&new.name) {
            return false;
        }

        let id = current.id;
        self.data.snippets.remove(&old.name);

        let mut stored = new.clone();
        stored.id = id;
        self.data.snippets.insert(stored.name.clone(), stored);

        self.persist()
    }

    pub fn remove_snippet(&mut self, name: &str) -> bool {
        if self.data.snippets.remove(name).is_none() {
            return false;
        }

        self.persist()
    }

    /// Removes every named snippet as a batch. If any name is unknown
    /// nothing is removed.
    pub fn remove_snippets(&mut self, names: &[String]) -> bool {
        if names.iter().any(|n| !self.data.snippets.contains_key(n)) {
            return false;
        }

        for name in names {
            self.data.snippets.remove(name);
        }

        self.persist()
    }

    /// Removes every snippet belonging to `category`. Fails if the
    /// category holds no snippets.
    pub fn remove_category(&mut self, category: &str) -> bool {
        let names = self.get_snippets_names(category);
        if names.is_empty() {
            return false;
        }

        for name in &names {
            self.data.snippets.remove(name);
        }

        self.persist()
    }

    /// Re-homes every snippet of `old` to `new`. Fails if `old` holds no
    /// snippets.
    pub fn rename_category(&mut self, old: &str, new: &str) -> bool {
        let mut touched = false;
        for snippet in self.data.snippets.values_mut() {
            if snippet.category == old {
                snippet.category = new.to_string();
                touched = true;
            }
        }

        if !touched {
            return false;
        }

        self.persist()
    }

    /// Re-homes exactly the named snippets to `new_category`. If any name
    /// is unknown nothing is re-homed.
    pub fn rename_category_of(&mut self, names: &[String], new_category: &str) -> bool {
        if names.iter().any(|n| !self.data.snippets.contains_key(n)) {
            return false;
        }

        for name in names {
            if let Some(snippet) = self.data.snippets.get_mut(name) {
                snippet.category = new_category.to_string();
            }
        }

        self.persist()
    }

    pub fn lock_snippet(&mut self, name: &str, locked: bool) -> bool {
        let Some(snippet) = self.data.snippets.get_mut(name) else {
            return false;
        };
        snippet.locked = locked;

        self.persist()
    }

    /// Applies `syntax` to every snippet of `category` except `excluded`
    /// (typically the snippet currently open in the editor, which is saved
    /// separately). Fails if the category holds no snippets.
    pub fn set_syntax_to_category(
        &mut self,
        syntax: &str,
        category: &str,
        excluded: Option<&str>,
    ) -> bool {
        let mut found = false;
        for snippet in self.data.snippets.values_mut() {
            if snippet.category != category {
                continue;
            }
            found = true;
            if excluded != Some(snippet.name.as_str()) {
                snippet.syntax = syntax.to_string();
            }
        }

        if !found {
            return false;
        }

        self.persist()
    }

    /// Applies `syntax` to exactly the named snippets. If any name is
    /// unknown nothing is touched.
    pub fn set_syntax_to_snippets(&mut self, syntax: &str, names: &[String]) -> bool {
        if names.iter().any(|n| !self.data.snippets.contains_key(n)) {
            return false;
        }

        for name in names {
            if let Some(snippet) = self.data.snippets.get_mut(name) {
                snippet.syntax = syntax.to_string();
            }
        }

        self.persist()
    }

    /// Runs a free-text search over the enabled scopes. A snippet matches
    /// when every keyword appears in at least one enabled field. With no
    /// keywords or no enabled scope the result is empty.
    pub fn search(
        &self,
        keywords: &[String],
        filter: &SearchFilter,
    ) -> BTreeMap<String, BTreeSet<String>> {
        let mut results: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(|k| {
                if filter.case_sensitive {
                    k.to_string()
                } else {
                    k.to_lowercase()
                }
            })
            .collect();

        if keywords.is_empty() || filter.count_enabled() == 0 {
            return results;
        }

        for snippet in self.data.snippets.values() {
            let matches = keywords
                .iter()
                .all(|keyword| keyword_matches(snippet, keyword, filter));

            if matches {
                results
                    .entry(snippet.category.clone())
                    .or_default()
                    .insert(snippet.name.clone());
            }
        }

        results
    }

    /// Copies the database file into `backups/` with a timestamped name.
    pub fn backup(&self) -> Result<PathBuf> {
        self.flush()?;

        let backup_dir = self.data_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .with_context(|| format!("Failed to create {}", backup_dir.display()))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup_file = backup_dir.join(format!("backup_{}.json", timestamp));
        fs::copy(&self.database_file, &backup_file).context("Failed to copy database file")?;

        Ok(backup_file)
    }
}

fn keyword_matches(snippet: &Snippet, keyword: &str, filter: &SearchFilter) -> bool {
    let contains = |text: &str| {
        if filter.case_sensitive {
            text.contains(keyword)
        } else {
            text.to_lowercase().contains(keyword)
        }
    };

    if filter.in_name && contains(&snippet.name) {
        return true;
    }
    if filter.in_tags && snippet.tags.iter().any(|t| contains(t)) {
        return true;
    }
    if filter.in_code && contains(&snippet.code) {
        return true;
    }
    if filter.in_comment && contains(&snippet.comment) {
        return true;
    }

    false
}
