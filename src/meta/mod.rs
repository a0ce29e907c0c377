//! Per-entry descriptions shown beside listing lines.
//!
//! Descriptions come from a `descript.ion` file in the listed directory, one
//! entry per line:
//!
//! ```text
//! "name with spaces.txt" Quarterly figures
//! notes.md Meeting notes
//! ```

/// `descript.ion` parsing.
pub mod descriptions;

pub use descriptions::parse_descriptions;

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the description file looked up in each directory.
pub const DESCRIPTION_FILE: &str = "descript.ion";

/// Source of per-entry metadata text.
pub trait MetadataSource {
    /// Description of `name` inside `directory`, if any.
    ///
    /// Names may carry the trailing `/` directory marker; it is ignored.
    fn lookup(&mut self, name: &str, directory: &Path) -> Option<String>;
}

/// Descriptions of the current directory, reloaded when the directory changes.
#[derive(Debug, Default)]
pub struct DescriptionCache {
    /// Directory the cached descriptions belong to.
    directory: Option<PathBuf>,
    /// Name to description.
    descriptions: HashMap<String, String>,
}

impl DescriptionCache {
    /// Empty cache bound to no directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the cache to `directory`, reloading its description file if the
    /// directory differs from the current one.
    pub fn enter_directory(&mut self, directory: &Path) {
        if self.directory.as_deref() == Some(directory) {
            return;
        }

        self.descriptions = load_descriptions(directory);
        self.directory = Some(directory.to_path_buf());
    }

    /// Cached description of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.strip_suffix('/').unwrap_or(name);
        self.descriptions
            .get(name)
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }
}

impl MetadataSource for DescriptionCache {
    fn lookup(&mut self, name: &str, directory: &Path) -> Option<String> {
        self.enter_directory(directory);
        self.get(name).map(str::to_string)
    }
}

fn load_descriptions(directory: &Path) -> HashMap<String, String> {
    let path = directory.join(DESCRIPTION_FILE);
    match fs::read(&path) {
        Ok(bytes) => {
            let descriptions = parse_descriptions(&String::from_utf8_lossy(&bytes));
            debug!(path = %path.display(), count = descriptions.len(), "Descriptions loaded");
            descriptions
        }
        Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read descriptions");
            HashMap::new()
        }
    }
}
