pub mod defaults;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// A named aesthetic bucket. Vibes key element libraries together with the
/// fashion style, and key rotation state via `key()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vibe {
    pub category: String,
    pub mood: String,
}

impl Vibe {
    pub fn new(category: &str, mood: &str) -> Self {
        Vibe {
            category: category.trim().to_lowercase(),
            mood: mood.trim().to_lowercase(),
        }
    }

    /// Stable rotation-state key for this bucket.
    pub fn key(&self) -> String {
        format!("{}_{}", self.category, self.mood)
    }
}

/// Immutable reference data: the ordered element lists the rotation indices
/// walk through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementLibrary {
    pub category: String,
    pub mood: String,
    pub fashion_style: String,
    pub outfits: Vec<String>,
    pub locations: Vec<String>,
    pub accessories: Vec<String>,
    pub lighting: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LibrariesFile {
    libraries: Vec<ElementLibrary>,
}

/// Read-only library source. Built-in defaults, overridable by a JSON
/// catalog file; a missing or corrupt file logs and falls back.
pub struct LibraryCatalog {
    libraries: HashMap<(String, String, String), ElementLibrary>,
}

impl LibraryCatalog {
    pub fn builtin() -> Self {
        Self::from_libraries(defaults::builtin_libraries())
    }

    pub fn load(path: &Path) -> Self {
        match load_libraries_from_path(path) {
            Some(libraries) if !libraries.is_empty() => {
                info!(
                    "Loaded {} element librar(ies) from {}",
                    libraries.len(),
                    path.display()
                );
                Self::from_libraries(libraries)
            }
            _ => Self::builtin(),
        }
    }

    pub fn from_libraries(libraries: Vec<ElementLibrary>) -> Self {
        let libraries = libraries
            .into_iter()
            .map(|library| {
                (
                    (
                        library.category.to_lowercase(),
                        library.mood.to_lowercase(),
                        library.fashion_style.to_lowercase(),
                    ),
                    library,
                )
            })
            .collect();
        LibraryCatalog { libraries }
    }

    pub fn resolve(
        &self,
        category: &str,
        mood: &str,
        fashion_style: &str,
    ) -> EngineResult<&ElementLibrary> {
        let key = (
            category.trim().to_lowercase(),
            mood.trim().to_lowercase(),
            fashion_style.trim().to_lowercase(),
        );
        self.libraries
            .get(&key)
            .ok_or_else(|| EngineError::LibraryNotFound {
                category: key.0.clone(),
                mood: key.1.clone(),
                fashion_style: key.2.clone(),
            })
    }
}

fn load_libraries_from_path(path: &Path) -> Option<Vec<ElementLibrary>> {
    if !path.exists() {
        info!("Element library config not found at {}", path.display());
        return None;
    }

    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            info!(
                "Failed to read element library config at {}: {}",
                path.display(),
                err
            );
            return None;
        }
    };

    match serde_json::from_str::<LibrariesFile>(&raw) {
        Ok(parsed) => Some(parsed.libraries),
        Err(err) => {
            info!(
                "Failed to parse element library config at {}: {}",
                path.display(),
                err
            );
            None
        }
    }
}
