//! Template cache for a single build run.
//!
//! The head, header, footer and body templates are shared by every page, so
//! without a cache a build would re-read them once per page. [`TemplateCache`]
//! memoizes raw template text by filename:
//!
//! - The first request for a filename reads `templates_dir/filename` through
//!   the [`Storage`] collaborator and keeps the full text.
//! - Later requests for the same filename are answered from memory.
//! - A failed read is returned to the caller immediately and nothing is
//!   stored, so the build aborts on it.
//!
//! There is no eviction or invalidation. A cache lives exactly as long as the
//! build that owns it.

use crate::storage::Storage;
use crate::template::TemplateError;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Raw template text keyed by filename.
#[derive(Debug)]
pub struct TemplateCache {
    templates_dir: PathBuf,
    templates: HashMap<String, String>,
    stats: CacheStats,
}

impl TemplateCache {
    /// Empty cache reading templates from `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            templates: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Raw text of `filename`, read through `storage` at most once.
    pub fn get<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        filename: &str,
    ) -> Result<&str, TemplateError> {
        if self.templates.contains_key(filename) {
            self.stats.hit();
        } else {
            let content = self.read(storage, filename)?;
            self.stats.read();
            self.templates.insert(filename.to_string(), content);
        }
        Ok(self.templates[filename].as_str())
    }

    fn read<S: Storage + ?Sized>(
        &self,
        storage: &S,
        filename: &str,
    ) -> Result<String, TemplateError> {
        let path = self.templates_dir.join(filename);
        log::debug!("reading template {}", path.display());
        let bytes = storage.read_file(&path).map_err(|source| TemplateError::Read {
            filename: filename.to_string(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| TemplateError::Encoding {
            filename: filename.to_string(),
        })
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.templates.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Lookup counts for one build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that went to storage.
    pub reads: u32,
    /// Lookups answered from memory.
    pub hits: u32,
}

impl CacheStats {
    pub fn read(&mut self) {
        self.reads += 1;
    }

    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn total(&self) -> u32 {
        self.reads + self.hits
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.reads == 1 { "template" } else { "templates" };
        if self.hits > 0 {
            write!(
                f,
                "{} {} read, {} served from cache",
                self.reads, noun, self.hits
            )
        } else {
            write!(f, "{} {} read", self.reads, noun)
        }
    }
}
