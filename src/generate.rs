//! Build driver.
//!
//! Walks `pagesToBuild` in order and, for each id:
//!
//! 1. Looks up the first page definition with that id. An unknown id is
//!    logged, recorded in the report and skipped. The run continues.
//! 2. Composes the page (see [`crate::compose`]).
//! 3. Writes it to `<output_dir>/<id>.html`.
//!
//! Any template read failure or write failure aborts the run. Pages written
//! before the failure stay on disk.
//!
//! ## Output Structure
//!
//! ```text
//! <output_dir>/
//! ├── index.html
//! ├── about.html
//! └── ...
//! ```
//!
//! [`check`] runs the same lookups without writing anything: it loads every
//! referenced template and collects the configuration's diagnostics.

use crate::cache::CacheStats;
use crate::compose::{ComposeError, PageComposer};
use crate::config::{Configuration, Diagnostic, Slot};
use crate::storage::Storage;
use crate::template::{Compiler, TemplateError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to build page '{id}': {source}")]
    Compose {
        id: String,
        #[source]
        source: ComposeError,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Where templates come from and where pages go.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl GenerateOptions {
    pub fn new(templates_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// A page written during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub id: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Result of a build run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Pages in the order they were written. A page listed twice appears twice.
    pub written: Vec<WrittenPage>,
    /// Build-list ids with no page definition, in build-list order.
    pub skipped: Vec<String>,
    pub cache: CacheStats,
}

/// Output filename for a page id.
pub fn output_filename(id: &str) -> String {
    format!("{id}.html")
}

/// Build every page listed in `config.pages_to_build`.
pub fn generate<S: Storage + ?Sized>(
    config: &Configuration,
    storage: &S,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    let compiler = Compiler::new(storage, &options.templates_dir);
    let mut composer = PageComposer::new(config, compiler);
    let mut report = GenerateReport {
        output_dir: options.output_dir.clone(),
        ..GenerateReport::default()
    };

    for id in &config.pages_to_build {
        let Some(page) = config.find_page(id) else {
            log::warn!("Page {{{id}}} not found in config! Failed to build.");
            report.skipped.push(id.clone());
            continue;
        };

        let html = composer
            .compose(page)
            .map_err(|source| GenerateError::Compose {
                id: id.clone(),
                source,
            })?;

        let path = options.output_dir.join(output_filename(&page.id));
        storage
            .write_file(&path, html.as_bytes())
            .map_err(|source| GenerateError::Write {
                path: path.clone(),
                source,
            })?;
        log::debug!("wrote {} ({} bytes)", path.display(), html.len());

        report.written.push(WrittenPage {
            id: page.id.clone(),
            path,
            bytes: html.len(),
        });
    }

    report.cache = composer.compiler().cache_stats();
    Ok(report)
}

/// Result of a dry run.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Distinct template files that were loaded successfully, in first-use order.
    pub templates: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Whether every listed page can be built.
    pub fn is_buildable(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingSlot(_)))
    }
}

/// Validate a configuration against its templates without writing output.
///
/// Every slot template and every page's content template must be readable;
/// the first unreadable one is returned as an error, just as a build would.
pub fn check<S: Storage + ?Sized>(
    config: &Configuration,
    storage: &S,
    templates_dir: &Path,
) -> Result<CheckReport, GenerateError> {
    let mut compiler = Compiler::new(storage, templates_dir);
    let mut report = CheckReport {
        templates: Vec::new(),
        diagnostics: config.diagnostics(),
    };

    let slot_files = Slot::ALL
        .into_iter()
        .filter_map(|slot| config.slot(slot))
        .map(|t| t.file.as_str());
    let content_files = config.pages.iter().map(|p| p.content_file.as_str());

    for file in slot_files.chain(content_files) {
        if compiler.cache().contains(file) {
            continue;
        }
        compiler.preload(file)?;
        report.templates.push(file.to_string());
    }

    for diagnostic in &report.diagnostics {
        log::warn!("{diagnostic}");
    }
    Ok(report)
}
