//! Build configuration (`config.json`).
//!
//! The configuration names the pages to build, the four global template
//! slots, and every page definition:
//!
//! ```json
//! {
//!     "pagesToBuild": ["index", "about"],
//!     "head":        { "template": "head.html",   "templateParams": { ... } },
//!     "body":        { "template": "body.html" },
//!     "body_header": { "template": "header.html", "templateParams": { ... } },
//!     "body_footer": { "template": "footer.html", "templateParams": { ... } },
//!     "pages": [
//!         {
//!             "id": "index",
//!             "content": "index.html",
//!             "contentParams": { ... },
//!             "headParams": { ... },
//!             "headerParams": { ... },
//!             "footerParams": { ... }
//!         }
//!     ]
//! }
//! ```
//!
//! Every `{ ... }` params block is parsed line by line, see [`crate::params`].
//! All params blocks and all four slots are optional. An absent block is an
//! empty parameter set. An absent slot only becomes an error when a page is
//! composed.
//!
//! Unknown keys are ignored.

use crate::params::TemplateParams;
use crate::storage::Storage;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Page ids to build, in build order. Ids may repeat.
    pub pages_to_build: Vec<String>,
    pub head: Option<Template>,
    pub body: Option<Template>,
    #[serde(rename = "body_header")]
    pub body_header: Option<Template>,
    #[serde(rename = "body_footer")]
    pub body_footer: Option<Template>,
    pub pages: Vec<Page>,
}

/// A template file plus the defaults applied when it is compiled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Template {
    /// Filename relative to the templates directory.
    #[serde(rename = "template")]
    pub file: String,
    #[serde(default, rename = "templateParams")]
    pub params: TemplateParams,
}

/// One output page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    /// Content template filename, relative to the templates directory.
    #[serde(rename = "content")]
    pub content_file: String,
    #[serde(default)]
    pub content_params: TemplateParams,
    #[serde(default)]
    pub head_params: TemplateParams,
    #[serde(default)]
    pub header_params: TemplateParams,
    #[serde(default)]
    pub footer_params: TemplateParams,
}

/// The four global template roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Head,
    Body,
    BodyHeader,
    BodyFooter,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Head, Slot::Body, Slot::BodyHeader, Slot::BodyFooter];

    /// Key of the slot in `config.json`.
    pub fn name(self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::Body => "body",
            Slot::BodyHeader => "body_header",
            Slot::BodyFooter => "body_footer",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-fatal finding about a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A `pagesToBuild` entry with no page definition. Skipped at build time.
    UnknownPageId(String),
    /// A `pagesToBuild` entry listed more than once. Built each time.
    DuplicateBuildId(String),
    /// Several pages share an id. Only the first is ever built.
    DuplicatePageId(String),
    /// A slot is not configured. Building any page will fail.
    MissingSlot(Slot),
    /// The body slot has `templateParams`. The body only receives the
    /// rendered header, footer and content, so these are never applied.
    IgnoredBodyParams,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownPageId(id) => {
                write!(f, "page '{id}' is listed in pagesToBuild but not defined")
            }
            Diagnostic::DuplicateBuildId(id) => {
                write!(f, "page '{id}' is listed in pagesToBuild more than once")
            }
            Diagnostic::DuplicatePageId(id) => write!(
                f,
                "page id '{id}' is defined more than once, the first definition wins"
            ),
            Diagnostic::MissingSlot(slot) => write!(f, "template slot '{slot}' is not configured"),
            Diagnostic::IgnoredBodyParams => {
                write!(f, "templateParams on the body slot are ignored")
            }
        }
    }
}

impl Configuration {
    /// Decode a configuration from JSON text and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Configuration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject records the build could not use at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for slot in Slot::ALL {
            if let Some(template) = self.slot(slot)
                && template.file.trim().is_empty()
            {
                return Err(ConfigError::Validation(format!(
                    "{slot}.template must not be empty"
                )));
            }
        }
        for (idx, page) in self.pages.iter().enumerate() {
            if page.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "pages[{idx}].id must not be empty"
                )));
            }
            if page.content_file.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "page '{}' has an empty content template",
                    page.id
                )));
            }
        }
        Ok(())
    }

    pub fn slot(&self, slot: Slot) -> Option<&Template> {
        match slot {
            Slot::Head => self.head.as_ref(),
            Slot::Body => self.body.as_ref(),
            Slot::BodyHeader => self.body_header.as_ref(),
            Slot::BodyFooter => self.body_footer.as_ref(),
        }
    }

    /// First page with this id.
    pub fn find_page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Non-fatal findings, in a stable order: slots, page definitions, build list.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();

        for slot in Slot::ALL {
            if self.slot(slot).is_none() {
                found.push(Diagnostic::MissingSlot(slot));
            }
        }
        if self.body.as_ref().is_some_and(|b| !b.params.is_empty()) {
            found.push(Diagnostic::IgnoredBodyParams);
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for page in &self.pages {
            if !seen.insert(page.id.as_str()) && reported.insert(page.id.as_str()) {
                found.push(Diagnostic::DuplicatePageId(page.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for id in &self.pages_to_build {
            if self.find_page(id).is_none() {
                if reported.insert(("unknown", id.as_str())) {
                    found.push(Diagnostic::UnknownPageId(id.clone()));
                }
            } else if !seen.insert(id.as_str()) && reported.insert(("duplicate", id.as_str())) {
                found.push(Diagnostic::DuplicateBuildId(id.clone()));
            }
        }

        found
    }
}

/// Read, decode and validate the configuration file at `path`.
pub fn load_config<S: Storage + ?Sized>(
    storage: &S,
    path: &Path,
) -> Result<Configuration, ConfigError> {
    let bytes = storage.read_file(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: Configuration = serde_json::from_slice(&bytes)?;
    config.validate()?;
    Ok(config)
}

/// A documented starter `config.json`, printed by `gen-config`.
///
/// Params blocks keep one pair per line; that layout is what the parser
/// relies on.
pub fn stock_config_json() -> &'static str {
    r#"{
    "pagesToBuild": ["index", "about"],

    "head": {
        "template": "head.html",
        "templateParams": {
            "$title": "My Site",
            "$description": "Pages built from shared templates"
        }
    },
    "body": {
        "template": "body.html"
    },
    "body_header": {
        "template": "header.html",
        "templateParams": {
            "$nav_active": "index"
        }
    },
    "body_footer": {
        "template": "footer.html",
        "templateParams": {
            "$owner": "My Site"
        }
    },

    "pages": [
        {
            "id": "index",
            "content": "index.html",
            "contentParams": {
                "$greeting": "Welcome"
            },
            "headParams": {}
        },
        {
            "id": "about",
            "content": "about.html",
            "contentParams": {},
            "headParams": {
                "$title": "About | My Site"
            },
            "headerParams": {
                "$nav_active": "about"
            }
        }
    ]
}
"#
}
