//! Page composition.
//!
//! A page is assembled from five compiled templates. The order matters:
//! the body consumes the rendered header, footer and content as parameter
//! values.
//!
//! | Step | Template | Explicit params | Defaults |
//! |------|----------|-----------------|----------|
//! | 1 | `head` slot | page `headParams` | `head` slot params |
//! | 2 | page `content` | page `contentParams` | none |
//! | 3 | `body_header` slot | page `headerParams` | `body_header` slot params |
//! | 4 | `body_footer` slot | page `footerParams` + `$year` | `body_footer` slot params |
//! | 5 | `body` slot | none | `$body_header`, `$body_footer`, `$body_content` |
//!
//! The document is then `<!DOCTYPE html><html>` + head + body + `</html>`.
//!
//! A page's own `$year` is dropped and the injected one appended, so the
//! footer always holds the current year. The body slot's own
//! `templateParams` are not applied.

use crate::config::{Configuration, Page, Slot, Template};
use crate::params::TemplateParam;
use crate::storage::Storage;
use crate::template::{Compiler, TemplateError};
use chrono::Datelike;
use thiserror::Error;

/// Footer token replaced by the current calendar year.
pub const YEAR_TOKEN: &str = "$year";
/// Body token replaced by the compiled body-header.
pub const BODY_HEADER_TOKEN: &str = "$body_header";
/// Body token replaced by the compiled body-footer.
pub const BODY_FOOTER_TOKEN: &str = "$body_footer";
/// Body token replaced by the compiled page content.
pub const BODY_CONTENT_TOKEN: &str = "$body_content";

const DOCUMENT_OPEN: &str = "<!DOCTYPE html><html>";
const DOCUMENT_CLOSE: &str = "</html>";

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("template slot '{0}' is not configured")]
    MissingSlot(Slot),
}

/// The current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Wrap compiled head and body in the fixed document shell.
pub fn assemble_document(head: &str, body: &str) -> String {
    let mut document = String::with_capacity(
        DOCUMENT_OPEN.len() + head.len() + body.len() + DOCUMENT_CLOSE.len(),
    );
    document.push_str(DOCUMENT_OPEN);
    document.push_str(head);
    document.push_str(body);
    document.push_str(DOCUMENT_CLOSE);
    document
}

/// Composes pages for one configuration, sharing one template cache.
pub struct PageComposer<'a, S: Storage + ?Sized> {
    config: &'a Configuration,
    compiler: Compiler<'a, S>,
    year: i32,
}

impl<'a, S: Storage + ?Sized> PageComposer<'a, S> {
    /// Composer stamping footers with the current year.
    pub fn new(config: &'a Configuration, compiler: Compiler<'a, S>) -> Self {
        Self::with_year(config, compiler, current_year())
    }

    /// Composer stamping footers with a fixed `year`.
    pub fn with_year(config: &'a Configuration, compiler: Compiler<'a, S>, year: i32) -> Self {
        Self {
            config,
            compiler,
            year,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn compiler(&self) -> &Compiler<'a, S> {
        &self.compiler
    }

    /// Full HTML document for `page`.
    pub fn compose(&mut self, page: &Page) -> Result<String, ComposeError> {
        let config = self.config;
        let head_slot = slot(config, Slot::Head)?;
        let body_slot = slot(config, Slot::Body)?;
        let header_slot = slot(config, Slot::BodyHeader)?;
        let footer_slot = slot(config, Slot::BodyFooter)?;

        let head = self.compiler.compile(
            &head_slot.file,
            page.head_params.as_slice(),
            head_slot.params.as_slice(),
        )?;

        let content = self
            .compiler
            .compile(&page.content_file, page.content_params.as_slice(), &[])?;

        let header = self.compiler.compile(
            &header_slot.file,
            page.header_params.as_slice(),
            header_slot.params.as_slice(),
        )?;

        let mut footer_params = page.footer_params.as_slice().to_vec();
        footer_params.retain(|p| p.key != YEAR_TOKEN);
        footer_params.push(TemplateParam::new(YEAR_TOKEN, self.year.to_string()));
        let footer = self.compiler.compile(
            &footer_slot.file,
            &footer_params,
            footer_slot.params.as_slice(),
        )?;

        let body_params = [
            TemplateParam::new(BODY_HEADER_TOKEN, header),
            TemplateParam::new(BODY_FOOTER_TOKEN, footer),
            TemplateParam::new(BODY_CONTENT_TOKEN, content),
        ];
        let body = self.compiler.compile(&body_slot.file, &[], &body_params)?;

        Ok(assemble_document(&head, &body))
    }
}

fn slot(config: &Configuration, slot: Slot) -> Result<&Template, ComposeError> {
    config.slot(slot).ok_or(ComposeError::MissingSlot(slot))
}
