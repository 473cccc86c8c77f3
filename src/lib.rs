//! # Pagesmith
//!
//! A static HTML page generator. A single `config.json` lists the pages to
//! build, four shared templates, and per-page parameters. Every page is
//! composed from the same head/body/header/footer hierarchy by literal string
//! substitution and written as `<page id>.html`.
//!
//! # Architecture: Compose Pipeline
//!
//! ```text
//! config.json ──► Configuration ──► generate ──► PageComposer ──► Compiler ──► TemplateCache
//!                 (params blocks                  (5 templates      (merge +     (one read per
//!                  parsed here)                    per page)         substitute)   file per run)
//! ```
//!
//! For each page the composer compiles, in order: head, content,
//! body-header, body-footer (with `$year` injected), and finally body, which
//! receives the three rendered fragments as `$body_header`, `$body_footer`
//! and `$body_content`. The document is
//! `<!DOCTYPE html><html>{head}{body}</html>`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`params`] | Params-block parser and explicit-over-defaults merge |
//! | [`config`] | `config.json` model, loading, validation, diagnostics |
//! | [`storage`] | File read/write collaborator ([`storage::Storage`]) |
//! | [`cache`] | Per-run template cache |
//! | [`template`] | Token substitution and the template [`template::Compiler`] |
//! | [`compose`] | Assembles one page from the five templates |
//! | [`generate`] | Build driver: walks `pagesToBuild`, writes pages; dry-run `check` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Params Blocks Are Parsed As Text
//!
//! Parameter blocks look like JSON objects but are split line by line (see
//! [`params`]). Existing configuration files depend on this: duplicate keys
//! survive, order is kept, and keys are arbitrary literal tokens.
//!
//! ## State Is Passed, Not Global
//!
//! The configuration, the template cache and the storage collaborator are
//! owned by the build run and passed down. Two builds in one process share
//! nothing, which keeps tests isolated.
//!
//! ## Fatal vs. Recoverable
//!
//! A build-list id without a page definition is logged and skipped. Every
//! other failure (config, template read, output write) ends the run.

pub mod cache;
pub mod compose;
pub mod config;
pub mod generate;
pub mod output;
pub mod params;
pub mod storage;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
