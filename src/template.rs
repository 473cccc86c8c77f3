//! Template compilation: literal token substitution.
//!
//! A template is plain text. Compiling it with a parameter set replaces every
//! occurrence of each parameter's key with its value. There is no escaping and
//! no control flow. A token is any literal substring, by convention a `$name`.
//!
//! Replacements are applied one parameter at a time over the accumulating
//! text. If a value inserted by one replacement happens to contain another
//! parameter's key, a later replacement rewrites it too. Templates that want
//! stable output should use tokens that cannot appear in values, and should
//! not use one token as a prefix of another (`$title` vs `$title_long`).

use crate::cache::{CacheStats, TemplateCache};
use crate::params::{TemplateParam, merge_params};
use crate::storage::Storage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {filename}: {source}")]
    Read {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error("template {filename} is not valid UTF-8")]
    Encoding { filename: String },
}

/// Replace every occurrence of each key with its value, in order.
///
/// Empty keys are skipped.
pub fn substitute(template: &str, params: &[TemplateParam]) -> String {
    let mut output = template.to_string();
    for param in params {
        if param.key.is_empty() {
            continue;
        }
        output = output.replace(param.key.as_str(), &param.value);
    }
    output
}

/// Compiles templates from a cached template directory.
///
/// Owns the [`TemplateCache`] for one build run, so each template file is
/// read at most once no matter how many pages use it.
pub struct Compiler<'s, S: Storage + ?Sized> {
    storage: &'s S,
    cache: TemplateCache,
}

impl<'s, S: Storage + ?Sized> Compiler<'s, S> {
    pub fn new(storage: &'s S, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            cache: TemplateCache::new(templates_dir),
        }
    }

    /// Compile `template_file` with `explicit` parameters over `defaults`.
    pub fn compile(
        &mut self,
        template_file: &str,
        explicit: &[TemplateParam],
        defaults: &[TemplateParam],
    ) -> Result<String, TemplateError> {
        let raw = self.cache.get(self.storage, template_file)?;
        let params = merge_params(explicit, defaults);
        Ok(substitute(raw, &params))
    }

    /// Make sure `template_file` is readable without compiling it.
    pub fn preload(&mut self, template_file: &str) -> Result<(), TemplateError> {
        self.cache.get(self.storage, template_file).map(|_| ())
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::MockStorage;

    fn params(entries: &[(&str, &str)]) -> Vec<TemplateParam> {
        entries
            .iter()
            .map(|(k, v)| TemplateParam::new(*k, *v))
            .collect()
    }

    // =========================================================================
    // substitute
    // =========================================================================

    #[test]
    fn replaces_token() {
        assert_eq!(
            substitute("<p>$name</p>", &params(&[("$name", "Ann")])),
            "<p>Ann</p>"
        );
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        let template = "<p>nothing to see</p>";
        assert_eq!(substitute(template, &params(&[("$name", "Ann")])), template);
        assert_eq!(substitute(template, &[]), template);
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            substitute("$x + $x = 2$x", &params(&[("$x", "1")])),
            "1 + 1 = 21"
        );
    }

    #[test]
    fn keys_without_sigil_are_literal_substrings() {
        assert_eq!(
            substitute("Hello NAME", &params(&[("NAME", "Bob")])),
            "Hello Bob"
        );
    }

    #[test]
    fn earlier_value_can_be_rewritten_by_later_key() {
        // Replacements run sequentially over the accumulated text.
        let out = substitute(
            "<h1>$title</h1>",
            &params(&[("$title", "$site home"), ("$site", "Shift")]),
        );
        assert_eq!(out, "<h1>Shift home</h1>");

        let out = substitute(
            "<h1>$title</h1>",
            &params(&[("$site", "Shift"), ("$title", "$site home")]),
        );
        assert_eq!(out, "<h1>$site home</h1>");
    }

    #[test]
    fn empty_key_is_skipped() {
        assert_eq!(substitute("abc", &params(&[("", "X")])), "abc");
    }

    #[test]
    fn value_may_be_empty() {
        assert_eq!(
            substitute("<p>$note</p>", &params(&[("$note", "")])),
            "<p></p>"
        );
    }

    // =========================================================================
    // Compiler
    // =========================================================================

    #[test]
    fn compile_merges_explicit_over_defaults() {
        let storage =
            MockStorage::new().with_file("t/head.html", "<title>$title</title><html lang=\"$lang\">");
        let mut compiler = Compiler::new(&storage, "t");

        let out = compiler
            .compile(
                "head.html",
                &params(&[("$title", "About")]),
                &params(&[("$title", "Home"), ("$lang", "en")]),
            )
            .unwrap();
        assert_eq!(out, "<title>About</title><html lang=\"en\">");
    }

    #[test]
    fn compile_with_defaults_only() {
        let storage = MockStorage::new().with_file("t/f.html", "© $owner");
        let mut compiler = Compiler::new(&storage, "t");
        let out = compiler
            .compile("f.html", &[], &params(&[("$owner", "Ann")]))
            .unwrap();
        assert_eq!(out, "© Ann");
    }

    #[test]
    fn compile_reads_each_template_once() {
        let storage = MockStorage::new().with_file("t/head.html", "<head>$title</head>");
        let mut compiler = Compiler::new(&storage, "t");

        let a = compiler
            .compile("head.html", &params(&[("$title", "A")]), &[])
            .unwrap();
        let b = compiler
            .compile("head.html", &params(&[("$title", "B")]), &[])
            .unwrap();

        assert_eq!(a, "<head>A</head>");
        assert_eq!(b, "<head>B</head>");
        assert_eq!(storage.read_count("t/head.html"), 1);
        assert_eq!(compiler.cache_stats(), CacheStats { reads: 1, hits: 1 });
    }

    #[test]
    fn compile_missing_template_fails() {
        let storage = MockStorage::new();
        let mut compiler = Compiler::new(&storage, "t");
        let err = compiler.compile("gone.html", &[], &[]).unwrap_err();
        assert!(err.to_string().contains("gone.html"));
    }

    #[test]
    fn preload_fills_cache() {
        let storage = MockStorage::new().with_file("t/a.html", "A");
        let mut compiler = Compiler::new(&storage, "t");
        compiler.preload("a.html").unwrap();
        assert!(compiler.cache().contains("a.html"));
        assert!(compiler.preload("b.html").is_err());
    }
}
