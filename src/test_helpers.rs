//! Shared test utilities for the pagesmith test suite.
//!
//! Provides an in-memory sample site (configuration plus templates), fixture
//! copying for filesystem tests, and lookups that panic with a clear message.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let config = sample_config();
//! let storage = sample_storage();
//! let report = generate(&config, &storage, &options()).unwrap();
//! assert_eq!(written_ids(&report), vec!["index", "bare"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::Configuration;
use crate::generate::{GenerateOptions, GenerateReport};
use crate::storage::tests::MockStorage;

// =========================================================================
// In-memory sample site
// =========================================================================

/// Configuration with all four slots and two pages:
///
/// - `index`: sets content, head and header params
/// - `bare`: no params at all, so every slot falls back to its defaults
pub fn sample_config() -> Configuration {
    Configuration::from_json(
        "{\n\
         \"pagesToBuild\": [\"index\", \"bare\"],\n\
         \"head\": {\"template\": \"head.html\", \"templateParams\": {\n\
             \"$title\": \"Shift\",\n\
             \"$lang\": \"en\"\n\
         }},\n\
         \"body\": {\"template\": \"body.html\"},\n\
         \"body_header\": {\"template\": \"header.html\", \"templateParams\": {\n\
             \"$nav\": \"none\"\n\
         }},\n\
         \"body_footer\": {\"template\": \"footer.html\", \"templateParams\": {\n\
             \"$owner\": \"Shift\"\n\
         }},\n\
         \"pages\": [\n\
             {\"id\": \"index\", \"content\": \"index.html\",\n\
              \"contentParams\": {\n\
                  \"$greeting\": \"Welcome\"\n\
              },\n\
              \"headParams\": {\n\
                  \"$title\": \"Home | Shift\"\n\
              },\n\
              \"headerParams\": {\n\
                  \"$nav\": \"index\"\n\
              }},\n\
             {\"id\": \"bare\", \"content\": \"index.html\"}\n\
         ]\n\
         }",
    )
    .unwrap()
}

/// Templates for [`sample_config`] under `templates/`.
pub fn sample_storage() -> MockStorage {
    MockStorage::new()
        .with_file(
            "templates/head.html",
            "<head><title>$title</title><meta lang=\"$lang\"></head>",
        )
        .with_file(
            "templates/body.html",
            "<body>$body_header<main>$body_content</main>$body_footer</body>",
        )
        .with_file("templates/header.html", "<header>nav:$nav</header>")
        .with_file("templates/footer.html", "<footer>© $year $owner</footer>")
        .with_file("templates/index.html", "<h1>$greeting</h1>")
}

/// Options matching [`sample_storage`]: templates in `templates/`, output in `out/`.
pub fn options() -> GenerateOptions {
    GenerateOptions::new("templates", "out")
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Report lookups
// =========================================================================

/// Ids of written pages, in build order.
pub fn written_ids(report: &GenerateReport) -> Vec<&str> {
    report.written.iter().map(|p| p.id.as_str()).collect()
}

/// Output of a written page. Panics if it was not written.
pub fn page_html(storage: &MockStorage, report: &GenerateReport, id: &str) -> String {
    let page = report
        .written
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| {
            let ids = written_ids(report);
            panic!("page '{id}' was not written. Written: {ids:?}")
        });
    storage.contents(&page.path)
}
