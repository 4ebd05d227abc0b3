#![forbid(unsafe_code)]

use std::io::Write;
use std::path::Path;

use kush_core::PageSnapshot;
use kush_runtime::StoreConfig;
use serde::Serialize;

use crate::error::{CliError, Result};

/// Load and validate the store configuration. `.json` files are read as
/// JSON, anything else as TOML; no path means the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<StoreConfig> {
    let Some(path) = path else {
        return Ok(StoreConfig::default());
    };
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => StoreConfig::from_json_file(path)?,
        _ => StoreConfig::from_toml_file(path)?,
    };
    tracing::debug!(target: "kush.cli", path = %path.display(), "config loaded");
    Ok(config.validated()?)
}

/// Read a page snapshot file. Records missing required fields are skipped
/// and counted; only malformed JSON is an error.
pub fn read_page(path: &Path) -> Result<PageSnapshot> {
    let json = std::fs::read_to_string(path)?;
    let (page, report) = PageSnapshot::extract(&json).map_err(|source| CliError::Page {
        path: path.to_path_buf(),
        source,
    })?;
    if report.total_skipped() > 0 {
        tracing::warn!(
            target: "kush.cli",
            path = %path.display(),
            skipped = report.total_skipped(),
            ?report,
            "page records skipped"
        );
    }
    Ok(page)
}

pub fn read_optional_page(path: Option<&Path>) -> Result<PageSnapshot> {
    path.map_or_else(|| Ok(PageSnapshot::default()), read_page)
}

/// Write `value` as one line of compact JSON.
pub fn write_json_line(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_format_follows_extension() {
        let dir = tempdir().expect("tempdir");
        let toml_path = dir.path().join("store.toml");
        std::fs::write(&toml_path, "[order]\nnumber = \"250700000000\"\n").expect("write");
        let json_path = dir.path().join("store.json");
        std::fs::write(&json_path, r#"{"tracker":{"margin":40}}"#).expect("write");

        assert_eq!(load_config(Some(&toml_path)).expect("toml").order.number, "250700000000");
        assert_eq!(load_config(Some(&json_path)).expect("json").tracker.margin, 40.0);
        assert_eq!(load_config(None).expect("default"), StoreConfig::default());
    }

    #[test]
    fn invalid_config_is_a_usage_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"timing":{"notice_ms":0}}"#).expect("write");
        let err = load_config(Some(&path)).expect_err("invalid");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn malformed_page_names_the_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.json");
        std::fs::write(&path, "{ not json").expect("write");
        let err = read_page(&path).expect_err("malformed");
        assert!(matches!(err, CliError::Page { .. }));
        assert!(err.to_string().contains("page.json"));
    }

    #[test]
    fn json_lines_are_newline_terminated() {
        let mut out = Vec::new();
        write_json_line(&mut out, &serde_json::json!({"a": 1})).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "{\"a\":1}\n");
    }
}
