use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use thiserror::Error;

/// How an input descriptor should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    HtmlFile,
    Url,
    ListFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub kind: SourceKind,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("list file not found: {0}")]
    NotFound(String),
    #[error("list file is empty or contains no valid entries: {0}")]
    EmptyList(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// URLs are recognized by scheme prefix, `.txt` files are treated as source
/// lists, anything else is assumed to be an HTML file on disk.
pub fn detect_source_kind(input: &str) -> SourceKind {
    if input.starts_with("http://") || input.starts_with("https://") {
        return SourceKind::Url;
    }
    if input.ends_with(".txt") {
        return SourceKind::ListFile;
    }
    SourceKind::HtmlFile
}

/// Entries of a list file: one source per line, blank lines and `#` comments
/// skipped. An effectively empty file is an error.
pub fn read_list_file(path: &Path) -> Result<Vec<String>, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(SourceError::EmptyList(path.display().to_string()));
    }
    debug!("read {} source(s) from {}", lines.len(), path.display());
    Ok(lines)
}

/// Expand an input descriptor into the concrete sources to process. A list
/// file yields one source per entry; list files do not nest.
pub fn resolve_sources(input: &str) -> Result<Vec<InputSource>, SourceError> {
    match detect_source_kind(input) {
        SourceKind::ListFile => {
            let entries = read_list_file(Path::new(input))?;
            Ok(entries
                .into_iter()
                .map(|value| InputSource {
                    kind: detect_source_kind(&value),
                    value,
                })
                .collect())
        }
        kind => Ok(vec![InputSource {
            kind,
            value: input.to_string(),
        }]),
    }
}

#[cfg(test)]
mod tests {
    use super::{detect_source_kind, read_list_file, resolve_sources, SourceError, SourceKind};
    use std::io::Write;

    #[test]
    fn kind_detection_covers_all_three_shapes() {
        assert_eq!(detect_source_kind("https://example.com/x"), SourceKind::Url);
        assert_eq!(detect_source_kind("http://example.com"), SourceKind::Url);
        assert_eq!(detect_source_kind("sources.txt"), SourceKind::ListFile);
        assert_eq!(detect_source_kind("docs/page.html"), SourceKind::HtmlFile);
    }

    #[test]
    fn list_file_skips_comments_and_blank_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sources.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# legacy pages").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  docs/one.html  ").unwrap();
        writeln!(file, "https://example.com/two").unwrap();

        let entries = read_list_file(&path).unwrap();
        assert_eq!(entries, vec!["docs/one.html", "https://example.com/two"]);
    }

    #[test]
    fn comment_only_list_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sources.txt");
        std::fs::write(&path, "# nothing here\n\n").unwrap();

        assert!(matches!(
            read_list_file(&path),
            Err(SourceError::EmptyList(_))
        ));
    }

    #[test]
    fn missing_list_file_is_an_error() {
        assert!(matches!(
            read_list_file(std::path::Path::new("no-such-file.txt")),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn list_entries_are_re_detected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sources.txt");
        std::fs::write(&path, "https://example.com/a\ndocs/b.html\n").unwrap();

        let sources = resolve_sources(path.to_str().unwrap()).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, SourceKind::Url);
        assert_eq!(sources[1].kind, SourceKind::HtmlFile);
    }
}
