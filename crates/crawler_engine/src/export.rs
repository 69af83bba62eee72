use std::path::{Path, PathBuf};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::ExerciseRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Write `content.json`: a pretty-printed array of import-ready records.
pub fn write_content_json(
    output_dir: &Path,
    records: &[ExerciseRecord],
) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(records)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    Ok(writer.write("content.json", &json)?)
}

/// Write one Markdown preview per record: `content.md` for a single record,
/// `content-<n>.md` (1-based) for several.
pub fn write_markdown_previews(
    output_dir: &Path,
    records: &[ExerciseRecord],
) -> Result<Vec<PathBuf>, ExportError> {
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let mut paths = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let filename = if records.len() > 1 {
            format!("content-{}.md", index + 1)
        } else {
            "content.md".to_string()
        };
        let preview = format!("# {}\n\n{}", record.header, record.body);
        paths.push(writer.write(&filename, &preview)?);
    }
    Ok(paths)
}
