//! Crawler engine: HTML content extraction and its IO collaborators.
//!
//! The core is [`extract_and_convert`], a pure transformation from one legacy
//! HTML page to a [`ParsedContent`] record (title, Markdown body, image
//! references). Everything else — fetching, input-source resolution,
//! persistence, export — serves the batch driver around that core.
mod bullets;
mod convert;
mod embed;
mod export;
mod extract;
mod fetch;
mod filename;
mod persist;
mod rewrite;
mod source;
mod types;

pub use convert::{tidy_markdown, Converter, Html2MdConverter};
pub use export::{write_content_json, write_markdown_previews, ExportError};
pub use extract::{extract_and_convert, extract_and_convert_with, extract_title};
pub use fetch::{Fetch, FetchError, FetchSettings, ReqwestFetcher};
pub use filename::image_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use rewrite::UPLOADS_PREFIX;
pub use source::{
    detect_source_kind, read_list_file, resolve_sources, InputSource, SourceError, SourceKind,
};
pub use types::{ExerciseRecord, ExtractError, ImageRef, ParsedContent};
