use serde::Serialize;

/// Result of extracting one legacy page: title, Markdown body and every
/// image reference discovered in the content region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub header: String,
    pub body: String,
    pub images: Vec<ImageRef>,
}

/// One `<img>` found in the content region, paired with the local filename
/// the Markdown body refers to. `local_path` is `image-<n>.<ext>` with `n`
/// counting images in document order from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub original_url: String,
    pub local_path: String,
}

/// Database-import shape written to `content.json`. The exercise type is
/// filled in by the driver, not by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub header: String,
    pub body: String,
    pub exercise_type_id: String,
}

/// Fatal per-document extraction failures. None of these has a
/// partial-output mode: the caller gets the error and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("could not find .entry-header h1.entry-title in HTML")]
    MissingTitleRegion,
    #[error("page title is empty")]
    EmptyTitle,
    #[error("could not find .entry-content in HTML")]
    MissingContentRegion,
}
