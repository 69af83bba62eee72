use url::Url;

const DEFAULT_EXTENSION: &str = "jpg";

/// Local filename for the `index`-th image (1-based, document order):
/// `image-<index>.<ext>`, where the extension comes from the source URL.
pub fn image_filename(index: usize, src: &str) -> String {
    format!("image-{index}.{}", extension_for(src))
}

/// Lowercased extension of the URL's final path segment, without the dot.
/// Query strings and fragments are stripped before detection; URLs with no
/// usable extension fall back to `jpg`.
fn extension_for(src: &str) -> String {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_string(),
        // Relative reference: drop query/fragment by hand.
        Err(_) => {
            let end = src.find(['?', '#']).unwrap_or(src.len());
            src[..end].to_string()
        }
    };

    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_plausible_extension(ext) => {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

fn is_plausible_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
