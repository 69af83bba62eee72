//! YouTube embed handling.
//!
//! The Markdown engine has no notion of video embeds, so matching iframes are
//! replaced with a sentinel paragraph before conversion and the sentinel is
//! decoded to the final `@[youtube](...)` syntax afterwards. Encoding and
//! decoding live here as a pair so the sentinel format has a single owner.

use std::sync::LazyLock;

use regex::Regex;

const SENTINEL_PREFIX: &str = "YOUTUBEVIDEO::";

static EMBED_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/embed/([^/?]+)").expect("embed src pattern")
});

// The conversion engine may escape underscores in the video id, so the
// sentinel pattern has to accept backslashes and the decoder removes them.
static SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"YOUTUBEVIDEO::([A-Za-z0-9\\_-]+)").expect("sentinel pattern")
});

/// Video id from an iframe `src`: the path segment after `/embed/`, up to the
/// first `?` or `/`. `None` for anything that is not a YouTube embed URL.
pub fn extract_video_id(src: &str) -> Option<&str> {
    EMBED_SRC
        .captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Sentinel paragraph carrying `video_id` through Markdown conversion.
pub fn encode_sentinel(video_id: &str) -> String {
    format!("<p>{SENTINEL_PREFIX}{video_id}</p>")
}

/// Rewrite every sentinel in converted Markdown to
/// `@[youtube](https://youtu.be/<id>)`, un-escaping `\_` in the captured id.
pub fn decode_sentinels(markdown: &str) -> String {
    SENTINEL
        .replace_all(markdown, |caps: &regex::Captures| {
            let video_id = caps[1].replace("\\_", "_");
            format!("@[youtube](https://youtu.be/{video_id})")
        })
        .into_owned()
}
