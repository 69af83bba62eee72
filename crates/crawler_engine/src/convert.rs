use std::sync::LazyLock;

use regex::Regex;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline run pattern"));

// html2md renders levels 1 and 2 as setext (underlined) headings.
static SETEXT_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S[^\n]*)\n=+[ \t]*$").expect("setext h1 pattern"));
static SETEXT_H2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S[^\n]*)\n-+[ \t]*$").expect("setext h2 pattern"));

pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        atx_headings(&html2md::parse_html(html))
    }
}

/// Rewrite setext headings to ATX: `text` over `====` becomes `# text`,
/// `text` over `----` becomes `## text`. The underline must sit directly
/// under a non-empty line, so thematic breaks (blank line, then dashes) are
/// left alone.
fn atx_headings(markdown: &str) -> String {
    let with_h1 = SETEXT_H1.replace_all(markdown, "# ${1}");
    SETEXT_H2.replace_all(&with_h1, "## ${1}").into_owned()
}

/// Collapse runs of 3+ newlines to exactly two and trim the whole body.
/// Idempotent: running it on already-tidied Markdown is a no-op.
pub fn tidy_markdown(markdown: &str) -> String {
    NEWLINE_RUNS
        .replace_all(markdown, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{atx_headings, tidy_markdown, Converter, Html2MdConverter};

    #[test]
    fn collapses_newline_runs_and_trims() {
        assert_eq!(tidy_markdown("\n\na\n\n\n\nb\n"), "a\n\nb");
    }

    #[test]
    fn tidy_is_idempotent() {
        let once = tidy_markdown("a\n\n\n\n\nb");
        assert_eq!(tidy_markdown(&once), once);
    }

    #[test]
    fn setext_underlines_become_atx_markers() {
        assert_eq!(atx_headings("Section One\n-----------"), "## Section One");
        assert_eq!(atx_headings("Top\n==="), "# Top");
    }

    #[test]
    fn thematic_breaks_are_not_mistaken_for_headings() {
        let markdown = "para\n\n---\n\nmore";
        assert_eq!(atx_headings(markdown), markdown);
    }

    #[test]
    fn atx_rewrite_is_idempotent() {
        let once = atx_headings("A\n--\n\nB\n==");
        assert_eq!(atx_headings(&once), once);
    }

    #[test]
    fn converter_emits_atx_for_level_two_headings() {
        let markdown = Html2MdConverter.to_markdown("<h2>Main Section</h2><p>a</p>");
        assert!(markdown.contains("## Main Section"), "got: {markdown:?}");
        assert!(!markdown.contains("\n--"), "got: {markdown:?}");
    }
}
