//! Document processing for generated content.
//!
//! Generated posts arrive as Markdown, HTML, or Markdown with embedded HTML.
//! pulldown-cmark parses the Markdown layer; HTML blocks it hands back are
//! reduced to text with a small tag stripper.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

/// A Markdown ATX heading line, or an HTML heading open tag.
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#\s.+|(?i:<h[1-6](?:\s[^>]*)?>)").expect("valid regex")
});

/// Elements whose content is not article prose.
static NON_PROSE_ELEMENTS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"),
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"),
        Regex::new(r"(?is)<h[1-6]\b[^>]*>.*?</h[1-6]\s*>").expect("valid regex"),
    ]
});

static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid regex"));

/// Whether the content contains a Markdown (`# Title`) or HTML (`<h2>`) heading.
pub fn has_heading(content: &str) -> bool {
    HEADING_PATTERN.is_match(content)
}

/// Extract the article prose from a Markdown or HTML document.
///
/// Removes code blocks, inline code, headings, scripts, styles, comments and
/// markup. Keeps paragraph, list, blockquote, emphasis and link text.
/// Block boundaries become spaces.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn extract_prose(text: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options);

    let mut result = String::with_capacity(text.len() / 2);
    let mut html_block = String::new();
    let mut skip_depth: usize = 0;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Heading { .. }) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_)) => {
                skip_depth = skip_depth.saturating_sub(1);
            }

            Event::Html(chunk) => html_block.push_str(&chunk),
            Event::End(TagEnd::HtmlBlock) => {
                result.push_str(&html_to_text(&html_block));
                result.push(' ');
                html_block.clear();
            }

            Event::Text(t) if skip_depth == 0 => result.push_str(&t),
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => result.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if skip_depth == 0 => result.push(' '),

            // inline tags arrive on their own; the text between them is Text
            _ => {}
        }
    }

    if !html_block.is_empty() {
        result.push_str(&html_to_text(&html_block));
    }

    collapse_whitespace(&result)
}

/// Reduce an HTML fragment to its visible prose.
fn html_to_text(html: &str) -> String {
    let mut text = COMMENT_PATTERN.replace_all(html, " ").into_owned();
    for pattern in NON_PROSE_ELEMENTS.iter() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    let text = TAG_PATTERN.replace_all(&text, " ");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_heading_detected() {
        assert!(has_heading("# Title\n\nBody text."));
        assert!(has_heading("Intro.\n\n## Section\n\nMore."));
    }

    #[test]
    fn html_heading_detected() {
        assert!(has_heading("<h2>Title</h2><p>Body</p>"));
        assert!(has_heading("<H1 class=\"title\">Title</H1>"));
    }

    #[test]
    fn plain_text_has_no_heading() {
        assert!(!has_heading("Title\n\nBody"));
        assert!(!has_heading("#hashtag without a space"));
        assert!(!has_heading("<header>not a heading</header>"));
    }

    #[test]
    fn prose_skips_markdown_code_and_headings() {
        let md = "# Title\n\nThe cat sat.\n\n```rust\nlet x = 1;\n```\n\nUse `foo()` here.";
        let prose = extract_prose(md);
        assert!(!prose.contains("Title"));
        assert!(!prose.contains("let x"));
        assert!(!prose.contains("foo()"));
        assert!(prose.contains("The cat sat."));
        assert!(prose.contains("Use here."));
    }

    #[test]
    fn prose_from_html_document() {
        let html = "<h1>Heading</h1>\n<p>First &amp; best.</p>\n<script>var x = 1;</script>\n<p>Second.</p>";
        let prose = extract_prose(html);
        assert_eq!(prose, "First & best. Second.");
    }

    #[test]
    fn prose_keeps_inline_html_text() {
        let prose = extract_prose("Some <strong>bold</strong> words.");
        assert_eq!(prose, "Some bold words.");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(extract_prose("").is_empty());
        assert!(!has_heading(""));
    }
}
