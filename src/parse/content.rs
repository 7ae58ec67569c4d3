use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static WIKI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!\[\[([^\]]+)\]\])|(\[\[([^\]]+)\]\])").expect("wiki link pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\p{L}\p{N}_/-]+)").expect("tag pattern is valid"));

/// A piece of task content, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentSpan {
    Text(String),
    Tag(String),
    Link { target: String, display: String },
    Embed(String),
}

/// Split task content into text, tags, wiki links and embeds.
///
/// `![[name]]` is an embed, `[[target]]` or `[[target|display]]` a link.
/// Tags are only recognised in the text between them.
pub fn tokenize_content(text: &str) -> Vec<ContentSpan> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in WIKI_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&text[last..whole.start()], &mut spans);

        if let Some(name) = caps.get(2) {
            spans.push(ContentSpan::Embed(name.as_str().to_string()));
        } else if let Some(inner) = caps.get(4) {
            let (target, display) = match inner.as_str().split_once('|') {
                Some((t, d)) => (t.trim(), d.trim()),
                None => (inner.as_str().trim(), inner.as_str().trim()),
            };
            spans.push(ContentSpan::Link {
                target: target.to_string(),
                display: display.to_string(),
            });
        }
        last = whole.end();
    }
    push_text(&text[last..], &mut spans);

    spans
}

/// Plain text, with any `#tags` split out
fn push_text(text: &str, spans: &mut Vec<ContentSpan>) {
    let mut last = 0;
    for caps in TAG_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(ContentSpan::Text(text[last..whole.start()].to_string()));
        }
        spans.push(ContentSpan::Tag(name.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(ContentSpan::Text(text[last..].to_string()));
    }
}

/// First tag outside links and embeds, without the `#`
pub fn first_tag(text: &str) -> Option<String> {
    tokenize_content(text).into_iter().find_map(|span| match span {
        ContentSpan::Tag(name) => Some(name),
        _ => None,
    })
}

pub fn has_attachment(text: &str) -> bool {
    tokenize_content(text)
        .iter()
        .any(|span| matches!(span, ContentSpan::Embed(_)))
}

/// Content with links shown by their display text and embeds dropped
pub fn plain_text(text: &str) -> String {
    let mut out = String::new();
    for span in tokenize_content(text) {
        match span {
            ContentSpan::Text(t) => out.push_str(&t),
            ContentSpan::Tag(name) => {
                out.push('#');
                out.push_str(&name);
            }
            ContentSpan::Link { display, .. } => out.push_str(&display),
            ContentSpan::Embed(_) => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
