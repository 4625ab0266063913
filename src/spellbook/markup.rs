//! Markdown emphasis as an authoring format for styled text.
//!
//! Only emphasis survives the trip: `**bold**`, `*italic*` and
//! `***bold italic***`. Everything else is kept as plain text. Paragraph
//! breaks become `"\n\n"`, line breaks `"\n"`.

use crate::tagged_text::{TagMap, TagRange, TaggedText, TextIndex, BOLD, BOLD_ITALIC, ITALIC};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Markdown marker for a span's tag set, if any.
fn marker(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (true, true) => "***",
        (true, false) => "**",
        (false, true) => "*",
        (false, false) => "",
    }
}

fn escape(text: &str, out: &mut String) {
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Render styled text as Markdown.
///
/// Markers are closed at every line break and never enclose leading or
/// trailing whitespace, so each styled run parses back on its own.
pub fn to_markdown(text: &TaggedText) -> String {
    let mut out = String::new();
    for span in text.spans() {
        let mark = marker(
            span.has(BOLD) || span.has(BOLD_ITALIC),
            span.has(ITALIC) || span.has(BOLD_ITALIC),
        );
        for (i, piece) in span.text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let core = piece.trim();
            if mark.is_empty() || core.is_empty() {
                escape(piece, &mut out);
                continue;
            }
            let lead = &piece[..piece.len() - piece.trim_start().len()];
            let trail = &piece[piece.trim_end().len()..];
            out.push_str(lead);
            out.push_str(mark);
            escape(core, &mut out);
            out.push_str(mark);
            out.push_str(trail);
        }
    }
    out
}

#[derive(Default)]
struct Builder {
    text: String,
    line: usize,
    col: usize,
    tags: Vec<(&'static str, TagRange)>,
}

impl Builder {
    fn new() -> Self {
        Self {
            line: 1,
            ..Self::default()
        }
    }

    fn position(&self) -> TextIndex {
        TextIndex::new(self.line, self.col)
    }

    fn push(&mut self, chunk: &str, tag: Option<&'static str>) {
        if chunk.is_empty() {
            return;
        }
        let start = self.position();
        for c in chunk.chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.text.push_str(chunk);

        let Some(tag) = tag else { return };
        let end = self.position();
        match self.tags.last_mut() {
            Some((last, range)) if *last == tag && range.end == start => range.end = end,
            _ => self.tags.push((tag, TagRange::new(start, end))),
        }
    }

    fn separate(&mut self, separator: &str) {
        if !self.text.is_empty() && !self.text.ends_with(separator) {
            self.push(separator, None);
        }
    }

    fn finish(self) -> TaggedText {
        let tags: TagMap = self.tags.into_iter().collect();
        TaggedText::new(self.text, tags)
    }
}

/// Parse Markdown into styled text.
pub fn from_markdown(markdown: &str) -> TaggedText {
    let mut out = Builder::new();
    let mut strong = 0usize;
    let mut emphasis = 0usize;

    for event in Parser::new(markdown) {
        let tag = match (strong > 0, emphasis > 0) {
            (true, true) => Some(BOLD_ITALIC),
            (true, false) => Some(BOLD),
            (false, true) => Some(ITALIC),
            (false, false) => None,
        };
        match event {
            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => emphasis += 1,
            Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
            Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_)) => {
                out.separate("\n\n")
            }
            Event::Start(Tag::Item) => {
                out.separate("\n");
                out.push("- ", None);
            }
            Event::Text(text) | Event::Code(text) => out.push(&text, tag),
            Event::Html(text) | Event::InlineHtml(text) => out.push(&text, None),
            Event::SoftBreak | Event::HardBreak => out.push("\n", None),
            _ => {}
        }
    }

    let mut text = out.finish();
    // Code blocks end with a newline of their own.
    if text.text().ends_with('\n') {
        let (body, tags) = text.into_parts();
        text = TaggedText::new(body.trim_end_matches('\n'), tags);
    }
    text
}
