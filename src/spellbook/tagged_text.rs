//! # Tagged Text
//!
//! Styled text is stored as plain text plus a map from style name to the
//! character ranges the style covers. Positions use the `line.column` scheme
//! of a text widget: lines are 1-indexed, columns are 0-indexed character
//! offsets, and ranges are end-exclusive. A column may also be the `end`
//! sentinel, meaning "the end of that line", which is distinct from column 0.
//!
//! ```text
//! text:  "You bless up to three creatures"
//! tags:  { "italic": [("1.4", "1.9")] }      -> "bless" is italic
//! ```
//!
//! ## Storage Format
//!
//! A [`TagMap`] serializes to a JSON object of tag name to a list of
//! `[start, end]` pairs, each endpoint written as `"line.column"` or
//! `"line.end"`:
//!
//! ```text
//! {"bold": [["1.16", "1.24"]], "italic": [["1.7", "1.14"]]}
//! ```
//!
//! ## Composition
//!
//! When several fields are rendered into one buffer, each field's ranges must
//! be moved to where its text lands. [`TaggedText::shift_all`] moves every
//! range by a fixed line/column delta; [`TaggedText::concat`] appends one
//! text to another and re-bases the appended ranges (only ranges on the first
//! appended line get the column offset).
//!
//! The `sel` tag belongs to the editing widget's selection and is never kept.

use crate::error::{Result, SpellbookError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Tag used by text widgets for the current selection. Never persisted.
pub const SELECTION_TAG: &str = "sel";

pub const BOLD: &str = "bold";
pub const ITALIC: &str = "italic";
pub const BOLD_ITALIC: &str = "bolditalic";

/// Column part of a [`TextIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    At(isize),
    /// End of the line, whatever its length.
    End,
}

/// A `line.column` position. Lines start at 1, columns at 0.
///
/// Components are signed so that shifting never fails: a shift can pass
/// through positions before the text and come back. Whether a position
/// addresses real text is checked by [`TaggedText::resolve`] and
/// [`TaggedText::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextIndex {
    pub line: isize,
    pub column: Column,
}

impl TextIndex {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line: line as isize,
            column: Column::At(column as isize),
        }
    }

    pub fn line_end(line: usize) -> Self {
        Self {
            line: line as isize,
            column: Column::End,
        }
    }

    /// Move by a signed delta. `End` columns stay `End`.
    pub fn shifted(self, line_delta: isize, col_delta: isize) -> Self {
        let column = match self.column {
            Column::End => Column::End,
            Column::At(col) => Column::At(col + col_delta),
        };
        Self {
            line: self.line + line_delta,
            column,
        }
    }
}

impl fmt::Display for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Column::At(col) => write!(f, "{}.{}", self.line, col),
            Column::End => write!(f, "{}.end", self.line),
        }
    }
}

impl FromStr for TextIndex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (line, column) = s
            .split_once('.')
            .ok_or_else(|| format!("Invalid text index: {}", s))?;
        let line: usize = line
            .parse()
            .map_err(|_| format!("Invalid line in text index: {}", s))?;
        if line == 0 {
            return Err(format!("Lines start at 1: {}", s));
        }
        if column == "end" {
            return Ok(Self::line_end(line));
        }
        let column: usize = column
            .parse()
            .map_err(|_| format!("Invalid column in text index: {}", s))?;
        Ok(Self::new(line, column))
    }
}

impl TryFrom<String> for TextIndex {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextIndex> for String {
    fn from(value: TextIndex) -> Self {
        value.to_string()
    }
}

/// An end-exclusive `(start, end)` pair of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(TextIndex, TextIndex)", into = "(TextIndex, TextIndex)")]
pub struct TagRange {
    pub start: TextIndex,
    pub end: TextIndex,
}

impl TagRange {
    pub fn new(start: TextIndex, end: TextIndex) -> Self {
        Self { start, end }
    }

    /// The whole of one line.
    pub fn line(line: usize) -> Self {
        make_range(line, 0, None, None)
    }

    pub fn shifted(self, line_delta: isize, col_delta: isize) -> Self {
        Self {
            start: self.start.shifted(line_delta, col_delta),
            end: self.end.shifted(line_delta, col_delta),
        }
    }
}

impl From<(TextIndex, TextIndex)> for TagRange {
    fn from((start, end): (TextIndex, TextIndex)) -> Self {
        Self { start, end }
    }
}

impl From<TagRange> for (TextIndex, TextIndex) {
    fn from(range: TagRange) -> Self {
        (range.start, range.end)
    }
}

impl fmt::Display for TagRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Build a range. `end_line` defaults to `start_line`; `end_col` defaults to
/// the end of the end line.
pub fn make_range(
    start_line: usize,
    start_col: usize,
    end_line: Option<usize>,
    end_col: Option<usize>,
) -> TagRange {
    let end_line = end_line.unwrap_or(start_line);
    let end = match end_col {
        Some(col) => TextIndex::new(end_line, col),
        None => TextIndex::line_end(end_line),
    };
    TagRange::new(TextIndex::new(start_line, start_col), end)
}

pub fn shift_range(range: TagRange, line_delta: isize, col_delta: isize) -> TagRange {
    range.shifted(line_delta, col_delta)
}

pub fn shift_all(text: &TaggedText, line_delta: isize, col_delta: isize) -> TaggedText {
    text.shift_all(line_delta, col_delta)
}

pub fn add_range(tags: &mut TagMap, tag_name: &str, range: TagRange) {
    tags.add_range(tag_name, range);
}

/// Tag name to ranges. Equality ignores range order and duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagMap(BTreeMap<String, Vec<TagRange>>);

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, tag_name: &str, range: TagRange) {
        if tag_name == SELECTION_TAG {
            return;
        }
        self.0.entry(tag_name.to_string()).or_default().push(range);
    }

    pub fn ranges(&self, tag_name: &str) -> &[TagRange] {
        self.0.get(tag_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TagRange])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn remove(&mut self, tag_name: &str) -> Option<Vec<TagRange>> {
        self.0.remove(tag_name)
    }

    pub fn shifted(&self, line_delta: isize, col_delta: isize) -> TagMap {
        self.iter()
            .flat_map(|(name, ranges)| {
                ranges
                    .iter()
                    .map(move |r| (name, r.shifted(line_delta, col_delta)))
            })
            .collect()
    }

    /// Append every range of `other`.
    pub fn merge(&mut self, other: TagMap) {
        for (name, ranges) in other.0 {
            for range in ranges {
                self.add_range(&name, range);
            }
        }
    }

    fn normalized(&self) -> BTreeMap<&str, BTreeSet<TagRange>> {
        self.0
            .iter()
            .filter(|(_, ranges)| !ranges.is_empty())
            .map(|(name, ranges)| (name.as_str(), ranges.iter().copied().collect()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<TagMap> {
        let mut tags: TagMap = serde_json::from_str(json)?;
        tags.remove(SELECTION_TAG);
        Ok(tags)
    }
}

impl PartialEq for TagMap {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl<'a> FromIterator<(&'a str, TagRange)> for TagMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, TagRange)>>(iter: T) -> Self {
        let mut tags = TagMap::new();
        for (name, range) in iter {
            tags.add_range(name, range);
        }
        tags
    }
}

/// A run of text carrying the same set of tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tags: BTreeSet<String>,
}

impl Span {
    pub fn has(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Text plus its style ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaggedTextRepr")]
pub struct TaggedText {
    text: String,
    tags: TagMap,
}

#[derive(Deserialize)]
struct TaggedTextRepr {
    text: String,
    #[serde(default)]
    tags: TagMap,
}

impl From<TaggedTextRepr> for TaggedText {
    fn from(repr: TaggedTextRepr) -> Self {
        TaggedText::new(repr.text, repr.tags)
    }
}

impl TaggedText {
    pub fn new(text: impl Into<String>, mut tags: TagMap) -> Self {
        tags.remove(SELECTION_TAG);
        Self {
            text: text.into(),
            tags,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TagMap::new())
    }

    pub fn with_range(mut self, tag_name: &str, range: TagRange) -> Self {
        self.tags.add_range(tag_name, range);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_parts(self) -> (String, TagMap) {
        (self.text, self.tags)
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    fn line_lengths(&self) -> Vec<usize> {
        self.text.split('\n').map(|l| l.chars().count()).collect()
    }

    /// Same text, every range moved by the given deltas.
    pub fn shift_all(&self, line_delta: isize, col_delta: isize) -> TaggedText {
        Self {
            text: self.text.clone(),
            tags: self.tags.shifted(line_delta, col_delta),
        }
    }

    /// Append `other`, moving its ranges to where its text lands.
    pub fn concat(&self, other: &TaggedText) -> TaggedText {
        let lines = (self.line_count() - 1) as isize;
        let cols = self.line_lengths().last().copied().unwrap_or(0) as isize;
        let rebase = |index: TextIndex| {
            if index.line == 1 {
                index.shifted(lines, cols)
            } else {
                index.shifted(lines, 0)
            }
        };

        let mut tags = self.tags.clone();
        tags.merge(
            other
                .tags
                .iter()
                .flat_map(|(name, ranges)| {
                    ranges
                        .iter()
                        .map(move |r| (name, TagRange::new(rebase(r.start), rebase(r.end))))
                })
                .collect(),
        );

        Self {
            text: format!("{}{}", self.text, other.text),
            tags,
        }
    }

    /// Character offset of a position, or `None` if it is outside the text.
    pub fn resolve(&self, index: TextIndex) -> Option<usize> {
        let lengths = self.line_lengths();
        let line = usize::try_from(index.line).ok()?.checked_sub(1)?;
        let line_len = *lengths.get(line)?;
        let col = match index.column {
            Column::End => line_len,
            Column::At(col) => usize::try_from(col).ok().filter(|col| *col <= line_len)?,
        };
        let line_start: usize = lengths[..line].iter().map(|len| len + 1).sum();
        Some(line_start + col)
    }

    /// Every range must address real positions, start before end.
    pub fn validate(&self) -> Result<()> {
        for (name, ranges) in self.tags.iter() {
            for range in ranges {
                let (Some(start), Some(end)) = (self.resolve(range.start), self.resolve(range.end))
                else {
                    return Err(SpellbookError::validation(format!(
                        "tag '{}' range {} is outside the text",
                        name, range
                    )));
                };
                if start > end {
                    return Err(SpellbookError::validation(format!(
                        "tag '{}' range {} ends before it starts",
                        name, range
                    )));
                }
            }
        }
        Ok(())
    }

    /// Split the text into maximal runs sharing the same tags.
    ///
    /// Ranges that reach past the text are clipped to it.
    pub fn spans(&self) -> Vec<Span> {
        let chars: Vec<char> = self.text.chars().collect();
        let total = chars.len();
        let clip = |index: TextIndex| self.resolve(index).unwrap_or(total).min(total);

        let mut resolved: Vec<(&str, usize, usize)> = Vec::new();
        let mut bounds: BTreeSet<usize> = BTreeSet::from([0, total]);
        for (name, ranges) in self.tags.iter() {
            for range in ranges {
                let (start, end) = (clip(range.start), clip(range.end));
                if start < end {
                    resolved.push((name, start, end));
                    bounds.insert(start);
                    bounds.insert(end);
                }
            }
        }

        let bounds: Vec<usize> = bounds.into_iter().collect();
        let mut spans: Vec<Span> = Vec::new();
        for pair in bounds.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from == to {
                continue;
            }
            let tags: BTreeSet<String> = resolved
                .iter()
                .filter(|(_, start, end)| *start <= from && to <= *end)
                .map(|(name, _, _)| name.to_string())
                .collect();
            let text: String = chars[from..to].iter().collect();
            match spans.last_mut() {
                Some(last) if last.tags == tags => last.text.push_str(&text),
                _ => spans.push(Span { text, tags }),
            }
        }
        spans
    }

    pub fn tags_to_storage(&self) -> Result<String> {
        self.tags.to_json()
    }

    /// Rebuild from a text column and its JSON tags column.
    pub fn from_storage(text: impl Into<String>, tags_json: &str) -> Result<TaggedText> {
        Ok(Self::new(text, TagMap::from_json(tags_json)?))
    }
}

impl fmt::Display for TaggedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for TaggedText {
    fn from(text: &str) -> Self {
        TaggedText::plain(text)
    }
}
