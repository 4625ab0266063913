//! Styled views of a spell for display.
//!
//! Everything here builds [`TaggedText`] by concatenation, so ranges from the
//! stored fields are carried into the combined buffer at the right place.

use crate::model::SpellRecord;
use crate::tagged_text::{TagRange, TaggedText, TextIndex, BOLD, BOLD_ITALIC, ITALIC};
use std::fmt;

pub const HIGHER_LEVELS_PREFIX: &str = "\n\nAt Higher Levels. ";
const HIGHER_LEVELS_LABEL: &str = "At Higher Levels.";

/// `text` with one tag over all of it.
fn styled(text: &str, tag: &str) -> TaggedText {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len();
    let last_len = lines.last().map(|l| l.chars().count()).unwrap_or(0);
    TaggedText::plain(text).with_range(
        tag,
        TagRange::new(TextIndex::new(1, 0), TextIndex::new(last, last_len)),
    )
}

/// `"(materials)"`, or empty when there are none.
pub fn materials_display(record: &SpellRecord) -> TaggedText {
    if record.materials.is_empty() {
        return TaggedText::default();
    }
    TaggedText::plain("(")
        .concat(&record.materials)
        .concat(&TaggedText::plain(")"))
}

/// Description followed by the higher-levels paragraph, if any.
pub fn description_display(record: &SpellRecord) -> TaggedText {
    if record.higher_levels.is_empty() {
        return record.description.clone();
    }
    let label_line = HIGHER_LEVELS_PREFIX.split('\n').count();
    let prefix = TaggedText::plain(HIGHER_LEVELS_PREFIX).with_range(
        BOLD_ITALIC,
        TagRange::new(
            TextIndex::new(label_line, 0),
            TextIndex::new(label_line, HIGHER_LEVELS_LABEL.len()),
        ),
    );
    record
        .description
        .concat(&prefix)
        .concat(&record.higher_levels)
}

fn kind_line(record: &SpellRecord) -> String {
    let mut line = if record.level == 0 {
        format!("{} cantrip", record.school)
    } else {
        format!(
            "{} {}",
            record.level_string(),
            record.school.name().to_lowercase()
        )
    };
    if record.ritual {
        line.push_str(" (ritual)");
    }
    line
}

fn field(label: &str, value: &TaggedText) -> TaggedText {
    TaggedText::plain("\n")
        .concat(&styled(&format!("{}:", label), BOLD))
        .concat(&TaggedText::plain(" "))
        .concat(value)
}

/// The full card: header, stat block, description and class list.
pub fn spell_card(record: &SpellRecord) -> TaggedText {
    let mut components = TaggedText::plain(record.vsm_string());
    let materials = materials_display(record);
    if !materials.is_empty() {
        if !components.is_empty() {
            components = components.concat(&TaggedText::plain(" "));
        }
        components = components.concat(&materials);
    }

    let duration = if record.concentration {
        format!("Concentration, up to {}", record.duration)
    } else {
        record.duration.clone()
    };

    let mut card = styled(&record.name, BOLD)
        .concat(&TaggedText::plain("\n"))
        .concat(&styled(&kind_line(record), ITALIC))
        .concat(&field("Casting Time", &record.cast_time_string().as_str().into()))
        .concat(&field("Range", &record.range.as_str().into()))
        .concat(&field("Components", &components))
        .concat(&field("Duration", &duration.as_str().into()));

    let description = description_display(record);
    if !description.is_empty() {
        card = card
            .concat(&TaggedText::plain("\n\n"))
            .concat(&description);
    }
    if !record.classes.is_empty() {
        card = card
            .concat(&TaggedText::plain("\n"))
            .concat(&field("Classes", &record.class_list_string().as_str().into()));
    }
    card
}

impl fmt::Display for SpellRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", spell_card(self).text())
    }
}
