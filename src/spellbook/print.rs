use colored::{ColoredString, Colorize};
use spellbook::api::{CmdMessage, MessageLevel};
use spellbook::config::{SpellbookConfig, KEYS};
use spellbook::display::spell_card;
use spellbook::markup::to_markdown;
use spellbook::model::{SpellEntry, SpellRecord};
use spellbook::tagged_text::{Span, TaggedText, BOLD, BOLD_ITALIC, ITALIC};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const ID_WIDTH: usize = 6;

pub(crate) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(crate) fn print_spell_list(entries: &[SpellEntry]) {
    if entries.is_empty() {
        println!("No spells found.");
        return;
    }

    for entry in entries {
        let id = format!("{:>width$}. ", entry.id, width = ID_WIDTH - 2);
        let available = LINE_WIDTH.saturating_sub(id.width());
        println!("{}{}", id.dimmed(), truncate_to_width(&entry.name, available));
    }
}

pub(crate) fn print_spell_cards(spells: &[SpellRecord], markdown: bool) {
    for (i, spell) in spells.iter().enumerate() {
        if markdown {
            if i > 0 {
                println!("\n---\n");
            }
            println!("{}", to_markdown(&spell_card(spell)));
            continue;
        }
        if i > 0 {
            println!("\n{}\n", "─".repeat(LINE_WIDTH).dimmed());
        }
        if let Some(id) = spell.id {
            println!("{}", format!("#{}", id).yellow());
        }
        println!("{}", render_styled(&spell_card(spell)));
    }
}

pub(crate) fn print_config(config: &SpellbookConfig) {
    for key in KEYS {
        println!("{} = {}", key, config.get(key).unwrap_or_default());
    }
}

fn style_span(span: &Span) -> ColoredString {
    let text = span.text.as_str();
    let bold = span.has(BOLD) || span.has(BOLD_ITALIC);
    let italic = span.has(ITALIC) || span.has(BOLD_ITALIC);
    match (bold, italic) {
        (true, true) => text.bold().italic(),
        (true, false) => text.bold(),
        (false, true) => text.italic(),
        (false, false) => text.normal(),
    }
}

/// Styled text with ANSI bold and italic.
fn render_styled(text: &TaggedText) -> String {
    text.spans().iter().map(|span| style_span(span).to_string()).collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
