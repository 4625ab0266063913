//! Sample spells for seeding a new spellbook.

use crate::model::{CastTime, CastUnit, Components, School, SpellClass, SpellRecord};
use crate::tagged_text::{make_range, TaggedText, BOLD, ITALIC};

fn spell(name: &str, level: u8, school: School, classes: &[SpellClass]) -> SpellRecord {
    let mut spell = SpellRecord::new(name, level, school);
    spell.cast_time = CastTime::new(1, CastUnit::Action).encode();
    spell.classes = classes.iter().copied().collect();
    spell
}

pub fn bless() -> SpellRecord {
    let mut s = spell("Bless", 1, School::Enchantment, &[SpellClass::Cleric]);
    s.range = "30 feet".to_string();
    s.concentration = true;
    s.duration = "1 minute".to_string();
    s.components = Components::new(true, true, true);
    s.materials = TaggedText::plain("a sprinkling of holy water");
    s.description = TaggedText::plain(
        "You bless up to three creatures of your choice within range. \
         Whenever a target makes an attack roll or a saving throw before the \
         spell ends, the target can roll a d4 and add the number rolled to \
         the attack roll or saving throw.",
    )
    .with_range(BOLD, make_range(1, 16, None, Some(31)))
    .with_range(ITALIC, make_range(1, 163, None, Some(165)));
    s.higher_levels = TaggedText::plain(
        "When you cast this spell using a spell slot of 2nd level or higher, \
         you can target one additional creature for each slot level above 1st.",
    )
    .with_range(BOLD, make_range(1, 83, None, Some(106)));
    s
}

pub fn false_life() -> SpellRecord {
    let mut s = spell(
        "False Life",
        1,
        School::Necromancy,
        &[SpellClass::Cleric, SpellClass::Sorceror, SpellClass::Wizard],
    );
    s.duration = "1 hour".to_string();
    s.components = Components::new(true, true, true);
    s.materials = TaggedText::plain("a small amount of alcohol or distilled spirits");
    s.description = TaggedText::plain(
        "Bolstering yourself with a necromantic facsimile of life, you gain \
         1d4 + 4 temporary hit points for the duration.",
    )
    .with_range(BOLD, make_range(1, 67, None, Some(74)));
    s.higher_levels = TaggedText::plain(
        "When you cast this spell using a spell slot of 2nd level or higher, \
         you gain 5 additional temporary hit points for each slot level above 1st.",
    );
    s
}

pub fn armor_of_agathys() -> SpellRecord {
    let mut s = spell("Armor of Agathys", 1, School::Abjuration, &[SpellClass::Warlock]);
    s.duration = "1 hour".to_string();
    s.components = Components::new(true, false, true);
    s.materials = TaggedText::plain("a cup of water");
    s.description = TaggedText::plain(
        "A protective magical force surrounds you, manifesting as a spectral \
         frost that covers you and your gear. You gain 5 temporary hit points \
         for the duration. If a creature hits you with a melee attack while you \
         have these hit points, the creature takes 5 cold damage.",
    )
    .with_range(BOLD, make_range(1, 114, None, Some(136)))
    .with_range(BOLD, make_range(1, 250, None, Some(263)));
    s.higher_levels = TaggedText::plain(
        "When you cast this spell using a spell slot of 2nd level or higher, \
         both the temporary hit points and the cold damage increase by 5 for \
         every level above 1st.",
    );
    s
}

pub fn fireball() -> SpellRecord {
    let mut s = spell(
        "Fireball",
        3,
        School::Evocation,
        &[SpellClass::Sorceror, SpellClass::Wizard],
    );
    s.range = "150 feet".to_string();
    s.components = Components::new(true, true, true);
    s.materials = TaggedText::plain("a tiny ball of bat guano and sulfur");
    s.description = TaggedText::plain(
        "A bright streak flashes from your pointing finger to a point you \
         choose within range and then blossoms with a low roar into an \
         explosion of flame. Each creature in a 20-foot-radius sphere centered \
         on that point must make a Dexterity saving throw. A target takes 8d6 \
         fire damage on a failed save, or half as much damage on a successful one.",
    )
    .with_range(BOLD, make_range(1, 262, None, Some(265)))
    .with_range(ITALIC, make_range(1, 223, None, Some(232)));
    s.higher_levels = TaggedText::plain(
        "When you cast this spell using a spell slot of 4th level or higher, \
         the damage increases by 1d6 for each slot level above 3rd.",
    );
    s
}

/// Every sample, in seeding order.
pub fn sample_spells() -> Vec<SpellRecord> {
    vec![bless(), false_life(), armor_of_agathys(), fireball()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_valid() {
        for spell in sample_spells() {
            spell.validate().unwrap();
        }
    }

    #[test]
    fn test_sample_ranges_cover_words() {
        let spans = bless().description.spans();
        let bold = spans.iter().find(|s| s.has(BOLD)).unwrap();
        assert_eq!(bold.text, "three creatures");
        let italic = spans.iter().find(|s| s.has(ITALIC)).unwrap();
        assert_eq!(italic.text, "d4");

        let bold: Vec<_> = armor_of_agathys()
            .description
            .spans()
            .into_iter()
            .filter(|s| s.has(BOLD))
            .map(|s| s.text)
            .collect();
        assert_eq!(bold, vec!["5 temporary hit points", "5 cold damage"]);

        let spans = fireball().description.spans();
        let bold = spans.iter().find(|s| s.has(BOLD)).unwrap();
        assert_eq!(bold.text, "8d6");
    }
}
