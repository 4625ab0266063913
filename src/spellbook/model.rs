//! Core spell types and the fixed tables they are measured against.
//!
//! Most scalar fields have a human form (shown in listings and typed by the
//! user) and a canonical form (stored and compared). The conversions live
//! here, next to the tables that define them.

use crate::error::{Result, SpellbookError};
use crate::tagged_text::TaggedText;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Store-assigned spell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellId(pub i64);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const MAX_LEVEL: u8 = 9;

/// Level names; the index is the level.
pub const LEVELS: [&str; 10] = [
    "Cantrip", "1st", "2nd", "3rd", "4th", "5th", "6th", "7th", "8th", "9th",
];

/// "Cantrip" for level 0, "3rd-level" and so on above.
pub fn level_as_string(level: u8) -> String {
    match LEVELS.get(level as usize) {
        Some(name) if level == 0 => name.to_string(),
        Some(name) => format!("{}-level", name),
        None => format!("Level {}", level),
    }
}

/// Inverse of [`level_as_string`]; also accepts the bare ordinal ("1st").
pub fn level_string_to_number(level: &str) -> Result<u8> {
    let level = level.trim();
    let bare = level.strip_suffix("-level").unwrap_or(level);
    LEVELS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(bare))
        .map(|i| i as u8)
        .ok_or_else(|| SpellbookError::validation(format!("Unknown spell level: {}", level)))
}

/// A level typed by a user: a number from 0 to 9, or a level name.
pub fn parse_level(level: &str) -> Result<u8> {
    match level.trim().parse::<u8>() {
        Ok(n) if n <= MAX_LEVEL => Ok(n),
        Ok(n) => Err(SpellbookError::validation(format!(
            "Spell level {} is outside 0..={}",
            n, MAX_LEVEL
        ))),
        Err(_) => level_string_to_number(level),
    }
}

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $what:literal, [$($variant:ident => $label:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = SpellbookError;

            fn from_str(s: &str) -> Result<Self> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| SpellbookError::validation(format!("Unknown {}: {}", $what, s)))
            }
        }
    };
}

named_enum!(
    /// The eight schools of magic.
    School,
    "school",
    [
        Abjuration => "Abjuration",
        Conjuration => "Conjuration",
        Divination => "Divination",
        Enchantment => "Enchantment",
        Evocation => "Evocation",
        Illusion => "Illusion",
        Necromancy => "Necromancy",
        Transmutation => "Transmutation",
    ]
);

named_enum!(
    /// Spellcasting classes, in canonical display order.
    SpellClass,
    "class",
    [
        Bard => "Bard",
        Cleric => "Cleric",
        Druid => "Druid",
        Paladin => "Paladin",
        Ranger => "Ranger",
        Sorceror => "Sorceror",
        Warlock => "Warlock",
        Wizard => "Wizard",
    ]
);

named_enum!(
    CastUnit,
    "casting time unit",
    [
        Reaction => "reaction",
        BonusAction => "bonus action",
        Action => "action",
        Minutes => "minutes",
        Hours => "hours",
    ]
);

named_enum!(
    RangeUnit,
    "range unit",
    [
        SelfOnly => "Self",
        Touch => "Touch",
        Feet => "feet",
    ]
);

impl CastUnit {
    /// Canonical value of one unit, in minutes.
    pub fn value(self) -> f64 {
        match self {
            CastUnit::Reaction => 0.01,
            CastUnit::BonusAction => 0.05,
            CastUnit::Action => 0.1,
            CastUnit::Minutes => 1.0,
            CastUnit::Hours => 60.0,
        }
    }

    fn scales(self) -> bool {
        matches!(self, CastUnit::Minutes | CastUnit::Hours)
    }

    fn singular(self) -> &'static str {
        match self {
            CastUnit::Minutes => "minute",
            CastUnit::Hours => "hour",
            other => other.name(),
        }
    }
}

/// A human casting time.
///
/// The canonical encoding uses minutes as the base unit so that every unit
/// orders correctly by plain float comparison: reaction < bonus action <
/// action < N minutes < N hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastTime {
    pub quantity: u32,
    pub unit: CastUnit,
}

impl CastTime {
    /// Only minutes and hours carry a quantity; other units are always one.
    pub fn new(quantity: u32, unit: CastUnit) -> Self {
        let quantity = if unit.scales() { quantity } else { 1 };
        Self { quantity, unit }
    }

    pub fn encode(self) -> f64 {
        if self.unit.scales() {
            self.quantity as f64 * self.unit.value()
        } else {
            self.unit.value()
        }
    }

    pub fn decode(value: f64) -> Self {
        if value < CastUnit::BonusAction.value() {
            Self::new(1, CastUnit::Reaction)
        } else if value < CastUnit::Action.value() {
            Self::new(1, CastUnit::BonusAction)
        } else if value < CastUnit::Minutes.value() {
            Self::new(1, CastUnit::Action)
        } else if value < CastUnit::Hours.value() {
            Self::new(value.trunc() as u32, CastUnit::Minutes)
        } else {
            Self::new((value / CastUnit::Hours.value()).trunc() as u32, CastUnit::Hours)
        }
    }
}

impl fmt::Display for CastTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.scales() && self.quantity > 1 {
            write!(f, "{} {}", self.quantity, self.unit.name())
        } else {
            write!(f, "{} {}", self.quantity, self.unit.singular())
        }
    }
}

impl FromStr for CastTime {
    type Err = SpellbookError;

    /// Accepts "1 action", "bonus action", "10 minutes", "1 hour".
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (quantity, unit) = match s.split_once(char::is_whitespace) {
            Some((first, rest)) if first.chars().all(|c| c.is_ascii_digit()) => {
                let quantity = first
                    .parse()
                    .map_err(|_| SpellbookError::validation(format!("Invalid casting time: {}", s)))?;
                (quantity, rest.trim())
            }
            _ => (1, s),
        };
        let unit = CastUnit::ALL
            .iter()
            .copied()
            .find(|u| {
                unit.eq_ignore_ascii_case(u.name())
                    || unit.eq_ignore_ascii_case(u.singular())
                    || unit.eq_ignore_ascii_case(&format!("{}s", u.name()))
            })
            .ok_or_else(|| SpellbookError::validation(format!("Invalid casting time: {}", s)))?;
        if quantity == 0 {
            return Err(SpellbookError::validation(format!(
                "Casting time must be at least 1: {}",
                s
            )));
        }
        Ok(CastTime::new(quantity, unit))
    }
}

/// "30 feet"; Self and Touch drop the quantity.
pub fn range_as_string(quantity: u32, unit: RangeUnit) -> String {
    match unit {
        RangeUnit::Feet => format!("{} {}", quantity, unit.name()),
        other => other.name().to_string(),
    }
}

/// Inverse of [`range_as_string`]. Self and Touch come back with quantity 0.
pub fn parse_range(range: &str) -> Result<(u32, RangeUnit)> {
    let range = range.trim();
    if let Ok(unit) = range.parse::<RangeUnit>() {
        if unit != RangeUnit::Feet {
            return Ok((0, unit));
        }
    }
    let invalid = || SpellbookError::validation(format!("Invalid range: {}", range));
    let (quantity, unit) = range.split_once(char::is_whitespace).ok_or_else(invalid)?;
    let quantity: u32 = quantity.parse().map_err(|_| invalid())?;
    match unit.trim().parse::<RangeUnit>() {
        Ok(RangeUnit::Feet) => Ok((quantity, RangeUnit::Feet)),
        _ => Err(invalid()),
    }
}

/// Verbal, somatic and material components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    pub verbal: bool,
    pub somatic: bool,
    pub material: bool,
}

impl Components {
    pub fn new(verbal: bool, somatic: bool, material: bool) -> Self {
        Self {
            verbal,
            somatic,
            material,
        }
    }

    /// Letters in V, S, M order for the components present.
    pub fn vsm_string(&self) -> String {
        [(self.verbal, 'V'), (self.somatic, 'S'), (self.material, 'M')]
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, letter)| *letter)
            .collect()
    }

    pub fn parse(letters: &str) -> Result<Self> {
        let mut components = Components::default();
        for c in letters.chars().filter(|c| !matches!(c, ' ' | ',')) {
            match c.to_ascii_uppercase() {
                'V' => components.verbal = true,
                'S' => components.somatic = true,
                'M' => components.material = true,
                _ => {
                    return Err(SpellbookError::validation(format!(
                        "Unknown component '{}' in {}",
                        c, letters
                    )))
                }
            }
        }
        Ok(components)
    }
}

/// One spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SpellId>,
    pub name: String,
    pub level: u8,
    pub school: School,
    #[serde(default)]
    pub ritual: bool,
    pub cast_time: f64,
    pub range: String,
    #[serde(default)]
    pub concentration: bool,
    pub duration: String,
    #[serde(default)]
    pub components: Components,
    #[serde(default)]
    pub materials: TaggedText,
    #[serde(default)]
    pub description: TaggedText,
    #[serde(default)]
    pub higher_levels: TaggedText,
    #[serde(default)]
    pub classes: BTreeSet<SpellClass>,
}

impl SpellRecord {
    pub fn new(name: impl Into<String>, level: u8, school: School) -> Self {
        Self {
            id: None,
            name: name.into(),
            level,
            school,
            ritual: false,
            cast_time: CastTime::new(1, CastUnit::Action).encode(),
            range: RangeUnit::SelfOnly.name().to_string(),
            concentration: false,
            duration: "Instantaneous".to_string(),
            components: Components::default(),
            materials: TaggedText::default(),
            description: TaggedText::default(),
            higher_levels: TaggedText::default(),
            classes: BTreeSet::new(),
        }
    }

    pub fn level_string(&self) -> String {
        level_as_string(self.level)
    }

    pub fn cast_time(&self) -> CastTime {
        CastTime::decode(self.cast_time)
    }

    pub fn cast_time_string(&self) -> String {
        self.cast_time().to_string()
    }

    pub fn vsm_string(&self) -> String {
        self.components.vsm_string()
    }

    /// Member classes in canonical order, comma separated.
    pub fn class_list_string(&self) -> String {
        self.classes
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_member(&self, class: SpellClass) -> bool {
        self.classes.contains(&class)
    }

    /// Check every field against its domain. Runs before any store write.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SpellbookError::validation("Spell name cannot be empty"));
        }
        if self.level > MAX_LEVEL {
            return Err(SpellbookError::validation(format!(
                "Spell level {} is outside 0..={}",
                self.level, MAX_LEVEL
            )));
        }
        if !self.cast_time.is_finite() || self.cast_time < 0.0 {
            return Err(SpellbookError::validation(format!(
                "Casting time {} is not a valid encoding",
                self.cast_time
            )));
        }
        self.materials.validate()?;
        self.description.validate()?;
        self.higher_levels.validate()?;
        Ok(())
    }
}

/// Identity pair returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellEntry {
    pub name: String,
    pub id: SpellId,
}

impl SpellEntry {
    pub fn new(name: impl Into<String>, id: SpellId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}
