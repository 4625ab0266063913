//! Spell listing filters.
//!
//! A [`FilterSpec`] narrows a listing along four optional axes. Each axis has
//! an "any" state that disables it:
//!
//! | axis    | any                          | active                         |
//! |---------|------------------------------|--------------------------------|
//! | classes | empty set, or all 8 classes  | spell is in one of the classes |
//! | level   | `None`                       | level equals                   |
//! | school  | `None`                       | school equals                  |
//! | ritual  | `RitualFilter::Any`          | ritual flag equals             |
//!
//! Active axes are combined with AND. Selecting every class and selecting no
//! class both mean "no class constraint".
//!
//! [`FilterSpec::matches`] is the reference predicate; the SQLite store
//! compiles the same semantics to SQL (see `store::query`).

use crate::error::{Result, SpellbookError};
use crate::model::{School, SpellClass, SpellRecord, MAX_LEVEL};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RitualFilter {
    #[default]
    Any,
    Required,
    Excluded,
}

impl RitualFilter {
    pub fn matches(self, ritual: bool) -> bool {
        match self {
            RitualFilter::Any => true,
            RitualFilter::Required => ritual,
            RitualFilter::Excluded => !ritual,
        }
    }
}

/// Two-state reading: a false flag means "don't filter", not "non-ritual".
impl From<bool> for RitualFilter {
    fn from(required: bool) -> Self {
        if required {
            RitualFilter::Required
        } else {
            RitualFilter::Any
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub classes: BTreeSet<SpellClass>,
    pub level: Option<u8>,
    pub school: Option<School>,
    pub ritual: RitualFilter,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the sentinel encoding: level `-1` and school `""` mean any,
    /// and a false ritual flag does not filter.
    pub fn from_legacy(
        classes: impl IntoIterator<Item = SpellClass>,
        level: i32,
        school: &str,
        ritual: bool,
    ) -> Result<Self> {
        let level = match level {
            -1 => None,
            l if (0..=MAX_LEVEL as i32).contains(&l) => Some(l as u8),
            l => {
                return Err(SpellbookError::validation(format!(
                    "Filter level {} is outside -1..={}",
                    l, MAX_LEVEL
                )))
            }
        };
        let school = if school.is_empty() {
            None
        } else {
            Some(school.parse()?)
        };
        Ok(Self {
            classes: classes.into_iter().collect(),
            level,
            school,
            ritual: RitualFilter::from(ritual),
        })
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = SpellClass>) -> Self {
        self.classes = classes.into_iter().collect();
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_school(mut self, school: School) -> Self {
        self.school = Some(school);
        self
    }

    pub fn with_ritual(mut self, ritual: RitualFilter) -> Self {
        self.ritual = ritual;
        self
    }

    /// The classes to constrain on, or `None` when the class axis is "any".
    pub fn class_constraint(&self) -> Option<&BTreeSet<SpellClass>> {
        if self.classes.is_empty() || self.classes.len() == SpellClass::ALL.len() {
            None
        } else {
            Some(&self.classes)
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.class_constraint().is_none()
            && self.level.is_none()
            && self.school.is_none()
            && self.ritual == RitualFilter::Any
    }

    pub fn matches(&self, spell: &SpellRecord) -> bool {
        if let Some(classes) = self.class_constraint() {
            if !classes.iter().any(|class| spell.is_member(*class)) {
                return false;
            }
        }
        if self.level.is_some_and(|level| level != spell.level) {
            return false;
        }
        if self.school.is_some_and(|school| school != spell.school) {
            return false;
        }
        self.ritual.matches(spell.ritual)
    }
}
