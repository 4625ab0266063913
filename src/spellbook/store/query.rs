//! Filter query construction.
//!
//! Compiles a [`FilterSpec`] into one `SELECT` over `spells`, joining the
//! lookup tables only for the axes that need them. Values are always bound as
//! positional parameters; only fixed SQL fragments are spliced into the text.

use crate::filter::{FilterSpec, RitualFilter};
use rusqlite::types::Value;

const SELECT: &str = "SELECT DISTINCT spells.spell_name, spells.spell_id FROM spells";
const ORDER: &str = "ORDER BY spells.spell_name ASC, spells.spell_id ASC";

#[derive(Debug, Clone, PartialEq)]
pub struct SpellQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Default)]
struct Builder {
    joins: Vec<&'static str>,
    predicates: Vec<String>,
    params: Vec<Value>,
}

impl Builder {
    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("?{}", self.params.len())
    }

    fn finish(self) -> SpellQuery {
        let mut sql = String::from(SELECT);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        sql.push(' ');
        sql.push_str(ORDER);
        SpellQuery {
            sql,
            params: self.params,
        }
    }
}

pub fn build(filter: &FilterSpec) -> SpellQuery {
    let mut q = Builder::default();

    if let Some(classes) = filter.class_constraint() {
        q.joins
            .push("JOIN spell_classes ON spell_classes.spell_id = spells.spell_id");
        q.joins
            .push("JOIN classes ON classes.class_id = spell_classes.class_id");
        let placeholders: Vec<String> = classes
            .iter()
            .map(|class| q.bind(Value::Text(class.name().to_string())))
            .collect();
        q.predicates
            .push(format!("classes.class_name IN ({})", placeholders.join(", ")));
    }

    if let Some(level) = filter.level {
        let p = q.bind(Value::Integer(level as i64));
        q.predicates.push(format!("spells.spell_level = {}", p));
    }

    if let Some(school) = filter.school {
        q.joins
            .push("JOIN schools ON schools.school_id = spells.spell_school");
        let p = q.bind(Value::Text(school.name().to_string()));
        q.predicates.push(format!("schools.school_name = {}", p));
    }

    let ritual = match filter.ritual {
        RitualFilter::Any => None,
        RitualFilter::Required => Some(1),
        RitualFilter::Excluded => Some(0),
    };
    if let Some(flag) = ritual {
        let p = q.bind(Value::Integer(flag));
        q.predicates.push(format!("spells.spell_ritual = {}", p));
    }

    q.finish()
}
