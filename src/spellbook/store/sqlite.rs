use super::{query, SpellStore};
use crate::error::{Result, SpellbookError};
use crate::filter::FilterSpec;
use crate::model::{Components, School, SpellClass, SpellEntry, SpellId, SpellRecord};
use crate::tagged_text::TaggedText;
use log::{debug, info};
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Drops and recreates the four tables.
pub const SCHEMA: &str = include_str!("schema.sql");

const EMPTY_TAGS: &str = "{}";

const INSERT_SPELL: &str = "INSERT INTO spells (
        spell_name, spell_level, spell_school, spell_ritual, spell_cast_time,
        spell_range, spell_concentration, spell_duration,
        spell_component_v, spell_component_s, spell_component_m,
        spell_materials, spell_materials_tags,
        spell_description, spell_description_tags,
        spell_higher_levels, spell_higher_levels_tags
    ) VALUES (
        :spell_name, :spell_level, :spell_school, :spell_ritual, :spell_cast_time,
        :spell_range, :spell_concentration, :spell_duration,
        :spell_component_v, :spell_component_s, :spell_component_m,
        :spell_materials, :spell_materials_tags,
        :spell_description, :spell_description_tags,
        :spell_higher_levels, :spell_higher_levels_tags
    )";

const UPDATE_SPELL: &str = "UPDATE spells SET
        spell_name = :spell_name,
        spell_level = :spell_level,
        spell_school = :spell_school,
        spell_ritual = :spell_ritual,
        spell_cast_time = :spell_cast_time,
        spell_range = :spell_range,
        spell_concentration = :spell_concentration,
        spell_duration = :spell_duration,
        spell_component_v = :spell_component_v,
        spell_component_s = :spell_component_s,
        spell_component_m = :spell_component_m,
        spell_materials = :spell_materials,
        spell_materials_tags = :spell_materials_tags,
        spell_description = :spell_description,
        spell_description_tags = :spell_description_tags,
        spell_higher_levels = :spell_higher_levels,
        spell_higher_levels_tags = :spell_higher_levels_tags
    WHERE spell_id = :spell_id";

const SELECT_SPELL: &str = "SELECT
        spell_name, spell_level, spell_school, spell_ritual, spell_cast_time,
        spell_range, spell_concentration, spell_duration,
        spell_component_v, spell_component_s, spell_component_m,
        spell_materials, spell_materials_tags,
        spell_description, spell_description_tags,
        spell_higher_levels, spell_higher_levels_tags
    FROM spells WHERE spell_id = ?1";

const SELECT_SPELL_CLASSES: &str = "SELECT classes.class_name FROM spell_classes
    JOIN classes ON classes.class_id = spell_classes.class_id
    WHERE spell_classes.spell_id = ?1";

const INSERT_SPELL_CLASS: &str = "INSERT INTO spell_classes (spell_id, class_id) VALUES (?1, ?2)";

/// Name <-> row id map for one of the small lookup tables.
#[derive(Debug)]
struct Lookup<T> {
    ids: HashMap<T, i64>,
    values: HashMap<i64, T>,
}

impl<T: Copy + Eq + Hash + fmt::Display> Lookup<T> {
    fn empty() -> Self {
        Self {
            ids: HashMap::new(),
            values: HashMap::new(),
        }
    }

    fn id(&self, value: T) -> Result<i64> {
        self.ids.get(&value).copied().ok_or_else(|| {
            SpellbookError::Store(format!("{} is missing from the lookup table", value))
        })
    }

    fn value(&self, id: i64) -> Result<T> {
        self.values
            .get(&id)
            .copied()
            .ok_or_else(|| SpellbookError::Store(format!("Unknown lookup id {}", id)))
    }
}

fn load_lookup<T>(conn: &Connection, sql: &str) -> Result<Lookup<T>>
where
    T: Copy + Eq + Hash + fmt::Display + FromStr<Err = SpellbookError>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut lookup = Lookup::empty();
    for (id, name) in rows {
        let value = name
            .parse::<T>()
            .map_err(|e| SpellbookError::Store(format!("Corrupt lookup table: {}", e)))?;
        lookup.ids.insert(value, id);
        lookup.values.insert(id, value);
    }
    Ok(lookup)
}

/// Column values for one `spells` row.
struct SpellRow {
    name: String,
    level: i64,
    school: i64,
    ritual: bool,
    cast_time: f64,
    range: String,
    concentration: bool,
    duration: String,
    components: Components,
    materials: String,
    materials_tags: String,
    description: String,
    description_tags: String,
    higher_levels: String,
    higher_levels_tags: String,
}

impl SpellRow {
    fn params(&self) -> Vec<(&'static str, &dyn ToSql)> {
        vec![
            (":spell_name", &self.name),
            (":spell_level", &self.level),
            (":spell_school", &self.school),
            (":spell_ritual", &self.ritual),
            (":spell_cast_time", &self.cast_time),
            (":spell_range", &self.range),
            (":spell_concentration", &self.concentration),
            (":spell_duration", &self.duration),
            (":spell_component_v", &self.components.verbal),
            (":spell_component_s", &self.components.somatic),
            (":spell_component_m", &self.components.material),
            (":spell_materials", &self.materials),
            (":spell_materials_tags", &self.materials_tags),
            (":spell_description", &self.description),
            (":spell_description_tags", &self.description_tags),
            (":spell_higher_levels", &self.higher_levels),
            (":spell_higher_levels_tags", &self.higher_levels_tags),
        ]
    }
}

/// Spell storage in an SQLite database file.
///
/// The lookup tables are read once when the store is opened and assumed not
/// to change afterwards.
pub struct SqliteStore {
    path: PathBuf,
    class_ids: Lookup<SpellClass>,
    school_ids: Lookup<School>,
}

impl SqliteStore {
    /// Open an initialized database.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            class_ids: Lookup::empty(),
            school_ids: Lookup::empty(),
        };
        store.load_lookups()?;
        Ok(store)
    }

    /// Create (or wipe) a database and open it.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            class_ids: Lookup::empty(),
            school_ids: Lookup::empty(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open the database, initializing it first if it has no schema yet.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let conn = open_connection(&path)?;
        if has_schema(&conn)? {
            drop(conn);
            Self::open(path)
        } else {
            drop(conn);
            Self::create(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.initialize_with_schema(SCHEMA)
    }

    /// Run a schema script, then fill the schools and classes tables.
    ///
    /// Destructive: the script is expected to drop existing tables.
    pub fn initialize_with_schema(&mut self, schema: &str) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(schema)?;
        {
            let mut insert = tx.prepare("INSERT INTO classes (class_name) VALUES (?1)")?;
            for class in SpellClass::ALL {
                insert.execute(params![class.name()])?;
            }
            let mut insert = tx.prepare("INSERT INTO schools (school_name) VALUES (?1)")?;
            for school in School::ALL {
                insert.execute(params![school.name()])?;
            }
        }
        tx.commit()?;
        info!("Initialized spell database at {}", self.path.display());

        self.load_lookups()
    }

    fn connect(&self) -> Result<Connection> {
        open_connection(&self.path)
    }

    fn load_lookups(&mut self) -> Result<()> {
        let conn = self.connect()?;
        if !has_schema(&conn)? {
            return Err(SpellbookError::Store(format!(
                "Spell database at {} is not initialized",
                self.path.display()
            )));
        }
        self.class_ids = load_lookup(&conn, "SELECT class_id, class_name FROM classes")?;
        self.school_ids = load_lookup(&conn, "SELECT school_id, school_name FROM schools")?;
        debug!(
            "Loaded {} classes and {} schools",
            self.class_ids.ids.len(),
            self.school_ids.ids.len()
        );
        Ok(())
    }

    fn to_row(&self, record: &SpellRecord) -> Result<SpellRow> {
        Ok(SpellRow {
            name: record.name.clone(),
            level: record.level as i64,
            school: self.school_ids.id(record.school)?,
            ritual: record.ritual,
            cast_time: record.cast_time,
            range: record.range.clone(),
            concentration: record.concentration,
            duration: record.duration.clone(),
            components: record.components,
            materials: record.materials.text().to_string(),
            materials_tags: record.materials.tags_to_storage()?,
            description: record.description.text().to_string(),
            description_tags: record.description.tags_to_storage()?,
            higher_levels: record.higher_levels.text().to_string(),
            higher_levels_tags: record.higher_levels.tags_to_storage()?,
        })
    }

    fn insert_class_relations(
        &self,
        tx: &Transaction,
        id: SpellId,
        classes: &BTreeSet<SpellClass>,
    ) -> Result<()> {
        let mut insert = tx.prepare(INSERT_SPELL_CLASS)?;
        for class in classes {
            insert.execute(params![id.0, self.class_ids.id(*class)?])?;
        }
        Ok(())
    }

    fn load_classes(&self, conn: &Connection, id: SpellId) -> Result<BTreeSet<SpellClass>> {
        let mut stmt = conn.prepare(SELECT_SPELL_CLASSES)?;
        let names = stmt
            .query_map(params![id.0], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        names
            .iter()
            .map(|name| {
                name.parse::<SpellClass>()
                    .map_err(|e| SpellbookError::Store(format!("Corrupt class relation: {}", e)))
            })
            .collect()
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    // Foreign keys are off by default and must be enabled per connection.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

fn has_schema(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
         AND name IN ('schools', 'classes', 'spells', 'spell_classes')",
        [],
        |row| row.get(0),
    )?;
    Ok(count == 4)
}

/// Raw `spells` row as read back.
struct StoredSpell {
    name: Option<String>,
    level: i64,
    school: i64,
    ritual: bool,
    cast_time: f64,
    range: Option<String>,
    concentration: bool,
    duration: Option<String>,
    components: Components,
    materials: (Option<String>, Option<String>),
    description: (Option<String>, Option<String>),
    higher_levels: (Option<String>, Option<String>),
}

fn tagged((text, tags): (Option<String>, Option<String>)) -> Result<TaggedText> {
    TaggedText::from_storage(
        text.unwrap_or_default(),
        tags.as_deref().unwrap_or(EMPTY_TAGS),
    )
}

impl SpellStore for SqliteStore {
    fn reset(&mut self) -> Result<()> {
        self.initialize()
    }

    fn add(&mut self, record: &SpellRecord) -> Result<SpellId> {
        record.validate()?;
        let row = self.to_row(record)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(INSERT_SPELL, row.params().as_slice())?;
        let id = SpellId(tx.last_insert_rowid());
        self.insert_class_relations(&tx, id, &record.classes)?;
        tx.commit()?;

        info!("Added spell {} ({})", record.name, id);
        Ok(id)
    }

    fn update(&mut self, id: SpellId, record: &SpellRecord) -> Result<()> {
        record.validate()?;
        let row = self.to_row(record)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut params = row.params();
        params.push((":spell_id", &id.0));
        if tx.execute(UPDATE_SPELL, params.as_slice())? == 0 {
            return Err(SpellbookError::NotFound(id));
        }
        tx.execute("DELETE FROM spell_classes WHERE spell_id = ?1", params![id.0])?;
        self.insert_class_relations(&tx, id, &record.classes)?;
        tx.commit()?;

        info!("Updated spell {} ({})", record.name, id);
        Ok(())
    }

    fn delete(&mut self, id: SpellId) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        // Relations first: they reference the spell row.
        tx.execute("DELETE FROM spell_classes WHERE spell_id = ?1", params![id.0])?;
        if tx.execute("DELETE FROM spells WHERE spell_id = ?1", params![id.0])? == 0 {
            return Err(SpellbookError::NotFound(id));
        }
        tx.commit()?;

        info!("Deleted spell {}", id);
        Ok(())
    }

    fn get(&self, id: SpellId) -> Result<SpellRecord> {
        let conn = self.connect()?;
        let stored = conn
            .query_row(SELECT_SPELL, params![id.0], |row| {
                Ok(StoredSpell {
                    name: row.get(0)?,
                    level: row.get(1)?,
                    school: row.get(2)?,
                    ritual: row.get(3)?,
                    cast_time: row.get(4)?,
                    range: row.get(5)?,
                    concentration: row.get(6)?,
                    duration: row.get(7)?,
                    components: Components::new(row.get(8)?, row.get(9)?, row.get(10)?),
                    materials: (row.get(11)?, row.get(12)?),
                    description: (row.get(13)?, row.get(14)?),
                    higher_levels: (row.get(15)?, row.get(16)?),
                })
            })
            .optional()?
            .ok_or(SpellbookError::NotFound(id))?;

        let level = u8::try_from(stored.level)
            .map_err(|_| SpellbookError::Store(format!("Spell {} has level {}", id, stored.level)))?;

        Ok(SpellRecord {
            id: Some(id),
            name: stored.name.unwrap_or_default(),
            level,
            school: self.school_ids.value(stored.school)?,
            ritual: stored.ritual,
            cast_time: stored.cast_time,
            range: stored.range.unwrap_or_default(),
            concentration: stored.concentration,
            duration: stored.duration.unwrap_or_default(),
            components: stored.components,
            materials: tagged(stored.materials)?,
            description: tagged(stored.description)?,
            higher_levels: tagged(stored.higher_levels)?,
            classes: self.load_classes(&conn, id)?,
        })
    }

    fn list_names(&self) -> Result<Vec<SpellEntry>> {
        self.query(&FilterSpec::default())
    }

    fn query(&self, filter: &FilterSpec) -> Result<Vec<SpellEntry>> {
        let q = query::build(filter);
        debug!("Spell query: {} {:?}", q.sql, q.params);

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&q.sql)?;
        let entries = stmt
            .query_map(params_from_iter(q.params.iter()), |row| {
                Ok(SpellEntry::new(
                    row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    SpellId(row.get(1)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}
