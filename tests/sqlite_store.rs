use rusqlite::{params, Connection};
use spellbook::error::SpellbookError;
use spellbook::filter::{FilterSpec, RitualFilter};
use spellbook::model::{School, SpellClass, SpellEntry, SpellId, SpellRecord};
use spellbook::samples;
use spellbook::store::memory::InMemoryStore;
use spellbook::store::sqlite::SqliteStore;
use spellbook::store::SpellStore;
use spellbook::tagged_text::{make_range, BOLD};
use std::path::PathBuf;
use tempfile::TempDir;

fn setup() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::create(dir.path().join("spells.sqlite3")).unwrap();
    (dir, store)
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("spells.sqlite3")
}

fn seeded() -> (TempDir, SqliteStore) {
    let (dir, mut store) = setup();
    for spell in samples::sample_spells() {
        store.add(&spell).unwrap();
    }
    (dir, store)
}

fn names(entries: &[SpellEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

fn spell(name: &str, level: u8, school: School, classes: &[SpellClass]) -> SpellRecord {
    let mut spell = SpellRecord::new(name, level, school);
    spell.classes = classes.iter().copied().collect();
    spell
}

#[test]
fn test_lookup_tables_are_filled() {
    let (dir, _store) = setup();
    let conn = Connection::open(db_path(&dir)).unwrap();
    let classes: i64 = conn
        .query_row("SELECT COUNT(*) FROM classes", [], |r| r.get(0))
        .unwrap();
    let schools: i64 = conn
        .query_row("SELECT COUNT(*) FROM schools", [], |r| r.get(0))
        .unwrap();
    assert_eq!(classes, 8);
    assert_eq!(schools, 8);

    let sorceror: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM classes WHERE class_name = 'Sorceror'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(sorceror, 1);
}

#[test]
fn test_add_then_get_round_trips() {
    let (_dir, mut store) = setup();
    for sample in samples::sample_spells() {
        let id = store.add(&sample).unwrap();
        let mut expected = sample.clone();
        expected.id = Some(id);
        assert_eq!(store.get(id).unwrap(), expected);
    }
}

#[test]
fn test_columns_hold_plain_values_and_tag_json() {
    let (dir, mut store) = setup();
    let id = store.add(&samples::bless()).unwrap();

    let conn = Connection::open(db_path(&dir)).unwrap();
    let (ritual, concentration, cast_time, tags): (i64, i64, f64, String) = conn
        .query_row(
            "SELECT spell_ritual, spell_concentration, spell_cast_time, spell_description_tags
             FROM spells WHERE spell_id = ?1",
            params![id.0],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(ritual, 0);
    assert_eq!(concentration, 1);
    assert_eq!(cast_time, 0.1);

    let tags: serde_json::Value = serde_json::from_str(&tags).unwrap();
    assert_eq!(
        tags,
        serde_json::json!({"bold": [["1.16", "1.31"]], "italic": [["1.163", "1.165"]]})
    );
}

#[test]
fn test_list_is_sorted_by_name() {
    let (_dir, store) = seeded();
    assert_eq!(
        names(&store.list_names().unwrap()),
        vec!["Armor of Agathys", "Bless", "False Life", "Fireball"]
    );
}

#[test]
fn test_class_filter() {
    let (_dir, store) = seeded();
    let wizard = store
        .query(&FilterSpec::new().with_classes([SpellClass::Wizard]))
        .unwrap();
    assert_eq!(names(&wizard), vec!["False Life", "Fireball"]);
}

#[test]
fn test_spell_in_several_selected_classes_is_listed_once() {
    let (_dir, store) = seeded();
    let result = store
        .query(&FilterSpec::new().with_classes([SpellClass::Sorceror, SpellClass::Wizard]))
        .unwrap();
    assert_eq!(names(&result), vec!["False Life", "Fireball"]);
}

#[test]
fn test_full_and_empty_class_sets_list_everything() {
    let (_dir, mut store) = seeded();
    store
        .add(&spell("Classless", 2, School::Divination, &[]))
        .unwrap();

    let all = store.list_names().unwrap();
    let full = store
        .query(&FilterSpec::new().with_classes(SpellClass::ALL.iter().copied()))
        .unwrap();
    let empty = store.query(&FilterSpec::new()).unwrap();
    assert_eq!(full, all);
    assert_eq!(empty, all);
    assert_eq!(all.len(), 5);
}

#[test]
fn test_bless_and_fireball_scenario() {
    let (_dir, mut store) = setup();
    store
        .add(&spell("Bless", 1, School::Enchantment, &[SpellClass::Cleric]))
        .unwrap();
    store
        .add(&spell(
            "Fireball",
            3,
            School::Evocation,
            &[SpellClass::Sorceror, SpellClass::Wizard],
        ))
        .unwrap();

    let level3 = store.query(&FilterSpec::new().with_level(3)).unwrap();
    assert_eq!(names(&level3), vec!["Fireball"]);

    let enchantment = store
        .query(&FilterSpec::new().with_school(School::Enchantment))
        .unwrap();
    assert_eq!(names(&enchantment), vec!["Bless"]);

    let everything = store.query(&FilterSpec::new()).unwrap();
    assert_eq!(names(&everything), vec!["Bless", "Fireball"]);
}

#[test]
fn test_ritual_filter() {
    let (_dir, mut store) = seeded();
    let mut alarm = spell("Alarm", 1, School::Abjuration, &[SpellClass::Wizard]);
    alarm.ritual = true;
    store.add(&alarm).unwrap();

    let rituals = store
        .query(&FilterSpec::new().with_ritual(RitualFilter::Required))
        .unwrap();
    assert_eq!(names(&rituals), vec!["Alarm"]);

    let plain = store
        .query(&FilterSpec::new().with_ritual(RitualFilter::Excluded))
        .unwrap();
    assert_eq!(plain.len(), 4);
}

#[test]
fn test_sqlite_and_memory_stores_agree() {
    let (_dir, sqlite) = seeded();
    let mut memory = InMemoryStore::new();
    for spell in samples::sample_spells() {
        memory.add(&spell).unwrap();
    }

    let filters = [
        FilterSpec::new(),
        FilterSpec::new().with_classes([SpellClass::Cleric]),
        FilterSpec::new().with_classes([SpellClass::Warlock, SpellClass::Cleric]),
        FilterSpec::new().with_level(1),
        FilterSpec::new().with_level(1).with_school(School::Necromancy),
        FilterSpec::new().with_school(School::Illusion),
        FilterSpec::new().with_ritual(RitualFilter::Excluded),
        FilterSpec::new()
            .with_classes([SpellClass::Wizard])
            .with_level(3)
            .with_school(School::Evocation),
    ];
    for filter in &filters {
        assert_eq!(
            sqlite.query(filter).unwrap(),
            memory.query(filter).unwrap(),
            "filter {:?}",
            filter
        );
    }
}

#[test]
fn test_update_replaces_fields_and_classes() {
    let (_dir, mut store) = seeded();
    let id = SpellId(4);
    let mut fireball = store.get(id).unwrap();
    fireball.level = 4;
    fireball.classes = [SpellClass::Druid].into();
    fireball.description = fireball
        .description
        .clone()
        .with_range(BOLD, make_range(1, 0, None, Some(1)));
    store.update(id, &fireball).unwrap();

    let stored = store.get(id).unwrap();
    assert_eq!(stored, fireball);
    assert_eq!(stored.classes, [SpellClass::Druid].into());

    let wizard = store
        .query(&FilterSpec::new().with_classes([SpellClass::Wizard]))
        .unwrap();
    assert_eq!(names(&wizard), vec!["False Life"]);
}

#[test]
fn test_delete_removes_spell_and_relations() {
    let (dir, mut store) = seeded();
    store.delete(SpellId(4)).unwrap();

    assert!(matches!(
        store.get(SpellId(4)),
        Err(SpellbookError::NotFound(SpellId(4)))
    ));
    assert!(!names(&store.list_names().unwrap()).contains(&"Fireball"));

    let conn = Connection::open(db_path(&dir)).unwrap();
    let relations: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM spell_classes WHERE spell_id = 4",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(relations, 0);
}

#[test]
fn test_missing_ids_are_not_found() {
    let (_dir, mut store) = seeded();
    let record = samples::bless();
    assert!(matches!(
        store.update(SpellId(99), &record),
        Err(SpellbookError::NotFound(_))
    ));
    assert!(matches!(
        store.delete(SpellId(99)),
        Err(SpellbookError::NotFound(_))
    ));
    assert_eq!(store.list_names().unwrap().len(), 4);
}

#[test]
fn test_invalid_record_is_rejected_before_writing() {
    let (_dir, mut store) = setup();
    let mut bad = samples::bless();
    bad.level = 10;
    assert!(matches!(store.add(&bad), Err(SpellbookError::Validation(_))));
    assert!(store.list_names().unwrap().is_empty());
}

#[test]
fn test_failed_add_leaves_nothing_behind() {
    let (dir, mut store) = setup();
    // The store still maps Wizard to the row removed here, so the relation
    // insert violates the foreign key.
    let conn = Connection::open(db_path(&dir)).unwrap();
    conn.execute("DELETE FROM classes WHERE class_name = 'Wizard'", [])
        .unwrap();

    let result = store.add(&samples::fireball());
    assert!(matches!(result, Err(SpellbookError::Storage(_))));
    assert!(store.list_names().unwrap().is_empty());
}

#[test]
fn test_failed_update_keeps_old_row_and_classes() {
    let (dir, mut store) = seeded();
    let fireball = SpellId(4);
    let conn = Connection::open(db_path(&dir)).unwrap();
    conn.execute("DELETE FROM classes WHERE class_name = 'Druid'", [])
        .unwrap();

    let mut changed = store.get(fireball).unwrap();
    changed.level = 5;
    changed.classes = [SpellClass::Druid].into_iter().collect();
    let result = store.update(fireball, &changed);
    assert!(matches!(result, Err(SpellbookError::Storage(_))));

    let kept = store.get(fireball).unwrap();
    assert_eq!(kept.level, 3);
    assert_eq!(
        kept.classes,
        [SpellClass::Sorceror, SpellClass::Wizard].into_iter().collect()
    );
}

#[test]
fn test_failed_delete_keeps_relations() {
    let (dir, mut store) = seeded();
    let conn = Connection::open(db_path(&dir)).unwrap();
    // Aborts after the relation rows are already gone.
    conn.execute_batch(
        "CREATE TRIGGER keep_spells BEFORE DELETE ON spells
         BEGIN SELECT RAISE(ABORT, 'spells are read-only'); END;",
    )
    .unwrap();

    let result = store.delete(SpellId(4));
    assert!(matches!(result, Err(SpellbookError::Storage(_))));
    assert_eq!(store.list_names().unwrap().len(), 4);
    let wizard = FilterSpec::new().with_classes([SpellClass::Wizard]);
    assert_eq!(names(&store.query(&wizard).unwrap()), vec!["False Life", "Fireball"]);
}

#[test]
fn test_invalid_schema_is_storage_error() {
    let (_dir, mut store) = seeded();
    let result = store.initialize_with_schema("CREATE TABL oops;");
    assert!(matches!(result, Err(SpellbookError::Storage(_))));

    // A script that fails partway leaves the old tables in place.
    let result = store.initialize_with_schema("DROP TABLE spell_classes; CREATE TABL oops;");
    assert!(matches!(result, Err(SpellbookError::Storage(_))));
    assert_eq!(store.list_names().unwrap().len(), 4);
    assert_eq!(
        store.get(SpellId(4)).unwrap().classes,
        [SpellClass::Sorceror, SpellClass::Wizard].into_iter().collect()
    );
}

#[test]
fn test_duplicate_names_are_ordered_by_id() {
    let (_dir, mut store) = setup();
    let first = store.add(&samples::bless()).unwrap();
    let second = store.add(&samples::bless()).unwrap();
    let listed = store.list_names().unwrap();
    assert_eq!(
        listed,
        vec![SpellEntry::new("Bless", first), SpellEntry::new("Bless", second)]
    );
}

#[test]
fn test_legacy_tag_json_is_read() {
    let (dir, mut store) = setup();
    let id = store.add(&spell("Light", 0, School::Evocation, &[])).unwrap();

    let conn = Connection::open(db_path(&dir)).unwrap();
    conn.execute(
        "UPDATE spells SET spell_description = 'Shines brightly.',
         spell_description_tags = ?1, spell_materials_tags = NULL
         WHERE spell_id = ?2",
        params![
            r#"{"bold": [["1.0", "1.end"]], "sel": [["1.0", "1.3"]]}"#,
            id.0
        ],
    )
    .unwrap();

    let light = store.get(id).unwrap();
    assert_eq!(light.description.text(), "Shines brightly.");
    assert_eq!(
        light.description.tags().ranges(BOLD),
        &[make_range(1, 0, None, None)]
    );
    assert!(light.description.tags().ranges("sel").is_empty());
    assert!(light.materials.tags().is_empty());
}

#[test]
fn test_malformed_tags_are_a_serialization_error() {
    let (dir, mut store) = setup();
    let id = store.add(&samples::bless()).unwrap();

    let conn = Connection::open(db_path(&dir)).unwrap();
    conn.execute(
        "UPDATE spells SET spell_higher_levels_tags = 'not json' WHERE spell_id = ?1",
        params![id.0],
    )
    .unwrap();

    assert!(matches!(
        store.get(id),
        Err(SpellbookError::Serialization(_))
    ));
}

#[test]
fn test_open_requires_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.sqlite3");
    assert!(matches!(
        SqliteStore::open(&path),
        Err(SpellbookError::Store(_))
    ));

    let store = SqliteStore::open_or_create(&path).unwrap();
    assert!(store.list_names().unwrap().is_empty());
    assert!(SqliteStore::open(&path).is_ok());
}

#[test]
fn test_reopen_keeps_data_and_reset_wipes_it() {
    let (dir, _store) = seeded();
    let mut reopened = SqliteStore::open(db_path(&dir)).unwrap();
    assert_eq!(reopened.list_names().unwrap().len(), 4);
    assert_eq!(reopened.get(SpellId(1)).unwrap().name, "Bless");

    reopened.reset().unwrap();
    assert!(reopened.list_names().unwrap().is_empty());
    let id = reopened.add(&samples::fireball()).unwrap();
    assert_eq!(id, SpellId(1));
}
