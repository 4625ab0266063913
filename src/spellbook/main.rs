use clap::Parser;
use spellbook::api::ConfigAction;
use spellbook::error::{Result, SpellbookError};
use spellbook::filter::{FilterSpec, RitualFilter};
use spellbook::init::{self, SpellbookContext};
use spellbook::markup::from_markdown;
use spellbook::model::{
    parse_level, parse_range, range_as_string, CastTime, Components, SpellClass, SpellRecord,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

mod args;
mod print;
use args::{Cli, Commands, ListArgs, SpellFields};
use print::{print_config, print_messages, print_spell_cards, print_spell_list};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = init::data_dir()?;
    let mut ctx = init::initialize(data_dir, cli.db.clone())?;

    match cli.command {
        Some(Commands::Init { seed }) => handle_init(&mut ctx, seed),
        Some(Commands::List(args)) => handle_list(&ctx, args),
        Some(Commands::View { spells, markdown }) => handle_view(&ctx, spells, markdown),
        Some(Commands::Add { name, fields }) => handle_add(&mut ctx, name, fields),
        Some(Commands::Edit {
            spells,
            name,
            fields,
        }) => handle_edit(&mut ctx, spells, name, fields),
        Some(Commands::Delete { spells }) => handle_delete(&mut ctx, spells),
        Some(Commands::Seed) => handle_seed(&mut ctx),
        Some(Commands::Export { spells, output }) => handle_export(&ctx, spells, output),
        Some(Commands::Import { paths }) => handle_import(&mut ctx, paths),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, ListArgs::default()),
    }
}

/// `-v` forces debug output; otherwise `RUST_LOG` applies, defaulting to
/// warnings only.
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn handle_init(ctx: &mut SpellbookContext, seed: bool) -> Result<()> {
    let result = ctx.api.init(seed)?;
    print_messages(&result.messages);
    println!("Database: {}", ctx.database.display());
    Ok(())
}

fn handle_list(ctx: &SpellbookContext, args: ListArgs) -> Result<()> {
    let filter = build_filter(&args)?;
    let result = ctx.api.list_spells(&filter)?;
    print_spell_list(&result.listed_spells);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &SpellbookContext, spells: Vec<String>, markdown: bool) -> Result<()> {
    let result = ctx.api.view_spells(&spells)?;
    print_spell_cards(&result.affected_spells, markdown);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut SpellbookContext, name: String, fields: SpellFields) -> Result<()> {
    let level = fields
        .level
        .as_deref()
        .ok_or_else(|| SpellbookError::Api("--level is required when adding a spell".into()))
        .and_then(parse_level)?;
    let school = fields
        .school
        .as_deref()
        .ok_or_else(|| SpellbookError::Api("--school is required when adding a spell".into()))?
        .parse()?;

    let mut record = SpellRecord::new(name, level, school);
    apply_fields(&mut record, &fields)?;

    let result = ctx.api.create_spell(record)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &mut SpellbookContext,
    spells: Vec<String>,
    name: Option<String>,
    fields: SpellFields,
) -> Result<()> {
    let current = ctx.api.view_spells(&spells)?;
    let mut record = match current.affected_spells.as_slice() {
        [spell] => spell.clone(),
        found => {
            return Err(SpellbookError::Api(format!(
                "Edit needs exactly one spell, got {}",
                found.len()
            )))
        }
    };

    if let Some(name) = name {
        record.name = name;
    }
    apply_fields(&mut record, &fields)?;

    let result = ctx.api.update_spell(&spells, record)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut SpellbookContext, spells: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_spells(&spells)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_seed(ctx: &mut SpellbookContext) -> Result<()> {
    let result = ctx.api.seed()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: &SpellbookContext,
    spells: Vec<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let result = ctx.api.export_spells(&spells, output.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut SpellbookContext, paths: Vec<PathBuf>) -> Result<()> {
    let result = ctx.api.import_spells(paths)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &SpellbookContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn build_filter(args: &ListArgs) -> Result<FilterSpec> {
    let classes = args
        .classes
        .iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.trim().parse::<SpellClass>())
        .collect::<Result<BTreeSet<_>>>()?;

    let mut filter = FilterSpec::new().with_classes(classes);
    if let Some(level) = &args.level {
        filter = filter.with_level(parse_level(level)?);
    }
    if let Some(school) = &args.school {
        filter = filter.with_school(school.parse()?);
    }
    if args.ritual {
        filter = filter.with_ritual(RitualFilter::Required);
    } else if args.no_ritual {
        filter = filter.with_ritual(RitualFilter::Excluded);
    }
    Ok(filter)
}

fn parse_classes(classes: &str) -> Result<BTreeSet<SpellClass>> {
    classes
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse)
        .collect()
}

fn apply_fields(record: &mut SpellRecord, fields: &SpellFields) -> Result<()> {
    if let Some(level) = &fields.level {
        record.level = parse_level(level)?;
    }
    if let Some(school) = &fields.school {
        record.school = school.parse()?;
    }
    if let Some(ritual) = fields.ritual {
        record.ritual = ritual;
    }
    if let Some(cast_time) = &fields.cast_time {
        record.cast_time = cast_time.parse::<CastTime>()?.encode();
    }
    if let Some(range) = &fields.range {
        let (quantity, unit) = parse_range(range)?;
        record.range = range_as_string(quantity, unit);
    }
    if let Some(concentration) = fields.concentration {
        record.concentration = concentration;
    }
    if let Some(duration) = &fields.duration {
        record.duration = duration.trim().to_string();
    }
    if let Some(components) = &fields.components {
        record.components = Components::parse(components)?;
    }
    if let Some(materials) = &fields.materials {
        record.materials = from_markdown(materials);
    }
    if let Some(description) = &fields.description {
        record.description = from_markdown(description);
    }
    if let Some(higher_levels) = &fields.higher_levels {
        record.higher_levels = from_markdown(higher_levels);
    }
    if let Some(classes) = &fields.classes {
        record.classes = parse_classes(classes)?;
    }
    Ok(())
}
