use anyhow::Context;
use colored::Colorize;

use shelf_codec::convert_scalar;
use shelf_store::{Store, StoreConfig};
use shelf_types::{Record, Value};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = open_store(&cli)?;
    match cli.command {
        Command::Get(args) => cmd_get(&store, args),
        Command::Set(args) => cmd_set(&store, args),
        Command::Delete(args) => cmd_delete(&store, args),
        Command::Exists(args) => cmd_exists(&store, args),
        Command::Search(args) => cmd_search(&store, args),
        Command::Stats => cmd_stats(&store),
        Command::Clean => cmd_clean(&store),
    }
}

fn open_store(cli: &Cli) -> anyhow::Result<Store> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if cli.verbose {
        config.debug = true;
    }
    Store::open(config).context("opening store")
}

fn print_record(record: &Record) -> anyhow::Result<()> {
    let doc = Value::Object(record.clone());
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_get(store: &Store, args: GetArgs) -> anyhow::Result<()> {
    let record = store.get(&args.name)?;
    print_record(&record)
}

fn cmd_set(store: &Store, args: SetArgs) -> anyhow::Result<()> {
    let mut data = Record::new();
    for entry in &args.entries {
        let Some((key, value)) = entry.split_once('=') else {
            anyhow::bail!("malformed entry {entry:?}: expected key=value");
        };
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("malformed entry {entry:?}: empty key");
        }
        data.insert(key.to_string(), convert_scalar(value.trim()));
    }

    let count = data.len();
    store.save(&args.name, data, args.overwrite)?;
    let mode = if args.overwrite { "replaced" } else { "merged" };
    println!(
        "{} Saved {} ({count} entries, {mode})",
        "✓".green().bold(),
        args.name.bold()
    );
    Ok(())
}

fn cmd_delete(store: &Store, args: DeleteArgs) -> anyhow::Result<()> {
    if store.delete(&args.name)? {
        println!("{} Deleted {}", "✓".green().bold(), args.name.bold());
    } else {
        println!("{} Invalid name {}", "✗".red(), args.name.bold());
    }
    Ok(())
}

fn cmd_exists(store: &Store, args: ExistsArgs) -> anyhow::Result<()> {
    if store.exists(&args.name) {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".red());
    }
    Ok(())
}

fn cmd_search(store: &Store, args: SearchArgs) -> anyhow::Result<()> {
    let hits = store.search(&args.name, &args.term, args.exact, args.scope.into())?;
    print_record(&hits)?;
    println!(
        "{} matching {}",
        hits.len().to_string().bold(),
        if hits.len() == 1 { "entry" } else { "entries" }
    );
    Ok(())
}

fn cmd_stats(store: &Store) -> anyhow::Result<()> {
    let stats = store.cache_stats();
    println!("Cache expiry: {}s", stats.expiry.as_secs().to_string().bold());
    println!(
        "Content cache: {} entries ({} valid, {} expired)",
        stats.entries.to_string().bold(),
        stats.valid.to_string().green(),
        stats.expired.to_string().yellow()
    );
    println!("Type cache: {} entries", stats.type_entries.to_string().bold());
    Ok(())
}

fn cmd_clean(store: &Store) -> anyhow::Result<()> {
    let removed = store.clean_expired_cache();
    println!(
        "{} Removed {} expired cache entries",
        "✓".green(),
        removed.to_string().bold()
    );
    Ok(())
}
