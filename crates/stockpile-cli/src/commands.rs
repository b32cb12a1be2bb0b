use std::path::Path;

use colored::Colorize;
use serde_json::Value;
use stockpile_items::ItemDatabase;
use stockpile_store::{FsBackend, MapStore, StoreConfig};
use tracing::info;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = StoreConfig {
        fsync: !cli.no_fsync,
        ..StoreConfig::default()
    };
    let store = MapStore::on_disk(config);
    let path = cli.file.as_path();

    match cli.command {
        Command::Show => cmd_show(&store, path, cli.format).await,
        Command::Count(args) => cmd_count(&store, path, args, cli.format).await,
        Command::Add(args) => cmd_adjust(&store, path, args, Adjust::Add).await,
        Command::Remove(args) => cmd_adjust(&store, path, args, Adjust::Remove).await,
        Command::Records(args) => cmd_records(&store, path, args, cli.format).await,
    }
}

#[derive(Clone, Copy)]
enum Adjust {
    Add,
    Remove,
}

async fn cmd_show(
    store: &MapStore<FsBackend>,
    path: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let db = ItemDatabase::load(store, path).await?;
    let snapshot = db.serialize();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if snapshot.is_empty() {
        println!("No items in {}.", path.display().to_string().bold());
        return Ok(());
    }
    for (item, counts) in snapshot.items() {
        println!("{}", item.bold());
        for (quality, count) in counts {
            println!("  {:<12} {}", quality.cyan(), format_count(*count));
        }
    }
    Ok(())
}

async fn cmd_count(
    store: &MapStore<FsBackend>,
    path: &Path,
    args: CountArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let db = ItemDatabase::load(store, path).await?;
    let count = db.get_item_count(&args.item, &args.quality);
    match format {
        OutputFormat::Json => println!("{count}"),
        OutputFormat::Text => println!(
            "{} ({}): {}",
            args.item.bold(),
            args.quality.cyan(),
            format_count(count)
        ),
    }
    Ok(())
}

async fn cmd_adjust(
    store: &MapStore<FsBackend>,
    path: &Path,
    args: AdjustArgs,
    adjust: Adjust,
) -> anyhow::Result<()> {
    let mut db = ItemDatabase::load(store, path).await?;
    match adjust {
        Adjust::Add => db.add_item(&args.item, args.count, &args.quality)?,
        Adjust::Remove => db.remove_item(&args.item, args.count, &args.quality)?,
    }
    db.save(store, path).await?;

    let total = db.get_item_count(&args.item, &args.quality);
    info!(item = %args.item, quality = %args.quality, total, "ledger updated");
    println!(
        "{} {} ({}) now {}",
        "✓".green().bold(),
        args.item.bold(),
        args.quality.cyan(),
        format_count(total)
    );
    Ok(())
}

async fn cmd_records(
    store: &MapStore<FsBackend>,
    path: &Path,
    args: RecordsArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let records = store.load_array_map(path).await?;
    let selected: Vec<&Value> = match &args.id {
        Some(id) => records.get(id.as_str()).into_iter().collect(),
        None => records.values().collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&selected)?),
        OutputFormat::Text => {
            if selected.is_empty() {
                println!("No records.");
            }
            for record in selected {
                let id = record.get("id").map(Value::to_string).unwrap_or_default();
                println!("{} {}", id.yellow(), record);
            }
        }
    }
    Ok(())
}

fn format_count(count: i64) -> colored::ColoredString {
    let text = count.to_string();
    if count < 0 {
        text.red()
    } else {
        text.green()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    async fn run(file: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["stockpile", "--no-fsync", "-f", file.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::parse_from(argv)).await
    }

    #[tokio::test]
    async fn add_and_remove_persist() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");

        run(&file, &["add", "gear", "5"]).await.unwrap();
        run(&file, &["add", "gear", "2", "-q", "rare"]).await.unwrap();
        run(&file, &["remove", "gear", "5"]).await.unwrap();

        let written: Value = serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"gear": {"rare": 2}}));
    }

    #[tokio::test]
    async fn show_on_missing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("absent.json");
        run(&file, &["show"]).await.unwrap();
        run(&file, &["--format", "json", "count", "gear"]).await.unwrap();
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn records_rejects_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("map.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(run(&file, &["records"]).await.is_err());
    }
}
