use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use ow_namespace::{
    Align, Attributes, CallerContext, Column, CompareOutcome, DirectoryRecordSource,
    DisplayMode, FsPathResolver, NamespaceConfig, NamespaceProvider, RecordSource,
    StaticRecordSource,
};
use ow_pidl::{codec, IdChain, IdList, ItemRef};
use ow_types::{HeapAllocator, Record};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut provider = build_provider(&cli)?;
    let caller = match &cli.caller {
        Some(location) => CallerContext::at(location.as_str()),
        None => CallerContext::default(),
    };
    let items = provider.enumerate(&caller)?.next_batch(usize::MAX)?.items;

    match cli.command {
        Command::List(args) => cmd_list(&provider, items, args, cli.format),
        Command::Dump => cmd_dump(&items, cli.format),
        Command::Show(args) => cmd_show(&provider, find(&items, args.rank)?, cli.format),
        Command::Bind(args) => cmd_bind(&provider, find(&items, args.rank)?, cli.format),
        Command::Transfer(args) => {
            cmd_transfer(&mut provider, find(&items, args.rank)?, cli.format)
        }
    }
}

fn build_provider(cli: &Cli) -> anyhow::Result<NamespaceProvider> {
    let source: Arc<dyn RecordSource> = match (&cli.records, &cli.dir) {
        (Some(path), _) => Arc::new(
            StaticRecordSource::load(path)
                .with_context(|| format!("loading records from {}", path.display()))?,
        ),
        (None, Some(dir)) => Arc::new(DirectoryRecordSource::new(dir)),
        (None, None) => bail!("a record source is required: pass --records <file> or --dir <path>"),
    };
    let config = match &cli.config {
        Some(path) => NamespaceConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NamespaceConfig::default(),
    };
    Ok(NamespaceProvider::new(
        source,
        Arc::new(FsPathResolver),
        Arc::new(HeapAllocator),
        config,
    ))
}

fn find(items: &[IdList], rank: u16) -> anyhow::Result<&IdList> {
    items
        .iter()
        .find(|id| codec::rank(&id.as_chain()).is_ok_and(|r| r == rank))
        .ok_or_else(|| anyhow!("no item with rank {rank}"))
}

fn record_of(id: &IdList) -> anyhow::Result<Record> {
    ItemRef::classify(id.as_chain())?
        .record()
        .cloned()
        .ok_or_else(|| anyhow!("identifier is not an item of this namespace"))
}

fn pad(text: &str, align: Align, width: usize) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

fn cmd_list(
    provider: &NamespaceProvider,
    mut items: Vec<IdList>,
    args: ListArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let key = match args.sort {
        SortColumn::Name => Column::Name,
        SortColumn::Path => Column::Path,
        SortColumn::Rank => Column::Rank,
    }
    .index();

    let mut failure = None;
    items.sort_by(|a, b| match provider.compare(key, a.as_chain(), b.as_chain()) {
        Ok(CompareOutcome::Ordered(ordering)) => ordering,
        Ok(CompareOutcome::Unordered) => Ordering::Greater,
        Err(err) => {
            failure.get_or_insert(err);
            Ordering::Equal
        }
    });
    if let Some(err) = failure {
        return Err(err.into());
    }
    if args.reverse {
        items.reverse();
    }

    if format == OutputFormat::Json {
        let records = items.iter().map(record_of).collect::<anyhow::Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let columns = provider.columns();
    let header: Vec<String> = columns
        .iter()
        .map(|c| pad(c.title, c.align, c.width_chars))
        .collect();
    println!("{}", header.join("  ").bold());
    for id in &items {
        let mut cells = Vec::with_capacity(columns.len());
        for info in &columns {
            let value = provider.column_value(id.as_chain(), info.column.index())?;
            let cell = pad(&value.text, value.align, info.width_chars);
            cells.push(match info.column {
                Column::Name => cell.cyan().to_string(),
                Column::Rank => cell.yellow().to_string(),
                Column::Path => cell,
            });
        }
        println!("{}", cells.join("  "));
    }
    println!("\n{} item(s)", items.len().to_string().bold());
    Ok(())
}

fn cmd_dump(items: &[IdList], format: OutputFormat) -> anyhow::Result<()> {
    let mut rows = Vec::with_capacity(items.len());
    for id in items {
        rows.push((codec::rank(&id.as_chain())?, hex::encode(id.as_bytes())));
    }
    match format {
        OutputFormat::Json => {
            let out: Vec<_> = rows
                .iter()
                .map(|(rank, bytes)| json!({ "rank": rank, "bytes": bytes }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for (rank, bytes) in rows {
                println!("{:>6}  {}", rank.to_string().yellow(), bytes.dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_show(provider: &NamespaceProvider, id: &IdList, format: OutputFormat) -> anyhow::Result<()> {
    let chain = id.as_chain();
    let modes = [
        ("normal", DisplayMode::NORMAL),
        ("in-folder", DisplayMode::IN_FOLDER),
        ("parsing", DisplayMode::NORMAL_PARSING),
        ("in-folder-parsing", DisplayMode::IN_FOLDER_PARSING),
    ];
    let mut names = Vec::with_capacity(modes.len());
    for (label, mode) in modes {
        names.push((label, provider.display_name(chain, mode)?.to_string_lossy()));
    }
    let attributes = provider.attributes_of(&[chain], Attributes::all());

    match format {
        OutputFormat::Json => {
            let names: serde_json::Map<_, _> = names
                .into_iter()
                .map(|(label, name)| (label.to_string(), json!(name)))
                .collect();
            let out = json!({
                "record": record_of(id)?,
                "display_names": names,
                "attributes": attributes.bits(),
                "attribute_names": attributes.iter_names().map(|(n, _)| n).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Item {}", chain.to_string().cyan().bold());
            for (label, name) in names {
                println!("  {:<18} {}", format!("{label}:"), name);
            }
            let flags: Vec<_> = attributes.iter_names().map(|(n, _)| n).collect();
            println!("  {:<18} {}", "attributes:", flags.join(" | ").green());
        }
    }
    Ok(())
}

fn cmd_bind(provider: &NamespaceProvider, id: &IdList, format: OutputFormat) -> anyhow::Result<()> {
    let folder = provider.bind(id.as_chain())?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "location": folder.location() })),
        OutputFormat::Text => println!(
            "{} Bound {} to {}",
            "✓".green().bold(),
            id.as_chain().to_string().cyan(),
            folder.location().bold()
        ),
    }
    Ok(())
}

fn cmd_transfer(
    provider: &mut NamespaceProvider,
    id: &IdList,
    format: OutputFormat,
) -> anyhow::Result<()> {
    provider.initialize(IdChain::root())?;
    let package = provider.data_object(&[id.as_chain()])?;
    match format {
        OutputFormat::Json => {
            let out = json!({
                "size": package.as_bytes().len(),
                "parent": hex::encode(package.parent()?.as_bytes()),
                "item": hex::encode(package.item(0)?.as_bytes()),
                "bytes": hex::encode(package.as_bytes()),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "{} Transfer package for {} ({} bytes)",
                "✓".green().bold(),
                id.as_chain().to_string().cyan(),
                package.as_bytes().len()
            );
            println!("  {}", hex::encode(package.as_bytes()).dimmed());
        }
    }
    Ok(())
}
