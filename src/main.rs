use clap::Parser;
use serde::Serialize;
use tracing::{debug, info, warn};
use yaml_bump::{
    diff, update_image_tags, update_keys, Change, Config, Document, Mode, OutputFormat, Result,
};

/// One applied change, tagged with the file it came from.
#[derive(Debug, Serialize)]
struct FileChange {
    file: String,
    #[serde(flatten)]
    change: Change,
}

/// Aggregate outcome of a run, across all files.
#[derive(Debug, Serialize)]
struct Summary {
    changed: bool,
    changed_files: Vec<String>,
    changes: Vec<FileChange>,
    diff: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse().normalize();
    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;
    info!(mode = ?config.mode, files = config.files.len(), "starting");
    if config.dry_run {
        info!("dry run mode enabled, no changes will be persisted");
    }

    let mut summary = Summary {
        changed: false,
        changed_files: Vec::new(),
        changes: Vec::new(),
        diff: String::new(),
    };

    for file in &config.files {
        debug!(%file, "processing");
        let text = std::fs::read_to_string(file)?;
        let doc = Document::parse(&text)?;
        if doc.is_empty() {
            warn!(%file, "skipping empty YAML file");
            continue;
        }

        let changes = match config.mode {
            Mode::Key => update_keys(&doc, &config.updates())?,
            Mode::Image => {
                // validate() guarantees both are present in image mode.
                let (Some(name), Some(tag)) = (&config.image_name, &config.image_tag) else {
                    unreachable!()
                };
                update_image_tags(&doc, name, tag)
            }
        };

        if changes.is_empty() {
            info!(%file, "no changes needed");
            continue;
        }
        for change in &changes {
            info!(%file, key = %change.key, old = %change.old, new = %change.new, "updated");
        }

        let updated = doc.dump();
        summary.diff.push_str(&diff(file, &text, &updated));
        if !config.dry_run {
            doc.save_to(file)?;
        }
        summary.changed_files.push(file.clone());
        summary.changes.extend(changes.into_iter().map(|change| FileChange {
            file: file.clone(),
            change,
        }));
    }
    summary.changed = !summary.changed_files.is_empty();
    if !summary.changed {
        info!("no changes detected across any files");
    }

    report(config, &summary)
}

fn report(config: &Config, summary: &Summary) -> Result<()> {
    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            for change in &summary.changes {
                println!(
                    "{}: {}: {} -> {}",
                    change.file, change.change.key, change.change.old, change.change.new
                );
            }
            if !summary.diff.is_empty() {
                print!("{}", summary.diff);
            }
        }
    }
    Ok(())
}
