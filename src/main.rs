use anyhow::Context;
use clap::Parser;
use ownerfi_common::PatternTableDef;
use ownerfi_filter::{batch, cli, config, export, scanner, telemetry};
use cli::{Cli, Commands};
use config::Config;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose)?;
    let config = Config::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Classify { text, price, estimate, patterns } => {
            let classifier = config.classifier_with(patterns.as_deref())?;
            let verdict = classifier.classify(&text, price, estimate);

            println!("{}", serde_json::to_string_pretty(&verdict)?);
            eprintln!("{}", verdict.summary());
        }

        Commands::Filter { input, output, format, all, recursive, patterns } => {
            println!("ownerfi-filter - listing filter\n");

            // 1. Classifier first so a bad pattern table fails before any work
            let classifier = config.classifier_with(patterns.as_deref())?;

            println!("[1/3] Loading listings...");
            let listings = scanner::load_listings(&input, recursive)?;
            println!("✔ {} listings loaded\n", listings.len());

            println!("[2/3] Classifying...");
            let results = batch::classify_listings(listings, &classifier, !cli.verbose);
            let summary = batch::BatchSummary::from_results(&results);
            println!(
                "✔ {} kept ({} owner finance, {} cash deal, {} both), {} disqualified\n",
                summary.kept, summary.owner_finance, summary.cash_deal, summary.both,
                summary.disqualified
            );

            println!("[3/3] Writing {} report...", format);
            let (output_dir, stem) = default_output(&input);
            let output = output.unwrap_or(output_dir);
            let written = export::export_results(&results, format, &output, &stem, all)?;
            for path in written {
                println!("✔ {}", path.display());
            }

            println!("\n✅ Done");
        }

        Commands::Patterns { export } => {
            let json = PatternTableDef::builtin().to_json_pretty()?;
            match export {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("✔ Pattern table written: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Config { show, set_window, set_distance, set_threshold, set_patterns } => {
            let mut config = config;
            let mut changed = false;

            if let Some(window) = set_window {
                config.set_look_behind_window(window)?;
                changed = true;
            }
            if let Some(distance) = set_distance {
                config.set_negation_distance(distance)?;
                changed = true;
            }
            if let Some(threshold) = set_threshold {
                config.set_deep_discount_threshold(threshold)?;
                changed = true;
            }
            if let Some(path) = set_patterns {
                // validate before persisting
                ownerfi_common::PatternTable::from_file(&path)
                    .with_context(|| format!("invalid pattern table {}", path.display()))?;
                config.patterns_file = Some(path);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ Configuration saved: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let options = &config.classifier;
                println!("Configuration:");
                println!("  Look-behind window: {} chars", options.matcher.look_behind_window);
                println!("  Negation distance: {} chars", options.matcher.negation_distance);
                println!(
                    "  Deep-discount threshold: {}% of estimate",
                    options.discount.deep_discount_threshold
                );
                match config.patterns_path() {
                    Some(path) => println!("  Pattern table: {}", path.display()),
                    None => println!("  Pattern table: builtin"),
                }
            }
        }
    }

    Ok(())
}

/// Output directory and file stem used when `--output` is not given
fn default_output(input: &Path) -> (PathBuf, String) {
    if input.is_dir() {
        (input.to_path_buf(), "ownerfi-filtered".to_string())
    } else {
        let parent = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "listings".to_string());
        (parent.to_path_buf(), format!("{}.filtered", stem))
    }
}
