mod cli;
mod html;
mod image;
mod loader;
mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cronspread_core::config::{load_dotenv, Config};
use cronspread_core::suggestion_output;
use cronspread_engine::{build_heatmap, optimizer_for, HeatmapData, ReferenceDay};

use crate::cli::{CliArgs, InputFormat};
use crate::html::{render_html, HtmlSection};
use crate::image::render_svg;
use crate::loader::load_jobs;
use crate::output::{render_heatmap, serialize_suggestions};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = resolve_config(&args);
    config.log_summary();

    let format = args.format.unwrap_or_else(|| InputFormat::infer(&args.file));
    let jobs = load_jobs(&args.file, format)
        .with_context(|| format!("failed to load jobs from '{}'", args.file.display()))?;
    info!(jobs = jobs.len(), ?format, "job list loaded");

    let day = ReferenceDay::new(config.reference_date);
    let heatmap = build_heatmap(&jobs, day, config.reflect_duration);
    let mut generated = Vec::new();

    if args.suggest {
        emit_heatmap(&args, &config, &heatmap, ".before", &mut generated)?;

        let suggestion = optimizer_for(config.optimizer, day).optimize(&jobs);
        let revised = suggestion_output(&jobs, &suggestion.jobs);
        let content = serialize_suggestions(&revised, format)?;
        let target = with_suffix(&args.file, ".suggested");
        fs::write(&target, content)
            .with_context(|| format!("failed to write '{}'", target.display()))?;
        generated.push(target);

        let after = build_heatmap(&suggestion.jobs, day, config.reflect_duration);
        emit_heatmap(&args, &config, &after, ".after", &mut generated)?;
        if args.html {
            let sections = [
                HtmlSection {
                    id: "before",
                    title: "Before suggestions",
                    heatmap: &heatmap,
                },
                HtmlSection {
                    id: "after",
                    title: "After suggestions",
                    heatmap: &after,
                },
            ];
            write_html(&args, &config, &sections, &mut generated)?;
        }
    } else {
        emit_heatmap(&args, &config, &heatmap, "", &mut generated)?;
        if args.html {
            let sections = [HtmlSection {
                id: "schedule",
                title: "Schedule overview",
                heatmap: &heatmap,
            }];
            write_html(&args, &config, &sections, &mut generated)?;
        }
    }

    if !generated.is_empty() {
        println!("Generated files:");
        for file in &generated {
            let shown = fs::canonicalize(file).unwrap_or_else(|_| file.clone());
            println!(" - {}", shown.display());
        }
    }
    Ok(())
}

/// Environment first, command-line flags on top.
fn resolve_config(args: &CliArgs) -> Config {
    let mut config = Config::from_env();
    if let Some(date) = args.date {
        config.reference_date = date;
    }
    if let Some(optimizer) = args.optimizer {
        config.optimizer = optimizer;
    }
    config.reflect_duration |= args.reflect_duration;
    config
}

/// Print the heatmap, write it next to `--out-file`, or write it as an image.
fn emit_heatmap(
    args: &CliArgs,
    config: &Config,
    heatmap: &HeatmapData,
    stage: &str,
    generated: &mut Vec<PathBuf>,
) -> Result<()> {
    if args.image {
        let base = args.out_file.as_deref().unwrap_or(args.file.as_path());
        let suffix = format!("{}.{}", run_suffix(args, config, stage), config.optimizer);
        let target = with_suffix(&base.with_extension(args.image_format.extension()), &suffix);
        let svg = render_svg(&heatmap.normalized).context("failed to render heatmap image")?;
        fs::write(&target, svg)
            .with_context(|| format!("failed to write '{}'", target.display()))?;
        generated.push(target);
        return Ok(());
    }

    let rendered = render_heatmap(heatmap, args.color);
    let Some(out_file) = &args.out_file else {
        println!("{rendered}\n");
        return Ok(());
    };

    let target = with_suffix(out_file, &run_suffix(args, config, stage));
    fs::write(&target, format!("{rendered}\n"))
        .with_context(|| format!("failed to write '{}'", target.display()))?;
    generated.push(target);
    Ok(())
}

/// Write the interactive page to `<base>.heatmap.html`.
fn write_html(
    args: &CliArgs,
    config: &Config,
    sections: &[HtmlSection<'_>],
    generated: &mut Vec<PathBuf>,
) -> Result<()> {
    let base = args.out_file.as_deref().unwrap_or(args.file.as_path());
    let target = with_suffix(&base.with_extension("html"), ".heatmap");
    let page = render_html(sections, &options_used(args, config))
        .context("failed to render HTML heatmap")?;
    fs::write(&target, page).with_context(|| format!("failed to write '{}'", target.display()))?;
    generated.push(target);
    Ok(())
}

/// Flags that shaped the HTML page, as listed on it.
fn options_used(args: &CliArgs, config: &Config) -> Vec<String> {
    let mut used = vec!["--html".to_string()];
    if args.suggest {
        used.push("--suggest".to_string());
        used.push(format!("--optimizer {}", config.optimizer));
    }
    if config.reflect_duration {
        used.push("--reflect-duration".to_string());
    }
    used
}

/// Stage, then `.suggested` and `.reflect` when those modes are on.
fn run_suffix(args: &CliArgs, config: &Config, stage: &str) -> String {
    let mut suffix = stage.to_string();
    if args.suggest {
        suffix.push_str(".suggested");
    }
    if config.reflect_duration {
        suffix.push_str(".reflect");
    }
    suffix
}

/// `dir/name.ext` -> `dir/name<suffix>.ext`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}
