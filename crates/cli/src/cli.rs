use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use cronspread_core::OptimizerKind;

use crate::image::ImageFormat;

/// Cron job density heatmaps and schedule spreading.
///
/// Reads a job list, prints a minute-by-hour heatmap of how many jobs run
/// at once, and optionally suggests offsets that flatten the peaks.
#[derive(Parser, Debug)]
#[command(name = "cronspread", about = "Visualize and spread cron job load")]
pub struct CliArgs {
    /// Job list: YAML, JSON or crontab text
    pub file: PathBuf,

    /// Input format (inferred from the file extension if not set)
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Suggest revised schedules and write them next to the input file
    #[arg(long)]
    pub suggest: bool,

    /// Optimizer used with --suggest: offset or greedy
    #[arg(long)]
    pub optimizer: Option<OptimizerKind>,

    /// Spread each run over its estimated duration
    #[arg(long)]
    pub reflect_duration: bool,

    /// Colour heatmap cells by intensity
    #[arg(long)]
    pub color: bool,

    /// Reference day for expanding schedules (YYYY-MM-DD, default today UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Write heatmaps to this file instead of stdout
    #[arg(short, long)]
    pub out_file: Option<PathBuf>,

    /// Write heatmap images instead of ASCII output
    #[arg(long)]
    pub image: bool,

    /// Image format used with --image
    #[arg(long, value_enum, default_value = "svg")]
    pub image_format: ImageFormat,

    /// Write an interactive HTML heatmap next to the out file or input
    #[arg(long)]
    pub html: bool,
}

/// Job list representation on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Yaml,
    Json,
    Text,
}

impl InputFormat {
    /// `.yaml`/`.yml` and `.json` by extension, anything else is crontab text.
    pub fn infer(path: &std::path::Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => InputFormat::Yaml,
            Some("json") => InputFormat::Json,
            _ => InputFormat::Text,
        }
    }
}
