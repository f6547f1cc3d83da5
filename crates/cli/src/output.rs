//! Text output: ASCII heatmaps and suggested job lists.

use anyhow::{Context, Result};
use crossterm::style::{style, Stylize};

use cronspread_core::{IntensityGrid, SuggestedJob, MINUTES_PER_HOUR};
use cronspread_engine::HeatmapData;

use crate::cli::InputFormat;

/// Block ramp indexed by intensity level.
const RAMP: [char; 10] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '▉', '█'];
const CELL_WIDTH: usize = 2;

/// Render a heatmap with its density summary line.
pub fn render_heatmap(heatmap: &HeatmapData, color: bool) -> String {
    format!(
        "{}\n\n{}",
        render_grid(&heatmap.normalized, color),
        density_summary(heatmap.max_value, heatmap.min_value)
    )
}

/// One row per hour framed by hour labels, minute labels above and below.
pub fn render_grid(grid: &IntensityGrid, color: bool) -> String {
    let header = minute_header();
    let mut lines = Vec::with_capacity(26);
    lines.push(header.clone());
    for (hour, row) in grid.rows().enumerate() {
        let cells: String = row.iter().map(|&level| cell(level, color)).collect();
        lines.push(format!("{hour:02} |{cells}| {hour:02}"));
    }
    lines.push(header);
    lines.join("\n")
}

fn minute_header() -> String {
    let labels: String = (0..MINUTES_PER_HOUR)
        .map(|minute| {
            if minute % 5 == 0 {
                format!("{minute:02}")
            } else {
                " ".repeat(CELL_WIDTH)
            }
        })
        .collect();
    format!("    {labels}    ")
}

fn cell(level: u8, color: bool) -> String {
    let glyph = RAMP[usize::from(level).min(RAMP.len() - 1)];
    let text = glyph.to_string().repeat(CELL_WIDTH);
    if !color || level == 0 {
        return text;
    }
    match level {
        1 => style(text).green().to_string(),
        2 | 3 => style(text).yellow().to_string(),
        _ => style(text).red().to_string(),
    }
}

fn density_summary(max_value: u32, min_value: u32) -> String {
    format!(
        "Density summary: Highest density: {}. Lowest density: {}.",
        runs(max_value),
        runs(min_value)
    )
}

pub(crate) fn runs(count: u32) -> String {
    match count {
        1 => "1 run".to_string(),
        n => format!("{n} runs"),
    }
}

/// Serialize suggestions in the same representation as the input.
pub fn serialize_suggestions(jobs: &[SuggestedJob], format: InputFormat) -> Result<String> {
    let content = match format {
        InputFormat::Yaml => serde_yaml::to_string(jobs).context("failed to encode YAML")?,
        InputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(jobs).context("failed to encode JSON")?;
            json.push('\n');
            json
        }
        InputFormat::Text => {
            let mut text = serialize_crontab(jobs);
            text.push('\n');
            text
        }
    };
    Ok(content)
}

/// `<schedule> <name>[ # <description>]`, one job per line.
pub fn serialize_crontab(jobs: &[SuggestedJob]) -> String {
    jobs.iter()
        .map(|job| match &job.description {
            Some(description) => format!("{} {} # {}", job.schedule, job.name, description),
            None => format!("{} {}", job.schedule, job.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use cronspread_core::HOURS_PER_DAY;

    use super::*;

    fn suggested(name: &str, schedule: &str, old: Option<&str>) -> SuggestedJob {
        SuggestedJob {
            name: name.into(),
            schedule: schedule.into(),
            description: None,
            old_schedule: old.map(String::from),
        }
    }

    #[test]
    fn grid_layout() {
        let blank = IntensityGrid::from_fn(|_| 0);
        let rendered = render_grid(&blank, false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), HOURS_PER_DAY + 2);
        assert_eq!(lines[0], lines[HOURS_PER_DAY + 1]);
        assert!(lines[0].starts_with("    00    05"));
        assert!(lines[1].starts_with("00 |"));
        assert!(lines[1].ends_with("| 00"));
        assert!(lines[24].starts_with("23 |"));
        assert_eq!(lines[1].chars().count(), 4 + MINUTES_PER_HOUR * CELL_WIDTH + 4);
        assert_eq!(&lines[1][4..4 + MINUTES_PER_HOUR * CELL_WIDTH], " ".repeat(120));
    }

    #[test]
    fn cells_follow_the_ramp() {
        let grid = IntensityGrid::from_fn(|slot| if slot == 0 { 9 } else { 0 });
        let rendered = render_grid(&grid, false);
        let first_row = rendered.lines().nth(1).unwrap();
        assert!(first_row.starts_with("00 |██  "));
    }

    #[test]
    fn colour_only_touches_busy_cells() {
        let grid = IntensityGrid::from_fn(|slot| (slot % 5) as u8);
        let plain = render_grid(&grid, false);
        let coloured = render_grid(&grid, true);
        assert!(coloured.len() >= plain.len());
        let blank = IntensityGrid::from_fn(|_| 0);
        assert_eq!(render_grid(&blank, true), render_grid(&blank, false));
    }

    #[test]
    fn summary_line() {
        assert_eq!(
            density_summary(12, 3),
            "Density summary: Highest density: 12 runs. Lowest density: 3 runs."
        );
        assert_eq!(
            density_summary(1, 0),
            "Density summary: Highest density: 1 run. Lowest density: 0 runs."
        );
    }

    #[test]
    fn crontab_serialization() {
        let mut with_description = suggested("backup", "0 2 * * *", None);
        with_description.description = Some("nightly".into());
        let jobs = vec![
            with_description,
            suggested("sync", "2/5 * * * *", Some("*/5 * * * *")),
        ];
        assert_eq!(
            serialize_crontab(&jobs),
            "0 2 * * * backup # nightly\n2/5 * * * * sync"
        );
    }

    #[test]
    fn json_serialization_uses_old_schedule_key() {
        let jobs = vec![suggested("sync", "2/5 * * * *", Some("*/5 * * * *"))];
        let json = serialize_suggestions(&jobs, InputFormat::Json).unwrap();
        assert!(json.contains("\"oldSchedule\": \"*/5 * * * *\""));
        assert!(json.ends_with("]\n"));

        let yaml = serialize_suggestions(&jobs, InputFormat::Yaml).unwrap();
        assert!(yaml.contains("oldSchedule:"));
        assert!(yaml.contains("*/5 * * * *"));
    }
}
