//! Interactive HTML heatmap page.
//!
//! Each section draws one heatmap as inline SVG. Every cell carries its raw
//! count and the jobs contributing to it, which the page shows on hover.
//! The template is registered under a `.html` name so minijinja escapes job
//! names and other user text.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use cronspread_core::{slot_of, Contribution, ContributionStatus, HOURS_PER_DAY, MINUTES_PER_HOUR};
use cronspread_engine::HeatmapData;

use crate::image::{cell_origin, color_of, grid_extent, grid_labels, CELL_SIZE, PALETTE};
use crate::output::runs;

const TEMPLATE_NAME: &str = "heatmap.html";
const HTML_TEMPLATE: &str = include_str!("../templates/heatmap.html");

/// One heatmap on the page.
#[derive(Debug, Clone, Copy)]
pub struct HtmlSection<'a> {
    pub id: &'static str,
    pub title: &'static str,
    pub heatmap: &'a HeatmapData,
}

#[derive(Serialize)]
struct SectionView {
    id: &'static str,
    title: &'static str,
    summary: String,
    width: usize,
    height: usize,
    cells: Vec<CellView>,
}

#[derive(Serialize)]
struct CellView {
    x: usize,
    y: usize,
    fill: &'static str,
    hour: String,
    minute: String,
    count: u32,
    starting: usize,
    continuing: usize,
    /// JSON list of `{name, status}` entries.
    contributions: String,
    label: String,
}

#[derive(Serialize)]
struct LegendStep {
    color: &'static str,
    label: String,
}

/// Contributing jobs of one cell, counted by name.
#[derive(Debug, Default)]
struct Buckets<'a> {
    starting: BTreeMap<&'a str, usize>,
    continuing: BTreeMap<&'a str, usize>,
}

impl<'a> Buckets<'a> {
    fn of(entries: &'a [Contribution]) -> Self {
        let mut buckets = Self::default();
        for entry in entries {
            let bucket = match entry.status {
                ContributionStatus::Starting => &mut buckets.starting,
                ContributionStatus::Continuing => &mut buckets.continuing,
            };
            *bucket.entry(entry.name.as_str()).or_default() += 1;
        }
        buckets
    }

    fn starting_count(&self) -> usize {
        self.starting.values().sum()
    }

    fn continuing_count(&self) -> usize {
        self.continuing.values().sum()
    }
}

fn build_env() -> Result<minijinja::Environment<'static>> {
    let mut env = minijinja::Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(TEMPLATE_NAME, HTML_TEMPLATE)?;
    Ok(env)
}

/// Render the page with one section per heatmap and the flags that shaped it.
pub fn render_html(sections: &[HtmlSection<'_>], options_used: &[String]) -> Result<String> {
    let views = sections
        .iter()
        .map(section_view)
        .collect::<Result<Vec<_>>>()?;
    let legend: Vec<LegendStep> = PALETTE
        .iter()
        .enumerate()
        .map(|(level, &color)| LegendStep {
            color,
            label: if level == PALETTE.len() - 1 {
                format!("{level}+")
            } else {
                level.to_string()
            },
        })
        .collect();

    let env = build_env()?;
    let template = env.get_template(TEMPLATE_NAME)?;
    let rendered = template.render(minijinja::context! {
        sections => views,
        options_used => options_used,
        legend => legend,
        labels => grid_labels(),
        cell_size => CELL_SIZE,
    })?;
    Ok(rendered)
}

fn section_view(section: &HtmlSection<'_>) -> Result<SectionView> {
    let heatmap = section.heatmap;
    let (width, height) = grid_extent();
    let mut cells = Vec::with_capacity(HOURS_PER_DAY * MINUTES_PER_HOUR);

    for hour in 0..HOURS_PER_DAY {
        for minute in 0..MINUTES_PER_HOUR {
            let slot = slot_of(hour, minute);
            let (x, y) = cell_origin(hour, minute);
            let entries = heatmap.contributions.at(slot);
            let buckets = Buckets::of(entries);
            let hour = format!("{hour:02}");
            let minute = format!("{minute:02}");
            let count = heatmap.raw.get(slot);
            cells.push(CellView {
                x,
                y,
                fill: color_of(heatmap.normalized.get(slot)),
                label: cell_label(&hour, &minute, count, &buckets),
                starting: buckets.starting_count(),
                continuing: buckets.continuing_count(),
                contributions: serde_json::to_string(entries)?,
                hour,
                minute,
                count,
            });
        }
    }

    Ok(SectionView {
        id: section.id,
        title: section.title,
        summary: section_summary(heatmap.max_value, heatmap.min_value),
        width,
        height,
        cells,
    })
}

fn section_summary(max_value: u32, min_value: u32) -> String {
    let lowest = match min_value {
        0 => "no runs".to_string(),
        n => runs(n),
    };
    format!(
        "Hover over a minute to inspect starting and continuing job contributions. \
         Highest density: {}. Lowest density: {lowest}.",
        runs(max_value)
    )
}

/// Accessible description of one cell, e.g. `09:30 has 2 runs. Starting runs: a, b.`
fn cell_label(hour: &str, minute: &str, count: u32, buckets: &Buckets<'_>) -> String {
    let mut parts = vec![format!("{hour}:{minute} has {}.", runs(count))];
    let starting = buckets.starting_count();
    if starting > 0 {
        let noun = if starting == 1 { "Starting run" } else { "Starting runs" };
        parts.push(format!("{noun}: {}.", list_bucket(&buckets.starting)));
    }
    let continuing = buckets.continuing_count();
    if continuing > 0 {
        let noun = if continuing == 1 { "Continuing run" } else { "Continuing runs" };
        parts.push(format!("{noun}: {}.", list_bucket(&buckets.continuing)));
    }
    if starting == 0 && continuing == 0 {
        parts.push("No jobs scheduled.".to_string());
    }
    parts.join(" ")
}

fn list_bucket(bucket: &BTreeMap<&str, usize>) -> String {
    bucket
        .iter()
        .map(|(name, &count)| match count {
            1 => (*name).to_string(),
            n => format!("{name} ({n})"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
