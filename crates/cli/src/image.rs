//! Static SVG heatmap images.
//!
//! The grid geometry and palette here are shared with the HTML page, so the
//! image and the interactive view draw the same picture.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use cronspread_core::{slot_of, IntensityGrid, HOURS_PER_DAY, MINUTES_PER_HOUR};

/// Fill colours indexed by intensity level.
pub const PALETTE: [&str; 10] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b", "#03132b",
];

pub const CELL_SIZE: usize = 20;
const GAP: usize = 1;
const PITCH: usize = CELL_SIZE + GAP;
const FONT_SIZE: usize = 12;
const LABEL_GAP: usize = 4;
const LABEL_WIDTH: usize = 18;
const LEFT_MARGIN: usize = LABEL_WIDTH + LABEL_GAP * 2;
const TOP_MARGIN: usize = FONT_SIZE + LABEL_GAP * 2;

/// Smallest canvas for the static image.
const MIN_WIDTH: usize = 1300;
const MIN_HEIGHT: usize = 550;

const SVG_TEMPLATE: &str = include_str!("../templates/heatmap.svg");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
        }
    }
}

pub fn color_of(level: u8) -> &'static str {
    PALETTE[usize::from(level).min(PALETTE.len() - 1)]
}

/// Top-left corner of the cell for `hour:minute`.
pub fn cell_origin(hour: usize, minute: usize) -> (usize, usize) {
    (LEFT_MARGIN + minute * PITCH, TOP_MARGIN + hour * PITCH)
}

/// Width and height of the drawn grid including its label margins.
pub fn grid_extent() -> (usize, usize) {
    (
        LEFT_MARGIN * 2 + MINUTES_PER_HOUR * PITCH - GAP,
        TOP_MARGIN * 2 + HOURS_PER_DAY * PITCH - GAP,
    )
}

/// A text label positioned around the grid.
#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub x: usize,
    pub y: usize,
    pub anchor: &'static str,
    pub baseline: &'static str,
    pub text: String,
}

/// Minute labels every 5 minutes above and below, hour labels on both sides.
pub fn grid_labels() -> Vec<Label> {
    let bottom = TOP_MARGIN + HOURS_PER_DAY * PITCH - GAP + LABEL_GAP;
    let right = LEFT_MARGIN + MINUTES_PER_HOUR * PITCH - GAP + LABEL_GAP;
    let mut labels = Vec::new();

    for minute in (0..MINUTES_PER_HOUR).step_by(5) {
        let x = LEFT_MARGIN + minute * PITCH + CELL_SIZE / 2;
        let text = format!("{minute:02}");
        labels.push(Label {
            x,
            y: TOP_MARGIN - LABEL_GAP,
            anchor: "middle",
            baseline: "baseline",
            text: text.clone(),
        });
        labels.push(Label {
            x,
            y: bottom,
            anchor: "middle",
            baseline: "hanging",
            text,
        });
    }

    for hour in 0..HOURS_PER_DAY {
        let y = TOP_MARGIN + hour * PITCH + CELL_SIZE / 2;
        let text = format!("{hour:02}");
        labels.push(Label {
            x: LEFT_MARGIN - LABEL_GAP,
            y,
            anchor: "end",
            baseline: "middle",
            text: text.clone(),
        });
        labels.push(Label {
            x: right,
            y,
            anchor: "start",
            baseline: "middle",
            text,
        });
    }
    labels
}

#[derive(Serialize)]
struct ImageCell {
    x: usize,
    y: usize,
    fill: &'static str,
}

fn build_env() -> minijinja::Environment<'static> {
    let mut env = minijinja::Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

/// Render the normalized grid as a standalone SVG document.
pub fn render_svg(grid: &IntensityGrid) -> Result<String> {
    let (grid_width, grid_height) = grid_extent();
    let mut cells = Vec::with_capacity(HOURS_PER_DAY * MINUTES_PER_HOUR);
    for hour in 0..HOURS_PER_DAY {
        for minute in 0..MINUTES_PER_HOUR {
            let (x, y) = cell_origin(hour, minute);
            cells.push(ImageCell {
                x,
                y,
                fill: color_of(grid.get(slot_of(hour, minute))),
            });
        }
    }

    let env = build_env();
    let rendered = env.render_str(
        SVG_TEMPLATE,
        minijinja::context! {
            width => grid_width.max(MIN_WIDTH),
            height => grid_height.max(MIN_HEIGHT),
            cell_size => CELL_SIZE,
            font_size => FONT_SIZE,
            cells => cells,
            labels => grid_labels(),
        },
    )?;
    Ok(rendered)
}
