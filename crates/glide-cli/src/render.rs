// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame record rendering (table or JSON lines).

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use crate::script::FrameRecord;

/// Output format for `glide replay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable table.
    Table,
    /// One JSON object per line.
    Json,
}

/// Renders `records` in `format`.
pub fn render(records: &[FrameRecord], format: Format) -> Result<String> {
    match format {
        Format::Table => Ok(table(records)),
        Format::Json => json_lines(records),
    }
}

fn table(records: &[FrameRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["frame", "t", "x", "y", "scale", "rotation", "moving"]);
    for r in records {
        table.add_row([
            r.frame.to_string(),
            format!("{:.4}", r.t),
            format!("{:.3}", r.x),
            format!("{:.3}", r.y),
            format!("{:.4}", r.scale),
            format!("{:.4}", r.rotation),
            if r.moving { "yes" } else { "no" }.to_owned(),
        ]);
    }
    table.to_string()
}

fn json_lines(records: &[FrameRecord]) -> Result<String> {
    let mut out = String::new();
    for r in records {
        out.push_str(&serde_json::to_string(r)?);
        out.push('\n');
    }
    Ok(out)
}
