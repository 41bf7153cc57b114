// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::args::OutputFormat;
use tally::{ViewData, ViewModel};

const BAR_WIDTH: usize = 40;

pub fn render(view: &ViewModel, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Text => Ok(render_text(view)),
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    "#".repeat(((value / max) * BAR_WIDTH as f64).round() as usize)
}

fn render_text(view: &ViewModel) -> String {
    let mut out = format!("== {} [{:?}] ==\n", view.title, view.render);
    if view.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    match &view.data {
        ViewData::Histogram(hist) => {
            let max = hist.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
            for bin in &hist.bins {
                out.push_str(&format!(
                    "  {:>22} {:>6} {}\n",
                    bin.label(),
                    bin.count,
                    bar(bin.count as f64, max)
                ));
            }
        }
        ViewData::Counts(counts) => {
            let total: usize = counts.iter().map(|c| c.count).sum();
            for entry in counts {
                let share = entry.count as f64 / total as f64 * 100.0;
                out.push_str(&format!(
                    "  {:<24} {:>6} {:>5.1}%\n",
                    entry.label, entry.count, share
                ));
            }
        }
        ViewData::GroupedSums(sums) => {
            let max = sums.iter().map(|s| s.total).fold(0.0, f64::max);
            for sum in sums {
                out.push_str(&format!(
                    "  {:<18} {:<14} {:>14.2} {}\n",
                    sum.group,
                    sum.series,
                    sum.total,
                    bar(sum.total, max)
                ));
            }
        }
        ViewData::Series(points) => {
            let max = points.iter().map(|p| p.count).max().unwrap_or(0) as f64;
            for point in points {
                out.push_str(&format!(
                    "  {} {:>6} {}\n",
                    point.label,
                    point.count,
                    bar(point.count as f64, max)
                ));
            }
        }
    }
    out
}
