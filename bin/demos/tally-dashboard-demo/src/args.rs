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

use clap::{Parser, ValueEnum};
use tally::DashboardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Built-in configurations used when no `--config` file is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Standard,
    Large,
    StrictDates,
}
impl Preset {
    pub fn config(self) -> DashboardConfig {
        match self {
            Preset::Standard => DashboardConfig::default(),
            Preset::Large => DashboardConfig::for_large_datasets(),
            Preset::StrictDates => DashboardConfig::strict_dates(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tally-dashboard-demo",
    version,
    about = "Healthcare billing dashboard: loads a CSV once and derives chart data from filter selections"
)]
pub struct Args {
    #[arg(
        long = "data",
        default_value = "Assets/healthcare.csv",
        help = "CSV with Age, Gender, Medical Condition, Insurance Provider, Billing Amount, Date of Admission"
    )]
    pub data: String,
    #[arg(long = "config", help = "Optional YAML dashboard configuration")]
    pub config: Option<String>,
    #[arg(
        long = "preset",
        value_enum,
        default_value_t = Preset::Standard,
        help = "Built-in configuration used when --config is absent"
    )]
    pub preset: Preset,
    #[arg(long = "gender", help = "Initial gender filter (Male, Female, ...)")]
    pub gender: Option<String>,
    #[arg(
        long = "billing",
        help = "Initial billing slider value (defaults to the median billing amount)"
    )]
    pub billing: Option<f64>,
    #[arg(
        long = "chart",
        default_value = "line",
        help = "Admission trends chart type: line or bar"
    )]
    pub chart: String,
    #[arg(long = "condition", help = "Initial medical condition filter")]
    pub condition: Option<String>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(
        long = "interactive",
        default_value_t = false,
        help = "Read field=value filter changes from stdin and re-render affected views"
    )]
    pub interactive: bool,
    #[arg(long = "verbose", default_value_t = false, help = "Enable debug logging")]
    pub verbose: bool,
}
