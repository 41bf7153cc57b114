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

mod args;
mod render;

use anyhow::Result;
use args::{Args, OutputFormat};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tally::{
    init_global, ChartType, DashboardConfig, Dataset, ErrorReporter, FilterChange, FilterState,
    Gender, TallyError, ViewDispatcher,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let reporter = ErrorReporter::new();
    let config = match &args.config {
        Some(path) => DashboardConfig::from_yaml_file(path)
            .map_err(|e| fail(&reporter, TallyError::from(e)))?,
        None => args.preset.config(),
    };
    let dataset = Dataset::from_path(&args.data, &config)
        .and_then(init_global)
        .map_err(|e| fail(&reporter, TallyError::from(e)))?;
    info!(records = dataset.len(), "dashboard ready");

    let initial = initial_state(&args, dataset).map_err(|e| fail(&reporter, e))?;
    let mut dispatcher = ViewDispatcher::with_state(dataset, config, initial);

    print_header(&dispatcher, dataset, args.format)?;
    for view in dispatcher.views() {
        println!("{}", render::render(view, args.format)?);
    }

    if args.interactive {
        run_interactive(&mut dispatcher, args.format)?;
    }
    Ok(())
}

fn fail(reporter: &ErrorReporter, error: TallyError) -> anyhow::Error {
    eprint!("{}", reporter.report(&error));
    anyhow::Error::new(error)
}

fn initial_state(args: &Args, dataset: &Dataset) -> tally::Result<FilterState> {
    let mut state = FilterState::initial(dataset);
    state.gender = args
        .gender
        .as_deref()
        .map(|g| g.parse::<Gender>().unwrap_or_else(|never| match never {}));
    if let Some(center) = args.billing {
        state.billing_center = center;
    }
    state.chart_type = args.chart.parse::<ChartType>()?;
    state.condition = args.condition.clone();
    Ok(state)
}

fn print_header(
    dispatcher: &ViewDispatcher<'_>,
    dataset: &Dataset,
    format: OutputFormat,
) -> Result<()> {
    let config = dispatcher.config();
    let summary = dataset.summary(config);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if let Some(bounds) = dataset.slider_bounds(config) {
                println!("{}", serde_json::to_string_pretty(&bounds)?);
            }
        }
        OutputFormat::Text => {
            println!("HealthCare Dashboard\n");
            println!("{}", summary.report());
            let genders: Vec<&str> = dataset.genders().iter().map(Gender::as_str).collect();
            println!("Gender options: {}", genders.join(", "));
            println!("Condition options: {}", dataset.conditions().join(", "));
            if let Some(bounds) = dataset.slider_bounds(config) {
                let marks: Vec<&str> = bounds.marks.iter().map(|m| m.label.as_str()).collect();
                println!(
                    "Billing slider: {:.2} .. {:.2}, step {}, marks {}",
                    bounds.min,
                    bounds.max,
                    bounds.step,
                    marks.join(" ")
                );
            }
            println!("Filters: {:?}\n", dispatcher.state());
        }
    }
    Ok(())
}

fn run_interactive(dispatcher: &mut ViewDispatcher<'_>, format: OutputFormat) -> Result<()> {
    let reporter = ErrorReporter::new();
    let stdin = io::stdin();
    eprintln!(
        "Enter filter changes as field=value (gender, billing, chart, condition); 'quit' to exit."
    );
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }
        let change = match input.parse::<FilterChange>() {
            Ok(change) => change,
            Err(e) => {
                let error = TallyError::from(e);
                warn!(input, "rejected filter change");
                eprint!("{}", reporter.report(&error));
                continue;
            }
        };
        let updated = dispatcher.apply(&change);
        if updated.is_empty() {
            println!("(no change)");
        }
        for view in updated {
            println!("{}", render::render(view, format)?);
        }
        io::stdout().flush()?;
    }
    Ok(())
}
