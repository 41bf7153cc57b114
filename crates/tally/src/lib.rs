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

pub mod config;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod view;

pub use config::DashboardConfig;
pub use dataset::{
    global, init_global, Dataset, DatasetSummary, Gender, IngestReport, Record, SliderBounds,
    SliderMark, YearMonth,
};
pub use dispatch::{DependencyMap, PendingUpdate, ViewDispatcher, ViewUpdate};
pub use error::{
    ConfigError, ErrorReporter, FilterError, IngestionError, Result, TallyError,
};
pub use filter::{ChartType, FilterChange, FilterField, FilterState};
pub use view::{compute_all, compute_view, RenderHint, ViewData, ViewKind, ViewModel};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Loads a dataset with the default configuration.
pub fn load<P: AsRef<Path>>(path: P) -> error::IngestionResult<Dataset> {
    Dataset::from_path(path, &DashboardConfig::default())
}

/// Choices offered by the gender and condition dropdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub genders: Vec<Gender>,
    pub conditions: Vec<String>,
    pub chart_types: Vec<ChartType>,
}

pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
}
impl Dashboard {
    pub fn load<P: AsRef<Path>>(path: P, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let dataset = Dataset::from_path(path, &config)?;
        Ok(Self { dataset, config })
    }
    pub fn from_dataset(dataset: Dataset, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { dataset, config })
    }
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
    pub fn summary(&self) -> DatasetSummary {
        self.dataset.summary(&self.config)
    }
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            genders: self.dataset.genders().to_vec(),
            conditions: self.dataset.conditions().to_vec(),
            chart_types: vec![ChartType::Line, ChartType::Bar],
        }
    }
    pub fn slider_bounds(&self) -> Option<SliderBounds> {
        self.dataset.slider_bounds(&self.config)
    }
    pub fn initial_filter(&self) -> FilterState {
        FilterState::initial(&self.dataset)
    }
    pub fn compute_view(&self, filter: &FilterState, kind: ViewKind) -> ViewModel {
        view::compute_view(&self.dataset, filter, kind, &self.config)
    }
    pub fn compute_all(&self, filter: &FilterState) -> Vec<ViewModel> {
        view::compute_all(&self.dataset, filter, &self.config)
    }
    pub fn dispatcher(&self) -> ViewDispatcher<'_> {
        ViewDispatcher::new(&self.dataset, self.config.clone())
    }
    pub fn views_json(&self, filter: &FilterState) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.compute_all(filter))?)
    }
}
