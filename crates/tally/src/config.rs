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

use crate::error::{utils, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables shared by ingestion and every view derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of equal-width buckets for the age and billing histograms.
    pub histogram_bins: usize,
    /// Half-width of the window around the billing slider value.
    pub billing_window: f64,
    pub slider_step: f64,
    /// Quantiles (0..=1) used as labelled slider marks.
    pub slider_quantiles: Vec<f64>,
    /// Formats tried in order when parsing Date of Admission.
    pub date_formats: Vec<String>,
    pub mean_decimals: u32,
}
impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            billing_window: 100.0,
            slider_step: 100.0,
            slider_quantiles: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
                "%Y%m%d".to_string(),
            ],
            mean_decimals: 2,
        }
    }
}
impl DashboardConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if self.histogram_bins == 0 {
            return Err(utils::invalid_config("histogram_bins", self.histogram_bins));
        }
        if !self.billing_window.is_finite() || self.billing_window < 0.0 {
            return Err(utils::invalid_config("billing_window", self.billing_window));
        }
        if !self.slider_step.is_finite() || self.slider_step <= 0.0 {
            return Err(utils::invalid_config("slider_step", self.slider_step));
        }
        if let Some(q) = self
            .slider_quantiles
            .iter()
            .find(|q| !(0.0..=1.0).contains(*q))
        {
            return Err(utils::invalid_config("slider_quantiles", q));
        }
        if self.date_formats.is_empty() {
            return Err(ConfigError::MissingRequiredConfig {
                field: "date_formats".to_string(),
            });
        }
        Ok(())
    }
    /// Coarser histograms for very large extracts.
    pub fn for_large_datasets() -> Self {
        Self {
            histogram_bins: 20,
            slider_step: 500.0,
            ..Default::default()
        }
    }
    /// Only ISO dates; anything else becomes missing.
    pub fn strict_dates() -> Self {
        Self {
            date_formats: vec!["%Y-%m-%d".to_string()],
            ..Default::default()
        }
    }
}
