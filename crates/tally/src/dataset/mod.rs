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

//! Immutable, in-memory store of patient billing records.
//!
//! A [`Dataset`] is built once from a CSV source and never mutated. Scalar
//! aggregates (record count, mean billing, slider bounds, filter options) are
//! computed at construction and served from cache.

pub mod ingest;
pub mod record;
pub mod stats;

use crate::config::DashboardConfig;
use crate::error::{IngestionError, IngestionResult};
use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

pub use ingest::{IngestReport, REQUIRED_COLUMNS};
pub use record::{Gender, Record, YearMonth};
pub use stats::{BillingStats, SliderBounds, SliderMark};

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    billing: BillingStats,
    genders: Vec<Gender>,
    conditions: Vec<String>,
    report: IngestReport,
}
impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P, config: &DashboardConfig) -> IngestionResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestionError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_reader(BufReader::new(file), config)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }
    pub fn from_reader<R: Read>(source: R, config: &DashboardConfig) -> IngestionResult<Self> {
        let (records, report) = ingest::read_records(source, config)?;
        Ok(Self::build(records, report))
    }
    /// Builds a dataset from already-coerced records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let report = IngestReport {
            rows: records.len(),
            missing_age: records.iter().filter(|r| r.age.is_none()).count(),
            missing_billing: records.iter().filter(|r| r.billing_amount.is_none()).count(),
            missing_dates: records
                .iter()
                .filter(|r| r.date_of_admission.is_none())
                .count(),
        };
        Self::build(records, report)
    }
    fn build(records: Vec<Record>, report: IngestReport) -> Self {
        let billing = BillingStats::from_values(records.iter().filter_map(|r| r.billing_amount));
        let genders: IndexSet<Gender> = records.iter().map(|r| r.gender.clone()).collect();
        let conditions: IndexSet<String> = records
            .iter()
            .map(|r| r.medical_condition.clone())
            .collect();
        Self {
            records,
            billing,
            genders: genders.into_iter().collect(),
            conditions: conditions.into_iter().collect(),
            report,
        }
    }
    pub fn records(&self) -> &[Record] {
        &self.records
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// Mean over non-missing billing amounts; `None` when there are none.
    pub fn mean_billing(&self) -> Option<f64> {
        self.billing.mean()
    }
    pub fn display_mean_billing(&self, config: &DashboardConfig) -> Option<f64> {
        self.mean_billing()
            .map(|mean| stats::round_to(mean, config.mean_decimals))
    }
    pub fn billing_stats(&self) -> &BillingStats {
        &self.billing
    }
    pub fn billing_min(&self) -> Option<f64> {
        self.billing.min()
    }
    pub fn billing_median(&self) -> Option<f64> {
        self.billing.median()
    }
    pub fn billing_max(&self) -> Option<f64> {
        self.billing.max()
    }
    /// Distinct genders in first-appearance order.
    pub fn genders(&self) -> &[Gender] {
        &self.genders
    }
    /// Distinct medical conditions in first-appearance order.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }
    pub fn ingest_report(&self) -> &IngestReport {
        &self.report
    }
    /// `None` when no billing amount survived coercion.
    pub fn slider_bounds(&self, config: &DashboardConfig) -> Option<SliderBounds> {
        let (min, max, initial) = (
            self.billing.min()?,
            self.billing.max()?,
            self.billing.median()?,
        );
        let mut marks: Vec<SliderMark> = config
            .slider_quantiles
            .iter()
            .filter_map(|q| self.billing.quantile(*q))
            .map(SliderMark::at)
            .collect();
        marks.dedup_by_key(|mark| mark.value);
        Some(SliderBounds {
            min,
            max,
            initial,
            step: config.slider_step,
            marks,
        })
    }
    pub fn summary(&self, config: &DashboardConfig) -> DatasetSummary {
        DatasetSummary {
            total_records: self.len(),
            mean_billing: self.display_mean_billing(config),
            billing_min: self.billing_min(),
            billing_median: self.billing_median(),
            billing_max: self.billing_max(),
            gender_count: self.genders.len(),
            condition_count: self.conditions.len(),
            missing_billing: self.report.missing_billing,
            missing_dates: self.report.missing_dates,
        }
    }
}

/// Header figures shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub mean_billing: Option<f64>,
    pub billing_min: Option<f64>,
    pub billing_median: Option<f64>,
    pub billing_max: Option<f64>,
    pub gender_count: usize,
    pub condition_count: usize,
    pub missing_billing: usize,
    pub missing_dates: usize,
}
impl DatasetSummary {
    pub fn mean_billing_label(&self) -> String {
        self.mean_billing
            .map_or_else(|| "no data".to_string(), |mean| format!("{mean:.2}"))
    }
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str("Dataset Summary\n===============\n");
        report.push_str(&format!("Total Patient Records: {}\n", self.total_records));
        report.push_str(&format!(
            "Average Billing Amount: {}\n",
            self.mean_billing_label()
        ));
        if let (Some(min), Some(median), Some(max)) =
            (self.billing_min, self.billing_median, self.billing_max)
        {
            report.push_str(&format!(
                "Billing Range: {min:.2} .. {max:.2} (median {median:.2})\n"
            ));
        }
        report.push_str(&format!("Genders: {}\n", self.gender_count));
        report.push_str(&format!("Medical Conditions: {}\n", self.condition_count));
        if self.missing_billing > 0 || self.missing_dates > 0 {
            report.push_str(&format!(
                "\nCoerced to missing: {} billing amounts, {} admission dates\n",
                self.missing_billing, self.missing_dates
            ));
        }
        report
    }
}
impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dataset: {} records, average billing: {}",
            self.total_records,
            self.mean_billing_label()
        )
    }
}

static GLOBAL_DATASET: OnceCell<Dataset> = OnceCell::new();

/// Installs the process-wide dataset. Succeeds exactly once.
pub fn init_global(dataset: Dataset) -> IngestionResult<&'static Dataset> {
    GLOBAL_DATASET
        .set(dataset)
        .map_err(|_| IngestionError::AlreadyInitialised)?;
    GLOBAL_DATASET
        .get()
        .ok_or(IngestionError::AlreadyInitialised)
}
pub fn global() -> Option<&'static Dataset> {
    GLOBAL_DATASET.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(gender: &str, condition: &str, billing: Option<f64>) -> Record {
        Record::new(
            Some(30),
            gender.parse().unwrap(),
            condition,
            "Medicare",
            billing,
            NaiveDate::from_ymd_opt(2021, 6, 1),
        )
    }

    #[test]
    fn options_keep_first_appearance_order() {
        let ds = Dataset::from_records(vec![
            record("Female", "Obesity", Some(1.0)),
            record("Male", "Cancer", Some(2.0)),
            record("Female", "Obesity", Some(3.0)),
            record("Male", "Asthma", Some(4.0)),
        ]);
        assert_eq!(ds.genders(), &[Gender::Female, Gender::Male]);
        assert_eq!(ds.conditions(), &["Obesity", "Cancer", "Asthma"]);
    }

    #[test]
    fn mean_ignores_missing_billing() {
        let ds = Dataset::from_records(vec![
            record("Male", "Flu", Some(100.0)),
            record("Male", "Flu", None),
            record("Male", "Flu", Some(300.0)),
        ]);
        assert_eq!(ds.mean_billing(), Some(200.0));
        assert_eq!(ds.ingest_report().missing_billing, 1);
    }

    #[test]
    fn all_missing_billing_reports_no_data() {
        let ds = Dataset::from_records(vec![
            record("Male", "Flu", None),
            record("Female", "Flu", None),
        ]);
        let config = DashboardConfig::default();
        assert_eq!(ds.mean_billing(), None);
        assert!(ds.slider_bounds(&config).is_none());
        assert_eq!(ds.summary(&config).mean_billing_label(), "no data");
    }

    #[test]
    fn slider_bounds_from_quantiles() {
        let ds = Dataset::from_records(
            [1000.0, 2000.0, 3000.0, 4000.0, 5000.0]
                .into_iter()
                .map(|b| record("Male", "Flu", Some(b)))
                .collect(),
        );
        let bounds = ds.slider_bounds(&DashboardConfig::default()).unwrap();
        assert_eq!(bounds.min, 1000.0);
        assert_eq!(bounds.max, 5000.0);
        assert_eq!(bounds.initial, 3000.0);
        let labels: Vec<_> = bounds.marks.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["$1,000", "$2,000", "$3,000", "$4,000", "$5,000"]);
    }

    #[test]
    fn summary_report_mentions_totals() {
        let ds = Dataset::from_records(vec![record("Male", "Flu", Some(10.005))]);
        let summary = ds.summary(&DashboardConfig::default());
        assert!(summary.report().contains("Total Patient Records: 1"));
        assert!(summary.to_string().starts_with("Dataset: 1 records"));
    }
}
