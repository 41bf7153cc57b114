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

//! Chart-ready aggregates derived from a [`Dataset`] and a [`FilterState`].
//!
//! Every derivation is a pure function: the same inputs always produce the
//! same [`ViewModel`], and neither the dataset nor any other view is touched.
//! An empty filtered subset yields an empty view model; the renderer decides
//! how to show "no data".

pub mod distribution;
pub mod grouping;
pub mod histogram;
pub mod trends;

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::{FilterField, FilterState};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use distribution::{age_distribution, billing_distribution};
pub use grouping::{condition_distribution, insurance_comparison, GroupedSum, LabelCount};
pub use histogram::{Bin, Histogram};
pub use trends::{admission_trends, TrendPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    AgeDistribution,
    ConditionDistribution,
    InsuranceComparison,
    BillingDistribution,
    AdmissionTrends,
}
impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::AgeDistribution,
        ViewKind::ConditionDistribution,
        ViewKind::InsuranceComparison,
        ViewKind::BillingDistribution,
        ViewKind::AdmissionTrends,
    ];
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::AgeDistribution => "Age Distribution By Gender",
            ViewKind::ConditionDistribution => "Medical Condition Distribution",
            ViewKind::InsuranceComparison => "Insurance Provider Price Comparison",
            ViewKind::BillingDistribution => "Billing Amount Distribution",
            ViewKind::AdmissionTrends => "Admission Trends over Time",
        }
    }
    /// The bar rendering of admission trends carries its own title.
    pub fn title_for(&self, render: RenderHint) -> &'static str {
        match (self, render) {
            (ViewKind::AdmissionTrends, RenderHint::Bar) => "Admission Trends Over Time",
            _ => self.title(),
        }
    }
    /// Filter fields this view reads.
    pub fn inputs(&self) -> &'static [FilterField] {
        match self {
            ViewKind::AgeDistribution
            | ViewKind::ConditionDistribution
            | ViewKind::InsuranceComparison => &[FilterField::Gender],
            ViewKind::BillingDistribution => &[FilterField::Gender, FilterField::BillingCenter],
            ViewKind::AdmissionTrends => &[FilterField::Condition, FilterField::ChartType],
        }
    }
    /// Fields whose change refreshes this view. Gender refreshes all five,
    /// trends included, even though trends never filter by it.
    pub fn triggers(&self) -> &'static [FilterField] {
        match self {
            ViewKind::AdmissionTrends => &[
                FilterField::Gender,
                FilterField::Condition,
                FilterField::ChartType,
            ],
            other => other.inputs(),
        }
    }
    pub fn depends_on(&self, field: FilterField) -> bool {
        self.triggers().contains(&field)
    }
}
impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How the renderer should draw the data; never affects aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderHint {
    Histogram,
    Pie,
    GroupedBar,
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "values", rename_all = "snake_case")]
pub enum ViewData {
    Histogram(Histogram),
    Counts(Vec<LabelCount>),
    GroupedSums(Vec<GroupedSum>),
    Series(Vec<TrendPoint>),
}
impl ViewData {
    pub fn is_empty(&self) -> bool {
        match self {
            ViewData::Histogram(h) => h.is_empty(),
            ViewData::Counts(c) => c.is_empty(),
            ViewData::GroupedSums(s) => s.is_empty(),
            ViewData::Series(p) => p.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub kind: ViewKind,
    pub title: String,
    pub render: RenderHint,
    pub data: ViewData,
}
impl ViewModel {
    pub fn new(kind: ViewKind, render: RenderHint, data: ViewData) -> Self {
        Self {
            kind,
            title: kind.title_for(render).to_string(),
            render,
            data,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub fn compute_view(
    dataset: &Dataset,
    filter: &FilterState,
    kind: ViewKind,
    config: &DashboardConfig,
) -> ViewModel {
    match kind {
        ViewKind::AgeDistribution => age_distribution(dataset, filter, config),
        ViewKind::ConditionDistribution => condition_distribution(dataset, filter),
        ViewKind::InsuranceComparison => insurance_comparison(dataset, filter),
        ViewKind::BillingDistribution => billing_distribution(dataset, filter, config),
        ViewKind::AdmissionTrends => admission_trends(dataset, filter),
    }
}

pub fn compute_all(
    dataset: &Dataset,
    filter: &FilterState,
    config: &DashboardConfig,
) -> Vec<ViewModel> {
    ViewKind::ALL
        .iter()
        .map(|kind| compute_view(dataset, filter, *kind, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ChartType;

    #[test]
    fn every_view_reads_at_least_one_field() {
        for kind in ViewKind::ALL {
            assert!(!kind.inputs().is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn trends_read_no_gender_but_refresh_on_it() {
        assert!(!ViewKind::AdmissionTrends.inputs().contains(&FilterField::Gender));
        assert!(ViewKind::AdmissionTrends.depends_on(FilterField::Gender));
        assert!(ViewKind::BillingDistribution.depends_on(FilterField::BillingCenter));
    }

    #[test]
    fn trends_title_follows_chart_type() {
        let ds = Dataset::from_records(Vec::new());
        let bar = FilterState {
            chart_type: ChartType::Bar,
            ..FilterState::default()
        };
        let config = DashboardConfig::default();
        let line = FilterState::default();
        let line_view = compute_view(&ds, &line, ViewKind::AdmissionTrends, &config);
        let bar_view = compute_view(&ds, &bar, ViewKind::AdmissionTrends, &config);
        assert_eq!(line_view.title, "Admission Trends over Time");
        assert_eq!(bar_view.title, "Admission Trends Over Time");
        assert_eq!(
            ViewKind::AgeDistribution.title_for(RenderHint::Bar),
            ViewKind::AgeDistribution.title()
        );
    }

    #[test]
    fn empty_dataset_yields_empty_views() {
        let ds = Dataset::from_records(Vec::new());
        let views = compute_all(&ds, &FilterState::default(), &DashboardConfig::default());
        assert_eq!(views.len(), 5);
        assert!(views.iter().all(ViewModel::is_empty));
    }

    #[test]
    fn serialises_with_shape_tag() {
        let ds = Dataset::from_records(Vec::new());
        let view = condition_distribution(&ds, &FilterState::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "condition_distribution");
        assert_eq!(json["render"], "pie");
        assert_eq!(json["data"]["shape"], "counts");
    }
}
