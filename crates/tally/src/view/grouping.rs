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

use crate::dataset::Dataset;
use crate::filter::FilterState;
use crate::view::{RenderHint, ViewData, ViewKind, ViewModel};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Billing total for one (provider, condition) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedSum {
    pub group: String,
    pub series: String,
    pub total: f64,
}

/// Groups appear in first-seen order; empty groups never appear.
pub fn condition_distribution(dataset: &Dataset, filter: &FilterState) -> ViewModel {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in dataset
        .records()
        .iter()
        .filter(|r| r.matches_gender(filter.gender.as_ref()))
    {
        *counts.entry(record.medical_condition.as_str()).or_insert(0) += 1;
    }
    let counts = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ViewModel::new(
        ViewKind::ConditionDistribution,
        RenderHint::Pie,
        ViewData::Counts(counts),
    )
}

/// Missing billing contributes 0 to the sum but keeps its group present.
pub fn insurance_comparison(dataset: &Dataset, filter: &FilterState) -> ViewModel {
    let mut sums: IndexMap<(&str, &str), f64> = IndexMap::new();
    for record in dataset
        .records()
        .iter()
        .filter(|r| r.matches_gender(filter.gender.as_ref()))
    {
        let key = (
            record.insurance_provider.as_str(),
            record.medical_condition.as_str(),
        );
        *sums.entry(key).or_insert(0.0) += record.billing_amount.unwrap_or(0.0);
    }
    let sums = sums
        .into_iter()
        .map(|((group, series), total)| GroupedSum {
            group: group.to_string(),
            series: series.to_string(),
            total,
        })
        .collect();
    ViewModel::new(
        ViewKind::InsuranceComparison,
        RenderHint::GroupedBar,
        ViewData::GroupedSums(sums),
    )
}
