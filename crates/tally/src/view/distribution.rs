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

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::FilterState;
use crate::view::histogram::Histogram;
use crate::view::{RenderHint, ViewData, ViewKind, ViewModel};

pub fn age_distribution(
    dataset: &Dataset,
    filter: &FilterState,
    config: &DashboardConfig,
) -> ViewModel {
    let ages: Vec<f64> = dataset
        .records()
        .iter()
        .filter(|r| r.matches_gender(filter.gender.as_ref()))
        .filter_map(|r| r.age.map(f64::from))
        .collect();
    ViewModel::new(
        ViewKind::AgeDistribution,
        RenderHint::Histogram,
        ViewData::Histogram(Histogram::from_values(&ages, config.histogram_bins)),
    )
}

/// Missing billing amounts never enter the window.
pub fn billing_distribution(
    dataset: &Dataset,
    filter: &FilterState,
    config: &DashboardConfig,
) -> ViewModel {
    let low = filter.billing_center - config.billing_window;
    let high = filter.billing_center + config.billing_window;
    let amounts: Vec<f64> = dataset
        .records()
        .iter()
        .filter(|r| r.matches_gender(filter.gender.as_ref()))
        .filter_map(|r| r.billing_amount)
        .filter(|amount| (low..=high).contains(amount))
        .collect();
    ViewModel::new(
        ViewKind::BillingDistribution,
        RenderHint::Histogram,
        ViewData::Histogram(Histogram::from_values(&amounts, config.histogram_bins)),
    )
}
