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

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Billing column statistics, computed once at load.
#[derive(Debug, Clone)]
pub struct BillingStats {
    column: Float64Chunked,
    mean: Option<f64>,
    median: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}
impl BillingStats {
    /// Negative and non-finite amounts never enter the column.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let valid: Vec<f64> = values
            .into_iter()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .collect();
        let column = Float64Chunked::from_vec("Billing Amount".into(), valid);
        Self {
            mean: column.mean(),
            median: column.median(),
            min: column.min(),
            max: column.max(),
            column,
        }
    }
    pub fn count(&self) -> usize {
        self.column.len()
    }
    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }
    pub fn min(&self) -> Option<f64> {
        self.min
    }
    pub fn max(&self) -> Option<f64> {
        self.max
    }
    pub fn median(&self) -> Option<f64> {
        self.median
    }
    /// Linear interpolation between closest ranks; `None` outside `0..=1`.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        self.column
            .quantile(q, QuantileMethod::Linear)
            .ok()
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderMark {
    pub value: i64,
    pub label: String,
}
impl SliderMark {
    pub fn at(value: f64) -> Self {
        let value = value.trunc() as i64;
        Self {
            value,
            label: format!("${}", group_thousands(value)),
        }
    }
}

/// Range, default position and marks for the billing slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub initial: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let chunks: Vec<&str> = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect();
    let grouped = chunks.join(",");
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
