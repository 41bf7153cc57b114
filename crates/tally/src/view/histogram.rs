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

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// `[lower, upper)`; the last bin of a histogram is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}
impl Bin {
    pub fn label(&self) -> String {
        format!("{:.2}-{:.2}", self.lower, self.upper)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    pub total: usize,
}
impl Histogram {
    /// Equal-width bins over the observed range of `values`. A constant
    /// input collapses into a single `[v, v]` bin.
    pub fn from_values(values: &[f64], bin_count: usize) -> Self {
        if bin_count == 0 {
            return Self::default();
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (min, max) = match finite.iter().copied().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => return Self::default(),
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        if max == min {
            return Self {
                bins: vec![Bin {
                    lower: min,
                    upper: max,
                    count: finite.len(),
                }],
                total: finite.len(),
            };
        }
        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();
        // Placed against the stored edges so counts agree with `count_at`.
        for value in &finite {
            let index = bins
                .partition_point(|bin| bin.lower <= *value)
                .saturating_sub(1)
                .min(bin_count - 1);
            bins[index].count += 1;
        }
        Self {
            bins,
            total: finite.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
    /// Count of the bin holding `value`, if it lies in range.
    pub fn count_at(&self, value: f64) -> Option<usize> {
        let last = self.bins.len().checked_sub(1)?;
        self.bins
            .iter()
            .enumerate()
            .find(|(i, bin)| {
                value >= bin.lower && (value < bin.upper || (*i == last && value <= bin.upper))
            })
            .map(|(_, bin)| bin.count)
    }
}
