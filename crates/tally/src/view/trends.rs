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

use crate::dataset::{Dataset, YearMonth};
use crate::filter::{ChartType, FilterState};
use crate::view::{RenderHint, ViewData, ViewKind, ViewModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: YearMonth,
    pub label: String,
    pub count: usize,
}

/// Admissions per month, oldest first. Chart type only picks the render hint.
pub fn admission_trends(dataset: &Dataset, filter: &FilterState) -> ViewModel {
    let mut per_month: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for period in dataset
        .records()
        .iter()
        .filter(|r| r.matches_condition(filter.condition.as_deref()))
        .filter_map(|r| r.year_month)
    {
        *per_month.entry(period).or_insert(0) += 1;
    }
    let points = per_month
        .into_iter()
        .map(|(period, count)| TrendPoint {
            period,
            label: period.to_string(),
            count,
        })
        .collect();
    let render = match filter.chart_type {
        ChartType::Line => RenderHint::Line,
        ChartType::Bar => RenderHint::Bar,
    };
    ViewModel::new(ViewKind::AdmissionTrends, render, ViewData::Series(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Gender, Record};
    use chrono::NaiveDate;

    fn admitted(condition: &str, y: i32, m: u32, d: u32) -> Record {
        Record::new(
            Some(60),
            Gender::Female,
            condition,
            "UnitedHealthcare",
            Some(1.0),
            NaiveDate::from_ymd_opt(y, m, d),
        )
    }

    fn labels(view: &ViewModel) -> Vec<(String, usize)> {
        match &view.data {
            ViewData::Series(points) => points.iter().map(|p| (p.label.clone(), p.count)).collect(),
            other => panic!("expected series, got {other:?}"),
        }
    }

    #[test]
    fn chronological_regardless_of_record_order() {
        let ds = Dataset::from_records(vec![
            admitted("Flu", 2021, 3, 9),
            admitted("Flu", 2019, 12, 1),
            admitted("Cancer", 2021, 3, 1),
            admitted("Flu", 2020, 1, 15),
        ]);
        let view = admission_trends(&ds, &FilterState::default());
        assert_eq!(
            labels(&view),
            vec![
                ("2019-12".to_string(), 1),
                ("2020-01".to_string(), 1),
                ("2021-03".to_string(), 2),
            ]
        );
    }

    #[test]
    fn chart_type_changes_hint_only() {
        let ds = Dataset::from_records(vec![admitted("Flu", 2021, 3, 9)]);
        let line = admission_trends(&ds, &FilterState::default());
        let bar = admission_trends(
            &ds,
            &FilterState {
                chart_type: ChartType::Bar,
                ..FilterState::default()
            },
        );
        assert_eq!(line.render, RenderHint::Line);
        assert_eq!(bar.render, RenderHint::Bar);
        assert_eq!(line.data, bar.data);
    }

    #[test]
    fn unknown_condition_is_empty_not_error() {
        let ds = Dataset::from_records(vec![admitted("Flu", 2021, 3, 9)]);
        let filter = FilterState {
            condition: Some("Gout".to_string()),
            ..FilterState::default()
        };
        assert!(admission_trends(&ds, &filter).is_empty());
    }

    #[test]
    fn undated_records_skipped() {
        let mut undated = admitted("Flu", 2021, 3, 9);
        undated.date_of_admission = None;
        undated.year_month = None;
        let ds = Dataset::from_records(vec![undated, admitted("Flu", 2022, 1, 1)]);
        assert_eq!(
            labels(&admission_trends(&ds, &FilterState::default())),
            vec![("2022-01".to_string(), 1)]
        );
    }
}
