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

use crate::dataset::{Dataset, Gender};
use crate::error::{utils, FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
}
impl FromStr for ChartType {
    type Err = FilterError;
    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ChartType::Line),
            "bar" => Ok(ChartType::Bar),
            other => Err(utils::invalid_filter("chart", other)),
        }
    }
}
impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
        })
    }
}

/// User selections driving every view. Owned by the caller; derivations
/// only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub gender: Option<Gender>,
    pub billing_center: f64,
    pub chart_type: ChartType,
    pub condition: Option<String>,
}
impl FilterState {
    /// Nothing selected, slider at the median billing amount.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            gender: None,
            billing_center: dataset.billing_median().unwrap_or(0.0),
            chart_type: ChartType::Line,
            condition: None,
        }
    }
    /// Applies a change and reports whether the state actually moved.
    pub fn apply(&mut self, change: &FilterChange) -> bool {
        match change {
            FilterChange::Gender(gender) if &self.gender != gender => {
                self.gender = gender.clone();
            }
            FilterChange::BillingCenter(center) if self.billing_center != *center => {
                self.billing_center = *center;
            }
            FilterChange::ChartType(chart_type) if self.chart_type != *chart_type => {
                self.chart_type = *chart_type;
            }
            FilterChange::Condition(condition) if &self.condition != condition => {
                self.condition = condition.clone();
            }
            _ => return false,
        }
        true
    }
}
impl Default for FilterState {
    fn default() -> Self {
        Self {
            gender: None,
            billing_center: 0.0,
            chart_type: ChartType::Line,
            condition: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Gender,
    BillingCenter,
    ChartType,
    Condition,
}
impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Gender,
        FilterField::BillingCenter,
        FilterField::ChartType,
        FilterField::Condition,
    ];
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::Gender => "gender",
            FilterField::BillingCenter => "billing",
            FilterField::ChartType => "chart",
            FilterField::Condition => "condition",
        }
    }
}
impl FromStr for FilterField {
    type Err = FilterError;
    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gender" => Ok(FilterField::Gender),
            "billing" | "billing_center" | "billing-center" => Ok(FilterField::BillingCenter),
            "chart" | "chart_type" | "chart-type" => Ok(FilterField::ChartType),
            "condition" => Ok(FilterField::Condition),
            other => Err(FilterError::UnknownField {
                field: other.to_string(),
            }),
        }
    }
}

/// A single discrete edit emitted by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterChange {
    Gender(Option<Gender>),
    BillingCenter(f64),
    ChartType(ChartType),
    Condition(Option<String>),
}
impl FilterChange {
    pub fn field(&self) -> FilterField {
        match self {
            FilterChange::Gender(_) => FilterField::Gender,
            FilterChange::BillingCenter(_) => FilterField::BillingCenter,
            FilterChange::ChartType(_) => FilterField::ChartType,
            FilterChange::Condition(_) => FilterField::Condition,
        }
    }
}
/// Parses `field=value`; an empty value clears optional selections.
impl FromStr for FilterChange {
    type Err = FilterError;
    fn from_str(s: &str) -> FilterResult<Self> {
        let (field, value) = s.split_once('=').ok_or_else(|| FilterError::MalformedChange {
            input: s.to_string(),
        })?;
        let value = value.trim();
        let optional = (!value.is_empty()).then(|| value.to_string());
        match field.parse::<FilterField>()? {
            FilterField::Gender => Ok(FilterChange::Gender(
                optional.map(|g| Gender::from_str(&g).unwrap_or_else(|never| match never {})),
            )),
            FilterField::BillingCenter => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FilterChange::BillingCenter)
                .ok_or_else(|| utils::invalid_filter("billing", value)),
            FilterField::ChartType => value.parse().map(FilterChange::ChartType),
            FilterField::Condition => Ok(FilterChange::Condition(optional)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_changes() {
        assert_eq!(
            "gender=Female".parse::<FilterChange>().unwrap(),
            FilterChange::Gender(Some(Gender::Female))
        );
        assert_eq!(
            "gender=".parse::<FilterChange>().unwrap(),
            FilterChange::Gender(None)
        );
        assert_eq!(
            "billing=25000.5".parse::<FilterChange>().unwrap(),
            FilterChange::BillingCenter(25000.5)
        );
        assert_eq!(
            "chart=BAR".parse::<FilterChange>().unwrap(),
            FilterChange::ChartType(ChartType::Bar)
        );
        assert_eq!(
            "condition=Cancer".parse::<FilterChange>().unwrap(),
            FilterChange::Condition(Some("Cancer".to_string()))
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "gender".parse::<FilterChange>(),
            Err(FilterError::MalformedChange { .. })
        ));
        assert!(matches!(
            "colour=red".parse::<FilterChange>(),
            Err(FilterError::UnknownField { .. })
        ));
        assert!(matches!(
            "chart=pie".parse::<FilterChange>(),
            Err(FilterError::InvalidValue { .. })
        ));
        assert!(matches!(
            "billing=lots".parse::<FilterChange>(),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn apply_reports_no_op() {
        let mut state = FilterState::default();
        assert!(!state.apply(&FilterChange::ChartType(ChartType::Line)));
        assert!(state.apply(&FilterChange::ChartType(ChartType::Bar)));
        assert_eq!(state.chart_type, ChartType::Bar);
        assert!(state.apply(&FilterChange::Condition(Some("Flu".into()))));
        assert!(!state.apply(&FilterChange::Condition(Some("Flu".into()))));
    }
}
