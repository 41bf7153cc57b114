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

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other(String),
}
impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other(label) => label,
        }
    }
}
impl FromStr for Gender {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "m" | "male" => Gender::Male,
            "f" | "female" => Gender::Female,
            _ => Gender::Other(trimmed.to_string()),
        })
    }
}
impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar month bucket used by admission trends. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}
impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One patient billing row after coercion. Missing values are `None`, never
/// unparsed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub age: Option<u32>,
    pub gender: Gender,
    pub medical_condition: String,
    pub insurance_provider: String,
    /// Non-negative and finite when present.
    pub billing_amount: Option<f64>,
    pub date_of_admission: Option<NaiveDate>,
    pub year_month: Option<YearMonth>,
}
impl Record {
    pub fn new(
        age: Option<u32>,
        gender: Gender,
        medical_condition: impl Into<String>,
        insurance_provider: impl Into<String>,
        billing_amount: Option<f64>,
        date_of_admission: Option<NaiveDate>,
    ) -> Self {
        Self {
            age,
            gender,
            medical_condition: medical_condition.into(),
            insurance_provider: insurance_provider.into(),
            billing_amount: billing_amount.filter(|v| v.is_finite() && *v >= 0.0),
            date_of_admission,
            year_month: date_of_admission.map(YearMonth::from_date),
        }
    }
    pub fn matches_gender(&self, gender: Option<&Gender>) -> bool {
        gender.map_or(true, |g| &self.gender == g)
    }
    pub fn matches_condition(&self, condition: Option<&str>) -> bool {
        condition.map_or(true, |c| self.medical_condition == c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_short_and_long_forms() {
        assert_eq!("M".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" female ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(
            "Nonbinary".parse::<Gender>().unwrap(),
            Gender::Other("Nonbinary".to_string())
        );
    }

    #[test]
    fn year_month_orders_across_years() {
        let dec = YearMonth::new(2019, 12).unwrap();
        let jan = YearMonth::new(2020, 1).unwrap();
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2020-01");
        assert!(YearMonth::new(2020, 13).is_none());
    }

    #[test]
    fn negative_or_nan_billing_is_missing() {
        let neg = Record::new(None, Gender::Male, "Flu", "Aetna", Some(-5.0), None);
        let nan = Record::new(None, Gender::Male, "Flu", "Aetna", Some(f64::NAN), None);
        assert_eq!(neg.billing_amount, None);
        assert_eq!(nan.billing_amount, None);
    }

    #[test]
    fn year_month_derived_from_admission_date() {
        let date = NaiveDate::from_ymd_opt(2022, 3, 17);
        let record = Record::new(Some(40), Gender::Female, "Asthma", "Cigna", Some(10.0), date);
        assert_eq!(record.year_month, YearMonth::new(2022, 3));
    }
}
