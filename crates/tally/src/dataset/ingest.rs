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
use crate::dataset::record::{Gender, Record};
use crate::error::{utils, IngestionError, IngestionResult};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ByteRecord, ReaderBuilder};
use polars::prelude::{DataType, NamedFrom, Series};
use std::borrow::Cow;
use std::io::Read;
use tracing::{debug, warn};

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const MEDICAL_CONDITION: &str = "Medical Condition";
pub const INSURANCE_PROVIDER: &str = "Insurance Provider";
pub const BILLING_AMOUNT: &str = "Billing Amount";
pub const DATE_OF_ADMISSION: &str = "Date of Admission";
pub const REQUIRED_COLUMNS: [&str; 6] = [
    AGE,
    GENDER,
    MEDICAL_CONDITION,
    INSURANCE_PROVIDER,
    BILLING_AMOUNT,
    DATE_OF_ADMISSION,
];

/// Counts of values coerced to missing during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub rows: usize,
    pub missing_age: usize,
    pub missing_billing: usize,
    pub missing_dates: usize,
}

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    age: usize,
    gender: usize,
    condition: usize,
    insurance: usize,
    billing: usize,
    admission: usize,
}
impl ColumnIndex {
    fn resolve(headers: &ByteRecord) -> IngestionResult<Self> {
        if headers.is_empty() {
            return Err(IngestionError::MissingHeader);
        }
        let names: Vec<String> = headers.iter().map(|h| decode(h).into_owned()).collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| utils::missing_column(name))
        };
        Ok(Self {
            age: find(AGE)?,
            gender: find(GENDER)?,
            condition: find(MEDICAL_CONDITION)?,
            insurance: find(INSURANCE_PROVIDER)?,
            billing: find(BILLING_AMOUNT)?,
            admission: find(DATE_OF_ADMISSION)?,
        })
    }
}

/// Invalid UTF-8 becomes U+FFFD so a bad byte only spoils its own field.
fn decode(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

pub(crate) fn read_records<R: Read>(
    source: R,
    config: &DashboardConfig,
) -> IngestionResult<(Vec<Record>, IngestReport)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(source);
    let columns = ColumnIndex::resolve(reader.byte_headers()?)?;
    let mut rows = Vec::new();
    let mut raw_billing = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        let field = |i: usize| decode(row.get(i).unwrap_or_default()).into_owned();
        raw_billing.push(field(columns.billing));
        rows.push((
            field(columns.age),
            field(columns.gender),
            field(columns.condition),
            field(columns.insurance),
            field(columns.admission),
        ));
    }
    let billing = coerce_billing(&raw_billing)?;

    let mut report = IngestReport {
        rows: rows.len(),
        ..IngestReport::default()
    };
    let records: Vec<Record> = rows
        .into_iter()
        .zip(billing)
        .map(|((age, gender, condition, insurance, admission), billing_amount)| {
            let age = parse_age(&age);
            let date_of_admission = parse_date(&admission, &config.date_formats);
            if age.is_none() {
                report.missing_age += 1;
            }
            if billing_amount.is_none() {
                report.missing_billing += 1;
            }
            if date_of_admission.is_none() {
                report.missing_dates += 1;
            }
            let gender: Gender = gender.parse().unwrap_or_else(|never| match never {});
            Record::new(
                age,
                gender,
                condition,
                insurance,
                billing_amount,
                date_of_admission,
            )
        })
        .collect();
    if report.missing_billing > 0 || report.missing_dates > 0 {
        warn!(
            rows = report.rows,
            missing_billing = report.missing_billing,
            missing_dates = report.missing_dates,
            missing_age = report.missing_age,
            "coerced malformed values to missing"
        );
    }
    debug!(rows = report.rows, "csv rows read");
    Ok((records, report))
}

/// Casts raw billing text to `Float64` without strictness, so anything
/// unparsable becomes null; negative or non-finite amounts are dropped too.
pub fn coerce_billing<S: AsRef<str>>(raw: &[S]) -> IngestionResult<Vec<Option<f64>>> {
    let text: Vec<&str> = raw.iter().map(|v| v.as_ref().trim()).collect();
    let cast = Series::new(BILLING_AMOUNT.into(), text).cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|v| v.is_finite() && *v >= 0.0))
        .collect())
}

pub fn parse_billing(raw: &str) -> Option<f64> {
    coerce_billing(&[raw])
        .ok()
        .and_then(|values| values.into_iter().next().flatten())
}

pub fn parse_age(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(age) = trimmed.parse::<u32>() {
        return Some(age);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32)
}

pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|dt| dt.date())
            })
    })
}
