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

use std::io::Write;
use tally::{
    Dashboard, DashboardConfig, Dataset, Gender, IngestionError, TallyError, ViewKind, YearMonth,
};
use tempfile::NamedTempFile;

const HEADER: &str =
    "Name,Age,Gender,Blood Type,Medical Condition,Date of Admission,Insurance Provider,Billing Amount";

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn loads_and_coerces_rows() {
    let file = csv_file(&[
        "Bobby Jackson,30,Male,B-,Cancer,2024-01-31,Blue Cross,18856.28",
        "Leslie Terry,62,Male,A+,Obesity,2019-08-20,Medicare,33643.33",
        "Danny Smith,76,Female,A-,Obesity,2022-09-22,Aetna,not-a-number",
        "Andrew Watts,28,Female,O+,Diabetes,bad-date,Medicare,40701.60",
    ]);
    let ds = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap();
    assert_eq!(ds.len(), 4);
    let report = ds.ingest_report();
    assert_eq!(report.missing_billing, 1);
    assert_eq!(report.missing_dates, 1);
    assert_eq!(ds.records()[2].billing_amount, None);
    assert_eq!(ds.records()[3].year_month, None);
    assert_eq!(ds.records()[0].year_month, YearMonth::new(2024, 1));
    assert_eq!(ds.genders(), &[Gender::Male, Gender::Female]);
    assert_eq!(ds.conditions(), &["Cancer", "Obesity", "Diabetes"]);
    let mean = ds.mean_billing().unwrap();
    assert!((mean - (18856.28 + 33643.33 + 40701.60) / 3.0).abs() < 1e-9);
    assert_eq!(ds.billing_min(), Some(18856.28));
    assert_eq!(ds.billing_median(), Some(33643.33));
    assert_eq!(ds.billing_max(), Some(40701.60));
}

#[test]
fn quoted_fields_with_commas() {
    let file = csv_file(&[
        "\"Smith, Jo\",45,Female,AB+,Arthritis,2020-02-02,\"Cigna, Inc\",1200",
    ]);
    let ds = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap();
    assert_eq!(ds.records()[0].insurance_provider, "Cigna, Inc");
}

#[test]
fn missing_required_column_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Name,Age,Gender,Medical Condition,Insurance Provider,Billing Amount").unwrap();
    writeln!(file, "Jo,30,Male,Cancer,Aetna,10").unwrap();
    let err = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap_err();
    match err {
        IngestionError::MissingColumn { column } => assert_eq!(column, "Date of Admission"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_source_is_fatal() {
    let err = Dataset::from_path("/definitely/not/here.csv", &DashboardConfig::default())
        .unwrap_err();
    assert!(matches!(err, IngestionError::Unreadable { .. }));
}

#[test]
fn empty_source_has_no_header() {
    let file = NamedTempFile::new().unwrap();
    let err = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap_err();
    assert!(matches!(err, IngestionError::MissingHeader));
}

#[test]
fn header_only_source_is_an_empty_dataset() {
    let file = csv_file(&[]);
    let ds = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.mean_billing(), None);
}

#[test]
fn all_billing_missing_reports_no_data() {
    let file = csv_file(&[
        "A,30,Male,B-,Cancer,2024-01-31,Blue Cross,",
        "B,31,Female,B-,Cancer,2024-01-31,Blue Cross,N/A",
    ]);
    let dashboard = Dashboard::load(file.path(), DashboardConfig::default()).unwrap();
    let summary = dashboard.summary();
    assert_eq!(summary.mean_billing, None);
    assert_eq!(summary.mean_billing_label(), "no data");
    assert!(dashboard.slider_bounds().is_none());
    let filter = dashboard.initial_filter();
    assert_eq!(filter.billing_center, 0.0);
    assert!(dashboard
        .compute_view(&filter, ViewKind::BillingDistribution)
        .is_empty());
}

#[test]
fn dashboard_rejects_invalid_config() {
    let file = csv_file(&[]);
    let config = DashboardConfig {
        histogram_bins: 0,
        ..Default::default()
    };
    let err = Dashboard::load(file.path(), config).err().unwrap();
    assert!(matches!(err, TallyError::Config(_)));
}

#[test]
fn reader_source_works_like_path() {
    let data = format!("{HEADER}\nJo,30,M,B-,Cancer,2024-01-31,Aetna,10\n");
    let ds = Dataset::from_reader(data.as_bytes(), &DashboardConfig::default()).unwrap();
    assert_eq!(ds.records()[0].gender, Gender::Male);
}

#[test]
fn bundled_demo_assets_load() {
    let demo = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../bin/demos/tally-dashboard-demo");
    let config = DashboardConfig::from_yaml_file(demo.join("config/dashboard.yml")).unwrap();
    let dashboard = Dashboard::load(demo.join("data/sample_healthcare.csv"), config).unwrap();
    let summary = dashboard.summary();
    assert_eq!(summary.total_records, 20);
    assert_eq!(summary.missing_billing, 0);
    assert_eq!(summary.missing_dates, 0);
    assert!(dashboard.filter_options().conditions.contains(&"Arthritis".to_string()));
}

#[test]
fn strict_dates_preset_rejects_us_dates() {
    let file = csv_file(&[
        "A,30,Male,B-,Cancer,2024-01-31,Aetna,10",
        "B,31,Female,B-,Cancer,01/31/2024,Aetna,20",
    ]);
    let lenient = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap();
    assert_eq!(lenient.ingest_report().missing_dates, 0);
    let strict = Dataset::from_path(file.path(), &DashboardConfig::strict_dates()).unwrap();
    assert_eq!(strict.ingest_report().missing_dates, 1);
    assert_eq!(strict.records()[1].year_month, None);
}

#[test]
fn invalid_utf8_field_only_spoils_its_value() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "A,30,Male,B-,Cancer,2024-01-31,Aetna,10").unwrap();
    file.write_all(b"B,31,Female,B-,Asthma,2024-02-01,Cigna,").unwrap();
    file.write_all(&[0xFF, 0xFE, b'\n']).unwrap();
    file.flush().unwrap();
    let ds = Dataset::from_path(file.path(), &DashboardConfig::default()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.ingest_report().missing_billing, 1);
    assert_eq!(ds.mean_billing(), Some(10.0));
}
