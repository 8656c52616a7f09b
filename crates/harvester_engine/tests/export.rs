use harvester_engine::{
    build_csv, split_csv_line, write_csv_export, ExportError, ExportOptions, HarvestedRecord,
    CSV_HEADER,
};
use pretty_assertions::assert_eq;

fn record(label: &str, name: &str, phone: &str, message: &str) -> HarvestedRecord {
    HarvestedRecord {
        display_label: label.to_string(),
        public_name: name.to_string(),
        phone_number: phone.to_string(),
        last_message: message.to_string(),
    }
}

#[test]
fn csv_starts_with_the_fixed_header() {
    let csv = build_csv(&[record("Alice", "", "", "")]).unwrap();
    assert_eq!(
        csv.lines().next().unwrap(),
        "Display Name,Public Name,Phone Number,Last Message"
    );
}

#[test]
fn quotes_and_commas_round_trip() {
    let original = record("A \"B\", C", "~Ali", "+1 555-123-4567", "said \"hi\", then left");
    let csv = build_csv(&[original.clone()]).unwrap();
    let data_line = csv.lines().nth(1).unwrap();

    let fields = split_csv_line(data_line);
    assert_eq!(
        fields,
        vec![
            original.display_label,
            original.public_name,
            original.phone_number,
            original.last_message,
        ]
    );
}

#[test]
fn rows_preserve_processing_order() {
    let csv = build_csv(&[
        record("first", "", "", ""),
        record("second", "", "", ""),
        record("third", "", "", ""),
    ])
    .unwrap();

    let labels: Vec<String> = csv
        .lines()
        .skip(1)
        .map(|line| split_csv_line(line)[0].clone())
        .collect();
    assert_eq!(labels, vec!["first", "second", "third"]);
}

#[test]
fn zero_records_is_a_distinct_condition_not_an_empty_file() {
    let err = build_csv(&[]).unwrap_err();
    assert!(matches!(err, ExportError::NoRecords));
}

#[test]
fn export_writes_the_file_into_the_output_dir() {
    let temp = tempfile::TempDir::new().unwrap();
    let records = vec![record("Alice", "~Ali", "+1 555-123-4567", "bye")];

    let summary = write_csv_export(temp.path(), &ExportOptions::default(), &records).unwrap();

    assert_eq!(summary.record_count, 1);
    assert_eq!(
        summary.output_path,
        temp.path().join(ExportOptions::default().output_filename)
    );
    let written = std::fs::read_to_string(summary.output_path).unwrap();
    assert!(written.starts_with(&CSV_HEADER.join(",")));
    assert!(written.contains("\"+1 555-123-4567\""));
}

#[test]
fn export_creates_a_missing_output_dir() {
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("out").join("records");

    let summary = write_csv_export(
        &nested,
        &ExportOptions::default(),
        &[record("Alice", "", "", "")],
    )
    .unwrap();

    assert!(summary.output_path.exists());
}

#[test]
fn export_replaces_a_previous_artifact() {
    let temp = tempfile::TempDir::new().unwrap();
    let options = ExportOptions::default();

    write_csv_export(temp.path(), &options, &[record("old", "", "", "")]).unwrap();
    let summary =
        write_csv_export(temp.path(), &options, &[record("new", "", "", "")]).unwrap();

    let written = std::fs::read_to_string(summary.output_path).unwrap();
    assert!(written.contains("\"new\""));
    assert!(!written.contains("\"old\""));
}
