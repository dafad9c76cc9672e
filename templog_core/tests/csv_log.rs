use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use templog_core::{CsvLog, HeaderState, LoggerError};
use tempfile::tempdir;

fn at(sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(14, 30, sec)
        .unwrap()
}

#[test]
fn missing_file_gets_header_then_row() {
    let dir = tempdir().unwrap();
    let log = CsvLog::new(dir.path().join("temp.csv"));

    let (state, rec) = log.write(at(0), 22.53, 45.27).unwrap();
    assert_eq!(state, HeaderState::Created);
    assert_eq!(rec.line(), "2024-01-15 14:30:00,22.5,45.3");

    let text = fs::read_to_string(log.path()).unwrap();
    assert_eq!(text, "TIMESTAMP,DHT22,CPU\r\n2024-01-15 14:30:00,22.5,45.3\r\n");
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn empty_file_is_reinitialized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("temp.csv");
    fs::write(&path, "").unwrap();
    let log = CsvLog::new(&path);

    let (state, _) = log.write(at(1), 20.0, 40.0).unwrap();
    assert_eq!(state, HeaderState::Reinitialized);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "TIMESTAMP,DHT22,CPU\r\n2024-01-15 14:30:01,20.0,40.0\r\n"
    );
}

#[test]
fn header_is_written_once_across_calls() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("temp.csv");
    fs::write(&path, "").unwrap();
    let log = CsvLog::new(&path);

    log.write(at(0), 21.0, 50.0).unwrap();
    let (second, _) = log.write(at(5), 21.1, 50.5).unwrap();
    assert_eq!(second, HeaderState::Present);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("TIMESTAMP,DHT22,CPU").count(), 1);
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().skip(1).all(|l| l.split(',').count() == 3));
}

#[test]
fn existing_content_is_only_appended() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("temp.csv");
    let before = "TIMESTAMP,DHT22,CPU\r\n2023-12-31 23:59:59,1.0,2.0\r\n";
    fs::write(&path, before).unwrap();
    let log = CsvLog::new(&path);

    assert_eq!(log.ensure_header().unwrap(), HeaderState::Present);
    log.write(at(2), 3.0, 4.0).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(before));
    assert!(text.ends_with("2024-01-15 14:30:02,3.0,4.0\r\n"));
}

#[test]
fn unwritable_location_is_a_log_error() {
    let dir = tempdir().unwrap();
    let log = CsvLog::new(dir.path().join("no-such-dir").join("temp.csv"));
    let err = log.write(at(0), 1.0, 2.0).unwrap_err();
    match err.downcast_ref::<LoggerError>() {
        Some(LoggerError::Log(msg)) => assert!(msg.contains("temp.csv"), "{msg}"),
        other => panic!("expected log error, got {other:?}"),
    }
}
