use std::collections::VecDeque;
use std::io::{self, BufReader, Cursor, ErrorKind, Read};
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use rstest::rstest;
use templog_hardware::{HwError, Reading, read_sample};

fn never() -> bool {
    false
}

/// Replays scripted chunks; `None` stands for a read that hit the port timeout.
struct ScriptedPort {
    chunks: VecDeque<Option<&'static [u8]>>,
}

impl ScriptedPort {
    fn new(chunks: Vec<Option<&'static [u8]>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }
}

impl Read for ScriptedPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.chunks.pop_front() {
            Some(Some(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(None) => Err(io::Error::new(ErrorKind::TimedOut, "operation timed out")),
            None => Ok(0),
        }
    }
}

#[rstest]
#[case::second_line_wins(b"half-a-fram\n22.5\n", 22.5)]
#[case::crlf_lines(b"19.9\r\n20.1\r\n", 20.1)]
#[case::leading_empty_lines(b"\n\r\n\n17.0\n-3.5\n", -3.5)]
#[case::empty_between(b"8.0\n\n\n\n9.5\n", 9.5)]
#[case::trailing_lines_ignored(b"1.0\n2.0\n3.0\n", 2.0)]
fn returns_second_non_empty_line(#[case] input: &[u8], #[case] expected: f64) {
    let mut reader = Cursor::new(input);
    let r = read_sample(&mut reader, &never).expect("reading");
    assert_eq!(r.celsius, expected);
}

#[test]
fn not_ready_marker_counts_as_the_discarded_line() {
    let mut reader = Cursor::new(&b"ERR\n22.5;41.0\n23.0\n"[..]);
    let r = read_sample(&mut reader, &never).expect("reading");
    assert_eq!(
        r,
        Reading {
            celsius: 22.5,
            humidity: Some(41.0)
        }
    );
}

#[rstest]
#[case::upper(b"21.0\nERR\n23.0\n")]
#[case::lower(b"21.0\n\nerr\r\n23.0\n")]
fn not_ready_marker_on_decoded_line_is_malformed(#[case] input: &[u8]) {
    let mut reader = Cursor::new(input);
    match read_sample(&mut reader, &never) {
        Err(HwError::Malformed(msg)) => assert!(msg.to_lowercase().contains("err"), "{msg}"),
        other => panic!("expected malformed, got {other:?}"),
    }
}

#[test]
fn malformed_second_line_is_an_error() {
    let mut reader = Cursor::new(&b"21.0\nhello\n"[..]);
    match read_sample(&mut reader, &never) {
        Err(HwError::Malformed(msg)) => assert!(msg.contains("hello"), "{msg}"),
        other => panic!("expected malformed, got {other:?}"),
    }
}

#[test]
fn first_line_is_not_validated() {
    let mut reader = Cursor::new(&b"\xff\xfe;;garbage\n30.0\n"[..]);
    assert_eq!(read_sample(&mut reader, &never).unwrap().celsius, 30.0);
}

#[test]
fn eof_before_two_lines_is_disconnect() {
    let mut reader = Cursor::new(&b"\n21.0\n\n"[..]);
    assert!(matches!(
        read_sample(&mut reader, &never),
        Err(HwError::Disconnected)
    ));
}

#[test]
fn unterminated_last_line_is_decoded() {
    let mut reader = Cursor::new(&b"21.0\n22.0"[..]);
    assert_eq!(read_sample(&mut reader, &never).unwrap().celsius, 22.0);
}

#[test]
fn line_split_across_timeouts_is_reassembled() {
    let port = ScriptedPort::new(vec![
        None,
        Some(b"1"),
        None,
        Some(b"9.0\n2"),
        None,
        Some(b"1.5"),
        None,
        Some(b"\n"),
    ]);
    let mut reader = BufReader::new(port);
    assert_eq!(read_sample(&mut reader, &never).unwrap().celsius, 21.5);
}

#[test]
fn silent_device_stops_when_cancelled() {
    let port = ScriptedPort::new(vec![None, None, None, None, None]);
    let mut reader = BufReader::new(port);
    let polls = AtomicUsize::new(0);
    let cancel = || polls.fetch_add(1, Ordering::Relaxed) >= 2;
    assert!(matches!(
        read_sample(&mut reader, &cancel),
        Err(HwError::Cancelled)
    ));
    assert_eq!(polls.load(Ordering::Relaxed), 3);
}

proptest! {
    #[test]
    fn prop_second_non_empty_line_value(
        first in "[A-Za-z0-9.;:-]{1,16}",
        blanks in 0usize..5,
        value in -40.0f64..125.0,
    ) {
        let mut input = "\n".repeat(blanks);
        input.push_str(&first);
        input.push('\n');
        input.push_str(&"\r\n".repeat(blanks));
        input.push_str(&format!("{value}\n"));
        let mut reader = Cursor::new(input.into_bytes());
        let r = read_sample(&mut reader, &never).unwrap();
        prop_assert_eq!(r.celsius, value);
        prop_assert_eq!(r.humidity, None);
    }
}
