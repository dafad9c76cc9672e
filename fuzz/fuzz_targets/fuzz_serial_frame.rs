#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes off the wire must decode or fail with an error, never panic.
    let mut reader = std::io::Cursor::new(data);
    let never = || false;
    if let Ok(r) = templog_hardware::read_sample(&mut reader, &never) {
        assert!(r.celsius.is_finite());
    }
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = templog_hardware::Frame::parse(line);
    }
});
