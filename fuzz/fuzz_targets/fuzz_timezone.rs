#![no_main]
use hammerqr::timezone::{FixedClock, device_timestamp, timezone_offset_ms};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(label) = std::str::from_utf8(data) else {
        return;
    };
    let clock = FixedClock {
        now_ms: 1_700_000_000_000,
        local_offset_ms: -3_600_000,
    };

    // Any label resolves to at most twelve hours either way
    let offset = timezone_offset_ms(label, &clock);
    assert!(offset.abs() <= 12 * 3_600_000);
    let _ = device_timestamp(label, &clock);
});
