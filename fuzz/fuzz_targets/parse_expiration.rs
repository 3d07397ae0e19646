#![no_main]

use fedauth_aws::parse_expiration;
use libfuzzer_sys::fuzz_target;

// Expiration parsing should never panic
fuzz_target!(|data: &[u8]| {
    let value = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };
    let _ = parse_expiration(value);
});
