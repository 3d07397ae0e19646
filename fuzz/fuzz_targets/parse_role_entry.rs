#![no_main]

use fedauth_saml::RoleEntry;
use libfuzzer_sys::fuzz_target;

// RoleEntry parsing should never panic
fuzz_target!(|data: &[u8]| {
    let value = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };
    if let Ok(entry) = value.parse::<RoleEntry>() {
        let _ = entry.role_name();
    }
});
