#![no_main]

use fedauth_saml::parse_roles;
use libfuzzer_sys::fuzz_target;

// Extracting roles from an embed link page should never panic
fuzz_target!(|data: &[u8]| {
    let html = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };
    let _ = parse_roles(html);
});
