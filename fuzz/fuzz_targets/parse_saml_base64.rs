#![no_main]

use base64::{Engine, engine::general_purpose::STANDARD};
use fedauth_saml::SamlAssertion;
use libfuzzer_sys::fuzz_target;

// Parsing arbitrary assertion documents should never panic
fuzz_target!(|data: &[u8]| {
    if let Ok(assertion) = SamlAssertion::from_base64(&STANDARD.encode(data)) {
        let _ = assertion.roles();
    }
});
