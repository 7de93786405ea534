#![no_main]

use libfuzzer_sys::fuzz_target;
use oauth_doctor_remediation::derive_project_ref;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let project_ref = derive_project_ref(&raw);
    assert!(!project_ref.is_empty());
    assert!(!project_ref.contains('.'));
});
