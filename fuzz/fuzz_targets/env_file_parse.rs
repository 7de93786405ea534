#![no_main]

use libfuzzer_sys::fuzz_target;
use oauth_doctor_config::{
    mask_key, parse_env_file_text, validate_credentials, DEFAULT_KEY_VAR, DEFAULT_URL_VAR,
};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let values = parse_env_file_text(&raw, DEFAULT_URL_VAR, DEFAULT_KEY_VAR);

    if let Some(url) = values.url.as_deref() {
        assert_eq!(url, url.trim());
    }
    if let Some(key) = values.key.as_deref() {
        let masked = mask_key(key).chars().count();
        if key.chars().count() > 40 {
            assert_eq!(masked, 43);
        } else {
            assert!(masked <= 7);
        }
    }

    let loaded = validate_credentials(
        std::path::Path::new(".env.local"),
        values.url,
        values.key,
        100,
    );
    if loaded.url.is_none() {
        assert!(loaded.key.is_none());
    }
    assert_eq!(loaded.is_complete(), loaded.service_credentials().is_some());
});
