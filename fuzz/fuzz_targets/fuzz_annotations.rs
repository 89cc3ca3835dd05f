#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Hand-edited annotation files are parsed permissively; any input must
    // yield a map or an error, never a panic
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = hcpmeg::annotations::parse_bad_channels(text);
    let _ = hcpmeg::annotations::parse_bad_segments(text);
    let _ = hcpmeg::annotations::parse_ica_classification(text);
    let _ = hcpmeg::transforms::parse_transforms(text, true);
    let _ = hcpmeg::landmarks::parse_landmarks(text);
});
