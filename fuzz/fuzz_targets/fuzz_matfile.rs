#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Truncated or corrupt containers must fail with an error
    if let Ok(mat) = hcpmeg::matfile::MatFile::from_bytes(data) {
        let _ = hcpmeg::mesh::extract_mesh(&mat, None);
        for (_, value) in mat.iter() {
            let _ = value.describe();
        }
    }
});
