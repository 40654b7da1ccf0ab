#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut rdr) = der_codec::DerReader::new(data) {
        let _ = rdr.build_offset_map();
    }
});
