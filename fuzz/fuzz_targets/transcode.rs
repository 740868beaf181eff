#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate bson2json;

use bson2json::Transcoder;

fuzz_target!(|buf: &[u8]| {
    for is_array in [false, true] {
        if let Ok(json) = Transcoder::new().transcode(buf, is_array) {
            // String payload bytes are copied through unvalidated, so the
            // output is only UTF-8 when the input was. Check structure on a
            // lossy decode: replacement characters land inside string
            // values and never affect the surrounding JSON syntax.
            let text = String::from_utf8_lossy(&json);
            serde_json::from_str::<serde_json::Value>(&text)
                .expect("successful transcode must produce structurally valid JSON");
        }
    }
});
