#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate bson2json;

use bson2json::{PopulateInfo, Transcoder};

fuzz_target!(|buf: &[u8]| {
    let mut populate = PopulateInfo::new();
    populate.add_items("a.b", Vec::<Vec<u8>>::new()).unwrap();
    let transcoder = Transcoder::with_populate(&populate);
    let _ = transcoder.scan_missing_ids(buf, false);
    let _ = transcoder.scan_missing_ids(buf, true);
});
