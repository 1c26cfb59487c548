#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use t3_chomper::t3r::{LogPParser, PkaParser, ResultParser, T3rDocument};

fuzz_target!(|data: &[u8]| {
    // Malformed documents must come back as errors, never panics
    let Ok(doc) = T3rDocument::from_reader(Cursor::new(data)) else {
        return;
    };

    let _ = PkaParser::new().parse_document(&doc, "fuzz.t3r");
    let _ = LogPParser::new().parse_document(&doc, "fuzz.t3r");
});
