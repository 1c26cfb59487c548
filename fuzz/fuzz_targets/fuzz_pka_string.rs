#![no_main]

use libfuzzer_sys::fuzz_target;

use t3_chomper::pka::PkaString;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must print back to a string that parses the same
    if let Ok(pkas) = text.parse::<PkaString>() {
        let again: PkaString = pkas.to_string().parse().expect("display output must parse");
        assert_eq!(pkas, again);
    }
});
