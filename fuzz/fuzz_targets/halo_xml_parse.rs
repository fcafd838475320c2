//! Fuzz target for Halo XML parsing.
//!
//! Feeds arbitrary byte sequences to the Halo XML parser and runs hole
//! matching on anything that parses, checking for panics, crashes, or hangs.

#![no_main]

use haloxml::diagnostics::Diagnostics;
use haloxml::model::io_halo_xml::from_halo_xml_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    if let Ok(mut doc) = from_halo_xml_slice(data) {
        let _ = doc.match_negative(&mut Diagnostics::new());
    }
});
