//! Fuzz target for ray-casting point-in-polygon.
//!
//! Interprets the input as little-endian f64 pairs: the first pair is the
//! probe point, the rest form the ring.

#![no_main]

use haloxml::model::pip::fuzz_point_in_polygon;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    let _ = fuzz_point_in_polygon(data);
});
