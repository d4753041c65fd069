use anyhow::Result;
use num::BigUint;

use aoc2021::{read_transmission, trace::TracingObserver, Decoder};

pub fn day16(input: &str) -> Result<(u64, BigUint)> {
    let mut observer = TracingObserver;
    let transmission = Decoder::new()
        .with_observer(&mut observer)
        .decode(&read_transmission(input))?;

    let version_sum = transmission.version_sum();
    let value = transmission.root()?.value();
    Ok((version_sum, value))
}
