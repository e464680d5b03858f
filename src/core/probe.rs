//! Latency probing for automatic mirror selection.

use crate::core::http::Transport;
use std::time::Duration;

/// Probe every mirror with a timed HEAD request and return the fastest one.
///
/// A mirror that fails the first probe gets one more chance with TLS
/// certificate validation disabled (several of the public proxies serve
/// certificates that do not validate); a mirror failing both probes is
/// excluded. Returns `None` when no mirror responds at all, which callers
/// treat as "proceed without a proxy", never as an error.
pub fn select_fastest_mirror(
    transport: &dyn Transport,
    mirrors: &[String],
) -> Option<(String, Duration)> {
    let mut best: Option<(String, Duration)> = None;

    for mirror in mirrors {
        let latency = match transport.head(mirror, false) {
            Ok(latency) => latency,
            Err(first) => match transport.head(mirror, true) {
                Ok(latency) => latency,
                Err(_) => {
                    println!("⚠️  {mirror} unreachable ({first}), skipping");
                    continue;
                }
            },
        };

        println!("{mirror}: {} ms", latency.as_millis());

        let faster = match &best {
            Some((_, current)) => latency < *current,
            None => true,
        };
        if faster {
            best = Some((mirror.clone(), latency));
        }
    }

    best
}
