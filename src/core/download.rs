//! Mirror-fallback downloader: try each mirror in list order with bounded
//! retries and a clamped linear backoff before moving to the next one.

use crate::core::http::Transport;
use crate::error::{Result, WrenkitError};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Stream chunk size for writing the response body to disk (8 KiB).
const CHUNK_SIZE: usize = 8192;

/// Retry behavior for one mirror. Tests zero the delays.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts against a single mirror before moving on.
    pub attempts: u32,
    /// Backoff grows linearly by this step per failed attempt.
    pub backoff_step: Duration,
    /// Ceiling for the backoff, regardless of attempt number.
    pub backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 5,
            backoff_step: Duration::from_millis(1500),
            backoff_cap: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Wait before retrying after failed attempt `attempt` (1-based):
    /// `min(cap, attempt * step)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        std::cmp::min(self.backoff_cap, self.backoff_step * attempt)
    }
}

pub struct Downloader<'a> {
    transport: &'a dyn Transport,
    policy: RetryPolicy,
}

impl<'a> Downloader<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(transport: &'a dyn Transport, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Download `urls` (one per mirror, in priority order) to `destination`.
    /// Each mirror gets the full retry budget before the next is tried; if
    /// every mirror is exhausted no file is left behind.
    pub fn download_with_fallbacks(&self, urls: &[String], destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            crate::utils::fs::ensure_dir_exists(parent)?;
        }

        for (index, url) in urls.iter().enumerate() {
            println!(
                "Mirror {}/{}: {}",
                index + 1,
                urls.len(),
                mirror_host(url)
            );

            for attempt in 1..=self.policy.attempts {
                match self.fetch_once(url, destination) {
                    Ok(()) => return Ok(()),
                    Err(e) => {
                        println!("Attempt #{attempt} failed: {e}");
                        if attempt < self.policy.attempts {
                            let wait = self.policy.backoff(attempt);
                            println!("Retrying in {:.1}s...", wait.as_secs_f64());
                            std::thread::sleep(wait);
                        }
                    }
                }
            }

            println!("{}", "-".repeat(60));
        }

        // A failed attempt may have left a partial file behind.
        if destination.exists() {
            let _ = std::fs::remove_file(destination);
        }

        println!("❌ All mirrors failed");
        Err(WrenkitError::AllMirrorsFailed {
            mirrors: urls.len(),
        })
    }

    fn fetch_once(&self, url: &str, destination: &Path) -> Result<()> {
        let started = Instant::now();
        let response = self.transport.get(url)?;

        match response.content_length {
            Some(total) => println!("File size: {:.2} MB", total as f64 / (1024.0 * 1024.0)),
            None => println!("File size: unknown"),
        }

        let downloaded = stream_to_file(response.body, response.content_length, destination)?;

        println!(
            "✅ Download complete: {:.2} MB in {:.2}s",
            downloaded as f64 / (1024.0 * 1024.0),
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

/// Write the body to disk in fixed-size chunks, reporting cumulative
/// percentage progress when the total size is known and cumulative megabytes
/// otherwise. Returns the number of bytes written.
fn stream_to_file(mut body: Box<dyn Read>, total: Option<u64>, destination: &Path) -> Result<u64> {
    let mut file = File::create(destination)?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut downloaded: u64 = 0;

    loop {
        let read = body.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])?;
        downloaded += read as u64;

        match total {
            Some(total) if total > 0 => {
                let progress = downloaded as f64 / total as f64 * 100.0;
                print!("\rProgress: {progress:.1}%");
            }
            _ => {
                print!("\rDownloaded: {:.2} MB", downloaded as f64 / (1024.0 * 1024.0));
            }
        }
        let _ = std::io::stdout().flush();
    }

    file.flush()?;
    println!();
    Ok(downloaded)
}

/// Host portion of a URL, for the per-mirror banner.
fn mirror_host(url: &str) -> &str {
    let rest = url.split("//").nth(1).unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}
