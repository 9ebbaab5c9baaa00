//! Concurrent CIDR classification into IPv4 and IPv6 collections.
//!
//! Lines are parsed by a bounded worker pool. Workers tag each result with
//! the index of its source line and route it to one of two bounded channels.
//! Each channel has a single collector that drains it until every worker has
//! exited and dropped its sender, then sorts by line index. Output order is
//! therefore input order, regardless of scheduling.

use crossbeam_channel::{bounded, Receiver};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::num::NonZeroUsize;
use std::thread;

/// Default capacity of the job and result channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Result of classifying a CIDR text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// IPv4 prefixes in input order
    pub v4: Vec<Ipv4Net>,
    /// IPv6 prefixes in input order (includes IPv4-mapped IPv6 text)
    pub v6: Vec<Ipv6Net>,
    /// Non-empty lines that did not parse as a CIDR prefix
    pub dropped: usize,
}

impl Classified {
    /// Total number of classified prefixes.
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }
}

/// Splits newline-delimited CIDR text into IPv4 and IPv6 prefixes.
///
/// Unparsable lines are dropped silently; only [`Classified::dropped`]
/// records how many.
///
/// # Examples
/// ```
/// use geoip2cidr::Classifier;
///
/// let out = Classifier::new().classify(b"1.2.3.0/24\n::1/128\nnotacidr\n");
/// assert_eq!(out.v4[0].to_string(), "1.2.3.0/24");
/// assert_eq!(out.v6[0].to_string(), "::1/128");
/// assert_eq!(out.dropped, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    workers: usize,
    channel_capacity: usize,
}

impl Classifier {
    /// Create a classifier with one worker per available CPU.
    pub fn new() -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            workers,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the number of parse workers (at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the capacity of each bounded channel (at least 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Classify a newline-delimited buffer. Never fails.
    pub fn classify(&self, data: &[u8]) -> Classified {
        let (job_tx, job_rx) = bounded::<(usize, &[u8])>(self.channel_capacity);
        let (v4_tx, v4_rx) = bounded::<(usize, Ipv4Net)>(self.channel_capacity);
        let (v6_tx, v6_rx) = bounded::<(usize, Ipv6Net)>(self.channel_capacity);

        thread::scope(|scope| {
            for _ in 0..self.workers {
                let jobs = job_rx.clone();
                let v4_tx = v4_tx.clone();
                let v6_tx = v6_tx.clone();
                scope.spawn(move || {
                    while let Ok((index, line)) = jobs.recv() {
                        let sent = match parse_line(line) {
                            Some(IpNet::V4(net)) => v4_tx.send((index, net)).is_ok(),
                            Some(IpNet::V6(net)) => v6_tx.send((index, net)).is_ok(),
                            None => true,
                        };
                        // A collector is gone only if it panicked.
                        if !sent {
                            break;
                        }
                    }
                });
            }
            // Workers hold the only remaining senders; once they exit the
            // result channels disconnect and the collectors finish.
            drop(job_rx);
            drop(v4_tx);
            drop(v6_tx);

            let v4_collector = scope.spawn(move || collect(v4_rx));
            let v6_collector = scope.spawn(move || collect(v6_rx));

            let mut lines = 0usize;
            for (index, line) in data
                .split(|&b| b == b'\n')
                .filter(|line| !line.is_empty())
                .enumerate()
            {
                lines = index + 1;
                if job_tx.send((index, line)).is_err() {
                    break;
                }
            }
            drop(job_tx);

            let v4 = v4_collector.join().unwrap_or_default();
            let v6 = v6_collector.join().unwrap_or_default();
            let dropped = lines.saturating_sub(v4.len() + v6.len());

            log::debug!(
                "Classified {} lines: {} IPv4, {} IPv6, {} dropped",
                lines,
                v4.len(),
                v6.len(),
                dropped
            );

            Classified { v4, v6, dropped }
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default classifier.
pub fn classify(data: &[u8]) -> Classified {
    Classifier::new().classify(data)
}

/// Parse one line as a CIDR prefix. No trimming is applied.
pub fn parse_line(line: &[u8]) -> Option<IpNet> {
    std::str::from_utf8(line).ok()?.parse::<IpNet>().ok()
}

/// Drain a result channel until it disconnects, then restore input order.
fn collect<T>(rx: Receiver<(usize, T)>) -> Vec<T> {
    let mut items: Vec<(usize, T)> = rx.iter().collect();
    items.sort_unstable_by_key(|(index, _)| *index);
    items.into_iter().map(|(_, item)| item).collect()
}
