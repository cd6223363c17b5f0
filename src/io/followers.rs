// Follower-file reading.
//
// File format, one account per line:
//
//   <iso8601-timestamp> <screen_name> <follower_id_1> <follower_id_2> ...
//
// Lines with fewer than 4 fields are malformed and skipped — collected
// data is noisy and a handful of truncated lines must not kill a run.
// Handles are lowercased on read; follower ids are deduplicated into a
// set (multiplicity carries no meaning).

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::{ExemplarPool, FollowerSet};

/// Minimum whitespace-separated fields for a valid record: timestamp,
/// handle, and at least two follower ids.
const MIN_FIELDS: usize = 4;

fn parse_line(line: &str) -> Option<(String, FollowerSet)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_FIELDS {
        return None;
    }
    let handle = parts[1].to_lowercase();
    let followers: FollowerSet = parts[2..]
        .iter()
        .filter_map(|tok| tok.parse::<u64>().ok())
        .collect();
    Some((handle, followers))
}

/// Read a follower file into an exemplar pool, applying the follower-count
/// window and the blacklist.
///
/// The window is exclusive below and inclusive above: an exemplar is kept
/// when `min_followers < count <= max_followers`. Blacklisted handles
/// (brand accounts) are never usable as exemplars.
pub fn read_follower_file(
    path: &Path,
    min_followers: usize,
    max_followers: usize,
    blacklist: &HashSet<String>,
) -> Result<ExemplarPool> {
    let file = File::open(path)
        .with_context(|| format!("cannot open follower file {}", path.display()))?;
    let mut pool = ExemplarPool::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let Some((handle, followers)) = parse_line(&line) else {
            continue;
        };
        if blacklist.contains(&handle) {
            info!(exemplar = %handle, "skipping blacklisted exemplar");
            continue;
        }
        if followers.len() > min_followers && followers.len() <= max_followers {
            pool.insert(handle, followers);
        }
    }
    Ok(pool)
}

/// Streaming iterator over a follower file: one `(handle, follower_set)`
/// per valid line. Brands are scored one at a time and never materialized
/// into a map — the brand set may be very large.
pub struct FollowerStream {
    lines: Lines<BufReader<File>>,
}

impl FollowerStream {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open follower file {}", path.display()))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl Iterator for FollowerStream {
    type Item = Result<(String, FollowerSet)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    if let Some(record) = parse_line(&line) {
                        return Some(Ok(record));
                    }
                    // malformed line, keep scanning
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Collect the account handles appearing in a file, for blacklist lookup.
///
/// Accepts either format: a full follower record (4+ fields, handle in
/// the second position) or a plain handle list (first token of each
/// line's first 90 characters — the truncation bounds the work done on
/// pathological lines). Handles are lowercased.
pub fn read_handles(path: &Path) -> Result<HashSet<String>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open handle file {}", path.display()))?;
    let mut handles = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= MIN_FIELDS {
            handles.insert(parts[1].to_lowercase());
        } else {
            let head: String = line.chars().take(90).collect();
            if let Some(tok) = head.split_whitespace().next() {
                handles.insert(tok.to_lowercase());
            }
        }
    }
    Ok(handles)
}
