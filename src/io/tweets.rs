// Tweet corpus reading.
//
// Tweet files are newline-delimited JSON: each line holds either a single
// tweet object or an array of tweet objects. Files ending in `.gz` are
// gzip-compressed. A malformed line is logged and skipped.
//
// Documents are built by grouping contiguous runs of the same account:
// the collector writes each account's tweets as one block, and the run
// boundary is the only grouping signal. Records for a handle that
// reappears after a gap become a separate document (they are NOT merged);
// the reader logs a warning so unsorted input is loud rather than a
// silent undercount.

use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct TweetUser {
    screen_name: String,
}

#[derive(Deserialize)]
struct TweetRecord {
    user: TweetUser,
    text: String,
}

/// A line is either one tweet object or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordLine {
    One(TweetRecord),
    Many(Vec<TweetRecord>),
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("cannot open tweet file {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterator over per-account documents: `(handle, concatenated tweet text)`.
///
/// Single-pass and lazy — the brand corpus may be large, and each brand
/// document is scored and then discarded.
pub struct TweetDocs {
    lines: Lines<Box<dyn BufRead>>,
    buffer: VecDeque<(String, String)>,
    pending: Option<(String, Vec<String>)>,
    seen: HashSet<String>,
    done: bool,
}

impl TweetDocs {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            lines: open_reader(path)?.lines(),
            buffer: VecDeque::new(),
            pending: None,
            seen: HashSet::new(),
            done: false,
        })
    }

    /// Pull the next `(handle, text)` record, refilling from the file as
    /// needed. `Ok(None)` means end of input.
    fn next_record(&mut self) -> Result<Option<(String, String)>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line = line.context("error reading tweet file")?;
            match serde_json::from_str::<RecordLine>(&line) {
                Ok(RecordLine::One(t)) => self
                    .buffer
                    .push_back((t.user.screen_name.to_lowercase(), t.text)),
                Ok(RecordLine::Many(ts)) => {
                    for t in ts {
                        self.buffer
                            .push_back((t.user.screen_name.to_lowercase(), t.text));
                    }
                }
                Err(e) => warn!(error = %e, "skipping malformed tweet record"),
            }
        }
    }

    fn next_doc(&mut self) -> Result<Option<(String, String)>> {
        loop {
            match self.next_record()? {
                Some((handle, text)) => match &mut self.pending {
                    Some((current, texts)) if *current == handle => texts.push(text),
                    _ => {
                        let finished = self.pending.take();
                        if !self.seen.insert(handle.clone()) {
                            warn!(
                                handle = %handle,
                                "non-contiguous tweet records; treating as a separate document"
                            );
                        }
                        self.pending = Some((handle, vec![text]));
                        if let Some((name, texts)) = finished {
                            return Ok(Some((name, texts.join(" "))));
                        }
                    }
                },
                None => {
                    self.done = true;
                    return Ok(self.pending.take().map(|(name, texts)| (name, texts.join(" "))));
                }
            }
        }
    }
}

impl Iterator for TweetDocs {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.next_doc().transpose()
    }
}

/// Read an entire tweet file into per-account documents.
///
/// Used for the exemplar and background-sample corpora, which are needed
/// in full to fit the vectorizer and the classifier.
pub fn read_docs(path: &Path) -> Result<Vec<(String, String)>> {
    TweetDocs::open(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tweet(name: &str, text: &str) -> String {
        format!(r#"{{"user": {{"screen_name": "{name}"}}, "text": "{text}"}}"#)
    }

    fn write_fixture(lines: &[String]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f
    }

    #[test]
    fn contiguous_runs_become_one_document() {
        let f = write_fixture(&[
            tweet("Acme", "first tweet"),
            tweet("acme", "second tweet"),
            tweet("other", "hello"),
        ]);
        let docs = read_docs(f.path()).unwrap();
        assert_eq!(
            docs,
            vec![
                ("acme".to_string(), "first tweet second tweet".to_string()),
                ("other".to_string(), "hello".to_string()),
            ]
        );
    }

    #[test]
    fn non_contiguous_runs_stay_separate() {
        let f = write_fixture(&[
            tweet("a", "one"),
            tweet("b", "two"),
            tweet("a", "three"),
        ]);
        let docs = read_docs(f.path()).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0], ("a".to_string(), "one".to_string()));
        assert_eq!(docs[2], ("a".to_string(), "three".to_string()));
    }

    #[test]
    fn array_lines_are_flattened() {
        let f = write_fixture(&[format!(
            "[{}, {}]",
            tweet("a", "one"),
            tweet("a", "two")
        )]);
        let docs = read_docs(f.path()).unwrap();
        assert_eq!(docs, vec![("a".to_string(), "one two".to_string())]);
    }

    #[test]
    fn malformed_json_is_skipped() {
        let f = write_fixture(&[
            tweet("a", "kept"),
            "{not json at all".to_string(),
            tweet("a", "also kept"),
        ]);
        let docs = read_docs(f.path()).unwrap();
        assert_eq!(docs, vec![("a".to_string(), "kept also kept".to_string())]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let f = write_fixture(&[
            r#"{"user": {"screen_name": "a", "id": 5}, "text": "hi", "created_at": "x"}"#
                .to_string(),
        ]);
        let docs = read_docs(f.path()).unwrap();
        assert_eq!(docs, vec![("a".to_string(), "hi".to_string())]);
    }

    #[test]
    fn gzip_files_are_decoded() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.json.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(enc, "{}", tweet("a", "zipped")).unwrap();
        enc.finish().unwrap();

        let docs = read_docs(&path).unwrap();
        assert_eq!(docs, vec![("a".to_string(), "zipped".to_string())]);
    }
}
