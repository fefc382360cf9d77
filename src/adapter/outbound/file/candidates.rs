//! JSON-lines candidate file.
//!
//! One candidate object per line. Blank lines and `#` comments are ignored.
//! A line that does not parse or validate is skipped with a warning; failing
//! to read the file is fatal to the run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::domain::candidate::Candidate;
use crate::error::Result;
use crate::port::inbound::producer::{CandidateProducer, CandidateSink};

/// Streams candidates from a JSON-lines file into the pipeline.
pub struct CandidateFile {
    path: PathBuf,
    skipped: u64,
}

impl CandidateFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            skipped: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines skipped as invalid so far.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }
}

fn parse_line(line: &str) -> Result<Candidate> {
    let candidate: Candidate = serde_json::from_str(line)?;
    candidate.validate()?;
    Ok(candidate)
}

#[async_trait]
impl CandidateProducer for CandidateFile {
    async fn produce(&mut self, sink: &dyn CandidateSink) -> Result<()> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut line_no = 0u64;
        let mut offered = 0u64;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let candidate = match parse_line(trimmed) {
                Ok(candidate) => candidate,
                Err(err) => {
                    self.skipped += 1;
                    warn!(
                        path = %self.path.display(),
                        line = line_no,
                        error = %err,
                        "Skipping invalid candidate row"
                    );
                    continue;
                }
            };

            offered += 1;
            if !sink.offer(candidate).await?.keep_going() {
                break;
            }
        }

        info!(
            path = %self.path.display(),
            offered,
            skipped = self.skipped,
            "Candidate file finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::inbound::producer::Offer;
    use parking_lot::Mutex;
    use std::io::Write;

    #[derive(Default)]
    struct CollectingSink {
        names: Mutex<Vec<String>>,
        capacity: Option<usize>,
    }

    #[async_trait]
    impl CandidateSink for CollectingSink {
        async fn offer(&self, candidate: Candidate) -> Result<Offer> {
            let mut names = self.names.lock();
            if self.capacity.is_some_and(|cap| names.len() >= cap) {
                return Ok(Offer::Refused);
            }
            names.push(candidate.name().to_string());
            Ok(Offer::Accepted)
        }
    }

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const ROWS: &str = r#"
# exported candidates
{"name": "AK-47 | Redline", "quality": "FT", "buff_url": "b/1", "steam_url": "s/1"}
{"name": "", "buff_locator": "b/2", "steam_locator": "s/2"}
not json
{"name": "AWP | Asiimov", "stattrak": true, "buff_locator": "b/3", "steam_locator": "s/3"}
"#;

    #[tokio::test]
    async fn streams_valid_rows_and_skips_invalid_ones() {
        let file = write_file(ROWS);
        let sink = CollectingSink::default();
        let mut producer = CandidateFile::new(file.path());

        producer.produce(&sink).await.unwrap();

        assert_eq!(*sink.names.lock(), ["AK-47 | Redline", "AWP | Asiimov"]);
        assert_eq!(producer.skipped(), 2);
    }

    #[tokio::test]
    async fn stops_when_the_sink_refuses() {
        let file = write_file(ROWS);
        let sink = CollectingSink {
            capacity: Some(1),
            ..CollectingSink::default()
        };

        CandidateFile::new(file.path()).produce(&sink).await.unwrap();
        assert_eq!(sink.names.lock().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut producer = CandidateFile::new(dir.path().join("absent.jsonl"));
        let result = producer.produce(&CollectingSink::default()).await;
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
