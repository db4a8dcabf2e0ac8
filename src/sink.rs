//! Persistence collaborator adapters for awards and session summaries.
//!
//! The monitor never writes anything itself; callers subscribe to its events
//! and forward the values they care about to a sink.

use crate::{rewards::ExperienceAward, session::SessionSummary, Result};
use serde::Serialize;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
    sync::Mutex,
};

/// Destination for awards and session summaries
pub trait AwardSink: Send + Sync {
    /// Persist one award
    fn record_award(&self, award: &ExperienceAward) -> Result<()>;

    /// Persist one session summary
    fn record_session(&self, summary: &SessionSummary) -> Result<()>;
}

/// Keeps everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    awards: Mutex<Vec<ExperienceAward>>,
    sessions: Mutex<Vec<SessionSummary>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards recorded so far
    #[must_use]
    pub fn awards(&self) -> Vec<ExperienceAward> {
        self.awards.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Session summaries recorded so far
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Sum of recorded award points
    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.awards().iter().map(|a| u64::from(a.points)).sum()
    }
}

impl AwardSink for MemorySink {
    fn record_award(&self, award: &ExperienceAward) -> Result<()> {
        self.awards
            .lock()
            .map_err(|_| crate::Error::IoError("memory sink award lock poisoned".to_string()))?
            .push(award.clone());
        Ok(())
    }

    fn record_session(&self, summary: &SessionSummary) -> Result<()> {
        self.sessions
            .lock()
            .map_err(|_| crate::Error::IoError("memory sink session lock poisoned".to_string()))?
            .push(summary.clone());
        Ok(())
    }
}

/// One JSON object per line, appended to a file
#[derive(Debug)]
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record<'a> {
    Award(&'a ExperienceAward),
    Session(&'a SessionSummary),
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn append(&self, record: &Record<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| crate::Error::IoError("award sink lock poisoned".to_string()))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl AwardSink for JsonLinesSink {
    fn record_award(&self, award: &ExperienceAward) -> Result<()> {
        self.append(&Record::Award(award))
    }

    fn record_session(&self, summary: &SessionSummary) -> Result<()> {
        self.append(&Record::Session(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::AwardReason;

    #[test]
    fn test_memory_sink_totals() {
        let sink = MemorySink::new();
        sink.record_award(&ExperienceAward::new(2, AwardReason::EyeRest { closed_seconds: 3 }))
            .unwrap();
        sink.record_award(&ExperienceAward::new(4, AwardReason::EyeRest { closed_seconds: 6 }))
            .unwrap();
        assert_eq!(sink.awards().len(), 2);
        assert_eq!(sink.total_points(), 6);
        assert!(sink.sessions().is_empty());
    }

    #[test]
    fn test_memory_sink_reports_poisoned_lock() {
        let sink = MemorySink::new();
        std::thread::scope(|scope| {
            let poisoned = scope
                .spawn(|| {
                    let _awards = sink.awards.lock().unwrap();
                    panic!("writer died holding the lock");
                })
                .join();
            assert!(poisoned.is_err());
        });

        let result = sink.record_award(&ExperienceAward::new(2, AwardReason::EyeRest { closed_seconds: 3 }));
        assert!(matches!(result, Err(crate::Error::IoError(_))));
        assert!(sink.awards().is_empty());
    }

    #[test]
    fn test_json_lines_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("awards.jsonl");
        {
            let sink = JsonLinesSink::open(&path).unwrap();
            sink.record_award(&ExperienceAward::new(2, AwardReason::EyeRest { closed_seconds: 3 }))
                .unwrap();
        }
        {
            let sink = JsonLinesSink::open(&path).unwrap();
            sink.record_award(&ExperienceAward::new(4, AwardReason::EyeRest { closed_seconds: 7 }))
                .unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["record"], "award");
        assert_eq!(lines[1]["points"], 4);
    }
}
