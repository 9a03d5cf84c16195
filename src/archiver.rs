use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::ScrapedRecord;

/// Name of the completion log inside the archive directory.
const LOG_FILE: &str = "processed_ids.txt";

/// Append-only log of identifiers whose artifacts are safely on disk.
///
/// The handle stays open for the whole run. Every append is flushed to
/// stable storage before `record` returns, so an identifier is never
/// marked complete ahead of its bytes.
pub struct CompletionLog {
    file: File,
    done: HashSet<String>,
}

impl CompletionLog {
    /// Open the log and load any existing entries. A missing file is a
    /// fresh start, not an error.
    pub fn open(path: &Path) -> Result<Self> {
        let done = match File::open(path) {
            Ok(f) => BufReader::new(f)
                .lines()
                .collect::<std::io::Result<Vec<_>>>()?
                .into_iter()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file, done })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.done.contains(id)
    }

    /// Append `id` and sync it to disk. Call only once the artifact for
    /// `id` is durably written.
    pub fn record(&mut self, id: &str) -> Result<()> {
        writeln!(self.file, "{id}")?;
        self.file.sync_data()?;
        self.done.insert(id.to_string());
        Ok(())
    }
}

/// The output directory together with the completion log that makes
/// reruns resumable.
pub struct Archive {
    data_dir: PathBuf,
    log: CompletionLog,
}

impl Archive {
    /// Create the directory if needed and open its completion log.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let log = CompletionLog::open(&data_dir.join(LOG_FILE))?;
        Ok(Self { data_dir, log })
    }

    /// Whether `id` already has a recorded artifact.
    pub fn is_complete(&self, id: &str) -> bool {
        self.log.contains(id)
    }

    /// Path of the JSON artifact for `id`.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.json"))
    }

    /// Write the artifact for `record`, then mark its id complete. The
    /// log entry goes in strictly after the artifact reaches disk;
    /// re-saving an unrecorded id overwrites whatever is there.
    pub fn save(&mut self, record: &ScrapedRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.id);
        let json = serde_json::to_string_pretty(record)?;
        let mut file = File::create(&path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        self.log.record(&record.id)?;
        Ok(path)
    }
}
