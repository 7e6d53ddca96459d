//! JSON-lines event source.
//!
//! One [`EventRecord`] per line; blank lines are skipped. A chain is an
//! ordered list of such files, scanned front to back.

use anyhow::{Context, Result};
use bm_core::EventRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Iterator over the events of one file.
pub struct EventFileReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl EventFileReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), lines: BufReader::new(file).lines(), line_no: 0 })
    }
}

impl Iterator for EventFileReader {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    let err = anyhow::Error::new(e)
                        .context(format!("failed to read {}", self.path.display()));
                    return Some(Err(err));
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let parsed = serde_json::from_str::<EventRecord>(&line).with_context(|| {
                format!("{}:{}: invalid event record", self.path.display(), self.line_no)
            });
            return Some(parsed);
        }
    }
}

/// Ordered list of event files.
#[derive(Debug, Clone, Default)]
pub struct EventChain {
    files: Vec<PathBuf>,
}

impl EventChain {
    /// Build a chain; a directory contributes its `*.jsonl` files in name order.
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut files = Vec::new();
        for p in paths {
            if p.is_dir() {
                let mut entries: Vec<PathBuf> = std::fs::read_dir(p)
                    .with_context(|| format!("failed to list {}", p.display()))?
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|e| e.is_file() && e.extension().is_some_and(|x| x == "jsonl"))
                    .collect();
                entries.sort();
                if entries.is_empty() {
                    tracing::warn!(dir = %p.display(), "no .jsonl files in input directory");
                }
                files.extend(entries);
            } else {
                files.push(p.clone());
            }
        }
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_dir(name: &str) -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let mut p = std::env::temp_dir();
        p.push(format!("babymaker_src_{}_{}_{}", std::process::id(), nanos, name));
        std::fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let dir = tmp_dir("read");
        let path = dir.join("a.jsonl");
        std::fs::write(
            &path,
            "{\"run\": 1, \"event\": 10, \"lumi\": 2}\n\n   \n{\"run\": 1, \"event\": 11, \"lumi\": 2}\n",
        )
        .unwrap();
        let events: Vec<EventRecord> =
            EventFileReader::open(&path).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(events.iter().map(|e| e.event).collect::<Vec<_>>(), vec![10, 11]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_error_names_file_and_line() {
        let dir = tmp_dir("bad");
        let path = dir.join("bad.jsonl");
        std::fs::write(&path, "{\"run\": 1, \"event\": 10, \"lumi\": 2}\n\n{\"run\": \"x\"}\n")
            .unwrap();
        let mut reader = EventFileReader::open(&path).unwrap();
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(format!("{err}").contains("bad.jsonl:3"), "{err}");
        assert!(reader.next().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_expands_to_sorted_jsonl_files() {
        let dir = tmp_dir("chain");
        for name in ["b.jsonl", "a.jsonl", "notes.txt"] {
            std::fs::write(dir.join(name), "").unwrap();
        }
        let extra = dir.join("notes.txt");
        let chain = EventChain::from_paths(&[dir.clone(), extra.clone()]).unwrap();
        assert_eq!(chain.files(), &[dir.join("a.jsonl"), dir.join("b.jsonl"), extra]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_fails_on_open() {
        assert!(EventFileReader::open(Path::new("/nonexistent/events.jsonl")).is_err());
    }
}
