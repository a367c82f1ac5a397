//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes to stderr and to one
//! log file per day, keeping only the newest `MAX_LOG_FILES` files. The most
//! recent lines are also held in an in-memory ring so the app can show them
//! without touching the disk.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{Local, NaiveDate};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Number of dated log files kept on disk
pub const MAX_LOG_FILES: usize = 7;
/// Number of formatted lines kept in memory
pub const RING_CAPACITY: usize = 500;

static RING: OnceLock<Arc<Mutex<LineRing>>> = OnceLock::new();
static INSTALLED: OnceLock<PathBuf> = OnceLock::new();

/// Fixed-capacity buffer of log lines, oldest evicted first
#[derive(Debug)]
pub struct LineRing {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LineRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Newest `n` lines, oldest first
    pub fn newest(&self, n: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A log file that switches to a new dated file when the day changes
#[derive(Debug)]
pub struct RollingFile {
    dir: PathBuf,
    prefix: String,
    date: NaiveDate,
    file: File,
}

impl RollingFile {
    pub fn open(dir: &Path, prefix: &str, date: NaiveDate) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let file = open_append(&dir.join(log_file_name(prefix, date)))?;
        prune_old_logs(dir, prefix, MAX_LOG_FILES)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            date,
            file,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(log_file_name(&self.prefix, self.date))
    }

    /// Switch to `today`'s file if the current one belongs to another day
    pub fn roll_to(&mut self, today: NaiveDate) -> io::Result<()> {
        if today == self.date {
            return Ok(());
        }
        self.file.flush()?;
        self.file = open_append(&self.dir.join(log_file_name(&self.prefix, today)))?;
        self.date = today;
        prune_old_logs(&self.dir, &self.prefix, MAX_LOG_FILES)?;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// `<prefix>_<YYYY-MM-DD>.log`
pub fn log_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.log", prefix, date.format("%Y-%m-%d"))
}

/// Delete the oldest `<prefix>_*.log` files so that at most `keep` remain.
/// Returns the removed paths.
pub fn prune_old_logs(dir: &Path, prefix: &str, keep: usize) -> io::Result<Vec<PathBuf>> {
    let head = format!("{}_", prefix);
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&head) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // ISO dates sort lexicographically
    logs.sort();

    let excess = logs.len().saturating_sub(keep);
    let mut removed = Vec::with_capacity(excess);
    for path in logs.into_iter().take(excess) {
        fs::remove_file(&path)?;
        removed.push(path);
    }
    Ok(removed)
}

/// Writer handed to the file layer; every event goes to the file and the ring
#[derive(Clone)]
struct SharedWriter {
    file: Arc<Mutex<RollingFile>>,
    ring: Arc<Mutex<LineRing>>,
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let mut file = self
                .file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?;
            file.roll_to(Local::now().date_naive())?;
            file.write_all(buf)?;
        }

        if let Ok(mut ring) = self.ring.lock() {
            for line in String::from_utf8_lossy(buf).lines() {
                if !line.trim().is_empty() {
                    ring.push(line.trim_end().to_string());
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn ring() -> Arc<Mutex<LineRing>> {
    RING.get_or_init(|| Arc::new(Mutex::new(LineRing::new(RING_CAPACITY))))
        .clone()
}

/// Install the global subscriber. Fails if the log directory cannot be
/// created or a subscriber is already installed.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    let file = RollingFile::open(&log_dir, app_name, Local::now().date_naive())
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;

    let writer = SharedWriter {
        file: Arc::new(Mutex::new(file)),
        ring: ring(),
    };

    tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    let _ = INSTALLED.set(log_dir);
    Ok(())
}

/// Newest `n` lines written since startup
pub fn recent_lines(n: usize) -> Vec<String> {
    match RING.get() {
        Some(ring) => ring.lock().map(|r| r.newest(n)).unwrap_or_default(),
        None => Vec::new(),
    }
}

fn ensure_installed(msg: &str) -> Result<(), String> {
    if INSTALLED.get().is_none() {
        eprintln!("{}", msg);
        return Err("Logger not initialized".to_string());
    }
    Ok(())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_installed(msg)?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_installed(msg)?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_installed(msg)?;
    tracing::error!("{}", msg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut ring = LineRing::new(3);
        for i in 0..5 {
            ring.push(format!("line {}", i));
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.newest(2), vec!["line 3", "line 4"]);
        assert_eq!(ring.newest(10), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(log_file_name("SlideTodo", day(9)), "SlideTodo_2026-03-09.log");
    }

    #[test]
    fn test_prune_keeps_newest() {
        let dir = TempDir::new().unwrap();
        for d in 1..=5 {
            fs::write(dir.path().join(log_file_name("App", day(d))), "x").unwrap();
        }
        fs::write(dir.path().join("Other_2026-03-01.log"), "x").unwrap();

        let removed = prune_old_logs(dir.path(), "App", 2).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(dir.path().join(log_file_name("App", day(4))).exists());
        assert!(dir.path().join(log_file_name("App", day(5))).exists());
        assert!(!dir.path().join(log_file_name("App", day(1))).exists());
        assert!(dir.path().join("Other_2026-03-01.log").exists());
    }

    #[test]
    fn test_roll_switches_file() {
        let dir = TempDir::new().unwrap();
        let mut file = RollingFile::open(dir.path(), "App", day(1)).unwrap();
        file.write_all(b"first\n").unwrap();
        file.roll_to(day(2)).unwrap();
        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();

        let first = fs::read_to_string(dir.path().join(log_file_name("App", day(1)))).unwrap();
        let second = fs::read_to_string(file.path()).unwrap();
        assert_eq!(first, "first\n");
        assert_eq!(second, "second\n");
    }

    #[test]
    fn test_writer_feeds_ring() {
        let dir = TempDir::new().unwrap();
        let file = RollingFile::open(dir.path(), "App", Local::now().date_naive()).unwrap();
        let ring = Arc::new(Mutex::new(LineRing::new(10)));
        let mut writer = SharedWriter {
            file: Arc::new(Mutex::new(file)),
            ring: ring.clone(),
        };

        writer.write_all(b"INFO one\nINFO two\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(ring.lock().unwrap().newest(5), vec!["INFO one", "INFO two"]);
    }
}
