//! Rotating file writer
//!
//! Files are named by formatting a strftime pattern at the start of the
//! current time bucket (`/var/log/app/%Y-%m-%d.log`). Buckets are aligned to
//! the local wall clock, so a daily file starts at local midnight. Inside one bucket a
//! size rotation moves on to `name.1`, `name.2`, ... After every newly opened
//! file, matching old files are purged by count or by age.

use crate::core::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Offset, TimeZone};
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const DEFAULT_ROTATION_TIME: Duration = Duration::from_secs(24 * 3600);
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600);

/// Rotation and retention settings
///
/// # Examples
///
/// ```
/// use request_logger::appenders::RotationOptions;
/// use std::time::Duration;
///
/// let options = RotationOptions::new()
///     .with_rotation_size(64 * 1024 * 1024)
///     .with_rotation_time(Duration::from_secs(3600))
///     .with_rotation_count(24);
/// assert!(options.buffered);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationOptions {
    /// Rotate once the active file reaches this many bytes; 0 disables
    pub rotation_size: u64,
    /// Files kept including the active one; 0 means unlimited (age applies)
    pub rotation_count: usize,
    /// Length of one time bucket
    pub rotation_time: Duration,
    /// Age after which files are purged when `rotation_count` is 0
    pub max_age: Duration,
    /// Buffer writes in memory; unbuffered writes hit the file every call
    pub buffered: bool,
    /// Never append to a file that already exists when opening
    pub force_new_file: bool,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            rotation_size: 0,
            rotation_count: 0,
            rotation_time: DEFAULT_ROTATION_TIME,
            max_age: DEFAULT_MAX_AGE,
            buffered: true,
            force_new_file: false,
        }
    }
}

impl RotationOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation_size(mut self, bytes: u64) -> Self {
        self.rotation_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation_count(mut self, count: usize) -> Self {
        self.rotation_count = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation_time(mut self, interval: Duration) -> Self {
        self.rotation_time = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_force_new_file(mut self, force: bool) -> Self {
        self.force_new_file = force;
        self
    }
}

enum FileSink {
    Buffered(BufWriter<File>),
    Direct(File),
}

impl FileSink {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            FileSink::Buffered(w) => w.write_all(buf),
            FileSink::Direct(f) => f.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileSink::Buffered(w) => w.flush(),
            FileSink::Direct(f) => f.flush(),
        }
    }
}

struct ActiveFile {
    sink: FileSink,
    path: PathBuf,
    generation: u32,
    size: u64,
    bucket: i64,
}

/// A `Write` destination that rotates by time bucket and by size.
///
/// Safe to share between threads: every `write` call takes an internal
/// lock, so one call is never interleaved with another.
pub struct RotatingFileWriter {
    pattern: String,
    options: RotationOptions,
    state: Mutex<Option<ActiveFile>>,
}

impl RotatingFileWriter {
    /// Validate `pattern`, create parent directories and open the first file.
    pub fn new(pattern: impl Into<String>, options: RotationOptions) -> Result<Self> {
        let pattern = pattern.into();

        if pattern.is_empty() {
            return Err(LoggerError::config("rotating_file", "path pattern is empty"));
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "rotating_file",
                format!("invalid strftime pattern '{}'", pattern),
            ));
        }
        if options.rotation_time.as_secs() == 0 {
            return Err(LoggerError::config(
                "rotating_file",
                "rotation time must be at least one second",
            ));
        }

        let writer = Self {
            pattern,
            options,
            state: Mutex::new(None),
        };

        let bucket = writer.bucket_at(&Local::now());
        let active = writer.open_bucket(bucket, 0, writer.options.force_new_file)?;
        writer.purge(&active.path);
        *writer.state.lock() = Some(active);

        Ok(writer)
    }

    pub fn options(&self) -> &RotationOptions {
        &self.options
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> Option<PathBuf> {
        self.state.lock().as_ref().map(|active| active.path.clone())
    }

    /// Bytes written to the current file, including what it held when opened
    pub fn current_size(&self) -> u64 {
        self.state.lock().as_ref().map_or(0, |active| active.size)
    }

    fn rotation_secs(&self) -> i64 {
        self.options.rotation_time.as_secs() as i64
    }

    /// Index of the bucket holding `now`, counted in local wall-clock seconds
    fn bucket_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i64 {
        let wall = now.timestamp() + i64::from(now.offset().fix().local_minus_utc());
        wall.div_euclid(self.rotation_secs())
    }

    /// Wall-clock start of `bucket` in `tz`
    ///
    /// A start that falls into a DST gap moves forward by one hour.
    fn bucket_start<Tz: TimeZone>(&self, tz: &Tz, bucket: i64) -> Option<DateTime<Tz>> {
        let wall = bucket.saturating_mul(self.rotation_secs());
        let naive = DateTime::from_timestamp(wall, 0)?.naive_utc();
        tz.from_local_datetime(&naive).earliest().or_else(|| {
            tz.from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
    }

    fn bucket_path(&self, bucket: i64) -> Result<PathBuf> {
        let start = self.bucket_start(&Local, bucket).unwrap_or_else(Local::now);

        let mut formatted = String::with_capacity(self.pattern.len() + 16);
        write!(formatted, "{}", start.format(&self.pattern)).map_err(|_| {
            LoggerError::config(
                "rotating_file",
                format!("cannot format path pattern '{}'", self.pattern),
            )
        })?;
        Ok(PathBuf::from(formatted))
    }

    fn open_bucket(&self, bucket: i64, first_generation: u32, force_new: bool) -> Result<ActiveFile> {
        let base = self.bucket_path(bucket)?;

        if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LoggerError::create_dir(parent, e))?;
        }

        let mut generation = first_generation;
        let mut path = generation_path(&base, generation);
        if force_new {
            while path.exists() {
                generation += 1;
                path = generation_path(&base, generation);
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::open_file(&path, e))?;

        let size = file
            .metadata()
            .map_err(|e| LoggerError::open_file(&path, e))?
            .len();

        let sink = if self.options.buffered {
            FileSink::Buffered(BufWriter::new(file))
        } else {
            FileSink::Direct(file)
        };

        Ok(ActiveFile {
            sink,
            path,
            generation,
            size,
            bucket,
        })
    }

    fn should_rotate(&self, active: &ActiveFile, bucket: i64) -> bool {
        active.bucket != bucket
            || (self.options.rotation_size > 0 && active.size >= self.options.rotation_size)
    }

    fn rotate(&self, state: &mut Option<ActiveFile>, bucket: i64) -> Result<()> {
        let next = match state.take() {
            Some(mut old) => {
                old.sink
                    .flush()
                    .map_err(|e| LoggerError::rotation(&old.path, e))?;
                if old.bucket == bucket {
                    self.open_bucket(bucket, old.generation + 1, true)?
                } else {
                    self.open_bucket(bucket, 0, self.options.force_new_file)?
                }
            }
            None => self.open_bucket(bucket, 0, self.options.force_new_file)?,
        };

        self.purge(&next.path);
        *state = Some(next);
        Ok(())
    }

    fn write_locked(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        let bucket = self.bucket_at(&Local::now());

        let needs_rotation = state
            .as_ref()
            .map_or(true, |active| self.should_rotate(active, bucket));
        if needs_rotation {
            self.rotate(&mut state, bucket)
                .map_err(io::Error::other)?;
        }

        let active = state
            .as_mut()
            .ok_or_else(|| io::Error::other("no active log file"))?;
        active.sink.write_all(buf)?;
        active.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush_locked(&self) -> io::Result<()> {
        match self.state.lock().as_mut() {
            Some(active) => active.sink.flush(),
            None => Ok(()),
        }
    }

    /// Remove old files matching the pattern, never touching `active`.
    fn purge(&self, active: &Path) {
        let Some(dir) = active.parent() else {
            return;
        };
        let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };

        let Some(name_pattern) = Path::new(&self.pattern).file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let pieces = literal_pieces(name_pattern);

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("[LOGGER WARNING] Failed to scan '{}' for purge: {}", dir.display(), e);
                return;
            }
        };

        let mut candidates: Vec<(SystemTime, u32, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                let name = path.file_name()?.to_str()?.to_string();
                let (stem, generation) = split_generation(&name);
                if path.as_path() == active || !wildcard_match(&pieces, stem) {
                    return None;
                }
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((modified, generation, path))
            })
            .collect();

        let doomed: Vec<PathBuf> = if self.options.rotation_count > 0 {
            candidates.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
            let keep = self.options.rotation_count.saturating_sub(1);
            candidates.into_iter().skip(keep).map(|c| c.2).collect()
        } else if !self.options.max_age.is_zero() {
            let cutoff = SystemTime::now()
                .checked_sub(self.options.max_age)
                .unwrap_or(SystemTime::UNIX_EPOCH);
            candidates
                .into_iter()
                .filter(|c| c.0 < cutoff)
                .map(|c| c.2)
                .collect()
        } else {
            Vec::new()
        };

        for path in doomed {
            if let Err(e) = fs::remove_file(&path) {
                eprintln!("[LOGGER WARNING] Failed to purge old log {}: {}", path.display(), e);
            }
        }
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_locked(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_locked()
    }
}

impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_locked(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_locked()
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Some(active) = self.state.get_mut().as_mut() {
            if let Err(e) = active.sink.flush() {
                eprintln!(
                    "[LOGGER ERROR] Failed to flush {} on close: {}",
                    active.path.display(),
                    e
                );
            }
        }
    }
}

fn generation_path(base: &Path, generation: u32) -> PathBuf {
    if generation == 0 {
        return base.to_path_buf();
    }
    let mut name = base.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}", generation));
    base.with_file_name(name)
}

/// `app.log.3` -> (`app.log`, 3); names without a numeric suffix are generation 0
fn split_generation(name: &str) -> (&str, u32) {
    if let Some((stem, suffix)) = name.rsplit_once('.') {
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(generation) = suffix.parse() {
                return (stem, generation);
            }
        }
    }
    (name, 0)
}

/// Literal text between strftime specifiers; each gap is a wildcard.
fn literal_pieces(pattern: &str) -> Vec<String> {
    let mut pieces = vec![String::new()];
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            if let Some(last) = pieces.last_mut() {
                last.push(c);
            }
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            if let Some(last) = pieces.last_mut() {
                last.push('%');
            }
            continue;
        }
        // padding / precision modifiers: %-d, %_H, %.3f, %:z
        while let Some(&m) = chars.peek() {
            if matches!(m, '-' | '_' | '0' | '^' | '#' | '.' | ':') || m.is_ascii_digit() {
                chars.next();
            } else {
                break;
            }
        }
        chars.next();
        pieces.push(String::new());
    }

    pieces
}

fn wildcard_match(pieces: &[String], name: &str) -> bool {
    match pieces {
        [] => name.is_empty(),
        [only] => name == only,
        [first, middle @ .., last] => {
            if name.len() < first.len() + last.len()
                || !name.starts_with(first.as_str())
                || !name.ends_with(last.as_str())
            {
                return false;
            }
            let mut rest = &name[first.len()..name.len() - last.len()];
            for piece in middle {
                match rest.find(piece.as_str()) {
                    Some(at) => rest = &rest[at + piece.len()..],
                    None => return false,
                }
            }
            true
        }
    }
}
