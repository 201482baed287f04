use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

/// Reads the time of the last successful sync. A missing file means this is
/// the first run, which looks back `lookback_hours` from `now`. A file that
/// exists but does not hold an RFC 3339 timestamp is an error.
pub fn load(path: &Path, now: DateTime<Utc>, lookback_hours: i64) -> Result<DateTime<Utc>> {
    let first_run = look_back(now, lookback_hours)?;
    let raw = match fs::read_to_string(path) {
        Ok(x) => x,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(first_run),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read cursor {}", path.display()))
        }
    };

    let at = DateTime::parse_from_rfc3339(raw.trim()).with_context(|| {
        format!(
            "Cursor {} does not hold a timestamp: {:?}",
            path.display(),
            raw.trim()
        )
    })?;
    Ok(at.with_timezone(&Utc))
}

/// `now` minus `hours`, rejecting negative or unrepresentable spans.
fn look_back(now: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    if hours < 0 {
        bail!("Lookback must not be negative, got {hours} hours");
    }
    TimeDelta::try_hours(hours)
        .and_then(|x| now.checked_sub_signed(x))
        .with_context(|| format!("Lookback of {hours} hours is out of range"))
}

pub fn save(path: &Path, at: DateTime<Utc>) -> Result<()> {
    let mut contents = at.to_rfc3339_opts(SecondsFormat::Secs, true);
    contents.push('\n');
    fs::write(path, contents).with_context(|| format!("Failed to write cursor {}", path.display()))
}
