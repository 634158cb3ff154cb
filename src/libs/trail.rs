//! Opt-in debug trail for binding, build and transport events.
//!
//! Enabled with `DEBUG_LOGS=true`. Each line is stamped and appended to one
//! file per UTC day, `logs/trail_<yyyy-mm-dd>.log`; disabled, every call is a
//! no-op. A trail that cannot be written warns on stderr and never fails the
//! caller.
use std::fs::{create_dir_all, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::constants::{DEBUG_LOGS, LOG_DIR};

pub fn save_log_to_file(line: &str) {
    if !*DEBUG_LOGS {
        return;
    }
    if let Err(e) = append_to_trail(Path::new(LOG_DIR), Utc::now(), line) {
        crate::warn!("debug trail unavailable: {}", e);
    }
}

fn trail_file(dir: &Path, at: DateTime<Utc>) -> PathBuf {
    dir.join(format!("trail_{}.log", at.format("%Y-%m-%d")))
}

fn append_to_trail(dir: &Path, at: DateTime<Utc>, line: &str) -> io::Result<PathBuf> {
    create_dir_all(dir)?;
    let path = trail_file(dir, at);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{} {line}", at.format("%H:%M:%S%.3f"))?;
    Ok(path)
}

/// First `max` characters of `s`, for keeping RPC payloads readable in logs.
pub fn trim_chars(s: &str, max: usize) -> String {
    let mut out: String = s.chars().take(max).collect();
    if s.chars().nth(max).is_some() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn trims_long_payloads() {
        assert_eq!(trim_chars("", 4), "");
        assert_eq!(trim_chars("abc", 4), "abc");
        assert_eq!(trim_chars("abcdef", 4), "abcd…");
    }

    #[test]
    fn lines_of_one_day_share_a_file() {
        let dir = std::env::temp_dir().join(format!("w3mod-trail-{}", std::process::id()));
        let morning = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 0).unwrap();

        let first = append_to_trail(&dir, morning, "[registry] built root").unwrap();
        let second = append_to_trail(&dir, evening, "[http] -> #1 eth_chainId").unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("trail_2024-05-01.log"));

        let written = std::fs::read_to_string(&first).unwrap();
        assert_eq!(
            written,
            "08:00:00.000 [registry] built root\n20:30:00.000 [http] -> #1 eth_chainId\n"
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
