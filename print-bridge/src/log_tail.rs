//! Bounded tail of the operational log

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lines returned when the caller gives no usable count
pub const DEFAULT_TAIL_LINES: usize = 200;

/// Upper bound for a single tail request
pub const MAX_TAIL_LINES: usize = 5000;

/// Normalize a requested line count: absent, unparsable or non-positive
/// falls back to the default, large values are capped.
pub fn clamp_lines(requested: Option<&str>) -> usize {
    requested
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| usize::try_from(n).unwrap_or(MAX_TAIL_LINES).min(MAX_TAIL_LINES))
        .unwrap_or(DEFAULT_TAIL_LINES)
}

/// Last `max_lines` lines of `path`, oldest first.
///
/// The file is read start to end keeping only a ring of the newest lines.
/// Std opens files with read, write and delete sharing on Windows, so the
/// appending writer is never blocked. A missing file yields no lines.
pub fn tail(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    if max_lines == 0 {
        return Ok(Vec::new());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut reader = BufReader::new(file);
    let mut ring: VecDeque<String> = VecDeque::with_capacity(max_lines.min(1024));
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        if ring.len() == max_lines {
            ring.pop_front();
        }
        ring.push_back(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(ring.into())
}
