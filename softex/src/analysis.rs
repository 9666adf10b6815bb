//! Memory bandwidth analysis of a waveform trace.
//!
//! Measures how long a request signal stays high, over the whole trace and per tile. A tile is a
//! burst of activity; two tiles are separated by a low gap longer than a threshold.

use std::fmt;
use std::io::{self, BufRead};

use itertools::Itertools;
use thiserror::Error;

/// Default low gap separating two tiles.
pub const DEFAULT_GAP: u64 = 1_000_000;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read the trace: {0}")]
    Io(#[from] io::Error),

    #[error("signal `{0}` is not declared in the trace")]
    SignalNotFound(String),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Activity of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileUsage {
    /// First rise of the tile.
    pub start: u64,
    /// Last fall of the tile.
    pub end: u64,
    /// Time spent high within the tile.
    pub up_time: u64,
}

impl TileUsage {
    /// Span of the tile.
    pub fn span(&self) -> u64 { self.end - self.start }

    /// Fraction of the span spent high.
    pub fn usage(&self) -> f64 { ratio(self.up_time, self.span()) }
}

/// Bandwidth figures of one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthReport {
    pub start_time: u64,
    pub end_time: u64,
    pub up_time: u64,
    /// Number of value changes of the signal.
    pub num_values: u64,
    pub tiles: Vec<TileUsage>,
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl BandwidthReport {
    pub fn total_time(&self) -> u64 { self.end_time.saturating_sub(self.start_time) }

    pub fn down_time(&self) -> u64 { self.total_time().saturating_sub(self.up_time) }

    /// Fraction of the whole trace spent high.
    pub fn mem_usage(&self) -> f64 { ratio(self.up_time, self.total_time()) }

    /// Fraction of the time inside tiles spent high.
    pub fn active_usage(&self) -> f64 { ratio(self.up_time, self.tiles.iter().map(TileUsage::span).sum()) }

    /// Fraction of the time from the first tile to the last one spent high.
    pub fn usage_with_gaps(&self) -> f64 {
        match (self.tiles.first(), self.tiles.last()) {
            (Some(first), Some(last)) => ratio(self.up_time, last.end - first.start),
            _ => 0.0,
        }
    }

    /// Warns when the number of tiles differs from `expected`. Returns whether they match.
    pub fn check_tiles(&self, expected: usize) -> bool {
        if self.tiles.len() != expected {
            log::warn!("found {} tiles, expected {}", self.tiles.len(), expected);
            return false;
        }
        true
    }
}

impl fmt::Display for BandwidthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "up time: {}", self.up_time)?;
        writeln!(f, "down time: {}", self.down_time())?;
        writeln!(f, "start time: {}", self.start_time)?;
        writeln!(f, "end time: {}", self.end_time)?;
        writeln!(f, "total time: {}", self.total_time())?;
        writeln!(f, "mem usage: {:.6}", self.mem_usage())?;
        writeln!(f, "num values: {}", self.num_values)?;
        for (i, tile) in self.tiles.iter().enumerate() {
            writeln!(f, "tile {}: {}..{} usage: {:.6}", i, tile.start, tile.end, tile.usage())?;
        }
        writeln!(f, "active usage: {:.6}", self.active_usage())?;
        write!(f, "usage with gaps: {:.6}", self.usage_with_gaps())
    }
}

/// Finds the identifier code of `signal`, given either as `name` or as `scope.name`.
fn find_code(lines: &mut impl Iterator<Item = (usize, io::Result<String>)>, signal: &str) -> Result<String, AnalysisError> {
    let mut scopes = Vec::new();
    let mut code = None;

    for (_, line) in lines {
        let line = line?;
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        match tokens.as_slice() {
            ["$scope", _, name, ..] => scopes.push(name.to_string()),
            ["$upscope", ..] => {
                let _ = scopes.pop();
            }
            ["$var", _, _, id, name, ..] => {
                let path = scopes.iter().map(String::as_str).chain(std::iter::once(*name)).join(".");
                if code.is_none() && (*name == signal || path == signal || path.ends_with(&format!(".{signal}"))) {
                    code = Some(id.to_string());
                }
            }
            ["$enddefinitions", ..] => break,
            _ => {}
        }
    }

    code.ok_or_else(|| AnalysisError::SignalNotFound(signal.to_string()))
}

/// Value change of `code` on `line`, if any. Returns whether the new value is high.
fn value_change(line: &str, code: &str) -> Option<bool> {
    let (value, id) = match line.strip_prefix(['b', 'B', 'r', 'R']) {
        Some(rest) => rest.split_once(' ').map(|(value, id)| (value, id.trim()))?,
        None => {
            let mut chars = line.chars();
            let value = chars.next()?;
            if !matches!(value, '0' | '1' | 'x' | 'X' | 'z' | 'Z') {
                return None;
            }
            (&line[..value.len_utf8()], chars.as_str())
        }
    };
    (id == code).then(|| value.contains('1'))
}

/// Measures the high time of `signal` in the trace read from `reader`.
pub fn analyze<R: BufRead>(reader: R, signal: &str, gap: u64) -> Result<BandwidthReport, AnalysisError> {
    let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));
    let code = find_code(&mut lines, signal)?;

    let mut start_time = None;
    let mut time = 0;
    let mut num_values = 0;
    let mut rise = None;
    let mut intervals = Vec::<(u64, u64)>::new();

    for (number, line) in lines {
        let line = line?;
        let line = line.trim();
        if let Some(stamp) = line.strip_prefix('#') {
            let stamp = stamp
                .trim()
                .parse::<u64>()
                .map_err(|e| AnalysisError::Malformed { line: number, reason: format!("bad timestamp: {e}") })?;
            if start_time.is_some() && stamp < time {
                return Err(AnalysisError::Malformed {
                    line: number,
                    reason: format!("timestamp {stamp} goes back from {time}"),
                });
            }
            time = stamp;
            if start_time.is_none() {
                start_time = Some(time);
                // Values dumped before the first timestamp take effect at it.
                if rise.is_some() {
                    rise = Some(time);
                }
            }
            continue;
        }

        let Some(high) = value_change(line, &code) else { continue };
        num_values += 1;
        if start_time.is_none() {
            rise = high.then_some(time);
            continue;
        }
        match (rise, high) {
            (None, true) => rise = Some(time),
            (Some(at), false) => {
                intervals.push((at, time));
                rise = None;
            }
            _ => {}
        }
    }

    let end_time = time;
    if let Some(at) = rise {
        intervals.push((at, end_time));
    }

    let mut tiles = Vec::<TileUsage>::new();
    for (up, down) in intervals {
        match tiles.last_mut() {
            Some(tile) if up - tile.end <= gap => {
                tile.end = down;
                tile.up_time += down - up;
            }
            _ => tiles.push(TileUsage { start: up, end: down, up_time: down - up }),
        }
    }

    Ok(BandwidthReport {
        start_time: start_time.unwrap_or(0),
        end_time,
        up_time: tiles.iter().map(|tile| tile.up_time).sum(),
        num_values,
        tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "\
$timescale 1ns $end
$scope module top $end
$var wire 1 ! req $end
$var wire 4 \" data $end
$upscope $end
$enddefinitions $end
#0
0!
b0000 \"
#10
1!
#20
b0101 \"
#30
0!
#40
1!
#50
0!
#2000
1!
#2100
0!
#2200
";

    #[test]
    fn whole_trace() {
        let report = analyze(TRACE.as_bytes(), "req", 1000).unwrap();
        assert_eq!(report.start_time, 0);
        assert_eq!(report.end_time, 2200);
        assert_eq!(report.up_time, 20 + 10 + 100);
        assert_eq!(report.down_time(), 2200 - 130);
        assert_eq!(report.num_values, 7);
        assert!((report.mem_usage() - 130.0 / 2200.0).abs() < 1e-12);
    }

    #[test]
    fn tiles_split_on_long_gaps() {
        let report = analyze(TRACE.as_bytes(), "top.req", 1000).unwrap();
        assert_eq!(
            report.tiles,
            vec![TileUsage { start: 10, end: 50, up_time: 30 }, TileUsage { start: 2000, end: 2100, up_time: 100 }]
        );
        assert!((report.active_usage() - 130.0 / 140.0).abs() < 1e-12);
        assert!((report.usage_with_gaps() - 130.0 / 2090.0).abs() < 1e-12);
        assert!(report.check_tiles(2));
        assert!(!report.check_tiles(8));

        let merged = analyze(TRACE.as_bytes(), "req", DEFAULT_GAP).unwrap();
        assert_eq!(merged.tiles.len(), 1);
    }

    #[test]
    fn vector_signal_and_open_interval() {
        let report = analyze(TRACE.as_bytes(), "data", DEFAULT_GAP).unwrap();
        assert_eq!(report.num_values, 2);
        assert_eq!(report.up_time, 2200 - 20);
    }

    #[test]
    fn missing_signal() {
        let err = analyze(TRACE.as_bytes(), "ack", DEFAULT_GAP).unwrap_err();
        assert!(matches!(err, AnalysisError::SignalNotFound(name) if name == "ack"));
    }

    #[test]
    fn malformed_timestamp() {
        let trace = "$var wire 1 ! req $end\n$enddefinitions $end\n#1x\n";
        let err = analyze(trace.as_bytes(), "req", DEFAULT_GAP).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed { line: 3, .. }));
    }

    #[test]
    fn values_before_first_timestamp() {
        let trace = "$var wire 1 ! req $end\n$enddefinitions $end\n1!\n#5\n#10\n";
        let report = analyze(trace.as_bytes(), "req", DEFAULT_GAP).unwrap();
        assert_eq!((report.start_time, report.end_time), (5, 10));
        assert_eq!(report.up_time, 5);
        assert_eq!(report.down_time(), 0);
        assert_eq!(report.num_values, 1);
        assert!(report.to_string().contains("mem usage: 1.000000"));
    }

    #[test]
    fn timestamps_going_back() {
        let trace = "$var wire 1 ! req $end\n$enddefinitions $end\n#10\n1!\n#20\n0!\n#15\n1!\n";
        let err = analyze(trace.as_bytes(), "req", DEFAULT_GAP).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed { line: 7, .. }));
    }
}
