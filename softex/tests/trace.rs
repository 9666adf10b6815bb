//! Waveform traces of the bench, read back by the bandwidth analysis.

use std::fs::File;
use std::io::BufReader;

use softex::analysis::{analyze, DEFAULT_GAP};
use softex::bench::Bench;
use softex::config::BenchConfig;

#[test]
fn request_bursts_per_pass() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let writer = Box::new(file.reopen().unwrap());

    let mut bench = Bench::with_trace(BenchConfig::default(), writer).unwrap();
    let stats = bench.softmax(1, 0).unwrap();
    let cycles = bench.cycle();
    bench.finish().unwrap();

    // One burst per accumulate or divide pass.
    let report = analyze(BufReader::new(File::open(file.path()).unwrap()), "req", 5).unwrap();
    assert_eq!(stats.passes.len(), 3);
    assert!(report.check_tiles(2));
    assert_eq!(report.num_values, 5);
    assert_eq!(report.start_time, 0);
    assert_eq!(report.end_time, cycles);
    assert!(report.tiles.iter().all(|tile| tile.up_time == tile.span() && tile.span() >= 32));
    assert!(report.mem_usage() > 0.0 && report.mem_usage() < 1.0);

    let merged = analyze(BufReader::new(File::open(file.path()).unwrap()), "softex.req", DEFAULT_GAP).unwrap();
    assert_eq!(merged.tiles.len(), 1);
    assert_eq!(merged.up_time, report.up_time);
}
