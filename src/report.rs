//! Results files
//!
//! `results.txt` is plain key/value text: each series name on its own line,
//! one `key: value` line per entry, then a blank line. The path trace follows
//! as one position per line.
//!
//! `results.json` is a [`RunRecord`]: the seed, the parameters and the full
//! report, enough to reproduce and reload a run.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::stats::TIME_TO_LEAVE_RADIUS;
use crate::sim::{SimulationParams, SimulationReport};

/// File name written by [`save_results`]
pub const RESULTS_FILE: &str = "results.txt";

/// File name written by [`save_record`]
pub const RECORD_FILE: &str = "results.json";

/// Header of the path trace section
pub const LOCATIONS: &str = "locations_list";

/// Write the full report
pub fn write_results<W: Write>(report: &SimulationReport, out: &mut W) -> io::Result<()> {
    let stats = &report.statistics;
    let mut series = stats.step_series().into_iter();

    // Time-to-leave section goes second, after distance from origin
    if let Some((name, values)) = series.next() {
        writeln!(out, "{name}:")?;
        for (step, value) in values {
            writeln!(out, "{step}: {value}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{TIME_TO_LEAVE_RADIUS}:")?;
    for (key, value) in stats.time_to_leave_radius.merged_points() {
        writeln!(out, "{key}: {value}")?;
    }
    writeln!(out)?;

    for (name, values) in series {
        writeln!(out, "{name}:")?;
        for (step, value) in values {
            writeln!(out, "{step}: {value}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{LOCATIONS}:")?;
    for pos in &report.path {
        writeln!(out, "({}, {})", pos.x, pos.y)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Render the report to a string
pub fn render_results(report: &SimulationReport) -> io::Result<String> {
    let mut buf = Vec::new();
    write_results(report, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write [`RESULTS_FILE`] into `dir`, returning its path
pub fn save_results(report: &SimulationReport, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(RESULTS_FILE);
    let mut out = BufWriter::new(File::create(&path)?);
    write_results(report, &mut out)?;
    out.flush()?;
    log::info!(
        "Results saved to {} ({} positions)",
        path.display(),
        report.path.len()
    );
    Ok(path)
}

/// A finished run with everything needed to replay it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: u64,
    pub params: SimulationParams,
    pub report: SimulationReport,
}

impl RunRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn read_from<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

/// Write [`RECORD_FILE`] into `dir`, returning its path
pub fn save_record(record: &RunRecord, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(RECORD_FILE);
    let mut out = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut out, record)?;
    out.flush()?;
    log::info!("Run record saved to {} (seed {})", path.display(), record.seed);
    Ok(path)
}

/// Load a record written by [`save_record`]
pub fn load_record(path: &Path) -> io::Result<RunRecord> {
    let file = File::open(path)?;
    Ok(RunRecord::read_from(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stats::{
        CROSSED_Y_AXIS, DISTANCE_FROM_ORIGIN, DISTANCE_FROM_X_AXIS, DISTANCE_FROM_Y_AXIS,
    };
    use crate::sim::terrain::{Gate, Obstacle};
    use crate::sim::{
        BiasConfig, BiasDirection, RestartPolicy, Simulator, WalkerType, seeded_rng,
    };
    use glam::DVec2;

    fn sample_report() -> SimulationReport {
        let sim = Simulator::new(SimulationParams::new(WalkerType::FourDirectionAxis, 2, 6));
        sim.run(&mut seeded_rng(5))
    }

    fn sample_record() -> RunRecord {
        let mut params = SimulationParams::new(
            WalkerType::Biased(BiasConfig {
                direction: BiasDirection::Left,
                increase_percent: 40,
            }),
            4,
            12,
        );
        params
            .terrain
            .obstacles
            .push(Obstacle::new(DVec2::new(1.5, -2.0), DVec2::new(1.5, 2.0)));
        params.terrain.gates.push(Gate::new(
            vec![DVec2::new(-3.0, -1.0), DVec2::new(-3.0, 1.0)],
            DVec2::new(0.25, 0.75),
        ));
        params.restart = RestartPolicy::new(vec![3, 7]);
        let seed = 2024;
        let report = Simulator::new(params.clone()).run(&mut seeded_rng(seed));
        RunRecord {
            seed,
            params,
            report,
        }
    }

    #[test]
    fn test_every_section_present_in_order() {
        let text = render_results(&sample_report()).unwrap();
        let headers: Vec<&str> = text.lines().filter(|l| l.ends_with(':')).collect();
        assert_eq!(
            headers,
            vec![
                "average_distance_from_origin:",
                "average_time_to_leave_radius_10:",
                "average_distance_from_y_axis:",
                "average_distance_from_x_axis:",
                "crossed_y_axis:",
                "locations_list:",
            ]
        );
        assert!(text.contains(&format!("{DISTANCE_FROM_ORIGIN}:\n0: 0\n")));
        for name in [DISTANCE_FROM_X_AXIS, DISTANCE_FROM_Y_AXIS, CROSSED_Y_AXIS] {
            assert!(text.contains(name));
        }
    }

    #[test]
    fn test_path_lines() {
        let report = sample_report();
        let text = render_results(&report).unwrap();
        let locations = text
            .split(&format!("{LOCATIONS}:\n"))
            .nth(1)
            .unwrap_or_default();
        assert_eq!(locations.lines().filter(|l| !l.is_empty()).count(), 1 + 2 * 6);
        assert!(locations.starts_with("(0, 0)\n"));
    }

    #[test]
    fn test_save_results_writes_file() {
        let dir = std::env::temp_dir().join(format!("random_walk_report_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let report = sample_report();
        let path = save_results(&report, &dir).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(written, render_results(&report).unwrap());
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = sample_record();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"seed\": 2024"));
        assert!(json.contains("\"average_distance_from_origin\""));
        assert_eq!(RunRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_record_replays_from_its_seed() {
        let record = sample_record();
        let replayed = Simulator::new(record.params.clone()).run(&mut seeded_rng(record.seed));
        assert_eq!(replayed, record.report);
    }

    #[test]
    fn test_save_and_load_record() {
        let dir = std::env::temp_dir().join(format!("random_walk_record_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let record = sample_record();
        let path = save_record(&record, &dir).unwrap();
        let loaded = load_record(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(path.file_name().unwrap(), RECORD_FILE);
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        assert!(RunRecord::from_json("{\"seed\": 1}").is_err());
        assert!(RunRecord::read_from("not json".as_bytes()).is_err());
    }
}
