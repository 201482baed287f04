use core::fmt;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, info, log_enabled, Level};

use crate::{
    config::FilterConfig,
    table::{self, Record},
    units::Unit,
    utils::progress_bar,
};

mod pairwise;

pub use pairwise::{filter, ExclusionFilter};

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// YAML file describing the two datasets and the radius
    #[arg(short, long, default_value = "filter.yaml")]
    pub config: PathBuf,
    #[arg(short, long)]
    pub radius: Option<f64>,
    #[arg(short, long)]
    pub unit: Option<Unit>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(short, long)]
    pub parallel: bool,
}

impl FilterArgs {
    fn apply(&self, config: &mut FilterConfig) {
        if let Some(x) = self.radius {
            config.radius = x;
        }
        if let Some(x) = self.unit {
            config.unit = x;
        }
        if let Some(x) = &self.output {
            config.output = Some(x.clone());
        }
        config.parallel |= self.parallel;
    }
}

pub fn main(args: FilterArgs) -> Result<()> {
    let mut config = FilterConfig::load(&args.config)?;
    args.apply(&mut config);
    let radius = config.radius()?;

    let candidates = table::read(&config.candidates).context("Failed to load candidates")?;
    let anchors = table::read(&config.anchors).context("Failed to load anchors")?;
    info!(
        "Loaded {} candidates from {} and {} anchors from {}",
        candidates.records.len(),
        candidates.path.display(),
        anchors.records.len(),
        anchors.path.display()
    );

    let start = Instant::now();
    let exclusion = ExclusionFilter::new(radius)
        .parallel(config.parallel)
        .progress(progress_bar(candidates.records.len() as u64));
    let kept = exclusion.run(&candidates.records, &anchors.records);
    let summary = FilterSummary {
        candidates: candidates.records.len(),
        anchors: anchors.records.len(),
        kept: kept.len(),
        elapsed: start.elapsed(),
    };

    if log_enabled!(Level::Debug) {
        let unit = exclusion.radius().unit().abbreviation();
        for c in excluded(&candidates.records, &kept) {
            if let Some((idx, d)) = exclusion.nearest(c, &anchors.records) {
                debug!(
                    "line {} excluded: anchor on line {} is {d:.2} {unit} away",
                    c.line, anchors.records[idx].line
                );
            }
        }
    }
    info!("Within {radius}: {summary}");

    let output = config.output_path();
    table::write(&output, &candidates.headers, kept.iter().copied())?;
    info!("Wrote {} records to {}", kept.len(), output.display());

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSummary {
    pub candidates: usize,
    pub anchors: usize,
    pub kept: usize,
    pub elapsed: Duration,
}

impl FilterSummary {
    pub fn excluded(&self) -> usize {
        self.candidates - self.kept
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kept {} of {} candidates, excluded {} ({} anchors, {:.3}s)",
            self.kept,
            self.candidates,
            self.excluded(),
            self.anchors,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Candidates missing from `kept`. Relies on `kept` being an ordered subset.
fn excluded<'a>(candidates: &'a [Record], kept: &[&Record]) -> Vec<&'a Record> {
    let mut kept = kept.iter().peekable();
    let mut output = Vec::new();
    for c in candidates {
        if kept.peek().is_some_and(|k| std::ptr::eq(**k, c)) {
            kept.next();
        } else {
            output.push(c);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use csv::StringRecord;

    use super::*;
    use crate::geo_point::GeoPoint;

    fn record(name: &str, lat: f64, lon: f64) -> Record {
        Record {
            line: 0,
            point: GeoPoint::new(lat, lon).unwrap(),
            fields: StringRecord::from(vec![name.to_string()]),
        }
    }

    #[test]
    fn excluded_is_the_complement() {
        let candidates = vec![
            record("a", 0.0, 0.0),
            record("b", 1.0, 1.0),
            record("c", 2.0, 2.0),
            record("d", 3.0, 3.0),
        ];
        let kept = vec![&candidates[1], &candidates[3]];
        let names: Vec<_> = excluded(&candidates, &kept)
            .iter()
            .map(|x| x.fields[0].to_string())
            .collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn summary_display() {
        let summary = FilterSummary {
            candidates: 10,
            anchors: 4,
            kept: 7,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            summary.to_string(),
            "kept 7 of 10 candidates, excluded 3 (4 anchors, 1.500s)"
        );
    }

    #[derive(Debug, Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: FilterArgs,
    }

    #[test]
    fn cli_overrides_config() {
        let mut config: FilterConfig = serde_yaml::from_str(
            "candidates: {path: a.csv}\nanchors: {path: b.csv}\nradius: 30\n",
        )
        .unwrap();
        let args = Wrapper::parse_from(["test", "--radius", "50", "--unit", "km", "-p"]).args;
        args.apply(&mut config);

        assert_eq!(config.radius, 50.0);
        assert_eq!(config.unit, Unit::Kilometers);
        assert!(config.parallel);
        assert_eq!(config.output, None);
    }

    #[test]
    fn end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("rehabs.csv"),
            "Equator Rehab,1 Main St,0.0,0.0,XX,12,1\n\
             Far Rehab,2 High St,10.0,10.0,YY,8,2\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("hospitals.csv"),
            "id,name,latitude,longitude,beds\nH1,General,0.0,0.5,300\n",
        )
        .unwrap();
        let config = dir.path().join("filter.yaml");
        fs::write(
            &config,
            "candidates:\n  path: rehabs.csv\n  columns: [name, address, latitude, longitude, state, beds, rehabs]\n\
             anchors:\n  path: hospitals.csv\n\
             radius: 30\n",
        )
        .unwrap();

        // 34.5 mi apart, kept at 30
        let args = Wrapper::parse_from(["test", "-c", config.to_str().unwrap()]).args;
        main(args).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("rehabs_beyond_30mi.csv")).unwrap(),
            "name,address,latitude,longitude,state,beds,rehabs\n\
             Equator Rehab,1 Main St,0.0,0.0,XX,12,1\n\
             Far Rehab,2 High St,10.0,10.0,YY,8,2\n"
        );

        // excluded at 40
        let out = dir.path().join("out.csv");
        let args = Wrapper::parse_from([
            "test",
            "-c",
            config.to_str().unwrap(),
            "-r",
            "40",
            "-o",
            out.to_str().unwrap(),
        ])
        .args;
        main(args).unwrap();
        assert_eq!(
            fs::read_to_string(out).unwrap(),
            "name,address,latitude,longitude,state,beds,rehabs\n\
             Far Rehab,2 High St,10.0,10.0,YY,8,2\n"
        );
    }

    #[test]
    fn bad_row_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "name,latitude,longitude\nx,1,2\ny,,3\n").unwrap();
        fs::write(dir.path().join("b.csv"), "name,latitude,longitude\nz,5,5\n").unwrap();
        let config = dir.path().join("filter.yaml");
        fs::write(
            &config,
            "candidates: {path: a.csv}\nanchors: {path: b.csv}\nradius: 1\n",
        )
        .unwrap();

        let args = Wrapper::parse_from(["test", "-c", config.to_str().unwrap()]).args;
        let err = main(args).unwrap_err();
        assert!(format!("{err:#}").contains("missing coordinate"), "{err:#}");
        assert!(!dir.path().join("a_beyond_1mi.csv").exists());
    }
}
