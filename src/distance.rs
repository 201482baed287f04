use anyhow::{Context, Result};
use clap::Args;

use crate::{geo_point::GeoPoint, units::Unit};

#[derive(Debug, Clone, Args)]
pub struct DistanceArgs {
    #[arg(allow_negative_numbers = true)]
    pub lat1: f64,
    #[arg(allow_negative_numbers = true)]
    pub lon1: f64,
    #[arg(allow_negative_numbers = true)]
    pub lat2: f64,
    #[arg(allow_negative_numbers = true)]
    pub lon2: f64,
    #[arg(short, long, default_value = "miles")]
    pub unit: Unit,
}

pub fn main(args: DistanceArgs) -> Result<()> {
    let d = distance(&args)?;
    println!("{d:.3} {}", args.unit.abbreviation());
    Ok(())
}

fn distance(args: &DistanceArgs) -> Result<f64> {
    let a = GeoPoint::new(args.lat1, args.lon1).context("Invalid first point")?;
    let b = GeoPoint::new(args.lat2, args.lon2).context("Invalid second point")?;
    Ok(a.distance(&b, args.unit))
}
