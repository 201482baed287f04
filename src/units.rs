use core::fmt;
use std::str::FromStr;

use anyhow::bail;
use clap::ValueEnum;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::FilterError;

pub const MILES_PER_KM: f64 = 0.621371;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, DeserializeFromStr, SerializeDisplay)]
pub enum Unit {
    #[value(alias = "mi")]
    Miles,
    #[value(alias = "km")]
    Kilometers,
}

impl Unit {
    pub fn from_km(&self, km: f64) -> f64 {
        match self {
            Self::Miles => km * MILES_PER_KM,
            Self::Kilometers => km,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Miles => "mi",
            Self::Kilometers => "km",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Miles => "miles",
                Self::Kilometers => "kilometers",
            }
        )
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "mi" | "mile" | "miles" => Self::Miles,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometers,
            _ => bail!("Unknown unit: {s}"),
        })
    }
}

/// Exclusion radius shared by every candidate of a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Radius {
    value: f64,
    unit: Unit,
}

impl Radius {
    pub fn new(value: f64, unit: Unit) -> Result<Self, FilterError> {
        if !value.is_finite() {
            return Err(FilterError::invalid_argument(format!(
                "radius must be finite, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(FilterError::invalid_argument(format!(
                "radius must not be negative, got {value}"
            )));
        }
        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Inclusive: a distance equal to the radius is within it.
    pub fn contains(&self, distance: f64) -> bool {
        distance <= self.value
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.abbreviation())
    }
}
