use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    error::FilterError,
    units::{Radius, Unit},
};

/// Where to find one input CSV and how to interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub path: PathBuf,
    /// Column names for files without a header row. When absent the first
    /// row of the file is the header.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default = "default_latitude")]
    pub latitude: String,
    #[serde(default = "default_longitude")]
    pub longitude: String,
}

fn default_latitude() -> String {
    "latitude".to_string()
}

fn default_longitude() -> String {
    "longitude".to_string()
}

fn default_unit() -> Unit {
    Unit::Miles
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub candidates: Dataset,
    pub anchors: Dataset,
    pub radius: f64,
    #[serde(default = "default_unit")]
    pub unit: Unit,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub parallel: bool,
}

impl FilterConfig {
    /// Reads a YAML config. Relative paths inside it are taken relative to
    /// the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        let join = |x: &mut PathBuf| {
            if x.is_relative() {
                *x = base.join(&*x);
            }
        };
        join(&mut self.candidates.path);
        join(&mut self.anchors.path);
        if let Some(x) = self.output.as_mut() {
            join(x);
        }
    }

    pub fn radius(&self) -> Result<Radius, FilterError> {
        Radius::new(self.radius, self.unit)
    }

    /// Explicit output path, or `<candidates>_beyond_<radius><unit>.csv` next
    /// to the candidates file.
    pub fn output_path(&self) -> PathBuf {
        if let Some(x) = &self.output {
            return x.clone();
        }

        let stem = self
            .candidates
            .path
            .file_stem()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_else(|| "candidates".to_string());
        self.candidates.path.with_file_name(format!(
            "{stem}_beyond_{}{}.csv",
            self.radius,
            self.unit.abbreviation()
        ))
    }
}
