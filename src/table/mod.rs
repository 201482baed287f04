use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use itertools::Itertools;
use log::debug;

use crate::{
    config::Dataset,
    error::FilterError,
    geo_point::{CoordinateError, GeoPoint},
};

mod coords;

pub use coords::parse_coordinate;

/// One row of an input file. `fields` is the row exactly as read, coordinate
/// columns included, so it can be written back out untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub line: u64,
    pub point: GeoPoint,
    pub fields: StringRecord,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub headers: StringRecord,
    pub records: Vec<Record>,
}

pub fn read(dataset: &Dataset) -> Result<Table, FilterError> {
    let file = File::open(&dataset.path).map_err(|e| FilterError::Csv {
        path: dataset.path.clone(),
        source: e.into(),
    })?;
    from_reader(&dataset.path, file, dataset)
}

pub fn from_reader<R: io::Read>(
    path: &Path,
    input: R,
    dataset: &Dataset,
) -> Result<Table, FilterError> {
    let csv_err = |source| FilterError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(dataset.columns.is_none())
        .flexible(true)
        .from_reader(input);

    let headers = match &dataset.columns {
        Some(columns) => StringRecord::from(columns.clone()),
        None => reader.headers().map_err(csv_err)?.clone(),
    };

    let column = |name: &str| {
        headers
            .iter()
            .position(|x| x.trim() == name)
            .ok_or_else(|| FilterError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
                available: headers.iter().join(", "),
            })
    };
    let lat_idx = column(&dataset.latitude)?;
    let lon_idx = column(&dataset.longitude)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let fields = row.map_err(csv_err)?;
        let line = fields.position().map(|x| x.line()).unwrap_or_default();
        let data_err = |column: &str, value: &str, reason: String| FilterError::Data {
            path: path.to_path_buf(),
            line,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        };

        if fields.len() != headers.len() {
            return Err(data_err(
                "*",
                &fields.iter().join(","),
                format!("expected {} fields, found {}", headers.len(), fields.len()),
            ));
        }

        let lat_raw = &fields[lat_idx];
        let lon_raw = &fields[lon_idx];
        let lat =
            parse_coordinate(lat_raw).map_err(|e| data_err(&dataset.latitude, lat_raw, e))?;
        let lon =
            parse_coordinate(lon_raw).map_err(|e| data_err(&dataset.longitude, lon_raw, e))?;
        let point = GeoPoint::new(lat, lon).map_err(|e| match e {
            CoordinateError::Latitude(_) => {
                data_err(&dataset.latitude, lat_raw, e.to_string())
            }
            CoordinateError::Longitude(_) => {
                data_err(&dataset.longitude, lon_raw, e.to_string())
            }
        })?;

        records.push(Record {
            line,
            point,
            fields,
        });
    }

    debug!("{}: {} records", path.display(), records.len());

    Ok(Table {
        path: path.to_path_buf(),
        headers,
        records,
    })
}

pub fn write<'a>(
    path: &Path,
    headers: &StringRecord,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<(), FilterError> {
    let file = File::create(path).map_err(|e| FilterError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    to_writer(path, file, headers, records)
}

pub fn to_writer<'a, W: Write>(
    path: &Path,
    output: W,
    headers: &StringRecord,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<(), FilterError> {
    let csv_err = |source| FilterError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new().from_writer(output);
    writer.write_record(headers).map_err(csv_err)?;
    for record in records {
        writer.write_record(&record.fields).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| csv_err(e.into()))?;
    Ok(())
}
