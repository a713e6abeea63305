//! Reading episode datasets and writing output records

use crate::error::{Result, TrackerError};
use crate::types::{OutputRecord, OUTPUT_COLUMNS};
use kizuna_domain::Episode;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetFormat {
    /// One header row followed by one row per record
    #[default]
    Csv,

    /// A pretty-printed JSON array of records
    Json,
}

impl DatasetFormat {
    /// Guess the format from a file extension, if recognized
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(DatasetFormat::Csv),
            "json" => Some(DatasetFormat::Json),
            _ => None,
        }
    }
}

/// Read episodes from CSV, keeping row order
///
/// Requires an `Episode` (or `#`) column, an `Arc` column and a `Synopsis`
/// column; other columns are ignored.
pub fn read_episodes<R: Read>(reader: R) -> Result<Vec<Episode>> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv.headers()?.clone();

    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.trim()))
            .ok_or_else(|| TrackerError::MissingColumn(names[0].to_string()))
    };
    let episode_idx = column(&["Episode", "#"])?;
    let arc_idx = column(&["Arc"])?;
    let synopsis_idx = column(&["Synopsis"])?;

    let mut episodes = Vec::new();
    for row in csv.records() {
        let row = row?;
        let field = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        episodes.push(Episode::new(
            field(episode_idx),
            field(arc_idx),
            field(synopsis_idx),
        ));
    }

    Ok(episodes)
}

/// Read episodes from a CSV file
pub fn read_episodes_from_path(path: impl AsRef<Path>) -> Result<Vec<Episode>> {
    let path = path.as_ref();
    let episodes = read_episodes(File::open(path)?)?;
    info!(path = %path.display(), episodes = episodes.len(), "Loaded episodes");
    Ok(episodes)
}

/// Write records as CSV with the output header, even when there are none
pub fn write_csv<W: Write>(writer: W, records: &[OutputRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write records as a JSON array
pub fn write_json<W: Write>(writer: W, records: &[OutputRecord]) -> Result<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Write records to a file in the given format
pub fn write_records(
    path: impl AsRef<Path>,
    records: &[OutputRecord],
    format: DatasetFormat,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        DatasetFormat::Csv => write_csv(&mut writer, records)?,
        DatasetFormat::Json => write_json(&mut writer, records)?,
    }
    writer.flush()?;

    info!(path = %path.display(), records = records.len(), "Wrote dataset");
    Ok(())
}
