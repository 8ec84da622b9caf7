//! Archive verification and summary statistics.
//!
//! The dataset stays opaque: the data entry is only scanned line by line to
//! count records and distinct values of the first (country code) column.

use crate::error::{MirrorError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

/// Entry name of the tab-separated dump inside `allCountries.zip`.
pub const DATA_ENTRY_NAME: &str = "allCountries.txt";

/// Figures derived from the archive's data entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Name of the entry that was scanned.
    pub entry_name: String,
    /// Non-empty lines in the data entry.
    pub total_entries: u64,
    /// Distinct values in the first tab-separated column.
    pub country_count: usize,
}

/// Open the zip at `path`, verify it is readable, and scan its data entry.
pub fn verify_and_scan(path: &Path) -> Result<ArchiveStats> {
    let file = File::open(path).map_err(|e| MirrorError::io("open", path, e))?;
    let len = file
        .metadata()
        .map_err(|e| MirrorError::io("stat", path, e))?
        .len();
    if len == 0 {
        return Err(MirrorError::EmptyArchive);
    }
    scan_archive(BufReader::new(file))
}

/// Same as [`verify_and_scan`] for any seekable reader.
pub fn scan_archive<R: Read + Seek>(reader: R) -> Result<ArchiveStats> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let index = data_entry_index(&mut archive)?;
    let entry = archive.by_index(index)?;
    let entry_name = entry.name().to_string();
    tracing::debug!(entry = %entry_name, size = entry.size(), "scanning data entry");
    let (total_entries, country_count) = count_records(BufReader::new(entry))?;
    Ok(ArchiveStats {
        entry_name,
        total_entries,
        country_count,
    })
}

/// `allCountries.txt` if present, otherwise the first `.txt` file entry.
fn data_entry_index<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<usize> {
    let mut first_txt = None;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name();
        let base = name.rsplit('/').next().unwrap_or(name);
        if base == DATA_ENTRY_NAME {
            return Ok(i);
        }
        if first_txt.is_none() && base.to_ascii_lowercase().ends_with(".txt") {
            first_txt = Some(i);
        }
    }
    first_txt.ok_or(MirrorError::MissingDataEntry)
}

/// Count non-empty lines and distinct first-column values.
fn count_records<R: BufRead>(mut reader: R) -> Result<(u64, usize)> {
    let mut total = 0u64;
    let mut countries: HashSet<String> = HashSet::new();
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).map_err(|e| {
            MirrorError::Stats(format!("reading record {}: {e}", total + 1))
        })?;
        if n == 0 {
            break;
        }
        let record = line.trim_end_matches(['\r', '\n']);
        if record.is_empty() {
            continue;
        }
        total += 1;
        let country = record.split('\t').next().unwrap_or(record);
        if !countries.contains(country) {
            countries.insert(country.to_string());
        }
    }
    Ok((total, countries.len()))
}
