// Data file listing
// Scans the data directory for recognized research files

use std::path::Path;
use tokio::fs;

use super::error::ApiError;
use super::types::{FileEntry, FileType};
use crate::logger;

const DATA_PREFIX: &str = "done_processed_";
const CSV_SUFFIX: &str = "_data.csv";
const STATS_SUFFIX: &str = "_data_stats.txt";

/// Classify a file name, returning its type and country code
///
/// Names that match neither naming pattern yield `None`.
pub fn classify(file_name: &str) -> Option<(FileType, &str)> {
    let ext = Path::new(file_name).extension().and_then(|e| e.to_str());
    if !matches!(ext, Some("csv" | "txt")) {
        return None;
    }

    if let Some(code) = country_code(file_name, CSV_SUFFIX) {
        return Some((FileType::Csv, code));
    }
    country_code(file_name, STATS_SUFFIX).map(|code| (FileType::Stats, code))
}

/// Text between the fixed prefix and `suffix`; empty when the two overlap
fn country_code<'a>(file_name: &'a str, suffix: &str) -> Option<&'a str> {
    if !(file_name.starts_with(DATA_PREFIX) && file_name.ends_with(suffix)) {
        return None;
    }
    Some(
        file_name
            .get(DATA_PREFIX.len()..file_name.len() - suffix.len())
            .unwrap_or(""),
    )
}

/// Bytes to kilobytes, rounded to one decimal with ties going to the even digit
#[allow(clippy::cast_precision_loss)]
pub fn size_in_kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 10.0).round_ties_even() / 10.0
}

/// Count text lines; `\n`, `\r\n` and a lone `\r` each end a line
pub fn count_lines(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut lines = 0;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\n' => lines += 1,
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => lines += 1,
            _ => {}
        }
    }
    if !text.is_empty() && !text.ends_with(['\n', '\r']) {
        lines += 1;
    }
    lines
}

/// Data rows of a CSV (lines minus the header), `None` if it cannot be read as text
pub async fn count_records(path: &Path) -> Option<u64> {
    match fs::read_to_string(path).await {
        Ok(text) => Some(count_lines(&text).saturating_sub(1)),
        Err(e) => {
            logger::log_debug(&format!(
                "Cannot count records in '{}': {e}",
                path.display()
            ));
            None
        }
    }
}

/// List recognized files in `data_dir` in directory order
///
/// `label` is the data directory as configured; it prefixes each `filePath`
/// so clients can hand the path straight back to `/api/file-content`.
pub async fn list_data_files(data_dir: &Path, label: &str) -> Result<Vec<FileEntry>, ApiError> {
    if !fs::try_exists(data_dir).await.unwrap_or(false) {
        logger::log_debug(&format!(
            "Data directory '{}' does not exist, listing is empty",
            data_dir.display()
        ));
        return Ok(Vec::new());
    }

    let mut dir = fs::read_dir(data_dir).await.map_err(ApiError::ListFiles)?;
    let mut files = Vec::new();

    while let Some(entry) = dir.next_entry().await.map_err(ApiError::ListFiles)? {
        let os_name = entry.file_name();
        let Some(file_name) = os_name.to_str() else {
            continue;
        };
        let Some((file_type, country_code)) = classify(file_name) else {
            continue;
        };

        let path = entry.path();
        let metadata = fs::metadata(&path).await.map_err(ApiError::ListFiles)?;
        let records = match file_type {
            FileType::Csv => count_records(&path).await,
            FileType::Stats => None,
        };

        files.push(FileEntry {
            country_code: country_code.to_string(),
            file_name: file_name.to_string(),
            file_type,
            file_path: Path::new(label).join(file_name).to_string_lossy().into_owned(),
            size: size_in_kb(metadata.len()),
            records,
        });
    }

    Ok(files)
}
