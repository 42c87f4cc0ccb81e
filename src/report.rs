use std::io;
use std::path::{Path, PathBuf};

use crate::chart::{self, ChartKind, CHART_HEIGHT, CHART_WIDTH};
use crate::format;
use crate::models::AnalysisReport;

pub const JSON_REPORT_FILENAME: &str = "snr_report.json";
pub const TEXT_REPORT_FILENAME: &str = "snr_report.txt";
pub const CSV_REPORT_FILENAME: &str = "snr_report.csv";

/// Load a previously saved report from `snr_report.json` in the given directory.
/// Returns `Ok(None)` if there is no such file; a file that does not parse is
/// an `InvalidData` error.
pub fn load_saved_report(dir: &Path) -> io::Result<Option<AnalysisReport>> {
    let path = dir.join(JSON_REPORT_FILENAME);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save the report as pretty-printed JSON to `snr_report.json`.
pub fn save_json_report(dir: &Path, report: &AnalysisReport) -> io::Result<PathBuf> {
    let path = dir.join(JSON_REPORT_FILENAME);
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Save the summary lines followed by the table to `snr_report.txt`.
pub fn save_text_report(dir: &Path, report: &AnalysisReport) -> io::Result<PathBuf> {
    let path = dir.join(TEXT_REPORT_FILENAME);
    let content = format!(
        "{}\n\n{}\n",
        format::format_summary(report),
        format::format_table(report)
    );
    std::fs::write(&path, content)?;
    Ok(path)
}

pub fn save_csv_report(dir: &Path, report: &AnalysisReport) -> io::Result<PathBuf> {
    let path = dir.join(CSV_REPORT_FILENAME);
    std::fs::write(&path, format::format_csv(report))?;
    Ok(path)
}

/// Render every chart off-screen and write each to its own text file.
pub fn save_charts(dir: &Path, report: &AnalysisReport) -> io::Result<Vec<PathBuf>> {
    ChartKind::ALL
        .iter()
        .map(|&kind| {
            let path = dir.join(kind.file_name());
            let text = chart::render_to_string(kind, report, CHART_WIDTH, CHART_HEIGHT);
            std::fs::write(&path, text)?;
            Ok(path)
        })
        .collect()
}
