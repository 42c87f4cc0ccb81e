use crate::models::{AnalysisRecord, AnalysisReport, SnrResult};

/// Format a duration in minutes as "M:SS".
pub fn format_duration(minutes: f64) -> String {
    let total_secs = (minutes * 60.0).round() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// "12.34 dB", or "∞ dB" for a perfect reconstruction.
pub fn format_snr(snr: SnrResult) -> String {
    format!("{} dB", snr.label())
}

/// Two summary lines for one record.
pub fn format_record_summary(record: &AnalysisRecord) -> String {
    match (record.compressed_snr(), record.reference_snr()) {
        (Some(compressed), Some(reference)) => format!(
            "Compressed SNR for {} ({}): {}\nReference SNR for {}: {}",
            record.algorithm,
            record.compressed,
            format_snr(compressed),
            record.original,
            format_snr(reference),
        ),
        _ => format!(
            "Compressed SNR for {} ({}): FAILED ({})\nReference SNR for {}: n/a",
            record.algorithm,
            record.compressed,
            record.failure().unwrap_or("unknown error"),
            record.original,
        ),
    }
}

/// Summary lines for every record, separated by blank lines.
pub fn format_summary(report: &AnalysisReport) -> String {
    report
        .records
        .iter()
        .map(format_record_summary)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format the report as a fixed-width table.
pub fn format_table(report: &AnalysisReport) -> String {
    let separator = "\u{2500}".repeat(72);
    let mut output = String::new();

    output.push_str(&format!(
        "{:<16} {:>12} {:>12} {:>9} {:>9} {:>9}\n",
        "Algorithm", "SNR", "Ref SNR", "Size", "Duration", "Bitrate"
    ));
    output.push_str(&separator);
    output.push('\n');

    for record in &report.records {
        let (snr, reference) = match record.measurement() {
            Some(m) => (format_snr(m.compressed_snr), format_snr(m.reference_snr)),
            None => ("FAILED".to_string(), "n/a".to_string()),
        };
        output.push_str(&format!(
            "{:<16} {:>12} {:>12} {:>6.2} MB {:>9} {:>4} kbps\n",
            record.algorithm,
            snr,
            reference,
            record.size_mb,
            format_duration(record.duration_min),
            record.bitrate_kbps,
        ));
    }

    output.push_str(&separator);
    output.push('\n');

    output.push_str(&format!(
        "Entries: {}  Measured: {}  Failed: {}",
        report.records.len(),
        report.measured_count(),
        report.failed_count(),
    ));

    for record in &report.records {
        if let Some(reason) = record.failure() {
            output.push_str(&format!("\n  {}: {}", record.algorithm, reason));
        }
    }

    output
}

/// Format the report as pretty-printed JSON.
pub fn format_json(report: &AnalysisReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Format the report as CSV. Perfect reconstructions are written as "inf",
/// failed entries leave both SNR columns empty.
pub fn format_csv(report: &AnalysisReport) -> String {
    let mut output = String::from(
        "Algorithm,Original,Compressed,SNR dB,Reference SNR dB,Size MB,Duration min,Bitrate kbps,Status\n",
    );
    let csv_snr = |snr: Option<SnrResult>| match snr {
        Some(SnrResult::Finite(db)) => format!("{:.4}", db),
        Some(SnrResult::PerfectReconstruction) => "inf".to_string(),
        None => String::new(),
    };
    for record in &report.records {
        let status = match record.failure() {
            None => "ok".to_string(),
            Some(reason) => format!("\"{}\"", reason.replace('"', "\"\"")),
        };
        output.push_str(&format!(
            "{},{},{},{},{},{:.2},{:.2},{},{}\n",
            record.algorithm,
            record.original,
            record.compressed,
            csv_snr(record.compressed_snr()),
            csv_snr(record.reference_snr()),
            record.size_mb,
            record.duration_min,
            record.bitrate_kbps,
            status,
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurement, Outcome};

    fn record(algorithm: &str, outcome: Outcome) -> AnalysisRecord {
        AnalysisRecord {
            algorithm: algorithm.to_string(),
            original: "song-og.wav".to_string(),
            compressed: "song.mp3".to_string(),
            size_mb: 2.53,
            duration_min: 2.6,
            bitrate_kbps: 128,
            outcome,
        }
    }

    fn measured(snr: SnrResult) -> Outcome {
        Outcome::Measured(Measurement {
            compressed_snr: snr,
            reference_snr: SnrResult::PerfectReconstruction,
            aligned_samples: 100,
            original_sample_rate: 44100,
            compressed_sample_rate: 44100,
        })
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            records: vec![
                record("SONG-MP3", measured(SnrResult::Finite(17.256))),
                record("SONG-FLAC", measured(SnrResult::PerfectReconstruction)),
                record(
                    "SONG-AAC",
                    Outcome::LoadFailure {
                        path: "song.aac".to_string(),
                        message: "unsupported format".to_string(),
                    },
                ),
            ],
            catalog: None,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(2.6), "2:36");
        assert_eq!(format_duration(230.0 / 60.0), "3:50");
    }

    #[test]
    fn test_record_summary() {
        let report = sample_report();
        assert_eq!(
            format_record_summary(&report.records[0]),
            "Compressed SNR for SONG-MP3 (song.mp3): 17.26 dB\nReference SNR for song-og.wav: \u{221e} dB"
        );
        assert!(format_record_summary(&report.records[2]).contains("FAILED (unsupported format)"));
    }

    #[test]
    fn test_summary_has_one_block_per_record() {
        let summary = format_summary(&sample_report());
        assert_eq!(summary.matches("Compressed SNR for").count(), 3);
        assert_eq!(summary.matches("Reference SNR for").count(), 3);
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&sample_report());
        assert!(table.contains("SONG-MP3"));
        assert!(table.contains("17.26 dB"));
        assert!(table.contains("\u{221e} dB"));
        assert!(table.contains("FAILED"));
        assert!(table.contains("2:36"));
        assert!(table.contains("Entries: 3  Measured: 2  Failed: 1"));
        assert!(table.contains("SONG-AAC: unsupported format"));
    }

    #[test]
    fn test_format_json_roundtrip() {
        let json = format_json(&sample_report());
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(
            parsed.records[1].compressed_snr(),
            Some(SnrResult::PerfectReconstruction)
        );
        assert_eq!(parsed.records[2].failure(), Some("unsupported format"));
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Algorithm,Original"));
        assert!(lines[1].starts_with("SONG-MP3,song-og.wav,song.mp3,17.2560,inf,2.53,2.60,128,ok"));
        assert!(lines[2].contains(",inf,inf,"));
        assert!(lines[3].contains(",,,"));
        assert!(lines[3].ends_with("\"unsupported format\""));
    }
}
