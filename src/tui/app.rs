use std::path::PathBuf;

use crate::chart::ChartKind;
use crate::models::AnalysisReport;
use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Table,
    Chart(ChartKind),
}

impl View {
    const ORDER: [View; 5] = [
        View::Table,
        View::Chart(ChartKind::ReferenceSnr),
        View::Chart(ChartKind::SnrVsSize),
        View::Chart(ChartKind::Duration),
        View::Chart(ChartKind::Bitrate),
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Table => "Results",
            View::Chart(ChartKind::ReferenceSnr) => "Reference SNR",
            View::Chart(ChartKind::SnrVsSize) => "SNR vs Size",
            View::Chart(ChartKind::Duration) => "Duration",
            View::Chart(ChartKind::Bitrate) => "Bitrate",
        }
    }

    pub fn all() -> &'static [View] {
        &Self::ORDER
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|v| *v == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    About,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
    Charts,
}

pub struct App {
    pub report: AnalysisReport,
    pub view: View,
    pub overlay: Overlay,
    pub selected: usize,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub out_dir: PathBuf,
    pub export_format: ExportFormat,
    pub export_message: Option<String>,
    /// Visible height of the results table (updated each frame by the renderer)
    pub visible_rows: usize,
}

impl App {
    pub fn new(report: AnalysisReport, out_dir: PathBuf) -> Self {
        Self {
            report,
            view: View::Table,
            overlay: Overlay::None,
            selected: 0,
            scroll_offset: 0,
            should_quit: false,
            out_dir,
            export_format: ExportFormat::Text,
            export_message: None,
            visible_rows: 20,
        }
    }

    pub fn next_view(&mut self) {
        let views = View::all();
        self.view = views[(self.view.position() + 1) % views.len()];
    }

    pub fn prev_view(&mut self) {
        let views = View::all();
        self.view = views[(self.view.position() + views.len() - 1) % views.len()];
    }

    pub fn select_next(&mut self) {
        if !self.report.records.is_empty() {
            self.selected = (self.selected + 1).min(self.report.records.len() - 1);
            self.ensure_visible();
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_visible();
    }

    /// Adjust scroll_offset so that self.selected is within the visible window.
    fn ensure_visible(&mut self) {
        if self.visible_rows == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = self.selected - self.visible_rows + 1;
        }
    }

    pub fn cycle_export_format(&mut self) {
        self.export_format = match self.export_format {
            ExportFormat::Text => ExportFormat::Json,
            ExportFormat::Json => ExportFormat::Csv,
            ExportFormat::Csv => ExportFormat::Charts,
            ExportFormat::Charts => ExportFormat::Text,
        };
    }

    /// File name(s) the current export format writes.
    pub fn export_target(&self) -> String {
        match self.export_format {
            ExportFormat::Text => report::TEXT_REPORT_FILENAME.to_string(),
            ExportFormat::Json => report::JSON_REPORT_FILENAME.to_string(),
            ExportFormat::Csv => report::CSV_REPORT_FILENAME.to_string(),
            ExportFormat::Charts => "chart_*.txt".to_string(),
        }
    }

    /// Write the report in the selected format and remember the outcome message.
    pub fn export(&mut self) {
        let dir = &self.out_dir;
        let result = match self.export_format {
            ExportFormat::Text => report::save_text_report(dir, &self.report).map(|p| vec![p]),
            ExportFormat::Json => report::save_json_report(dir, &self.report).map(|p| vec![p]),
            ExportFormat::Csv => report::save_csv_report(dir, &self.report).map(|p| vec![p]),
            ExportFormat::Charts => report::save_charts(dir, &self.report),
        };
        self.export_message = Some(match result {
            Ok(paths) if paths.len() == 1 => format!("Saved to {}", paths[0].display()),
            Ok(paths) => format!("Saved {} files to {}", paths.len(), dir.display()),
            Err(e) => format!("Error: {}", e),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisRecord, Outcome};

    fn app_with(records: usize, out_dir: PathBuf) -> App {
        let records = (0..records)
            .map(|i| AnalysisRecord {
                algorithm: format!("ALG-{}", i),
                original: format!("{}.wav", i),
                compressed: format!("{}.mp3", i),
                size_mb: 1.0,
                duration_min: 1.0,
                bitrate_kbps: 128,
                outcome: Outcome::DegenerateSignal {
                    message: "empty".to_string(),
                },
            })
            .collect();
        App::new(
            AnalysisReport {
                records,
                catalog: None,
            },
            out_dir,
        )
    }

    #[test]
    fn test_view_cycle_wraps() {
        let mut app = app_with(1, PathBuf::from("."));
        for _ in 0..View::all().len() {
            app.next_view();
        }
        assert_eq!(app.view, View::Table);
        app.prev_view();
        assert_eq!(app.view, View::Chart(ChartKind::Bitrate));
    }

    #[test]
    fn test_selection_scrolls() {
        let mut app = app_with(10, PathBuf::from("."));
        app.visible_rows = 3;
        for _ in 0..5 {
            app.select_next();
        }
        assert_eq!(app.selected, 5);
        assert_eq!(app.scroll_offset, 3);
        for _ in 0..20 {
            app.select_next();
        }
        assert_eq!(app.selected, 9);
        for _ in 0..9 {
            app.select_prev();
        }
        assert_eq!(app.selected, 0);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_export_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(2, dir.path().to_path_buf());

        app.export();
        assert!(dir.path().join(report::TEXT_REPORT_FILENAME).exists());
        assert!(app.export_message.as_deref().unwrap().starts_with("Saved to"));

        app.cycle_export_format();
        app.cycle_export_format();
        app.cycle_export_format();
        assert_eq!(app.export_format, ExportFormat::Charts);
        app.export();
        assert_eq!(
            app.export_message.as_deref(),
            Some(format!("Saved 4 files to {}", dir.path().display()).as_str())
        );
    }
}
