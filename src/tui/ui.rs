use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use ratatui::Frame;

use super::app::{App, ExportFormat, Overlay, View};
use crate::chart;
use crate::format::{format_duration, format_snr};
use crate::models::{AnalysisRecord, SnrResult};

const ACCENT: Color = Color::Cyan;
const DIM: Color = Color::DarkGray;
const COMPLETE_COLOR: Color = Color::Green;
const ERROR_COLOR: Color = Color::Red;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(5),    // Table or chart
            Constraint::Length(3), // Summary
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    match app.view {
        View::Table => render_record_table(frame, app, chunks[2]),
        View::Chart(kind) => chart::render_chart(kind, &app.report, chunks[2], frame.buffer_mut()),
    }
    render_summary(frame, app, chunks[3]);
    render_footer(frame, app, chunks[4]);

    match app.overlay {
        Overlay::About => render_about_overlay(frame),
        Overlay::Export => render_export_overlay(frame, app),
        Overlay::None => {}
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let catalog = app.report.catalog.as_deref().unwrap_or("catalog");
    let out_text = app.out_dir.display().to_string();

    let text = vec![Line::from(vec![
        Span::styled("Catalog: ", Style::default().fg(DIM)),
        Span::styled(
            catalog,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Output: ", Style::default().fg(DIM)),
        Span::styled(out_text, Style::default().fg(DIM)),
    ])];

    let block = Block::default()
        .title(Span::styled(
            " SNR Meter ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<&str> = View::all().iter().map(|v| v.title()).collect();
    let selected = View::all().iter().position(|v| *v == app.view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(DIM))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn snr_cell(snr: SnrResult) -> Cell<'static> {
    let style = if snr.is_perfect() {
        Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(snr_color(snr))
    };
    Cell::from(format_snr(snr)).style(style)
}

fn record_row(index: usize, record: &AnalysisRecord, selected: bool) -> Row<'_> {
    let style = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let num = format!("{}", index + 1);

    match record.measurement() {
        Some(m) => Row::new(vec![
            Cell::from(num),
            Cell::from(record.algorithm.as_str()),
            snr_cell(m.compressed_snr),
            snr_cell(m.reference_snr),
            Cell::from(format!("{:.2} MB", record.size_mb)),
            Cell::from(format_duration(record.duration_min)),
            Cell::from(format!("{} kbps", record.bitrate_kbps)),
            Cell::from("\u{2713}").style(Style::default().fg(COMPLETE_COLOR)),
        ])
        .style(style),
        None => Row::new(vec![
            Cell::from(num),
            Cell::from(record.algorithm.as_str()),
            Cell::from("ERR").style(Style::default().fg(ERROR_COLOR)),
            Cell::from(record.failure().unwrap_or("")).style(Style::default().fg(ERROR_COLOR)),
            Cell::from(format!("{:.2} MB", record.size_mb)),
            Cell::from(format_duration(record.duration_min)),
            Cell::from(format!("{} kbps", record.bitrate_kbps)),
            Cell::from("\u{2717}").style(Style::default().fg(ERROR_COLOR)),
        ])
        .style(style),
    }
}

fn render_record_table(frame: &mut Frame, app: &mut App, area: Rect) {
    // 2 for borders, 1 for header
    let inner_height = area.height.saturating_sub(3) as usize;
    app.visible_rows = inner_height;

    let header = Row::new(
        ["#", "Algorithm", "SNR", "Ref SNR", "Size", "Duration", "Bitrate", ""]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(DIM))),
    )
    .height(1);

    let records = &app.report.records;
    let end = (app.scroll_offset + inner_height).min(records.len());
    let start = app.scroll_offset.min(end);

    let rows: Vec<Row> = records[start..end]
        .iter()
        .enumerate()
        .map(|(vi, record)| {
            let index = start + vi;
            record_row(index, record, index == app.selected)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(2),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let report = &app.report;
    let best = report
        .records
        .iter()
        .filter_map(|r| r.compressed_snr().and_then(|s| s.db()).map(|db| (db, r)))
        .max_by(|a, b| a.0.total_cmp(&b.0));
    let best_text = match best {
        Some((db, r)) => format!("Best finite SNR: {} ({:.2} dB)", r.algorithm, db),
        None => "Best finite SNR: --".to_string(),
    };

    let text = format!(
        "{}  |  {} measured, {} failed",
        best_text,
        report.measured_count(),
        report.failed_count()
    );
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keys = match app.overlay {
        Overlay::None => "[Tab] next view  [e]xport  [a]bout  [q]uit",
        Overlay::About | Overlay::Export => "[Esc] close",
    };
    let footer = Paragraph::new(keys)
        .style(Style::default().fg(DIM))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn render_about_overlay(frame: &mut Frame) {
    let area = centered_rect(48, 11, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(
            "SNR Meter",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
        Line::from(""),
        Line::from("Signal-to-noise ratio of compressed audio"),
        Line::from("against its original. \u{221e} marks a"),
        Line::from("bit-identical reconstruction."),
        Line::from(""),
        Line::from(Span::styled("[Esc] close", Style::default().fg(DIM))),
    ];

    let block = Block::default()
        .title(" About ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn render_export_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(56, 12, frame.area());
    frame.render_widget(Clear, area);

    let format_name = match app.export_format {
        ExportFormat::Text => "Text (summary and table)",
        ExportFormat::Json => "JSON",
        ExportFormat::Csv => "CSV",
        ExportFormat::Charts => "Charts (text)",
    };

    let output_path = app.out_dir.join(app.export_target());

    let mut text = vec![
        Line::from(Span::styled(
            "Export Report",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Format: ", Style::default().fg(DIM)),
            Span::styled(format_name, Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Output: ", Style::default().fg(DIM)),
            Span::styled(
                output_path.display().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] cycle format  [Enter] save  [Esc] cancel",
            Style::default().fg(DIM),
        )),
    ];

    if let Some(ref msg) = app.export_message {
        text.push(Line::from(""));
        let color = if msg.starts_with("Error") {
            ERROR_COLOR
        } else {
            COMPLETE_COLOR
        };
        text.push(Line::from(Span::styled(msg.as_str(), Style::default().fg(color))));
    }

    let block = Block::default()
        .title(" Export ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Color-code SNR values: high fidelity = green, audible loss likely = red.
fn snr_color(snr: SnrResult) -> Color {
    match snr.db() {
        None => Color::Green,
        Some(db) if db >= 30.0 => Color::Green,
        Some(db) if db >= 15.0 => Color::Yellow,
        Some(_) => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::models::{AnalysisReport, Measurement, Outcome};

    fn app() -> App {
        let record = AnalysisRecord {
            algorithm: "FLOW-AAC".to_string(),
            original: "flow-og.wav".to_string(),
            compressed: "flow-aac.aac".to_string(),
            size_mb: 3.14,
            duration_min: 205.0 / 60.0,
            bitrate_kbps: 160,
            outcome: Outcome::Measured(Measurement {
                compressed_snr: SnrResult::Finite(14.2),
                reference_snr: SnrResult::PerfectReconstruction,
                aligned_samples: 100,
                original_sample_rate: 44100,
                compressed_sample_rate: 44100,
            }),
        };
        App::new(
            AnalysisReport {
                records: vec![record],
                catalog: Some("builtin".to_string()),
            },
            PathBuf::from("out"),
        )
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_table_view() {
        let mut app = app();
        let text = screen(&mut app);
        assert!(text.contains("SNR Meter"));
        assert!(text.contains("FLOW-AAC"));
        assert!(text.contains("14.20 dB"));
        assert!(text.contains("Best finite SNR: FLOW-AAC (14.20 dB)"));
        assert!(app.visible_rows > 0);
    }

    #[test]
    fn test_every_view_renders() {
        let mut app = app();
        for _ in View::all() {
            let text = screen(&mut app);
            assert!(text.contains("[Tab] next view"));
            app.next_view();
        }
    }

    #[test]
    fn test_export_overlay() {
        let mut app = app();
        app.overlay = Overlay::Export;
        let text = screen(&mut app);
        assert!(text.contains("Export Report"));
        assert!(text.contains("snr_report.txt"));
    }
}
