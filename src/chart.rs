//! Chart rendering with ratatui widgets.
//!
//! Every chart can be drawn into any [`Buffer`]: the interactive viewer draws
//! into the terminal frame, report export draws into an off-screen buffer and
//! writes the result as plain text.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Widget};

use crate::format::format_duration;
use crate::models::{AnalysisReport, SnrResult};

pub const CHART_WIDTH: u16 = 100;
pub const CHART_HEIGHT: u16 = 30;

const BAR_GAP: u16 = 2;
const SNR_COLOR: Color = Color::LightBlue;
const SIZE_COLOR: Color = Color::Rgb(255, 165, 0);
const REFERENCE_COLOR: Color = Color::Green;
const DURATION_COLOR: Color = Color::Magenta;
const BITRATE_COLOR: Color = Color::Rgb(255, 165, 0);
const MARKER_COLOR: Color = Color::Red;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    ReferenceSnr,
    SnrVsSize,
    Duration,
    Bitrate,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::ReferenceSnr,
        ChartKind::SnrVsSize,
        ChartKind::Duration,
        ChartKind::Bitrate,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ReferenceSnr => "Signal-to-Noise Ratio (SNR) of Original Files",
            ChartKind::SnrVsSize => "Comparison of SNR and File Sizes for Compression Algorithms",
            ChartKind::Duration => "File Durations of Compressed Files (minutes)",
            ChartKind::Bitrate => "Bit Rates of Compressed Files (kbps)",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::ReferenceSnr => "chart_reference_snr.txt",
            ChartKind::SnrVsSize => "chart_snr_vs_size.txt",
            ChartKind::Duration => "chart_duration.txt",
            ChartKind::Bitrate => "chart_bitrate.txt",
        }
    }
}

/// One bar: category label, plotted height and the text drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub text: String,
    /// Drawn at the placeholder height; annotated with a marker instead of a number.
    pub perfect: bool,
}

impl BarDatum {
    fn plain(label: &str, value: f64, text: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            text,
            perfect: false,
        }
    }

    fn snr(label: &str, snr: Option<SnrResult>) -> Self {
        match snr {
            Some(snr) => Self {
                label: label.to_string(),
                value: snr.display_value(),
                text: snr.label(),
                perfect: snr.is_perfect(),
            },
            None => Self::plain(label, 0.0, "n/a".to_string()),
        }
    }
}

/// Bars for a chart, one per record in report order.
pub fn chart_data(kind: ChartKind, report: &AnalysisReport) -> Vec<BarDatum> {
    report
        .records
        .iter()
        .map(|r| match kind {
            ChartKind::ReferenceSnr => BarDatum::snr(&r.original, r.reference_snr()),
            ChartKind::SnrVsSize => BarDatum::snr(&r.algorithm, r.compressed_snr()),
            ChartKind::Duration => {
                BarDatum::plain(&r.algorithm, r.duration_min, format_duration(r.duration_min))
            }
            ChartKind::Bitrate => {
                BarDatum::plain(&r.algorithm, r.bitrate_kbps as f64, r.bitrate_kbps.to_string())
            }
        })
        .collect()
}

pub fn render_chart(kind: ChartKind, report: &AnalysisReport, area: Rect, buf: &mut Buffer) {
    match kind {
        ChartKind::SnrVsSize => render_snr_vs_size(report, area, buf),
        _ => render_bar_chart(kind, &chart_data(kind, report), area, buf),
    }
}

/// Render a chart off-screen and return it as text, one line per row.
pub fn render_to_string(kind: ChartKind, report: &AnalysisReport, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    render_chart(kind, report, area, &mut buf);
    buffer_to_string(&buf)
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// BarChart values are integers; keep two decimals of resolution.
/// Every bar gets at least one unit so its text is still drawn.
fn bar_units(value: f64) -> u64 {
    ((value.max(0.0) * 100.0).round() as u64).max(1)
}

fn bar_width(inner_width: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 1;
    }
    let bars = bars as u16;
    let gaps = BAR_GAP.saturating_mul(bars - 1);
    (inner_width.saturating_sub(gaps) / bars).clamp(3, 24)
}

fn render_bar_chart(kind: ChartKind, data: &[BarDatum], area: Rect, buf: &mut Buffer) {
    let color = match kind {
        ChartKind::ReferenceSnr => REFERENCE_COLOR,
        ChartKind::SnrVsSize => SNR_COLOR,
        ChartKind::Duration => DURATION_COLOR,
        ChartKind::Bitrate => BITRATE_COLOR,
    };

    let bars: Vec<Bar> = data
        .iter()
        .map(|d| {
            let value_style = if d.perfect {
                Style::default()
                    .fg(MARKER_COLOR)
                    .bg(color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Black).bg(color)
            };
            Bar::default()
                .value(bar_units(d.value))
                .text_value(d.text.clone())
                .label(Line::from(d.label.clone()))
                .style(Style::default().fg(color))
                .value_style(value_style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ", kind.title()))
        .borders(Borders::ALL);

    BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area.width.saturating_sub(2), data.len()))
        .bar_gap(BAR_GAP)
        .render(area, buf);
}

/// Compressed SNR as bars on the left axis, file size as a line on the right axis.
fn render_snr_vs_size(report: &AnalysisReport, area: Rect, buf: &mut Buffer) {
    const BAR_HALF_WIDTH: f64 = 0.3;
    const FILL_STEPS: usize = 24;

    let bars = chart_data(ChartKind::SnrVsSize, report);
    let sizes: Vec<f64> = report.records.iter().map(|r| r.size_mb).collect();
    let count = bars.len();

    let title = Line::from(vec![
        Span::raw(format!(" {} ", ChartKind::SnrVsSize.title())),
        Span::styled("\u{2588} SNR (dB) ", Style::default().fg(SNR_COLOR)),
        Span::styled("\u{25cf} File Size (MB) ", Style::default().fg(SIZE_COLOR)),
    ]);
    let block = Block::default().title(title).borders(Borders::ALL);

    if count == 0 {
        block.render(area, buf);
        return;
    }

    let snr_top = bars.iter().map(|d| d.value).fold(0.0, f64::max).max(1.0);
    let snr_bottom = bars.iter().map(|d| d.value).fold(0.0, f64::min);
    let size_top = sizes.iter().copied().fold(0.0, f64::max);
    let y_max = snr_top * 1.15;
    let span = y_max - snr_bottom;
    let y_min = snr_bottom - span * 0.12;
    let x_max = count as f64 + 1.0;
    let cell_width = x_max / area.width.saturating_sub(2).max(1) as f64;

    // The size axis is mapped onto the SNR axis so that size_top sits at snr_top.
    let project = move |mb: f64| {
        if size_top > 0.0 {
            mb / size_top * snr_top
        } else {
            0.0
        }
    };
    let centered = move |x: f64, text: &str| x - text.chars().count() as f64 / 2.0 * cell_width;

    Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, x_max])
        .y_bounds([y_min, y_max])
        .paint(move |ctx| {
            ctx.draw(&CanvasLine::new(0.5, 0.0, x_max - 0.5, 0.0, Color::DarkGray));
            ctx.draw(&CanvasLine::new(0.5, snr_bottom, 0.5, snr_top, SNR_COLOR));
            ctx.draw(&CanvasLine::new(x_max - 0.5, 0.0, x_max - 0.5, snr_top, SIZE_COLOR));

            for (i, bar) in bars.iter().enumerate() {
                let x = i as f64 + 1.0;
                for step in 0..=FILL_STEPS {
                    let dx = -BAR_HALF_WIDTH + 2.0 * BAR_HALF_WIDTH * step as f64 / FILL_STEPS as f64;
                    ctx.draw(&CanvasLine::new(x + dx, 0.0, x + dx, bar.value, SNR_COLOR));
                }
            }

            ctx.layer();

            for (i, pair) in sizes.windows(2).enumerate() {
                let x = i as f64 + 1.0;
                ctx.draw(&CanvasLine::new(x, project(pair[0]), x + 1.0, project(pair[1]), SIZE_COLOR));
            }
            let coords: Vec<(f64, f64)> = sizes
                .iter()
                .enumerate()
                .map(|(i, &mb)| (i as f64 + 1.0, project(mb)))
                .collect();
            ctx.draw(&Points {
                coords: &coords,
                color: SIZE_COLOR,
            });

            for (i, bar) in bars.iter().enumerate() {
                let x = i as f64 + 1.0;
                let style = if bar.perfect {
                    Style::default().fg(MARKER_COLOR).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ctx.print(
                    centered(x, &bar.text),
                    bar.value.max(0.0) + span * 0.04,
                    Span::styled(bar.text.clone(), style),
                );
                ctx.print(
                    centered(x, &bar.label),
                    snr_bottom - span * 0.06,
                    Span::raw(bar.label.clone()),
                );
            }

            ctx.print(0.0, snr_top, Span::styled(format!("{:.0}dB", snr_top), Style::default().fg(SNR_COLOR)));
            ctx.print(0.0, 0.0, Span::styled("0dB", Style::default().fg(SNR_COLOR)));
            ctx.print(
                x_max - 0.45,
                snr_top,
                Span::styled(format!("{:.1}MB", size_top), Style::default().fg(SIZE_COLOR)),
            );
            ctx.print(x_max - 0.45, 0.0, Span::styled("0MB", Style::default().fg(SIZE_COLOR)));
        })
        .render(area, buf);
}
