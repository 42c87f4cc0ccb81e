pub mod app;
pub mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::models::AnalysisReport;

use app::{App, Overlay};

/// Browse a finished report interactively.
pub fn run(report: AnalysisReport, out_dir: &Path) -> Result<()> {
    let mut app = App::new(report, out_dir.to_path_buf());

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code);
                }
            }
        }
    }
    Ok(())
}

pub fn handle_key(app: &mut App, code: KeyCode) {
    match app.overlay {
        Overlay::None => match code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_view(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
            KeyCode::Char('e') => {
                app.overlay = Overlay::Export;
                app.export_message = None;
            }
            KeyCode::Char('a') => app.overlay = Overlay::About,
            _ => {}
        },
        Overlay::About => {
            if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
                app.overlay = Overlay::None;
            }
        }
        Overlay::Export => match code {
            KeyCode::Esc => app.overlay = Overlay::None,
            KeyCode::Tab => {
                app.cycle_export_format();
                app.export_message = None;
            }
            KeyCode::Enter => app.export(),
            _ => {}
        },
    }
}
