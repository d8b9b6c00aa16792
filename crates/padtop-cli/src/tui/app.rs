//! TUI application state and event loop.
//!
//! The poller writes into the shared dashboard state from its own tasks; the
//! UI reads one locked snapshot per frame and never touches the network. The
//! frame cadence is independent of the scrape cadence; frames just show
//! whatever the last completed scrape left behind.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use padtop_core::{MetricInfo, Poller, SharedDashboard, SystemInfoSnapshot};

/// UI frame budget. Scrapes land at their own pace.
const FRAME_BUDGET: Duration = Duration::from_millis(250);

/// One series as a frame renders it.
pub struct ChartView {
    pub info: &'static MetricInfo,
    /// `(timestamp, value)` oldest first.
    pub points: Vec<(f64, f64)>,
}

/// All shared state the UI needs, captured in a single lock.
pub struct FrameSnapshot {
    pub charts: Vec<ChartView>,
    pub system_info: Option<SystemInfoSnapshot>,
    pub cycle_count: u64,
    pub last_scrape_error: Option<String>,
    pub last_info_error: Option<String>,
    pub paused: bool,
}

pub struct App {
    shared: SharedDashboard,
    poller: Poller,
    rt: tokio::runtime::Handle,
    base_url: String,
    running: bool,
}

impl App {
    pub fn new(
        shared: SharedDashboard,
        poller: Poller,
        rt: tokio::runtime::Handle,
        base_url: String,
    ) -> Self {
        Self {
            shared,
            poller,
            rt,
            base_url,
            running: true,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Capture everything a frame renders under one lock.
    pub fn snapshot(&self) -> FrameSnapshot {
        let state = match self.shared.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let charts = state
            .registry
            .series()
            .map(|series| ChartView {
                info: series.info(),
                points: series.points().map(|p| (p.timestamp, p.value)).collect(),
            })
            .collect();

        FrameSnapshot {
            charts,
            system_info: state.system_info.clone(),
            cycle_count: state.cycle_count,
            last_scrape_error: state.last_scrape_error.clone(),
            last_info_error: state.last_info_error.clone(),
            paused: state.paused,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            let snapshot = self.snapshot();
            terminal.draw(|f| super::ui::draw(f, self, &snapshot))?;

            if event::poll(FRAME_BUDGET)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('p') => {
                let mut state = match self.shared.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                state.paused = !state.paused;
            }
            KeyCode::Char('i') => {
                // Refresh the system info panel on demand.
                let poller = self.poller.clone();
                self.rt.spawn(async move {
                    let _ = poller.run_system_info_cycle().await;
                });
            }
            _ => {}
        }
    }
}
