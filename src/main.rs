//! kating.AI - Terminal Client
//!
//! Paste raw text, submit it to the rewriting service and copy back the
//! formal academic version. The free tier accepts up to 150 words per
//! request.

use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{error, info};

use kating::application::{App, AppCommand};
use kating::domain::ServiceError;
use kating::infrastructure::{self, HttpRewriteService, RewriteWorker, Settings, SystemClipboard};
use kating::presentation::{output_scroll_limit, render_ui, InputHandler};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Entry point for the kating.AI terminal client.
///
/// Parses settings, installs file logging, starts the rewrite worker and
/// runs the UI until the user quits.
///
/// # Errors
///
/// Returns an error if logging, the HTTP client or the terminal cannot be
/// set up, or if the terminal fails during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    infrastructure::logging::init(&settings.log_path(), &settings.log_level)?;
    info!(endpoint = %settings.api_url, "starting kating.AI");

    let service = HttpRewriteService::new(settings.api_url.clone(), settings.timeout())?;
    let worker = RewriteWorker::spawn(service)?;
    let mut clipboard = SystemClipboard::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    let res = run_app(&mut terminal, &mut app, &worker, &mut clipboard);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }
    info!("kating.AI stopped");

    Ok(())
}

/// Main event loop.
///
/// Each pass draws, waits up to one tick for terminal input, then applies
/// finished rewrites and timed state. Every update lands before the next
/// draw.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    worker: &RewriteWorker,
    clipboard: &mut SystemClipboard,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let size = terminal.size()?;
        let limit = output_scroll_limit(app, Rect::new(0, 0, size.width, size.height));
        app.set_output_scroll_limit(limit);
        terminal.draw(|f| render_ui(f, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    InputHandler::handle_key_event(app, key.code, key.modifiers)
                }
                Event::Paste(text) => {
                    InputHandler::handle_paste(app, &text);
                    None
                }
                _ => None,
            };

            match command {
                Some(AppCommand::Quit) => return Ok(()),
                Some(AppCommand::Submit) => {
                    if let Some(job) = app.start_submission() {
                        if let Err(job) = worker.dispatch(job) {
                            app.finish_submission(job.abandon(ServiceError::worker_unavailable()));
                        }
                    }
                }
                Some(AppCommand::CopyOutput) => app.copy_output(clipboard),
                None => {}
            }
        }

        while let Some(done) = worker.try_completion() {
            app.finish_submission(done);
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
