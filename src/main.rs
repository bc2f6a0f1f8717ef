use anyhow::Context;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tarefas::{app::App, config::Cli, config::Config, logging, tracker::Tracker, ui};

fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    let _logger = logging::init_logging(&config.log_level, &config.log_dir)
        .context("failed to initialize logging")?;
    info!(
        "event=config data_dir={} ephemeral={}",
        config.data_dir.display(),
        config.ephemeral
    );

    let mut tracker = Tracker::open(config.storage());

    // Terminal setup
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut tracker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!("event=app_exit status=error error={err}");
    } else {
        info!("event=app_exit status=ok");
    }
    result.context("terminal session failed")
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, tracker: &mut Tracker) -> io::Result<()> {
    let mut app = App::new(tracker, Local::now().date_naive());
    loop {
        app.set_today(Local::now().date_naive());
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
        if app.should_quit() {
            return Ok(());
        }
    }
}
