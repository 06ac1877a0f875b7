use clap::Parser;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::library::TagReader;
use crate::ui::InputState;
use crate::workflow::{Notice, ReviewWorkflow};

mod cli;
mod event_loop;
mod logging;
mod settings;
mod startup;
mod terminal;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let (settings, config_problem) = settings::load_settings(cli.config.as_deref());

    match logging::init(&settings.logging) {
        Ok(path) => eprintln!("setlist: logging to {}", path.display()),
        Err(e) => eprintln!("setlist: logging disabled: {e}"),
    }
    info!(version = env!("CARGO_PKG_VERSION"), "setlist starting");
    if let Some(problem) = &config_problem {
        warn!(%problem, "config");
    }

    // Authorization may prompt on stdin, so it has to happen before raw mode.
    let (catalog, catalog_notice) = startup::connect_catalog(&settings.catalog);
    let player = startup::open_player(&settings);

    let mut workflow = ReviewWorkflow::new(
        catalog,
        Box::new(TagReader),
        Box::new(player),
        settings.library.clone(),
        settings.catalog.search_limit,
    );

    let mut input = InputState {
        directory: cli
            .dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default(),
        playlist: cli.playlist.clone().unwrap_or_default(),
        ..InputState::default()
    };
    if let (Some(dir), Some(name)) = (&cli.dir, &cli.playlist) {
        workflow.start(dir, name);
    }
    if let Some(notice) = catalog_notice {
        workflow.post_notice(notice);
    }
    if let Some(problem) = config_problem {
        workflow.post_notice(Notice::error("Configuration", problem));
    }

    terminal::install_panic_hook();
    let mut guard = terminal::TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut workflow, &mut input);

    workflow.shutdown();
    guard.restore()?;

    if let Some(summary) = workflow.summary() {
        println!("{}", summary.report());
    }
    info!("setlist exiting");
    run_result
}
