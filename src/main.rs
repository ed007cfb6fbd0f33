use std::fs::File;
use std::io::stdout;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use komikrat::api::ComicClient;
use komikrat::app::{App, run_app};
use komikrat::event_source::TerminalEventSource;
use komikrat::{panic_handler, settings, ui};

#[derive(Parser, Debug)]
#[command(
    name = "komikrat",
    version,
    about = "A terminal reader for tile-scrambled web comics"
)]
struct Args {
    /// Content service base URL, e.g. https://comics.example.org/api
    #[arg(long, env = "KOMIKRAT_SERVER")]
    server: String,

    /// Comic id the chapter belongs to
    #[arg(long)]
    comic: i64,

    /// Chapter id to open
    #[arg(long)]
    chapter: i64,

    /// Log file path
    #[arg(long, default_value = "komikrat.log")]
    log_file: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&args.log_file)?,
    )?;

    info!("Starting komikrat");

    settings::load_settings();
    panic_handler::initialize_panic_handler();

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Graphics capability query has to happen in raw mode.
    let picker = ui::create_picker();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let client = Arc::new(ComicClient::new(args.server));
    let mut app = App::new(client, args.comic, args.chapter, picker);
    let mut events = TerminalEventSource;
    let res = run_app(&mut terminal, &mut app, &mut events);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {:?}", err);
        println!("{err:?}");
    }

    info!("Shutting down komikrat");
    Ok(())
}
