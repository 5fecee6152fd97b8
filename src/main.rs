use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::panic;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, terminal, ExecutableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade::config::Config;
use arcade::display::TerminalSurface;
use arcade::game::{run, Game};
use arcade::input::TerminalInput;

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file or nowhere; stderr shares the screen with the game.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn enter_terminal<W: Write>(out: &mut W) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    Ok(())
}

fn restore_terminal<W: Write>(out: &mut W) {
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// A broken chain invariant panics; put the terminal back before the panic
/// message is printed so it stays readable.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal(&mut stdout());
        default_hook(info);
    }));
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let (width, height) = terminal::size().context("reading terminal size")?;
    let mut game = Game::new(width, height)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::info!("terminal {}x{}, seed {:?}", width, height, config.seed);

    let mut out = BufWriter::new(stdout());
    install_panic_hook();
    enter_terminal(&mut out).context("preparing terminal")?;

    let result = {
        let mut surface = TerminalSurface::new(&mut out, width, height);
        run(&mut game, &mut surface, &mut TerminalInput, &mut rng, &config)
    };

    // Always restore the terminal
    restore_terminal(&mut out);

    result.context("game loop failed")
}
