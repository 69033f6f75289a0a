//! Terminal runner (default binary).
//!
//! Owns the clock: polls crossterm for key events, feeds them through the
//! held-key handler into a [`Session`], and ticks gravity every frame.

mod options;

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use flexi_logger::{FileSpec, Logger, LoggerHandle, WriteMode};
use log::{debug, error, info};

use blockfall::core::{GameSnapshot, Presenter, Session};
use blockfall::input::{handle_key_event, should_quit, InputHandler};
use blockfall::term::{AsciiPresenter, ColorPresenter};
use blockfall::types::{GameAction, FRAME_MS};

use options::{Options, RendererKind};

fn main() -> Result<()> {
    let options = Options::parse();
    let _logger = init_logger(&options)?;

    let seed = options.seed.unwrap_or_else(clock_seed);
    info!("starting: seed={seed} renderer={:?}", options.renderer);

    let mut frontend = match options.renderer {
        RendererKind::Color => Frontend::Color(ColorPresenter::new()),
        RendererKind::Ascii => Frontend::Ascii(AsciiPresenter::new()),
    };
    frontend.enter()?;

    let result = run(&mut frontend, Session::new(seed));

    // Always try to restore terminal state.
    if let Err(e) = frontend.exit() {
        error!("failed to restore terminal: {e:#}");
    }
    if let Err(e) = &result {
        error!("fatal error: {e:#}");
    }
    result
}

fn init_logger(options: &Options) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&options.log_level)?;
    // The terminal belongs to the renderer, so logs never go to stderr.
    let logger = match &options.log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename("blockfall"))
            .write_mode(WriteMode::BufferAndFlush)
            .format(flexi_logger::detailed_format),
        None => logger.do_not_log(),
    };
    Ok(logger.start()?)
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}

fn run(frontend: &mut Frontend, mut session: Session) -> Result<()> {
    let mut input = InputHandler::new();
    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        session.present(frontend)?;

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            info!("quit: score={}", session.engine().score());
                            return Ok(());
                        }
                        if let Some(action) = input.handle_key_press(key.code) {
                            session.apply(action);
                        } else if let Some(action) = handle_key_event(key) {
                            // Held moves repeat through `input.update`.
                            if !matches!(action, GameAction::Move(_)) {
                                apply(&mut session, &mut input, action);
                            }
                        }
                    }
                    // Repeats are generated by the held-key handler.
                    KeyEventKind::Repeat => {}
                    KeyEventKind::Release => input.handle_key_release(key.code),
                },
                Event::Resize(..) => frontend.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);

            for action in input.update(elapsed_ms) {
                session.apply(action);
            }
            if let Some(landing) = session.tick(elapsed_ms) {
                debug!(
                    "gravity landed {} with {} lines",
                    landing.kind.as_str(),
                    landing.lines_cleared
                );
            }
        }
    }
}

fn apply(session: &mut Session, input: &mut InputHandler, action: GameAction) {
    if action == GameAction::Restart {
        input.reset();
    }
    session.apply(action);
}

/// The presenter chosen on the command line.
enum Frontend {
    Color(ColorPresenter),
    Ascii(AsciiPresenter),
}

impl Frontend {
    fn enter(&mut self) -> Result<()> {
        match self {
            Frontend::Color(p) => p.enter(),
            Frontend::Ascii(p) => p.enter(),
        }
    }

    fn exit(&mut self) -> Result<()> {
        match self {
            Frontend::Color(p) => p.exit(),
            Frontend::Ascii(p) => p.exit(),
        }
    }

    fn invalidate(&mut self) {
        if let Frontend::Color(p) = self {
            p.invalidate();
        }
    }
}

impl Presenter for Frontend {
    type Error = anyhow::Error;

    fn present(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        match self {
            Frontend::Color(p) => p.present(snapshot),
            Frontend::Ascii(p) => p.present(snapshot),
        }
    }
}
