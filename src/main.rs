//! Word board runner (default binary).
//!
//! Interactive mode draws the board with the framebuffer renderer and
//! replays generation streams as they arrive. `headless` runs one
//! generation and prints the final board.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wordboard::adapter::{ChannelStream, GatewayError, GatewayRuntime};
use wordboard::cli::{parse_headless_args, HeadlessArgs};
use wordboard::config::AppConfig;
use wordboard::core::{
    Clock, MonotonicClock, Notice, PlaybackController, PuzzleSnapshot, SessionStatus,
    StartOutcome,
};
use wordboard::input::{handle_key_event, should_quit};
use wordboard::term::{BoardView, FrameBuffer, RenderThrottle, TerminalRenderer, Viewport};
use wordboard::types::{UiAction, RENDER_STATIC_INTERVAL_MS, TICK_MS};

type Playback = PlaybackController<ChannelStream>;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let headless = parse_headless_args(&args)?;
    let mut config = AppConfig::from_env();

    match headless {
        Some(args) => {
            init_stderr_logging();
            if let Some(url) = &args.url {
                config.gateway.base_url = url.clone();
            }
            run_headless(&config, &args)
        }
        None => {
            let _guard = init_file_logging(config.log_path.as_deref())?;
            let rt = GatewayRuntime::new(config.gateway.clone())?;

            let mut term = TerminalRenderer::new();
            term.enter()?;
            let result = run(&mut term, &rt, &config);
            // Always try to restore terminal state.
            let _ = term.exit();
            result
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Log to a file so the alternate screen is left alone. No path, no logging.
fn init_file_logging(path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("WORDBOARD_LOG_PATH has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(Some(guard))
}

/// Feed a blocking fetch result to the controller.
fn apply_fetch(playback: &mut Playback, now_ms: u64, result: Result<PuzzleSnapshot, GatewayError>) {
    match result {
        Ok(snapshot) => {
            playback.apply_plain(now_ms, &snapshot);
        }
        Err(err) => playback.fail_request(err.into()),
    }
}

/// Run one UI action. Returns true if the screen needs a redraw.
fn dispatch(playback: &mut Playback, rt: &GatewayRuntime, clock: &MonotonicClock, action: UiAction) -> bool {
    if action.starts_request() && !playback.control_enabled() {
        tracing::debug!(action = action.as_str(), "request in flight, ignoring");
        return false;
    }
    match action {
        UiAction::GenerateAnimated => matches!(
            playback.start_animated(clock.now_ms(), || Ok(rt.open_stream())),
            StartOutcome::Started { .. }
        ),
        UiAction::GeneratePlain => {
            let result = rt.generate_plain_blocking();
            apply_fetch(playback, clock.now_ms(), result);
            true
        }
        UiAction::LoadCurrent => {
            let result = rt.current_blocking();
            apply_fetch(playback, clock.now_ms(), result);
            true
        }
        UiAction::Cancel => playback.abandon(),
    }
}

fn run(term: &mut TerminalRenderer, rt: &GatewayRuntime, config: &AppConfig) -> Result<()> {
    let clock = MonotonicClock::new();
    let mut playback: Playback = PlaybackController::new(config.playback);
    let view = BoardView::new();
    let mut throttle = RenderThrottle::new(RENDER_STATIC_INTERVAL_MS);
    let mut fb = FrameBuffer::new(0, 0);
    let mut notice: Option<Notice> = None;
    let tick = Duration::from_millis(TICK_MS as u64);

    loop {
        let report = playback.pump(clock.now_ms());
        if let Some(n) = playback.take_notice() {
            notice = Some(n);
        }
        if report.changed() {
            throttle.invalidate();
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let animating = playback.status().is_in_flight() || !playback.entering().is_empty();
        let fingerprint = playback.board().fingerprint() ^ ((w as u64) << 48) ^ ((h as u64) << 32);
        if throttle.should_render(clock.now_ms(), fingerprint, animating) {
            view.render_into(&playback, notice.as_ref(), Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    playback.abandon();
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    if dispatch(&mut playback, rt, &clock, action) {
                        if action.starts_request() {
                            notice = playback.take_notice();
                        }
                        throttle.invalidate();
                    }
                }
            }
            Event::Resize(_, _) => {
                term.invalidate();
                throttle.invalidate();
            }
            _ => {}
        }
    }
}

fn run_headless(config: &AppConfig, args: &HeadlessArgs) -> Result<()> {
    let rt = GatewayRuntime::new(config.gateway.clone())?;
    let clock = MonotonicClock::new();
    let mut playback: Playback = PlaybackController::new(config.playback);
    tracing::info!(url = %config.gateway.base_url, plain = args.plain, "headless run");
    match rt.health_blocking() {
        Ok(body) => tracing::info!(health = %body.trim(), "generator reachable"),
        Err(err) => tracing::warn!(%err, "generator health check failed"),
    }

    if args.plain {
        apply_fetch(&mut playback, clock.now_ms(), rt.generate_plain_blocking());
    } else {
        playback.start_animated(clock.now_ms(), || Ok(rt.open_stream()));
        let tick = Duration::from_millis(TICK_MS as u64);
        while playback.status().is_in_flight() {
            playback.pump(clock.now_ms());
            std::thread::sleep(tick);
        }
    }

    let notice = playback.take_notice();
    let fb = BoardView::new().render(&playback, notice.as_ref(), Viewport::new(100, 30));
    for y in 0..fb.height() {
        println!("{}", fb.row_text(y).trim_end());
    }
    if !playback.rack().is_empty() {
        println!("Remaining: {}", playback.rack().listing());
    }

    match (playback.status(), notice) {
        (SessionStatus::Failed, Some(Notice::Failed(message))) => Err(anyhow!(message)),
        (SessionStatus::Failed, _) => Err(anyhow!("generation failed")),
        _ => Ok(()),
    }
}
