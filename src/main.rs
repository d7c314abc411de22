//! A scroll-driven portfolio page for the terminal.
//!
//! Run the binary to open the page.  The link committed in the search hero
//! is printed to stdout on exit so a shell wrapper can open it.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Terminal};

use crate::app::{
    event::{self, AppEvent},
    handler,
    rank_runtime::{spawn_rank_job, RankUpdate},
    state::AppState,
};
use crate::core::catalog::Catalog;
use crate::core::rerank::{ChatReranker, Reranker};
use crate::ui::{layout::AppLayout, theme::Theme, PageView};

/// Target time between two rendered frames (~60 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven portfolio page for the terminal")]
struct Cli {
    /// Directory holding `socials.yaml` and `projects.yaml` (defaults to the
    /// bundled copies).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Never call the remote ranking endpoint.
    #[arg(long = "no-remote")]
    no_remote: bool,

    /// Wrap the projects carousel instead of clamping it.
    #[arg(long = "loop-carousel")]
    loop_carousel: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        // Only meaningful with RUST_LOG set; never pollute stdout.
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    // ── configuration layers ──────────────────────────────────
    let mut user_config = config::AppConfig::load();
    if cli.no_remote {
        user_config.remote.enabled = false;
    }
    if cli.loop_carousel {
        user_config.loop_carousel = true;
    }

    let catalog = Catalog::load(cli.data.as_deref());
    let reranker: Option<Arc<dyn Reranker>> = ChatReranker::from_config(&user_config.remote)
        .map(|r| Arc::new(r) as Arc<dyn Reranker>);
    tracing::info!(
        remote_ranking = reranker.is_some(),
        projects = catalog.projects.len(),
        "starting"
    );
    let mut state = AppState::new(user_config, catalog, reranker.is_some());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, reranker).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result?;

    if let Some(url) = state.search.committed_url() {
        println!("{url}");
    }

    Ok(())
}

/// Event loop.  Events only queue input; state advances and the screen is
/// drawn once per frame tick.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    reranker: Option<Arc<dyn Reranker>>,
) -> Result<()> {
    let mut events = event::subscribe(Duration::from_millis(50));
    let (rank_tx, mut rank_rx) = tokio::sync::mpsc::unbounded_channel::<RankUpdate>();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                let now = Instant::now();
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k, now),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    // Picked up by the next frame's layout pass.
                    AppEvent::Resize => {}
                }
            }

            Some(update) = rank_rx.recv() => {
                state.search.apply_remote(update.generation, update.hits);
                while let Ok(update) = rank_rx.try_recv() {
                    state.search.apply_remote(update.generation, update.hits);
                }
            }

            _ = frames.tick() => {
                let now = Instant::now();
                let size = terminal.size()?;
                let layout = AppLayout::from_area(Rect::new(0, 0, size.width, size.height));
                state.set_page_area(layout.page_area);
                state.advance_frame(now);

                if let Some(job) = state.pending_rank_job.take() {
                    match &reranker {
                        Some(r) => {
                            spawn_rank_job(
                                rank_tx.clone(),
                                Arc::clone(r),
                                state.search.candidates(),
                                job,
                            );
                        }
                        None => {
                            state.search.apply_remote(job.generation, None);
                        }
                    }
                }

                let exiting = state.is_exiting(now);
                terminal.draw(|frame| {
                    let layout = AppLayout::from_area(frame.area());
                    frame.render_widget(
                        PageView {
                            state,
                            exiting,
                        },
                        layout.page_area,
                    );
                    let hint = state.config.status_bar_hint();
                    let status_text = state.status_message.as_deref().unwrap_or(&hint);
                    frame.render_widget(
                        Paragraph::new(status_text).style(Theme::status_bar_style()),
                        layout.status_area,
                    );
                })?;
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
