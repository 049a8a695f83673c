pub mod animation;
pub mod cli;
pub mod interaction;
pub mod motion;
pub mod reminders;
pub mod session;
pub mod settings;
pub mod sprites;
pub mod surface;
pub mod timer;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use cli::Cli;
use interaction::InputEvent;
use session::{run_session, PetSession};
use settings::PetSettings;
use sprites::SpriteAnimationSet;
use surface::LogSurface;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

const INPUT_QUEUE_DEPTH: usize = 64;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    utils::init_logging(if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    log_info!("deskpet starting up...");

    if cli.init_settings {
        PetSettings::default().save(&cli.settings)?;
        log_info!("Wrote default settings to {}", cli.settings.display());
        return Ok(());
    }

    let settings = PetSettings::load(&cli.settings)?;
    let sprites = match &cli.manifest {
        Some(manifest) => SpriteAnimationSet::load(&cli.sheet, manifest, settings.sprite_size),
        None => SpriteAnimationSet::load_single_image(&cli.sheet, settings.sprite_size),
    }
    .with_context(|| format!("Failed to load sprites from {}", cli.sheet.display()))?;
    let sprites = Arc::new(sprites);

    let session = match cli.seed {
        Some(seed) => PetSession::with_rng(
            &settings,
            sprites,
            LogSurface::new(),
            StdRng::seed_from_u64(seed),
        ),
        None => PetSession::new(&settings, sprites, LogSurface::new()),
    };

    // Timers and input callbacks must never overlap, so everything runs on
    // one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build the tokio runtime")?;

    let (reason, session) = runtime.block_on(async move {
        let shutdown = CancellationToken::new();
        let (tx, rx) = mpsc::channel(INPUT_QUEUE_DEPTH);

        tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));
        tokio::spawn(forward_stdin_events(tx));

        run_session(session, rx, shutdown).await
    });

    log_info!(
        "deskpet exiting ({:?}) after {} frames",
        reason,
        session.surface().frames_presented()
    );
    drop(session);

    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    Ok(())
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            log_info!("Ctrl-C received, shutting down");
            shutdown.cancel();
        }
        Err(err) => log_warn!("Failed to listen for Ctrl-C: {err}"),
    }
}

/// One JSON-encoded [`InputEvent`] per line. Bad lines are skipped.
async fn forward_stdin_events(events: mpsc::Sender<InputEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<InputEvent>(line) {
                    Ok(event) => {
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => log_warn!("Ignoring input line {line:?}: {err}"),
                }
            }
            Ok(None) => break,
            Err(err) => {
                log_warn!("Failed to read stdin: {err}");
                break;
            }
        }
    }
}
