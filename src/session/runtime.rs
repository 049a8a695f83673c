use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::interaction::InputEvent;
use crate::surface::PetSurface;

use super::{PetSession, SessionControl};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The shutdown token was cancelled (Ctrl-C, embedding app closing).
    Cancelled,
    /// Exit was picked from the pet's context menu.
    ExitRequested,
}

/// Drive `session` on the current task until it is told to exit.
///
/// Timers and input share one task, so every callback runs to completion
/// before the next one starts. Closing the input channel does not end the
/// session; the pet keeps wandering on its timers.
pub async fn run_session<S: PetSurface>(
    mut session: PetSession<S>,
    mut events: mpsc::Receiver<InputEvent>,
    shutdown: CancellationToken,
) -> (ExitReason, PetSession<S>) {
    let epoch = Instant::now();
    let mut input_open = true;

    log_info!("Session loop started for {}", session.id());

    let reason = loop {
        let wake_at = session
            .next_deadline()
            .map(|deadline| epoch + Duration::from_millis(deadline));

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                log_info!("Session loop cancelled");
                break ExitReason::Cancelled;
            }

            event = events.recv(), if input_open => match event {
                Some(event) => {
                    let now_ms = millis_since(epoch);
                    if session.handle_input(event, now_ms) == SessionControl::Shutdown {
                        break ExitReason::ExitRequested;
                    }
                }
                None => {
                    log_debug!("Input channel closed; timers keep running");
                    input_open = false;
                }
            },

            _ = sleep_until_deadline(wake_at) => {
                session.advance_to(millis_since(epoch));
            }
        }
    };

    session.stop();
    (reason, session)
}

fn millis_since(epoch: Instant) -> u64 {
    u64::try_from(epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn sleep_until_deadline(wake_at: Option<Instant>) {
    match wake_at {
        Some(instant) => tokio::time::sleep_until(instant).await,
        None => std::future::pending::<()>().await,
    }
}
