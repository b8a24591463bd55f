//! Form event routing.
//!
//! Presentation layers register once through [`attach_listeners`] and then only
//! send [`UiEvent`]s. Each event maps onto one controller method; submissions
//! run as their own tasks so the form stays responsive while a search is in
//! flight.

use super::controller::SearchController;
use crate::model::{Field, SubmitOutcome};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

/// Events raised by the form controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UiEvent {
    Submit,
    Focus(Field),
    SwapCities,
    Quit,
}

/// Notifications sent back to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiUpdate {
    Finished(SubmitOutcome),
}

/// Spawn the controller loop and hand back the event sender and the join handle.
pub(crate) fn attach_listeners(
    controller: Arc<SearchController>,
    update_tx: UnboundedSender<UiUpdate>,
) -> (
    UnboundedSender<UiEvent>,
    tokio::task::JoinHandle<()>,
) {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let handle = tokio::spawn(run_controller(controller, event_rx, update_tx));
    (event_tx, handle)
}

/// Dispatch form events until `Quit` or until every sender is gone.
///
/// Overlapping submissions are allowed; the controller's submission token keeps
/// stale ones from rendering. On quit, in-flight searches are aborted, which
/// drops their spinners.
pub(crate) async fn run_controller(
    controller: Arc<SearchController>,
    mut event_rx: UnboundedReceiver<UiEvent>,
    update_tx: UnboundedSender<UiUpdate>,
) {
    let mut in_flight: JoinSet<SubmitOutcome> = JoinSet::new();

    loop {
        tokio::select! {
            ev = event_rx.recv() => {
                match ev {
                    Some(UiEvent::Submit) => {
                        let ctl = controller.clone();
                        in_flight.spawn(async move { ctl.on_submit().await });
                    }
                    Some(UiEvent::Focus(field)) => controller.on_focus(field),
                    Some(UiEvent::SwapCities) => controller.switch_cities(),
                    Some(UiEvent::Quit) | None => break,
                }
            }
            // Parked while nothing is in flight; join_next on an empty set resolves immediately.
            done = async {
                if in_flight.is_empty() {
                    futures::future::pending().await
                } else {
                    in_flight.join_next().await
                }
            } => {
                if let Some(joined) = done {
                    report(&update_tx, joined);
                }
            }
        }
    }

    if !in_flight.is_empty() {
        debug!(count = in_flight.len(), "aborting in-flight searches");
    }
    in_flight.shutdown().await;
}

fn report(update_tx: &UnboundedSender<UiUpdate>, joined: Result<SubmitOutcome, JoinError>) {
    match joined {
        Ok(outcome) => {
            let _ = update_tx.send(UiUpdate::Finished(outcome));
        }
        Err(e) if e.is_cancelled() => {}
        Err(e) => warn!("search task failed: {e}"),
    }
}
