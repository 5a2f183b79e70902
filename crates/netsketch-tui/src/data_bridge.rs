//! Data bridge — forwards store and selection changes as TUI actions.
//!
//! The app owns the [`InteractionController`]; panels only ever see the
//! `Arc<Topology>` snapshots published on the store's watch channel, the
//! same way they would for any other observer.

use std::sync::Arc;

use netsketch_core::{EntityId, Topology};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;

/// Forward every snapshot and selection change until cancelled.
///
/// Pushes the current values first so panels have data immediately.
pub async fn run_data_bridge(
    mut topology: watch::Receiver<Arc<Topology>>,
    mut selection: watch::Receiver<Option<EntityId>>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::TopologyUpdated(
        topology.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::SelectionChanged(
        selection.borrow_and_update().clone(),
    ));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = topology.changed() => {
                let snapshot = topology.borrow_and_update().clone();
                debug!(nodes = snapshot.nodes.len(), links = snapshot.links.len(), "dispatching TopologyUpdated");
                let _ = action_tx.send(Action::TopologyUpdated(snapshot));
            }
            Ok(()) = selection.changed() => {
                let selected = selection.borrow_and_update().clone();
                let _ = action_tx.send(Action::SelectionChanged(selected));
            }
            else => break,
        }
    }

    debug!("data bridge shut down");
}
