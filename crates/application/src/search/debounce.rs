//! Debouncing of typed queries.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

/// Forwards only the last query of each burst.
///
/// A query is emitted once `quiet` has elapsed without a newer one. When the
/// input closes, a pending query is flushed before the output closes.
#[must_use]
pub fn debounce(mut input: mpsc::Receiver<String>, quiet: Duration) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut pending: Option<String> = None;
        loop {
            if let Some(query) = pending.take() {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => {
                            let _ = tx.send(query).await;
                            break;
                        }
                    },
                    () = sleep(quiet) => {
                        if tx.send(query).await.is_err() {
                            break;
                        }
                    }
                }
            } else {
                match input.recv().await {
                    Some(query) => pending = Some(query),
                    None => break,
                }
            }
        }
    });

    rx
}
