//! Room actor: a Tokio task that runs one game's mutating jobs in order.
//!
//! Jobs arrive on a bounded mpsc channel and are awaited one at a time, so
//! two jobs for the same game never overlap. Each job runs in its own
//! task; a panicking job is logged and the actor moves on to the next.

use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use gambit_protocol::GameId;
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

type Job = BoxFuture<'static, ()>;

/// Handle to a running room actor.
///
/// Cheap to clone; the manager keeps one per game.
#[derive(Clone)]
pub struct RoomHandle {
    game_id: GameId,
    sender: mpsc::Sender<Job>,
}

impl RoomHandle {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// `true` once the actor has stopped accepting jobs.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queues `job` behind every job already submitted for this game and
    /// waits for its output.
    ///
    /// # Errors
    /// [`RoomError::Unavailable`] if the actor is gone or the job panicked.
    pub async fn run<F, T>(&self, job: F) -> Result<T, RoomError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let wrapped = async move {
            let _ = reply_tx.send(job.await);
        }
        .boxed();

        self.sender
            .send(wrapped)
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))
    }
}

struct RoomActor {
    game_id: GameId,
    receiver: mpsc::Receiver<Job>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(game_id = %self.game_id, "room actor started");

        while let Some(job) = self.receiver.recv().await {
            if let Err(e) = tokio::spawn(job).await {
                tracing::error!(game_id = %self.game_id, error = %e, "room job panicked");
            }
        }

        tracing::info!(game_id = %self.game_id, "room actor stopped");
    }
}

/// Spawns a room actor and returns a handle to it.
///
/// `capacity` bounds the job queue; submitters wait while it is full.
pub(crate) fn spawn_room(game_id: GameId, capacity: usize) -> RoomHandle {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let actor = RoomActor { game_id, receiver };
    tokio::spawn(actor.run());
    RoomHandle { game_id, sender }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_run_returns_job_output() {
        let room = spawn_room(GameId(1), 8);
        let out = room.run(async { 6 * 7 }).await.unwrap();
        assert_eq!(out, 42);
        assert_eq!(room.game_id(), GameId(1));
    }

    #[tokio::test]
    async fn test_run_jobs_never_overlap() {
        let room = spawn_room(GameId(1), 8);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let room = room.clone();
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                room.run(async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_jobs_complete_in_submission_order() {
        let room = spawn_room(GameId(1), 8);
        let log = Arc::new(tokio::sync::Mutex::new(Vec::new()));

        let slow = {
            let log = Arc::clone(&log);
            room.run(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                log.lock().await.push("slow");
            })
        };
        let fast = {
            let log = Arc::clone(&log);
            room.run(async move {
                log.lock().await.push("fast");
            })
        };
        let (a, b) = tokio::join!(slow, fast);
        a.unwrap();
        b.unwrap();
        assert_eq!(*log.lock().await, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn test_run_panicking_job_reports_unavailable_and_room_survives() {
        let room = spawn_room(GameId(3), 8);
        let result: Result<(), _> = room.run(async { panic!("boom") }).await;
        assert!(matches!(result, Err(RoomError::Unavailable(GameId(3)))));

        assert_eq!(room.run(async { 1 }).await.unwrap(), 1);
        assert!(!room.is_closed());
    }
}
