//! Playback surface trait and the timer-driven simulator

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::PlaybackError;
use crate::types::{PlaybackEvent, PlaybackRequest};

/// Core playback surface interface
///
/// Implementations render a clip and deliver events out of band. The
/// contract: exactly one `Completed` per non-looping play, none for looping
/// plays, and a play that gets superseded must not complete later.
#[async_trait]
pub trait PlaybackSurface: Send {
    /// Start rendering the requested clip, superseding the current one.
    async fn play(&mut self, request: PlaybackRequest) -> Result<(), PlaybackError>;

    /// Stop the current clip without completing it.
    async fn stop(&mut self) -> Result<(), PlaybackError>;
}

/// Headless surface: pretends every non-looping clip runs for a fixed
/// duration, then reports completion. Looping clips just stay on screen.
pub struct SimulatedSurface {
    clip_duration: Duration,
    event_tx: mpsc::Sender<PlaybackEvent>,
    pending: Option<JoinHandle<()>>,
    current_play: Option<u64>,
}

impl SimulatedSurface {
    pub fn new(clip_duration: Duration, event_tx: mpsc::Sender<PlaybackEvent>) -> Self {
        Self {
            clip_duration,
            event_tx,
            pending: None,
            current_play: None,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[async_trait]
impl PlaybackSurface for SimulatedSurface {
    async fn play(&mut self, request: PlaybackRequest) -> Result<(), PlaybackError> {
        // A new clip supersedes the old one; its completion must never fire.
        self.cancel_pending();
        self.current_play = Some(request.play_id);

        info!(
            target: "playback",
            "Playing {} (loop: {}, play {})",
            request.asset.display(),
            request.looped,
            request.play_id
        );
        self.event_tx
            .send(PlaybackEvent::Started {
                play_id: request.play_id,
            })
            .await
            .map_err(|_| PlaybackError::SurfaceClosed)?;

        if !request.looped {
            let event_tx = self.event_tx.clone();
            let clip_duration = self.clip_duration;
            let play_id = request.play_id;
            self.pending = Some(tokio::spawn(async move {
                tokio::time::sleep(clip_duration).await;
                debug!(target: "playback", "Clip finished (play {})", play_id);
                let _ = event_tx
                    .send(PlaybackEvent::Completed { play_id })
                    .await;
            }));
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), PlaybackError> {
        self.cancel_pending();
        if let Some(play_id) = self.current_play.take() {
            info!(target: "playback", "Playback stopped (play {})", play_id);
            self.event_tx
                .send(PlaybackEvent::Stopped { play_id })
                .await
                .map_err(|_| PlaybackError::SurfaceClosed)?;
        }
        Ok(())
    }
}

impl Drop for SimulatedSurface {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::next_play_id;
    use std::path::PathBuf;

    fn request(looped: bool) -> PlaybackRequest {
        PlaybackRequest {
            play_id: next_play_id(),
            asset: PathBuf::from("clip.mp4"),
            looped,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn non_looping_play_completes_once() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut surface = SimulatedSurface::new(Duration::from_secs(3), tx);

        let req = request(false);
        let play_id = req.play_id;
        surface.play(req).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Started { play_id }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Completed { play_id }
        );

        // Exactly one completion.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn looping_play_never_completes() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut surface = SimulatedSurface::new(Duration::from_secs(3), tx);

        surface.play(request(true)).await.unwrap();
        assert!(matches!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Started { .. }
        ));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_play_does_not_complete() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut surface = SimulatedSurface::new(Duration::from_secs(3), tx);

        let first = request(false);
        let first_id = first.play_id;
        surface.play(first).await.unwrap();

        let second = request(true);
        let second_id = second.play_id;
        surface.play(second).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Started { play_id: first_id }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Started { play_id: second_id }
        );

        // The first clip's completion timer was cancelled.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_reports_stopped_not_completed() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut surface = SimulatedSurface::new(Duration::from_secs(3), tx);

        let req = request(false);
        let play_id = req.play_id;
        surface.play(req).await.unwrap();
        surface.stop().await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Started { play_id }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::Stopped { play_id }
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
