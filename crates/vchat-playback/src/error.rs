use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Playback surface is closed")]
    SurfaceClosed,
}
