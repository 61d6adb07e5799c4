use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the widget: font loading and window setup.
/// Gesture handling and scene building never fail.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("failed to read font file {path}: {source}")]
    FontFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font data could not be parsed")]
    InvalidFont,
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixel surface error: {0}")]
    Surface(#[from] pixels::Error),
}
