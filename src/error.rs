// One error type for the whole binary.
// Every variant states *where* things went wrong.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String), // Loading or validating the TOML config failed

    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the overlay window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the overlay buffer failed

    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed

    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    #[error("Detector error: {0}")]
    Detector(String), // Landmark detector sent something we cannot use

    #[error("Detector exited: {0}")]
    DetectorExited(String), // Landmark detector process is gone

    #[error("Malformed hand: expected 21 landmarks in order, {0}")]
    MalformedHand(String),

    #[error("Pointer init error: {0}")]
    PointerInit(String), // OS pointer backend unavailable

    #[error("Pointer error: {0}")]
    Pointer(String), // A single move/click/press/release failed

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
