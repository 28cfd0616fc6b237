/// Fatal startup failures of the graphics backend.
#[derive(thiserror::Error, Debug, Clone)]
pub enum GfxError {
    #[error("could not initialize graphics: {0}")]
    Init(String),
    #[error("{label} failed to compile: {log}")]
    Compile { label: &'static str, log: String },
}
