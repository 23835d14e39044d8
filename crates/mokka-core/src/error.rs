use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Validation errors
    #[error("Not a valid percent value: {value} (accuracy: {accuracy})")]
    InvalidPercent { value: i64, accuracy: u32 },

    #[error("Accuracy must be at most {max}, got {accuracy}")]
    InvalidAccuracy { accuracy: u32, max: u32 },

    #[error("Doses must be 1 or 2, got {doses}")]
    InvalidDoses { doses: i64 },

    #[error("Unknown runtime state id: {state_id}")]
    UnknownRuntimeState { state_id: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
