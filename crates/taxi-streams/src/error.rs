use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxiStreamsError {
    #[error("CSV parse error: {0}")]
    Parse(String),

    #[error("trip-time matrix missing off-diagonal entry ({0}, {1})")]
    MissingTripTime(usize, usize),

    #[error("deterministic pax stream exhausted")]
    StreamExhausted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TaxiStreamsResult<T> = Result<T, TaxiStreamsError>;
