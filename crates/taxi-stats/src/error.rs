use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxiStatsError {
    #[error("CDF drift {drift:.6} exceeds tolerance {tolerance:.6}")]
    CdfTolerance { drift: f64, tolerance: f64 },

    #[error("OD matrix must have at least one positive entry")]
    EmptyOdMatrix,

    #[error("OD matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}

pub type TaxiStatsResult<T> = Result<T, TaxiStatsError>;
