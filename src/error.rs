use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not defined on the UTM grid: {0}")]
    NotDefinedOnUtmGrid(String),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(
        "Inverse projection did not converge after {iterations} iterations \
         (residual {residual} m)"
    )]
    NoConvergence { iterations: usize, residual: f64 },
}
