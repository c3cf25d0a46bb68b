/// An error type for the linalg module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LinalgError {
    /// Error when the matrix cannot be inverted.
    #[error("Matrix is singular")]
    Singular,
}
