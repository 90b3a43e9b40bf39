use thiserror::Error;

use crate::model::path::PathError;
use crate::model::problem::ProblemError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Path(#[from] PathError),
}
