use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("linear algebra failure: {0}")]
    Linalg(#[from] rulinalg::error::Error),

    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    #[error("iteration limit of {0} reached")]
    IterationLimit(usize),

    #[error("node limit of {0} reached")]
    NodeLimit(usize),

    #[error("name {0:?} is already in use")]
    DuplicateName(String),

    #[error("variable {0} does not belong to this model")]
    UnknownVariable(usize),
}
