use thiserror::Error;

#[derive(Error, Debug)]
pub enum SawqError {
    #[error("Search error: {0}")]
    Search(String),

    #[error("Content generation error: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
