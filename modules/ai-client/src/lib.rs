pub mod claude;
pub mod error;

pub use claude::Claude;
pub use error::{AiError, Result};
