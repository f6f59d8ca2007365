pub mod error;
pub mod history;
pub mod ordering;

pub use error::{GitError, Result};
pub use history::{FetchOutcome, RealHistorySource};
