pub mod hypothesis;
pub mod results;
pub mod verdict;

pub use hypothesis::*;
pub use results::*;
pub use verdict::*;
