pub mod outcome;
pub mod runner;

pub use outcome::*;
pub use runner::*;
