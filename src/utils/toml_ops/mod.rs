pub mod reader;
pub mod types;

pub use reader::*;
pub use types::*;
