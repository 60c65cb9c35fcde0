pub mod catalog;
pub mod report;
pub mod pick;
pub mod injury;
pub mod intelligence;
pub mod line;
pub mod client;
pub mod error;

pub use catalog::*;
pub use report::*;
pub use pick::*;
pub use injury::*;
pub use intelligence::*;
pub use line::*;
pub use client::*;
pub use error::*;
