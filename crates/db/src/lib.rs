pub mod book;
pub mod store;

pub use book::*;
pub use store::*;
