pub mod clock;
pub mod desk;
pub mod injuries;
pub mod lines;
pub mod outcomes;
pub mod projection;

#[cfg(test)]
mod testing;

pub use clock::*;
pub use desk::*;
