pub mod boat;

pub use boat::*;
