pub mod negotiate;
pub mod resolve;
pub mod uniqueness;
pub mod validate;

pub use resolve::*;
pub use uniqueness::*;
pub use validate::*;
