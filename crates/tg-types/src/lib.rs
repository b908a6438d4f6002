pub mod condition;
pub mod session;
pub mod errors;

pub use condition::*;
pub use session::*;
pub use errors::*;
