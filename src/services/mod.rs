pub mod store;
pub mod transport;

pub use store::*;
pub use transport::*;
