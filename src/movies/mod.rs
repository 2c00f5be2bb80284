// Movies module entry
// Record types and the shared in-memory collection

mod decode;
mod model;
mod store;

pub use model::{Director, Movie};
pub use store::MovieStore;
