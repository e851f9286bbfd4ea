pub mod error;
pub mod record;
pub mod store;

pub use error::{PersistenceError, Result};
pub use store::FileStateStore;
