pub mod error;
pub mod io;
pub mod ledger;
pub mod model;
pub mod process;
pub mod upload;
pub mod version;

pub use error::{ExportError, Result};
