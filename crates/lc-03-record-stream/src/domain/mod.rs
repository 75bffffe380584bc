pub mod entities;
pub mod errors;

pub use entities::{recompute_chain, RecordLine, RecordStreamObject, StreamedRecord};
pub use errors::RecordStreamError;
