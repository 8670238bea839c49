pub mod csv_store;
pub mod destination;

#[cfg(test)]
pub mod memory;

pub use csv_store::{CsvSourceStore, CsvStagingStore};
pub use destination::JsonlDestinationStore;
