pub mod record_store_trait;

pub use record_store_trait::RecordStore;
