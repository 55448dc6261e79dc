//! Task store, persistence and configuration for tickoff.
//!
//! Front ends hold a [`TaskStore`], drive it through its operations and render
//! [`TaskStore::view`]. Editing state lives in an [`EditDraft`] owned by the front end.

pub mod config;
pub mod draft;
pub mod error;
pub mod persistence;
pub mod task_store;

// Re-exports for convenience
pub use config::{AppConfig, FileTaskStore, StorageConfig};
pub use draft::EditDraft;
pub use error::{PersistError, TaskError};
pub use persistence::{
    DEFAULT_SLOT, FileSlots, MemorySlots, SlotBackend, SlotPersistence, TaskPersistence,
    TaskRecord, decode_tasks, encode_tasks,
};
pub use task_store::TaskStore;
