pub mod model;
pub mod note_store;
pub mod storage;

pub use model::{Note, NoteError, NoteId};
pub use note_store::{Change, Listing, NoteStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
