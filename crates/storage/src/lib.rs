#![warn(clippy::pedantic)]

pub mod backend;
pub mod dto;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;

pub use backend::{Backend, BackendError, FileBackend, MemoryBackend};
pub use local_storage::{LocalStorage, Log};
