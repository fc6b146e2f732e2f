//! The user's profile and emergency contacts. Owned outside the kernel; the
//! kernel only sees a `DirectorySnapshot` when one is pushed to it.

pub mod book;
pub mod store;
pub mod types;

pub use book::UserDirectory;
pub use store::{FileStore, InMemoryStore, KeyValueStore, StoreError};
pub use types::{Contact, DirectorySnapshot, NewContact, UserProfile};
