//! Transition journal.
//!
//! Write-only from the kernel's point of view: the reactor records into it
//! but never reads it back when deciding a transition. It holds ids, kinds,
//! timestamps and magnitudes only; no profile or contact data.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::JournalEvent;
pub use metrics::JournalSnapshot;
pub use recorder::TransitionJournal;
