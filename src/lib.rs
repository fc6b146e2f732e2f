pub mod directory;
pub mod kernel;
pub mod outputs;
pub mod sensors;

pub use kernel::config::GuardConfig;
pub use kernel::driver::{Collaborators, Driver};
pub use kernel::reactor::Reactor;
