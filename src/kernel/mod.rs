pub mod config;
pub mod driver;
pub mod escalation;
pub mod event;
pub mod journal;
pub mod reactor;
pub mod scheduler;
pub mod state;
pub mod time;
