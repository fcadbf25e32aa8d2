//! Wave execution and the per-coordinate result store.
mod scheduler;
mod store;


pub use scheduler::WaveScheduler;
pub use store::ResultStore;
