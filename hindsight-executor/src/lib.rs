//! Bounded async worker pool for observation regeneration and background
//! edge building, owned explicitly by the caller
//! (the `hindsight` facade) rather than a process-global.

pub mod coalescing;
pub mod observation;
pub mod pool;

pub use coalescing::CoalescingQueue;
pub use observation::{ObservationSynthesizer, ObservationWorker};
pub use pool::{Task, TaskHandler, WorkerPool};
