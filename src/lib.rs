pub mod allocation;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod process;
pub mod report;
pub mod scheduler;

// Re-export commonly used items for convenience
pub use allocation::{allocate, AllocationResult, Assignment, Eviction};
pub use config::SimulationConfig;
pub use constants::*;
pub use error::{ConfigError, LoadError, MemoryError};
pub use memory::{FramePool, ReclamationQueue};
pub use process::{Process, ProcessId};
pub use scheduler::{Phase, Simulation, SimulationReport};
