//! Error types for loading, configuration and the frame allocation engine

use std::path::PathBuf;

use thiserror::Error;

use crate::process::ProcessId;

/// Failure while reading the process input. Aborts the run before any allocation.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unable to open process file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records are `arrival size` pairs, so the token count must be even
    #[error("Process input has {0} tokens, expected pairs of arrival time and size")]
    OddTokenCount(usize),

    #[error("Record {record}: invalid number '{token}'")]
    InvalidNumber { record: usize, token: String },

    #[error("Record {record}: arrival time {value} is negative")]
    NegativeArrival { record: usize, value: i64 },

    #[error("Record {record}: size {value} must be positive")]
    NonPositiveSize { record: usize, value: i64 },
}

/// Rejected simulation geometry or unreadable config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Frame size must be positive")]
    ZeroFrameSize,

    #[error("Total memory {total_memory} KB holds no {frame_size} KB frame")]
    NoFrames { total_memory: usize, frame_size: usize },

    #[error("Total memory {total_memory} KB is not a multiple of the {frame_size} KB frame size")]
    UnalignedMemory { total_memory: usize, frame_size: usize },

    #[error("Per-process page cap must be positive")]
    ZeroPageCap,
}

/// Internal consistency failures of the frame pool and reclamation queue.
///
/// The engine only assigns after finding a free frame and only evicts when the
/// pool is full, so any of these reaching a caller means a logic defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Frame {frame} is already owned by {owner}")]
    InvariantViolation { frame: usize, owner: ProcessId },

    #[error("Frame {0} is not occupied")]
    FrameNotOccupied(usize),

    #[error("Frame {0} is outside the frame pool")]
    FrameOutOfRange(usize),

    #[error("Reclamation queue is empty")]
    EmptyQueue,

    #[error("Reclamation queue is full")]
    QueueFull,

    /// An evicted frame named an owner that is not in the process set
    #[error("Evicted frame {frame} belonged to unknown {owner}")]
    UnknownOwner { frame: usize, owner: ProcessId },
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type MemoryResult<T> = std::result::Result<T, MemoryError>;
