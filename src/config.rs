use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};

/// Geometry and policy of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Main memory in KB
    pub total_memory: usize,
    /// Frame (and page) size in KB
    pub frame_size: usize,
    pub max_pages_per_process: usize,
    /// Decrement the victim's `pages_allocated` on every eviction
    pub reclaim_victim_pages: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            total_memory: TOTAL_MEMORY,
            frame_size: FRAME_SIZE,
            max_pages_per_process: MAX_PAGES_PER_PROCESS,
            reclaim_victim_pages: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config for a pool of exactly `frames` frames of the default size
    pub fn with_frames(frames: usize, max_pages_per_process: usize) -> Self {
        SimulationConfig {
            total_memory: frames * FRAME_SIZE,
            frame_size: FRAME_SIZE,
            max_pages_per_process,
            reclaim_victim_pages: false,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        if self.total_memory < self.frame_size {
            return Err(ConfigError::NoFrames {
                total_memory: self.total_memory,
                frame_size: self.frame_size,
            });
        }
        if self.total_memory % self.frame_size != 0 {
            return Err(ConfigError::UnalignedMemory {
                total_memory: self.total_memory,
                frame_size: self.frame_size,
            });
        }
        if self.max_pages_per_process == 0 {
            return Err(ConfigError::ZeroPageCap);
        }
        Ok(())
    }

    #[inline]
    pub fn total_frames(&self) -> usize {
        self.total_memory / self.frame_size
    }

    /// Pages needed to hold `size` KB, rounded up to whole frames
    #[inline]
    pub fn pages_for(&self, size: usize) -> usize {
        size.div_ceil(self.frame_size)
    }
}
