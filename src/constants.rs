// size of main memory in KB
pub const TOTAL_MEMORY: usize = 256;
pub const FRAME_SIZE: usize = 4;
pub const TOTAL_FRAMES: usize = TOTAL_MEMORY / FRAME_SIZE;

// pages a single pass may grant one process
pub const MAX_PAGES_PER_PROCESS: usize = 5;

pub const DEFAULT_PROCESS_FILE: &str = "processes_file.txt";
