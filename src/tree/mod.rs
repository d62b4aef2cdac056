//! Directory walking and candidate filtering
//!
//! - `Walk`: lazy, depth-first iterator over every file below a root
//! - `filter`: extension check deciding which files are images worth inspecting

mod config;
pub mod filter;
mod utils;
mod walker;

pub use config::{DEFAULT_BATCH_SIZE, ScanConfig, WalkerConfig};
pub use filter::{CandidateFile, SUPPORTED_EXTENSIONS, candidate, is_supported_image};
pub use utils::glob_match;
pub use walker::{Walk, walk};
