//! Tremor engine: keyword-spotting theme detection, tremor registry, and spiral depth scoring.

pub mod depth;
pub mod engine;
pub mod scoring;
pub mod storage;
pub mod themes;
pub mod types;

pub use depth::{DepthLevel, DepthResult};
pub use engine::{PatternAnalyzer, PatternEngine, DEFAULT_REGISTRY_PATH};
pub use scoring::{calculate_depth_score, calculate_intensity, QUAKE_THRESHOLD};
pub use storage::{RegistryReader, RegistryWriter};
pub use themes::{ThemeKeywordTable, ThemeMatch, BUILTIN_THEMES};
pub use types::*;
