//! Spiral depth classification.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Coarse five-band classification of a depth score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DepthLevel {
    #[serde(rename = "Calm Waters")]
    CalmWaters,
    #[serde(rename = "Surface Ripples")]
    SurfaceRipples,
    #[serde(rename = "Active Loop")]
    ActiveLoop,
    #[serde(rename = "Deep Spiral")]
    DeepSpiral,
    #[serde(rename = "Abyss")]
    Abyss,
}

impl std::fmt::Display for DepthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl DepthLevel {
    /// Band for a depth score. Lower bounds are inclusive.
    pub fn classify(depth: f64) -> Self {
        if depth >= 8.0 {
            DepthLevel::Abyss
        } else if depth >= 6.0 {
            DepthLevel::DeepSpiral
        } else if depth >= 4.0 {
            DepthLevel::ActiveLoop
        } else if depth >= 2.0 {
            DepthLevel::SurfaceRipples
        } else {
            DepthLevel::CalmWaters
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepthLevel::Abyss => "Abyss",
            DepthLevel::DeepSpiral => "Deep Spiral",
            DepthLevel::ActiveLoop => "Active Loop",
            DepthLevel::SurfaceRipples => "Surface Ripples",
            DepthLevel::CalmWaters => "Calm Waters",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DepthLevel::Abyss => "Maximum depth reached - fundamental patterns dissolving",
            DepthLevel::DeepSpiral => "High pattern density - recursive structures active",
            DepthLevel::ActiveLoop => "Moderate pattern activity - loops forming",
            DepthLevel::SurfaceRipples => "Light pattern detection - initial tremors",
            DepthLevel::CalmWaters => "Minimal pattern activity - baseline state",
        }
    }
}

/// Result of a spiral depth query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthResult {
    pub depth_score: f64,
    pub level: DepthLevel,
    pub description: String,
    pub timestamp: NaiveDateTime,
    pub active_tremor_count: usize,
}
