//! Core data types for theme detection and the tremor registry.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Current local time, the timestamp flavour stored in analyses and the registry.
pub fn now_timestamp() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// A named cluster of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub theme: String,
    pub keywords: Vec<String>,
}

/// One theme found in a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDetection {
    pub theme: String,
    pub total_occurrences: usize,
    pub intensity: f64,
    pub keywords_found: Vec<String>,
}

/// The outcome of a single `detect_patterns` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub timestamp: NaiveDateTime,
    pub document: Option<String>,
    /// Detected themes in table order; theme names are unique. Serialized as a JSON
    /// object keyed by theme.
    #[serde(with = "theme_map")]
    pub detected_themes: Vec<ThemeDetection>,
    pub depth_score: f64,
    pub quake_detected: bool,
    pub total_pattern_count: usize,
}

impl AnalysisResult {
    /// Look up a detected theme by name.
    pub fn theme(&self, name: &str) -> Option<&ThemeDetection> {
        self.detected_themes.iter().find(|t| t.theme == name)
    }

    pub fn theme_count(&self) -> usize {
        self.detected_themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detected_themes.is_empty()
    }
}

mod theme_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ThemeDetection;

    #[derive(Serialize)]
    struct EntryRef<'a> {
        total_occurrences: usize,
        intensity: f64,
        keywords_found: &'a [String],
    }

    #[derive(Deserialize)]
    struct Entry {
        total_occurrences: usize,
        intensity: f64,
        #[serde(default)]
        keywords_found: Vec<String>,
    }

    pub fn serialize<S: Serializer>(
        themes: &[ThemeDetection],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(themes.len()))?;
        for detection in themes {
            map.serialize_entry(
                &detection.theme,
                &EntryRef {
                    total_occurrences: detection.total_occurrences,
                    intensity: detection.intensity,
                    keywords_found: &detection.keywords_found,
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ThemeDetection>, D::Error> {
        struct ThemeMapVisitor;

        impl<'de> Visitor<'de> for ThemeMapVisitor {
            type Value = Vec<ThemeDetection>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of theme name to detection")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut themes = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((theme, entry)) = access.next_entry::<String, Entry>()? {
                    themes.push(ThemeDetection {
                        theme,
                        total_occurrences: entry.total_occurrences,
                        intensity: entry.intensity,
                        keywords_found: entry.keywords_found,
                    });
                }
                Ok(themes)
            }
        }

        deserializer.deserialize_map(ThemeMapVisitor)
    }
}

/// Persisted aggregate of a theme's detection history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tremor {
    pub theme: String,
    pub total_occurrences: usize,
    pub intensity: f64,
    pub source_documents: Vec<String>,
}

/// Derived registry statistics, recomputed after each merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_themes_detected: usize,
    pub tremor_count: usize,
    pub highest_intensity_tremor: Option<String>,
}

/// The JSON-backed registry of tremors across all analyzed documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TremorRegistry {
    #[serde(default = "now_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub documents_analyzed: Vec<String>,
    #[serde(default)]
    pub active_tremors: Vec<Tremor>,
    #[serde(default)]
    pub analysis_summary: AnalysisSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_patterns: Vec<ThemeDefinition>,
}

impl Default for TremorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TremorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            timestamp: now_timestamp(),
            documents_analyzed: Vec::new(),
            active_tremors: Vec::new(),
            analysis_summary: AnalysisSummary::default(),
            custom_patterns: Vec::new(),
        }
    }

    /// Get a tremor by theme.
    pub fn tremor(&self, theme: &str) -> Option<&Tremor> {
        self.active_tremors.iter().find(|t| t.theme == theme)
    }

    /// Number of tremor entries.
    pub fn count(&self) -> usize {
        self.active_tremors.len()
    }

    /// Mean intensity across all tremors, 0.0 when there are none.
    pub fn average_intensity(&self) -> f64 {
        if self.active_tremors.is_empty() {
            return 0.0;
        }
        let total: f64 = self.active_tremors.iter().map(|t| t.intensity).sum();
        total / self.active_tremors.len() as f64
    }

    /// Tremors ordered by intensity, strongest first. Equal intensities keep registry order.
    pub fn strongest(&self, limit: usize) -> Vec<&Tremor> {
        let mut sorted: Vec<_> = self.active_tremors.iter().collect();
        sorted.sort_by(|a, b| {
            b.intensity
                .partial_cmp(&a.intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(limit);
        sorted
    }

    /// Fold an analysis of `document` into the registry.
    ///
    /// Occurrences accumulate; intensity is a running maximum. Document lists have set
    /// semantics.
    pub fn merge(&mut self, document: &str, analysis: &AnalysisResult) {
        push_unique(&mut self.documents_analyzed, document);

        for detection in &analysis.detected_themes {
            match self
                .active_tremors
                .iter_mut()
                .find(|t| t.theme == detection.theme)
            {
                Some(tremor) => {
                    tremor.total_occurrences += detection.total_occurrences;
                    tremor.intensity = tremor.intensity.max(detection.intensity);
                    push_unique(&mut tremor.source_documents, document);
                }
                None => self.active_tremors.push(Tremor {
                    theme: detection.theme.clone(),
                    total_occurrences: detection.total_occurrences,
                    intensity: detection.intensity,
                    source_documents: vec![document.to_string()],
                }),
            }
        }

        self.refresh_summary();
    }

    /// Recompute `analysis_summary` from the current tremors.
    pub fn refresh_summary(&mut self) {
        let mut themes: Vec<&str> = self.active_tremors.iter().map(|t| t.theme.as_str()).collect();
        themes.sort_unstable();
        themes.dedup();

        let mut highest: Option<&Tremor> = None;
        for tremor in &self.active_tremors {
            match highest {
                Some(best) if tremor.intensity <= best.intensity => {}
                _ => highest = Some(tremor),
            }
        }

        self.analysis_summary = AnalysisSummary {
            total_themes_detected: themes.len(),
            tremor_count: self.active_tremors.len(),
            highest_intensity_tremor: highest.map(|t| t.theme.clone()),
        };
    }

    /// Insert or replace a stored custom theme.
    pub fn upsert_custom_pattern(&mut self, definition: ThemeDefinition) {
        match self
            .custom_patterns
            .iter_mut()
            .find(|d| d.theme == definition.theme)
        {
            Some(existing) => existing.keywords = definition.keywords,
            None => self.custom_patterns.push(definition),
        }
    }

    /// Stamp the registry with the current time.
    pub fn touch(&mut self) {
        self.timestamp = now_timestamp();
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Errors that can occur in the pattern engine.
#[derive(thiserror::Error, Debug)]
pub enum TremorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type TremorResult<T> = Result<T, TremorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(theme: &str, occurrences: usize, intensity: f64) -> ThemeDetection {
        ThemeDetection {
            theme: theme.to_string(),
            total_occurrences: occurrences,
            intensity,
            keywords_found: vec![],
        }
    }

    fn analysis(themes: Vec<ThemeDetection>) -> AnalysisResult {
        AnalysisResult {
            timestamp: now_timestamp(),
            document: None,
            total_pattern_count: themes.iter().map(|t| t.total_occurrences).sum(),
            detected_themes: themes,
            depth_score: 0.0,
            quake_detected: false,
        }
    }

    #[test]
    fn test_merge_creates_tremors() {
        let mut registry = TremorRegistry::new();
        registry.merge("a.md", &analysis(vec![detection("void", 2, 4.0)]));

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.documents_analyzed, vec!["a.md"]);
        let tremor = registry.tremor("void").unwrap();
        assert_eq!(tremor.total_occurrences, 2);
        assert_eq!(tremor.source_documents, vec!["a.md"]);
        assert_eq!(registry.analysis_summary.highest_intensity_tremor.as_deref(), Some("void"));
    }

    #[test]
    fn test_merge_accumulates_and_keeps_max_intensity() {
        let mut registry = TremorRegistry::new();
        registry.merge("a.md", &analysis(vec![detection("mirror", 1, 6.0)]));
        registry.merge("a.md", &analysis(vec![detection("mirror", 5, 2.5)]));

        let tremor = registry.tremor("mirror").unwrap();
        assert_eq!(tremor.total_occurrences, 6);
        assert_eq!(tremor.intensity, 6.0);
        assert_eq!(tremor.source_documents.len(), 1);
        assert_eq!(registry.documents_analyzed.len(), 1);
    }

    #[test]
    fn test_summary_tie_keeps_first() {
        let mut registry = TremorRegistry::new();
        registry.merge(
            "a.md",
            &analysis(vec![detection("void", 1, 3.0), detection("shadow", 1, 3.0)]),
        );
        assert_eq!(registry.analysis_summary.tremor_count, 2);
        assert_eq!(registry.analysis_summary.total_themes_detected, 2);
        assert_eq!(registry.analysis_summary.highest_intensity_tremor.as_deref(), Some("void"));
    }

    #[test]
    fn test_detected_themes_serialize_as_ordered_map() {
        let mut result = analysis(vec![detection("mirror", 1, 2.7), detection("void", 3, 4.1)]);
        result.detected_themes[1].keywords_found = vec!["void".to_string()];

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.find("\"mirror\"").unwrap() < json.find("\"void\"").unwrap());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let void = &value["detected_themes"]["void"];
        assert_eq!(void["total_occurrences"], 3);
        assert_eq!(void["keywords_found"], serde_json::json!(["void"]));
        assert!(void.get("theme").is_none());

        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        let names: Vec<_> = back.detected_themes.iter().map(|t| t.theme.as_str()).collect();
        assert_eq!(names, vec!["mirror", "void"]);
        assert_eq!(back.theme("void").unwrap().intensity, 4.1);
    }

    #[test]
    fn test_average_intensity_empty() {
        assert_eq!(TremorRegistry::new().average_intensity(), 0.0);
    }

    #[test]
    fn test_strongest_orders_descending() {
        let mut registry = TremorRegistry::new();
        registry.merge(
            "a.md",
            &analysis(vec![
                detection("void", 1, 1.0),
                detection("shadow", 1, 7.5),
                detection("depth", 1, 3.0),
            ]),
        );
        let names: Vec<_> = registry.strongest(2).iter().map(|t| t.theme.as_str()).collect();
        assert_eq!(names, vec!["shadow", "depth"]);
    }

    #[test]
    fn test_upsert_custom_pattern_replaces() {
        let mut registry = TremorRegistry::new();
        registry.upsert_custom_pattern(ThemeDefinition {
            theme: "flame".into(),
            keywords: vec!["fire".into()],
        });
        registry.upsert_custom_pattern(ThemeDefinition {
            theme: "flame".into(),
            keywords: vec!["ember".into(), "ash".into()],
        });
        assert_eq!(registry.custom_patterns.len(), 1);
        assert_eq!(registry.custom_patterns[0].keywords, vec!["ember", "ash"]);
    }
}
