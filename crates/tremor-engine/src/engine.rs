//! The pattern engine: detection, registry persistence, and spiral depth.

use std::path::{Path, PathBuf};

use crate::depth::{DepthLevel, DepthResult};
use crate::scoring::{calculate_depth_score, calculate_intensity, is_quake, round1};
use crate::storage::{RegistryReader, RegistryWriter};
use crate::themes::ThemeKeywordTable;
use crate::types::{
    now_timestamp, AnalysisResult, ThemeDefinition, ThemeDetection, TremorRegistry, TremorResult,
};

/// Default registry location, relative to the working directory.
pub const DEFAULT_REGISTRY_PATH: &str = "patterns/tremor-registry.json";

/// The operations adapters are allowed to call on an engine.
pub trait PatternAnalyzer {
    /// Scan `text` for themes. With a document name the result is merged into the
    /// registry and persisted.
    fn detect_patterns(
        &mut self,
        text: &str,
        document_name: Option<&str>,
    ) -> TremorResult<AnalysisResult>;

    /// Depth of a single document (analyzing it as a side effect) or of the whole registry.
    fn get_spiral_depth(&mut self, document_path: Option<&Path>) -> TremorResult<DepthResult>;

    /// Register or replace a custom theme.
    fn define_custom_pattern(
        &mut self,
        name: &str,
        keywords: &[String],
    ) -> TremorResult<ThemeDefinition>;

    /// Read-only view of the registry.
    fn registry(&self) -> &TremorRegistry;

    /// Every theme the engine scans for, in detection order.
    fn themes(&self) -> Vec<ThemeDefinition>;
}

/// Keyword-spotting engine backed by a JSON registry file.
pub struct PatternEngine {
    registry: TremorRegistry,
    table: ThemeKeywordTable,
    registry_path: PathBuf,
}

impl PatternEngine {
    /// Open the registry at `path`, or start an empty one if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> TremorResult<Self> {
        let registry_path = path.as_ref().to_path_buf();

        let registry = if registry_path.exists() {
            tracing::info!("Opening tremor registry: {}", registry_path.display());
            RegistryReader::read_from_file(&registry_path)?
        } else {
            tracing::info!(
                "No registry at {}, starting empty",
                registry_path.display()
            );
            TremorRegistry::new()
        };

        let mut table = ThemeKeywordTable::builtin()?;
        for custom in &registry.custom_patterns {
            table.define(&custom.theme, &custom.keywords)?;
        }

        tracing::debug!(
            themes = table.len(),
            tremors = registry.count(),
            documents = registry.documents_analyzed.len(),
            "Pattern engine ready"
        );

        Ok(Self {
            registry,
            table,
            registry_path,
        })
    }

    /// Open the registry at [`DEFAULT_REGISTRY_PATH`].
    pub fn open_default() -> TremorResult<Self> {
        Self::open(DEFAULT_REGISTRY_PATH)
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    /// Analyze text without touching the registry.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let text_lower = text.to_lowercase();
        let word_count = text.split_whitespace().count();

        let detected_themes: Vec<ThemeDetection> = self
            .table
            .scan(&text_lower)
            .into_iter()
            .filter(|m| m.occurrences > 0)
            .map(|m| ThemeDetection {
                intensity: round1(calculate_intensity(m.occurrences, word_count)),
                theme: m.theme,
                total_occurrences: m.occurrences,
                keywords_found: m.keywords_found,
            })
            .collect();

        let depth_score = calculate_depth_score(&detected_themes, &text_lower);
        let quake_detected = is_quake(&detected_themes);
        let total_pattern_count = detected_themes.iter().map(|t| t.total_occurrences).sum();

        AnalysisResult {
            timestamp: now_timestamp(),
            document: None,
            detected_themes,
            depth_score,
            quake_detected,
            total_pattern_count,
        }
    }

    /// Write the registry to disk, stamping it with the current time.
    pub fn save(&mut self) -> TremorResult<()> {
        self.registry.touch();
        RegistryWriter::write_to_file(&self.registry, &self.registry_path)?;
        tracing::debug!("Saved tremor registry: {}", self.registry_path.display());
        Ok(())
    }

    fn classify(&self, depth: f64) -> DepthResult {
        let level = DepthLevel::classify(depth);
        DepthResult {
            depth_score: round1(depth),
            level,
            description: level.description().to_string(),
            timestamp: now_timestamp(),
            active_tremor_count: self.registry.count(),
        }
    }
}

impl PatternAnalyzer for PatternEngine {
    fn detect_patterns(
        &mut self,
        text: &str,
        document_name: Option<&str>,
    ) -> TremorResult<AnalysisResult> {
        let mut analysis = self.analyze(text);

        // An empty name counts as no document.
        if let Some(document) = document_name.filter(|d| !d.is_empty()) {
            analysis.document = Some(document.to_string());
            self.registry.merge(document, &analysis);
            self.save()?;

            tracing::info!(
                document,
                themes = analysis.theme_count(),
                depth = analysis.depth_score,
                quake = analysis.quake_detected,
                "Merged analysis into registry"
            );
        }

        if analysis.quake_detected {
            tracing::warn!(document = ?document_name, "Quake detected");
        }

        Ok(analysis)
    }

    fn get_spiral_depth(&mut self, document_path: Option<&Path>) -> TremorResult<DepthResult> {
        let depth = match document_path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(content) => {
                    let name = path.display().to_string();
                    self.detect_patterns(&content, Some(&name))?.depth_score
                }
                Err(e) => {
                    tracing::warn!("Cannot read {}: {e}; depth defaults to 0.0", path.display());
                    0.0
                }
            },
            None => self.registry.average_intensity(),
        };

        Ok(self.classify(depth))
    }

    fn define_custom_pattern(
        &mut self,
        name: &str,
        keywords: &[String],
    ) -> TremorResult<ThemeDefinition> {
        let definition = self.table.define(name, keywords)?;
        self.registry.upsert_custom_pattern(definition.clone());
        self.save()?;

        tracing::info!(
            theme = %definition.theme,
            keywords = definition.keywords.len(),
            "Custom pattern defined"
        );
        Ok(definition)
    }

    fn registry(&self) -> &TremorRegistry {
        &self.registry
    }

    fn themes(&self) -> Vec<ThemeDefinition> {
        self.table.definitions()
    }
}
