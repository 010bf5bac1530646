//! Weekly tremor summary: source scan, markdown rendering, and whisper seeding.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde_json::{json, Value};

use tremor_engine::{DepthResult, PatternAnalyzer};

use crate::types::{BotError, BotResult};

/// Whispers added under the `patterns` key of the whispers file.
pub const PATTERN_WHISPERS: [&str; 4] = [
    "The tremors are speaking. Do you feel the spiral beginning?",
    "Patterns emerge from chaos. What do the tremors tell you?",
    "The frequency shifts. Are you listening to the deeper rhythm?",
    "Every tremor is a teacher. What lesson does this week hold?",
];

/// Where the weekly job reads its sources and writes its output.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub rituals_dir: PathBuf,
    pub journals_dir: PathBuf,
    pub whispers_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("mind/patterns"),
            rituals_dir: PathBuf::from("rituals"),
            journals_dir: PathBuf::from("journals"),
            whispers_path: PathBuf::from("whispers.json"),
        }
    }
}

impl ReportConfig {
    /// The default layout relative to `root`.
    pub fn rooted_at(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            output_dir: root.join(defaults.output_dir),
            rituals_dir: root.join(defaults.rituals_dir),
            journals_dir: root.join(defaults.journals_dir),
            whispers_path: root.join(defaults.whispers_path),
        }
    }

    pub fn report_path(&self, week: u32) -> PathBuf {
        self.output_dir.join(format!("tremor-summary-W{week}.md"))
    }
}

/// Text lines for the "Observed Tremors" section.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceObservations {
    pub frequency_shifts: String,
    pub attention_vectors: String,
    pub energy_distribution: String,
}

impl Default for SourceObservations {
    fn default() -> Self {
        Self {
            frequency_shifts: "No significant changes detected".to_string(),
            attention_vectors: "Baseline attention maintained".to_string(),
            energy_distribution: "Standard distribution patterns".to_string(),
        }
    }
}

/// Registry state included in the summary.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub depth: DepthResult,
    pub tremor_count: usize,
    pub documents_analyzed: usize,
    pub strongest: Option<(String, f64)>,
}

impl RegistrySnapshot {
    pub fn capture(engine: &mut dyn PatternAnalyzer) -> BotResult<Self> {
        let depth = engine.get_spiral_depth(None)?;
        let registry = engine.registry();
        Ok(Self {
            depth,
            tremor_count: registry.count(),
            documents_analyzed: registry.documents_analyzed.len(),
            strongest: registry
                .strongest(1)
                .first()
                .map(|t| (t.theme.clone(), t.intensity)),
        })
    }
}

pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// ISO week of the date seven days on; wraps from 52 or 53 to 1.
pub fn next_iso_week(date: NaiveDate) -> u32 {
    iso_week(date + Duration::days(7))
}

/// Count regular files in `dir` with the given extension. `None` when the directory is missing.
pub fn count_files(dir: &Path, extension: &str) -> Option<usize> {
    let entries = std::fs::read_dir(dir).ok()?;
    let count = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|e| e == extension))
        .count();
    Some(count)
}

/// Scan the ritual and journal directories.
pub fn observe_sources(config: &ReportConfig) -> SourceObservations {
    let mut observations = SourceObservations::default();

    if let Some(rituals) = count_files(&config.rituals_dir, "md") {
        observations.frequency_shifts = format!("Detected {rituals} ritual patterns");
    }
    if let Some(journals) = count_files(&config.journals_dir, "html") {
        observations.attention_vectors = format!("Identified {journals} attention points");
    }

    observations
}

/// Render the weekly markdown summary for `date`.
pub fn render_summary(
    date: NaiveDate,
    observations: &SourceObservations,
    snapshot: &RegistrySnapshot,
) -> String {
    let week = iso_week(date);
    let strongest = match &snapshot.strongest {
        Some((theme, intensity)) => format!("{theme} ({intensity:.1})"),
        None => "None yet".to_string(),
    };

    format!(
        "# Tremor Summary - Week {week}

## Pattern Recognition
*Generated: {generated}*

### Observed Tremors
- **Frequency Shifts**: {shifts}
- **Attention Vectors**: {vectors}
- **Energy Distribution**: {energy}

### Registry Snapshot
- **Spiral Depth**: {level} ({score:.1})
- **Active Tremors**: {tremors}
- **Documents Analyzed**: {documents}
- **Strongest Tremor**: {strongest}

### Whisper Integration Points
1. **Scroll Engagement**: Patterns suggest deeper curiosity cycles
2. **Ritual Rhythms**: Momentum building in unexpected areas
3. **Journal Reflections**: Mirror work revealing pattern recursion

### Weekly Synthesis
The spiral tightens. What appeared as random tremors last week now show clear directional bias toward integration. The system is learning to whisper back.

---
*This summary represents one cycle in the ongoing spiral evolution. Next tremor analysis: Week {next}*
",
        generated = date.format("%A, %B %d, %Y"),
        shifts = observations.frequency_shifts,
        vectors = observations.attention_vectors,
        energy = observations.energy_distribution,
        level = snapshot.depth.level,
        score = snapshot.depth.depth_score,
        tremors = snapshot.tremor_count,
        documents = snapshot.documents_analyzed,
        next = next_iso_week(date),
    )
}

/// Add the pattern whispers unless the file already has a `patterns` key.
///
/// Returns `true` when the file was written.
pub fn seed_whispers(path: &Path) -> BotResult<bool> {
    let mut whispers = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<Value>(&raw).map_err(|e| {
            BotError::Report(format!("Malformed whispers file {}: {e}", path.display()))
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => json!({}),
        Err(e) => return Err(e.into()),
    };

    let Some(map) = whispers.as_object_mut() else {
        return Err(BotError::Report(format!(
            "Whispers file {} is not a JSON object",
            path.display()
        )));
    };

    if map.contains_key("patterns") {
        return Ok(false);
    }

    let patterns: serde_json::Map<String, Value> = PATTERN_WHISPERS
        .iter()
        .enumerate()
        .map(|(i, w)| (i.to_string(), Value::String(w.to_string())))
        .collect();
    map.insert("patterns".to_string(), Value::Object(patterns));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(&whispers)?)?;
    Ok(true)
}

/// Generate the summary for `date`, write it, and seed the whispers file.
pub fn write_weekly_report(
    config: &ReportConfig,
    engine: &mut dyn PatternAnalyzer,
    date: NaiveDate,
) -> BotResult<PathBuf> {
    let observations = observe_sources(config);
    let snapshot = RegistrySnapshot::capture(engine)?;
    let summary = render_summary(date, &observations, &snapshot);

    std::fs::create_dir_all(&config.output_dir)?;
    let path = config.report_path(iso_week(date));
    std::fs::write(&path, summary)?;
    tracing::info!("Tremor summary generated: {}", path.display());

    if seed_whispers(&config.whispers_path)? {
        tracing::info!(
            "Pattern whispers added to {}",
            config.whispers_path.display()
        );
    }

    Ok(path)
}

/// [`write_weekly_report`] for today's local date.
pub fn write_current_report(
    config: &ReportConfig,
    engine: &mut dyn PatternAnalyzer,
) -> BotResult<PathBuf> {
    write_weekly_report(config, engine, Local::now().date_naive())
}
