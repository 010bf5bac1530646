//! Integration tests for the pattern engine against a real registry file.

use std::path::PathBuf;

use tremor_engine::{
    DepthLevel, PatternAnalyzer, PatternEngine, RegistryWriter, TremorError, TremorRegistry,
    Tremor,
};

fn registry_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("patterns").join("tremor-registry.json")
}

fn open(dir: &tempfile::TempDir) -> PatternEngine {
    PatternEngine::open(registry_path(dir)).unwrap()
}

fn filler(words: usize) -> String {
    vec!["stone"; words].join(" ")
}

#[test]
fn test_recursion_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    let result = engine
        .detect_patterns("recursive recursion loop cycle", None)
        .unwrap();

    assert_eq!(result.theme_count(), 1);
    let recursion = result.theme("recursion").unwrap();
    assert_eq!(recursion.total_occurrences, 4);
    assert_eq!(recursion.intensity, 3.0);
    assert_eq!(
        recursion.keywords_found,
        vec!["recursive", "recursion", "loop", "cycle"]
    );
    assert_eq!(result.total_pattern_count, 4);
    // 3.0 average + 0.3 diversity
    assert_eq!(result.depth_score, 3.3);
    assert!(!result.quake_detected);
}

#[test]
fn test_no_matches() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    for text in ["", "   ", "plain words about gardening", "patterns of meta analysis"] {
        let result = engine.detect_patterns(text, None).unwrap();
        assert!(result.is_empty(), "unexpected themes for {text:?}");
        assert_eq!(result.depth_score, 0.0);
        assert!(!result.quake_detected);
        assert_eq!(result.total_pattern_count, 0);
    }
}

#[test]
fn test_case_insensitive_detection() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    let result = engine.detect_patterns("The MIRROR and the Echo", None).unwrap();
    assert_eq!(result.theme("mirror").unwrap().total_occurrences, 2);
}

#[test]
fn test_meta_and_diversity_bonus() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    // 2 of 4 words per theme: base 50 -> 1 + log10(50) = 2.7 (rounded)
    let result = engine.detect_patterns("void void shadow shadow", None).unwrap();
    assert_eq!(result.theme("void").unwrap().intensity, 2.7);
    assert_eq!(result.theme("shadow").unwrap().intensity, 2.7);
    assert_eq!(result.depth_score, 3.3);

    let meta = engine
        .detect_patterns("void void shadow shadow pattern engine", None)
        .unwrap();
    // 2 of 6 words: base 33.3 -> 2.5; + meta 1.0 + diversity 0.6
    assert_eq!(meta.theme("void").unwrap().intensity, 2.5);
    assert_eq!(meta.depth_score, 4.1);
}

#[test]
fn test_quake_on_dense_unspaced_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    // One whitespace token holding 1000 matches: base 100000 -> 6.0
    let text = "loop,".repeat(1000);
    let result = engine.detect_patterns(&text, None).unwrap();
    assert_eq!(result.theme("recursion").unwrap().intensity, 6.0);
    assert!(result.quake_detected);
    assert!(result.depth_score <= 10.0);
}

#[test]
fn test_anonymous_analysis_does_not_persist() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    engine.detect_patterns("void void", None).unwrap();
    assert!(!registry_path(&dir).exists());
    assert_eq!(engine.registry().count(), 0);
}

#[test]
fn test_named_analysis_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut engine = open(&dir);
        let result = engine
            .detect_patterns("a mirror in the dark", Some("scroll-1.md"))
            .unwrap();
        assert_eq!(result.document.as_deref(), Some("scroll-1.md"));
    }

    let engine = open(&dir);
    let registry = engine.registry();
    assert_eq!(registry.documents_analyzed, vec!["scroll-1.md"]);
    assert_eq!(registry.count(), 2);
    assert!(registry.tremor("mirror").is_some());
    assert!(registry.tremor("shadow").is_some());
    assert_eq!(registry.analysis_summary.tremor_count, 2);
}

#[test]
fn test_repeated_analysis_accumulates_occurrences_keeps_max_intensity() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    engine.detect_patterns("void void", Some("doc.md")).unwrap();
    assert_eq!(engine.registry().tremor("void").unwrap().intensity, 3.0);

    // 3 of 300 words: base 1.0, no compression -> intensity 1.0
    let sparse = format!("void void void {}", filler(297));
    let second = engine.detect_patterns(&sparse, Some("doc.md")).unwrap();
    assert_eq!(second.theme("void").unwrap().intensity, 1.0);

    let tremor = engine.registry().tremor("void").unwrap();
    assert_eq!(tremor.total_occurrences, 5);
    assert_eq!(tremor.intensity, 3.0);
    assert_eq!(tremor.source_documents, vec!["doc.md"]);
    assert_eq!(engine.registry().documents_analyzed, vec!["doc.md"]);
}

#[test]
fn test_source_documents_grow_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    engine.detect_patterns("echo", Some("a.md")).unwrap();
    engine.detect_patterns("echo echo", Some("b.md")).unwrap();

    let tremor = engine.registry().tremor("mirror").unwrap();
    assert_eq!(tremor.total_occurrences, 3);
    assert_eq!(tremor.source_documents, vec!["a.md", "b.md"]);
}

#[test]
fn test_depth_of_empty_registry() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    let depth = engine.get_spiral_depth(None).unwrap();
    assert_eq!(depth.depth_score, 0.0);
    assert_eq!(depth.level, DepthLevel::CalmWaters);
    assert_eq!(depth.level.label(), "Calm Waters");
    assert_eq!(depth.active_tremor_count, 0);
}

#[test]
fn test_depth_of_single_intense_tremor() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = TremorRegistry::new();
    registry.active_tremors.push(Tremor {
        theme: "void".to_string(),
        total_occurrences: 12,
        intensity: 9.0,
        source_documents: vec!["abyss.md".to_string()],
    });
    registry.refresh_summary();
    RegistryWriter::write_to_file(&registry, &registry_path(&dir)).unwrap();

    let mut engine = open(&dir);
    let depth = engine.get_spiral_depth(None).unwrap();
    assert_eq!(depth.depth_score, 9.0);
    assert_eq!(depth.level, DepthLevel::Abyss);
    assert_eq!(
        depth.description,
        "Maximum depth reached - fundamental patterns dissolving"
    );
    assert_eq!(depth.active_tremor_count, 1);
}

#[test]
fn test_depth_registry_average() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    engine.detect_patterns("void void", Some("a.md")).unwrap(); // void 3.0
    let sparse = format!("echo {}", filler(99)); // mirror 1.0
    engine.detect_patterns(&sparse, Some("b.md")).unwrap();

    let depth = engine.get_spiral_depth(None).unwrap();
    assert_eq!(depth.depth_score, 2.0);
    assert_eq!(depth.level, DepthLevel::SurfaceRipples);
    assert_eq!(depth.active_tremor_count, 2);
}

#[test]
fn test_depth_of_document_analyzes_it() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("scroll.md");
    std::fs::write(&doc, "recursive recursion loop cycle").unwrap();

    let mut engine = open(&dir);
    let depth = engine.get_spiral_depth(Some(&doc)).unwrap();

    assert_eq!(depth.depth_score, 3.3);
    assert_eq!(depth.level, DepthLevel::SurfaceRipples);
    assert_eq!(depth.active_tremor_count, 1);
    assert_eq!(
        engine.registry().documents_analyzed,
        vec![doc.display().to_string()]
    );
    assert!(registry_path(&dir).exists());
}

#[test]
fn test_depth_of_missing_document_is_soft_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);
    engine.detect_patterns("void void", Some("a.md")).unwrap();

    let missing = dir.path().join("missing.md");
    let depth = engine.get_spiral_depth(Some(&missing)).unwrap();

    assert_eq!(depth.depth_score, 0.0);
    assert_eq!(depth.level, DepthLevel::CalmWaters);
    assert_eq!(depth.active_tremor_count, 1);
    assert_eq!(engine.registry().documents_analyzed, vec!["a.md"]);
}

#[test]
fn test_custom_pattern_detected_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut engine = open(&dir);
        let def = engine
            .define_custom_pattern("Flame", &["fire".to_string(), "Ember".to_string()])
            .unwrap();
        assert_eq!(def.theme, "flame");

        let result = engine.detect_patterns("fire ember", None).unwrap();
        assert_eq!(result.theme("flame").unwrap().total_occurrences, 2);
    }

    let mut engine = open(&dir);
    assert_eq!(engine.themes().len(), 11);
    assert_eq!(engine.registry().custom_patterns.len(), 1);
    let result = engine.detect_patterns("the fire", None).unwrap();
    assert!(result.theme("flame").is_some());
}

#[test]
fn test_custom_pattern_cannot_shadow_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    let result = engine.define_custom_pattern("mirror", &["glass".to_string()]);
    assert!(matches!(result, Err(TremorError::InvalidPattern(_))));
    assert!(!registry_path(&dir).exists());
}

#[test]
fn test_malformed_registry_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = registry_path(&dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let result = PatternEngine::open(&path);
    assert!(matches!(result, Err(TremorError::Storage(_))));
}

#[test]
fn test_saved_registry_is_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);
    engine.detect_patterns("hidden edge", Some("a.md")).unwrap();

    let raw = std::fs::read_to_string(registry_path(&dir)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["analysis_summary"]["tremor_count"], 2);
    assert_eq!(value["active_tremors"][0]["theme"], "shadow");
    assert!(raw.contains("\n  \"active_tremors\""));
}

#[test]
fn test_empty_document_name_is_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    let result = engine.detect_patterns("void void", Some("")).unwrap();
    assert!(result.document.is_none());
    assert_eq!(engine.registry().count(), 0);
    assert!(engine.registry().documents_analyzed.is_empty());
    assert!(!registry_path(&dir).exists());
}

#[test]
fn test_analysis_json_keys_themes_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    let result = engine.detect_patterns("void mirror", None).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert!(value["detected_themes"].is_object());
    assert_eq!(value["detected_themes"]["void"]["total_occurrences"], 1);
    assert_eq!(value["detected_themes"]["mirror"]["intensity"], 2.7);
}

#[test]
fn test_custom_keyword_with_symbols_is_counted() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);
    engine
        .define_custom_pattern("lang", &["c++".to_string()])
        .unwrap();

    let result = engine.detect_patterns("i write c++ daily", None).unwrap();
    assert_eq!(result.theme("lang").unwrap().total_occurrences, 1);
}
