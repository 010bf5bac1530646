//! Theme keyword table and whole-word keyword matching.

use regex::Regex;

use crate::types::{ThemeDefinition, TremorError, TremorResult};

/// Built-in themes, in detection order.
pub const BUILTIN_THEMES: &[(&str, &[&str])] = &[
    ("recursion", &["recursive", "recursion", "loop", "cycle", "spiral", "repeat", "iterate"]),
    ("mirror", &["mirror", "reflection", "reflect", "echo", "double", "twin", "parallel"]),
    ("paradox", &["paradox", "contradiction", "impossible", "antithesis", "opposing", "contrary"]),
    ("emergence", &["emerge", "emergent", "arising", "becoming", "unfold", "manifest"]),
    ("void", &["void", "empty", "nothing", "absence", "hollow", "blank", "null"]),
    ("shadow", &["shadow", "dark", "hidden", "beneath", "under", "behind", "obscure"]),
    ("threshold", &["threshold", "boundary", "edge", "border", "limit", "crossing", "between"]),
    ("tremor", &["tremor", "quake", "shake", "vibration", "resonance", "pulse", "rhythm"]),
    ("depth", &["depth", "deep", "profound", "surface", "layer", "level", "dimension"]),
    ("whisper", &["whisper", "murmur", "soft", "subtle", "hint", "suggestion", "trace"]),
];

/// Raw keyword tallies for one theme in one text.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeMatch {
    pub theme: String,
    pub occurrences: usize,
    pub keywords_found: Vec<String>,
}

struct KeywordMatcher {
    keyword: String,
    pattern: Regex,
}

struct CompiledTheme {
    definition: ThemeDefinition,
    matchers: Vec<KeywordMatcher>,
    builtin: bool,
}

impl CompiledTheme {
    fn compile(definition: ThemeDefinition, builtin: bool) -> TremorResult<Self> {
        let matchers = definition
            .keywords
            .iter()
            .map(|keyword| {
                let pattern = Regex::new(&keyword_pattern(keyword))
                    .map_err(|e| TremorError::InvalidPattern(format!("{keyword}: {e}")))?;
                Ok(KeywordMatcher {
                    keyword: keyword.clone(),
                    pattern,
                })
            })
            .collect::<TremorResult<Vec<_>>>()?;

        Ok(Self {
            definition,
            matchers,
            builtin,
        })
    }

    /// `text_lower` must already be lower-cased.
    fn scan(&self, text_lower: &str) -> ThemeMatch {
        let occurrences = self
            .matchers
            .iter()
            .map(|m| m.pattern.find_iter(text_lower).count())
            .sum();

        // Presence is a plain substring test, looser than the counted whole-word matches.
        let keywords_found = self
            .matchers
            .iter()
            .filter(|m| text_lower.contains(m.keyword.as_str()))
            .map(|m| m.keyword.clone())
            .collect();

        ThemeMatch {
            theme: self.definition.theme.clone(),
            occurrences,
            keywords_found,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word pattern for `keyword`. A boundary is only asserted on an edge that is a
/// word character, so keywords like `c++` or `.net` still match.
fn keyword_pattern(keyword: &str) -> String {
    let leading = keyword.chars().next().is_some_and(is_word_char);
    let trailing = keyword.chars().last().is_some_and(is_word_char);
    format!(
        "{}{}{}",
        if leading { r"\b" } else { "" },
        regex::escape(keyword),
        if trailing { r"\b" } else { "" },
    )
}

/// Ordered theme -> keywords table with pre-compiled matchers.
pub struct ThemeKeywordTable {
    themes: Vec<CompiledTheme>,
}

impl ThemeKeywordTable {
    /// The ten built-in themes.
    pub fn builtin() -> TremorResult<Self> {
        let themes = BUILTIN_THEMES
            .iter()
            .map(|(theme, keywords)| {
                CompiledTheme::compile(
                    ThemeDefinition {
                        theme: theme.to_string(),
                        keywords: keywords.iter().map(|k| k.to_string()).collect(),
                    },
                    true,
                )
            })
            .collect::<TremorResult<Vec<_>>>()?;

        Ok(Self { themes })
    }

    /// Number of themes, built-in and custom.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn is_builtin(&self, theme: &str) -> bool {
        self.themes
            .iter()
            .any(|t| t.builtin && t.definition.theme == theme)
    }

    pub fn get(&self, theme: &str) -> Option<&ThemeDefinition> {
        self.themes
            .iter()
            .find(|t| t.definition.theme == theme)
            .map(|t| &t.definition)
    }

    /// All theme definitions in detection order.
    pub fn definitions(&self) -> Vec<ThemeDefinition> {
        self.themes.iter().map(|t| t.definition.clone()).collect()
    }

    /// Only the runtime-defined themes.
    pub fn custom_definitions(&self) -> Vec<ThemeDefinition> {
        self.themes
            .iter()
            .filter(|t| !t.builtin)
            .map(|t| t.definition.clone())
            .collect()
    }

    /// Register or replace a custom theme. Built-in themes cannot be redefined.
    pub fn define(&mut self, name: &str, keywords: &[String]) -> TremorResult<ThemeDefinition> {
        let definition = normalize_definition(name, keywords)?;

        if self.is_builtin(&definition.theme) {
            return Err(TremorError::InvalidPattern(format!(
                "'{}' is a built-in theme",
                definition.theme
            )));
        }

        let compiled = CompiledTheme::compile(definition.clone(), false)?;
        match self
            .themes
            .iter_mut()
            .find(|t| t.definition.theme == definition.theme)
        {
            Some(existing) => *existing = compiled,
            None => self.themes.push(compiled),
        }

        Ok(definition)
    }

    /// Tally every theme against `text_lower`, including themes with zero hits.
    pub fn scan(&self, text_lower: &str) -> Vec<ThemeMatch> {
        self.themes.iter().map(|t| t.scan(text_lower)).collect()
    }
}

/// Trim and lower-case a theme name and its keywords, dropping duplicates.
pub fn normalize_definition(name: &str, keywords: &[String]) -> TremorResult<ThemeDefinition> {
    let theme = name.trim().to_lowercase();
    if theme.is_empty() {
        return Err(TremorError::InvalidInput("theme name is empty".to_string()));
    }

    let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }

    if normalized.is_empty() {
        return Err(TremorError::InvalidInput(format!(
            "theme '{theme}' needs at least one keyword"
        )));
    }

    Ok(ThemeDefinition {
        theme,
        keywords: normalized,
    })
}
