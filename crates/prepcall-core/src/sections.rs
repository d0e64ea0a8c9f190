//! Markdown section classifier for LLM-generated briefs.
//!
//! A generated brief arrives as one free-text markdown document whose
//! heading wording and order are not guaranteed; the model does not
//! reliably follow the prompt template. This module deterministically
//! partitions that document into the fixed set of named sections a brief
//! is stored and displayed as.
//!
//! The classifier is a pure, total function: it never fails, it assigns
//! every non-heading line to exactly one section, and it consumes heading
//! lines that trigger a section switch. Unrecognized headings are kept as
//! ordinary content inside the current section. Content seen before any
//! recognized heading lands in the default section (the first key of the
//! taxonomy), and a brief whose default section ends up empty gets the
//! whole document as its default text so it is never silently blank.
//!
//! Alias matching is data-driven: the alias table is an *ordered* list of
//! (phrase, key) pairs and the first phrase contained in the normalized
//! heading wins. The order is part of the observable contract and is
//! pinned by tests.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// SECTION KEYS
// =============================================================================

/// Canonical section labels, in taxonomy order.
///
/// The order is significant: the first key is the default section, the
/// bucket content falls into before any recognized heading is seen. It has
/// no bearing on output ordering otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    CompanyContext,
    AttendeeAnalysis,
    TechStack,
    CompetitiveLandscape,
    SuggestedQuestions,
}

impl SectionKey {
    /// All keys, in taxonomy order.
    pub const ALL: [SectionKey; 5] = [
        SectionKey::CompanyContext,
        SectionKey::AttendeeAnalysis,
        SectionKey::TechStack,
        SectionKey::CompetitiveLandscape,
        SectionKey::SuggestedQuestions,
    ];

    /// Stable wire/storage name for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyContext => "company_context",
            Self::AttendeeAnalysis => "attendee_analysis",
            Self::TechStack => "tech_stack",
            Self::CompetitiveLandscape => "competitive_landscape",
            Self::SuggestedQuestions => "suggested_questions",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company_context" => Ok(Self::CompanyContext),
            "attendee_analysis" => Ok(Self::AttendeeAnalysis),
            "tech_stack" => Ok(Self::TechStack),
            "competitive_landscape" => Ok(Self::CompetitiveLandscape),
            "suggested_questions" => Ok(Self::SuggestedQuestions),
            _ => Err(format!("Unknown section key: {}", s)),
        }
    }
}

// =============================================================================
// ALIAS TABLE
// =============================================================================

/// Default heading-alias table, in match order.
///
/// Phrases are matched by substring containment against the normalized
/// heading text, first match wins. Keep more specific phrases ahead of
/// broader ones so a heading like "Suggested Questions & Talking Points"
/// resolves before the generic "questions" catch-all.
pub const DEFAULT_ALIASES: &[(&str, SectionKey)] = &[
    ("company context", SectionKey::CompanyContext),
    ("company overview", SectionKey::CompanyContext),
    ("about the company", SectionKey::CompanyContext),
    ("attendee analysis", SectionKey::AttendeeAnalysis),
    ("attendee", SectionKey::AttendeeAnalysis),
    ("meeting participants", SectionKey::AttendeeAnalysis),
    ("tech stack", SectionKey::TechStack),
    ("technology", SectionKey::TechStack),
    ("security posture", SectionKey::TechStack),
    ("competitive landscape", SectionKey::CompetitiveLandscape),
    ("competitive positioning", SectionKey::CompetitiveLandscape),
    ("competitors", SectionKey::CompetitiveLandscape),
    ("competition", SectionKey::CompetitiveLandscape),
    ("suggested questions", SectionKey::SuggestedQuestions),
    ("talking points", SectionKey::SuggestedQuestions),
    ("discovery questions", SectionKey::SuggestedQuestions),
    ("questions", SectionKey::SuggestedQuestions),
];

/// Section taxonomy: the key set (in order, first key is the default) and
/// the ordered alias table used to recognize headings.
#[derive(Debug, Clone)]
pub struct SectionTaxonomy {
    keys: Vec<SectionKey>,
    aliases: Vec<(String, SectionKey)>,
}

impl SectionTaxonomy {
    /// Build a taxonomy from an ordered key set and an ordered alias table.
    ///
    /// Alias phrases are normalized to lowercase so construction input
    /// casing cannot affect matching.
    pub fn new<S: Into<String>>(keys: Vec<SectionKey>, aliases: Vec<(S, SectionKey)>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(phrase, key)| (phrase.into().to_lowercase(), key))
            .collect();
        Self { keys, aliases }
    }

    /// The keys of this taxonomy, in order.
    pub fn keys(&self) -> &[SectionKey] {
        &self.keys
    }

    /// The default (fallback) key: the first key in the taxonomy.
    pub fn default_key(&self) -> Option<SectionKey> {
        self.keys.first().copied()
    }

    /// Resolve a normalized heading to a section key.
    ///
    /// Table order is the tie-breaker: the first alias phrase contained in
    /// the heading wins.
    fn match_alias(&self, normalized_heading: &str) -> Option<SectionKey> {
        self.aliases
            .iter()
            .find(|(phrase, _)| normalized_heading.contains(phrase.as_str()))
            .map(|(_, key)| *key)
    }
}

impl Default for SectionTaxonomy {
    fn default() -> Self {
        Self::new(SectionKey::ALL.to_vec(), DEFAULT_ALIASES.to_vec())
    }
}

// =============================================================================
// CLASSIFIED OUTPUT
// =============================================================================

/// The result of classifying one document: every taxonomy key mapped to
/// its reconstructed text (possibly empty, never absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedBrief {
    sections: BTreeMap<SectionKey, String>,
}

impl ClassifiedBrief {
    /// Text for a section. Empty string for keys outside the taxonomy.
    pub fn text(&self, key: SectionKey) -> &str {
        self.sections.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Number of sections that received non-empty text.
    pub fn sections_filled(&self) -> usize {
        self.sections.values().filter(|t| !t.is_empty()).count()
    }

    /// Iterate over (key, text) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> {
        self.sections.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Consume into the underlying map.
    pub fn into_sections(self) -> BTreeMap<SectionKey, String> {
        self.sections
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Deterministic markdown section classifier.
///
/// Holds a fixed [`SectionTaxonomy`]; [`classify`](Self::classify) is a pure
/// function of its input, safe to call concurrently from any number of
/// callers.
#[derive(Debug, Clone, Default)]
pub struct SectionClassifier {
    taxonomy: SectionTaxonomy,
}

impl SectionClassifier {
    /// Classifier over a custom taxonomy.
    pub fn new(taxonomy: SectionTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Classifier over the default five-section taxonomy.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The taxonomy this classifier matches against.
    pub fn taxonomy(&self) -> &SectionTaxonomy {
        &self.taxonomy
    }

    /// Partition a markdown document into section texts.
    ///
    /// Scans lines in order, switching the current section whenever a
    /// heading matches an alias. Matched heading lines are consumed;
    /// unmatched headings stay as content in the current section. Each
    /// section's lines are rejoined and trimmed of surrounding blank
    /// lines. If the default section comes out empty, it is replaced with
    /// the entire trimmed document so a brief with no recognizable
    /// headings still surfaces its text.
    pub fn classify(&self, document: &str) -> ClassifiedBrief {
        let mut buckets: BTreeMap<SectionKey, Vec<&str>> = self
            .taxonomy
            .keys()
            .iter()
            .map(|key| (*key, Vec::new()))
            .collect();

        // Seeded to the default key; the None arm below only exists for an
        // empty taxonomy, where discarding beats misfiling.
        let mut current: Option<SectionKey> = self.taxonomy.default_key();

        for line in document.lines() {
            if is_heading(line) {
                if let Some(key) = self.taxonomy.match_alias(&normalize_heading(line)) {
                    // The heading itself contributes no content to either
                    // the section it leaves or the one it starts.
                    current = Some(key);
                    continue;
                }
                // Unrecognized heading: not a section boundary, falls
                // through as ordinary content.
            }
            if let Some(key) = current {
                if let Some(bucket) = buckets.get_mut(&key) {
                    bucket.push(line);
                }
            }
        }

        let mut sections: BTreeMap<SectionKey, String> = buckets
            .into_iter()
            .map(|(key, lines)| (key, lines.join("\n").trim().to_string()))
            .collect();

        // A brief whose default section came out empty, whether the input
        // had no recognizable headings or every line landed elsewhere,
        // gets the whole document verbatim (outer whitespace trimmed).
        if let Some(default_key) = self.taxonomy.default_key() {
            let default_is_empty = sections
                .get(&default_key)
                .map(|text| text.is_empty())
                .unwrap_or(true);
            if default_is_empty {
                sections.insert(default_key, document.trim().to_string());
            }
        }

        ClassifiedBrief { sections }
    }
}

// =============================================================================
// HEADING NORMALIZATION
// =============================================================================

/// ATX heading test: one or more `#` after leading whitespace.
fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Normalize a heading line for alias matching.
///
/// Strips the `#` markers and surrounding whitespace, drops a leading
/// ordinal ("1.", "2)"), lowercases, rewrites `&` as "and", and truncates
/// at the first parenthesis so trailing qualifiers like
/// "(if attendees provided)" cannot affect matching.
fn normalize_heading(line: &str) -> String {
    let text = line.trim_start().trim_start_matches('#').trim();
    let text = strip_ordinal_prefix(text);
    let mut text = text.to_lowercase().replace('&', "and");
    if let Some(idx) = text.find('(') {
        text.truncate(idx);
    }
    text.trim().to_string()
}

/// Strip a leading "1." / "12)" style ordinal. Digits not followed by a
/// `.` or `)` are left alone: "2024 Outlook" is a title, not a number.
fn strip_ordinal_prefix(text: &str) -> &str {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == text.len() {
        return text;
    }
    match rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
        Some(after) => after.trim_start(),
        None => text,
    }
}

// =============================================================================
// TESTS
// =============================================================================
