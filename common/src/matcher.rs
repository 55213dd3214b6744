//! Negation-scoped matcher
//!
//! Scans one listing text against one [`PatternSet`].
//!
//! ## Pipeline
//! 1. Disqualifying rules (hard veto, short-circuits everything else)
//! 2. Every affirmative match, each checked against the negation tokens in a
//!    look-behind window
//!
//! A match is suppressed only when a negation token is closer than
//! `negation_distance` characters AND no sentence terminator (`.`, `!`, `?`)
//! lies between the two. "Great property with no issues. Owner financing
//! available." therefore keeps its match.

use crate::patterns::{PatternRule, PatternSet};
use serde::{Deserialize, Serialize};

/// Default look-behind budget in characters
pub const DEFAULT_LOOK_BEHIND_WINDOW: usize = 50;

/// Default negation distance in characters
pub const DEFAULT_NEGATION_DISTANCE: usize = 15;

/// Tunable distances (in characters, not bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherOptions {
    /// How far before an affirmative match to look for negation tokens
    pub look_behind_window: usize,
    /// A negation must end closer than this to suppress the match
    pub negation_distance: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            look_behind_window: DEFAULT_LOOK_BEHIND_WINDOW,
            negation_distance: DEFAULT_NEGATION_DISTANCE,
        }
    }
}

/// One regex hit in the listing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    /// Canonical label of the rule that matched
    pub keyword: String,
    pub matched_text: String,
    /// Byte offset into the listing text
    pub start_offset: usize,
}

/// Affirmative match cancelled by a nearby negation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressedMatch {
    #[serde(flatten)]
    pub matched: KeywordMatch,
    pub negation: String,
    pub negation_offset: usize,
}

/// Result of scanning one text against one set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvidence {
    /// Surviving affirmative matches, in scan order
    pub matches: Vec<KeywordMatch>,
    pub disqualified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualified_by: Option<KeywordMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<SuppressedMatch>,
}

impl MatchEvidence {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.keyword.as_str())
    }
}

/// Scan `text` against `set`.
pub fn scan(text: &str, set: &PatternSet, options: &MatcherOptions) -> MatchEvidence {
    if text.trim().is_empty() {
        return MatchEvidence::default();
    }

    if let Some(hit) = find_disqualifier(text, set.disqualifying()) {
        tracing::debug!(
            set = set.name(),
            rule = %hit.keyword,
            matched = %hit.matched_text,
            "listing disqualified"
        );
        return MatchEvidence {
            disqualified: true,
            disqualified_by: Some(hit),
            ..Default::default()
        };
    }

    let mut evidence = MatchEvidence::default();
    for rule in set.affirmative() {
        for m in rule.regex().find_iter(text) {
            let matched = KeywordMatch {
                keyword: rule.label().to_string(),
                matched_text: m.as_str().to_string(),
                start_offset: m.start(),
            };

            match suppressing_negation(text, m.start(), set, options) {
                Some((negation, negation_offset)) => {
                    tracing::trace!(
                        keyword = %matched.keyword,
                        negation = %negation,
                        "affirmative match suppressed"
                    );
                    evidence.suppressed.push(SuppressedMatch {
                        matched,
                        negation,
                        negation_offset,
                    });
                }
                None => evidence.matches.push(matched),
            }
        }
    }

    evidence
}

fn find_disqualifier(text: &str, rules: &[PatternRule]) -> Option<KeywordMatch> {
    rules.iter().find_map(|rule| {
        rule.regex().find(text).map(|m| KeywordMatch {
            keyword: rule.label().to_string(),
            matched_text: m.as_str().to_string(),
            start_offset: m.start(),
        })
    })
}

/// First negation token in the look-behind window that is both close
/// enough and in the same sentence as the match starting at `match_start`.
fn suppressing_negation(
    text: &str,
    match_start: usize,
    set: &PatternSet,
    options: &MatcherOptions,
) -> Option<(String, usize)> {
    let negation = set.negation()?;
    let window_start = window_start(text, match_start, options.look_behind_window);

    // find_at keeps the text before `pos` as context, so a token cut by the
    // window edge never matches as a whole word.
    let mut pos = window_start;
    while pos < match_start {
        let neg = negation.find_at(text, pos)?;
        if neg.end() > match_start {
            return None;
        }

        let between = &text[neg.end()..match_start];
        let distance = between.chars().count();
        let crosses_sentence = between.chars().any(is_sentence_terminator);
        if distance < options.negation_distance && !crosses_sentence {
            return Some((neg.as_str().to_string(), neg.start()));
        }

        pos = neg.end();
    }

    None
}

/// Byte index `window` characters before `end`, clamped to the text start.
fn window_start(text: &str, end: usize, window: usize) -> usize {
    if window == 0 {
        return end;
    }
    text[..end]
        .char_indices()
        .rev()
        .nth(window - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}
