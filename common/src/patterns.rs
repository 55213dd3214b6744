//! Pattern tables
//!
//! Phrase sets used to recognise financing language in listing text.
//! A table is written as a declarative, versioned document
//! ([`PatternTableDef`]) and compiled once into a [`PatternTable`].
//! Compiled tables are never mutated; adding a phrase means adding a rule
//! to the document.
//!
//! ## Structure
//! - `affirmative`: rules that detect an offer (each with a canonical label)
//! - `negationWords`: whole-word tokens that can cancel a nearby affirmative match
//! - `disqualifying`: hard vetoes such as "no owner financing"

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Supported table document version
pub const PATTERN_TABLE_VERSION: u32 = 1;

/// Name of the builtin primary set
pub const OWNER_FINANCING_SET: &str = "owner_financing";

/// Name of the builtin secondary set
pub const NO_BANK_TERMS_SET: &str = "no_bank_terms";

/// Default negation tokens
pub const DEFAULT_NEGATION_WORDS: &[&str] = &["no", "not", "never", "none", "without"];

/// One labelled regex, as written in a table document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRuleDef {
    pub label: String,
    pub pattern: String,
}

impl PatternRuleDef {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// A named pattern set, as written in a table document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSetDef {
    pub name: String,
    #[serde(default)]
    pub affirmative: Vec<PatternRuleDef>,
    #[serde(default)]
    pub negation_words: Vec<String>,
    #[serde(default)]
    pub disqualifying: Vec<PatternRuleDef>,
}

/// Table document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTableDef {
    pub version: u32,
    /// Set that decides the owner-finance verdict
    pub primary: String,
    pub sets: Vec<PatternSetDef>,
}

impl PatternTableDef {
    /// Builtin table shipped with the crate
    pub fn builtin() -> Self {
        Self {
            version: PATTERN_TABLE_VERSION,
            primary: OWNER_FINANCING_SET.into(),
            sets: vec![owner_financing_set(), no_bank_terms_set()],
        }
    }

    /// Load from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let def: Self = serde_json::from_str(json)?;
        Ok(def)
    }

    /// Load from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and compile every rule.
    ///
    /// Fails on the first invalid regex, so a broken table is rejected at
    /// load time instead of misbehaving per listing.
    pub fn compile(&self) -> Result<PatternTable> {
        if self.version != PATTERN_TABLE_VERSION {
            return Err(Error::InvalidTable(format!(
                "unsupported version {} (expected {})",
                self.version, PATTERN_TABLE_VERSION
            )));
        }
        if self.sets.is_empty() {
            return Err(Error::InvalidTable("table has no pattern sets".into()));
        }

        let mut names = HashSet::new();
        let mut sets = Vec::with_capacity(self.sets.len());
        for set in &self.sets {
            if set.name.trim().is_empty() {
                return Err(Error::InvalidTable("pattern set with empty name".into()));
            }
            if !names.insert(set.name.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "duplicate pattern set `{}`",
                    set.name
                )));
            }
            sets.push(PatternSet::compile(set)?);
        }

        let primary = sets
            .iter()
            .position(|s| s.name == self.primary)
            .ok_or_else(|| {
                Error::InvalidTable(format!("unknown primary set `{}`", self.primary))
            })?;

        Ok(PatternTable {
            version: self.version,
            primary,
            sets,
        })
    }
}

/// Compiled rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    label: String,
    regex: Regex,
}

impl PatternRule {
    fn compile(def: &PatternRuleDef) -> Result<Self> {
        if def.label.trim().is_empty() {
            return Err(Error::InvalidTable(format!(
                "rule `{}` has an empty label",
                def.pattern
            )));
        }
        let regex = RegexBuilder::new(&def.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::Pattern {
                label: def.label.clone(),
                source,
            })?;
        Ok(Self {
            label: def.label.clone(),
            regex,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compiled pattern set
#[derive(Debug, Clone)]
pub struct PatternSet {
    name: String,
    affirmative: Vec<PatternRule>,
    negation_words: Vec<String>,
    /// Whole-word alternation of `negation_words`; `None` when the set has none
    negation: Option<Regex>,
    disqualifying: Vec<PatternRule>,
}

impl PatternSet {
    fn compile(def: &PatternSetDef) -> Result<Self> {
        let affirmative = def
            .affirmative
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>>>()?;
        let disqualifying = def
            .disqualifying
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>>>()?;

        let negation_words: Vec<String> = def
            .negation_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let negation = if negation_words.is_empty() {
            None
        } else {
            let alternation = negation_words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
                .case_insensitive(true)
                .build()
                .map_err(|source| Error::Pattern {
                    label: format!("{} negation words", def.name),
                    source,
                })?;
            Some(regex)
        };

        Ok(Self {
            name: def.name.clone(),
            affirmative,
            negation_words,
            negation,
            disqualifying,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn affirmative(&self) -> &[PatternRule] {
        &self.affirmative
    }

    pub fn negation_words(&self) -> &[String] {
        &self.negation_words
    }

    pub fn negation(&self) -> Option<&Regex> {
        self.negation.as_ref()
    }

    pub fn disqualifying(&self) -> &[PatternRule] {
        &self.disqualifying
    }
}

/// Compiled, immutable pattern table
#[derive(Debug, Clone)]
pub struct PatternTable {
    version: u32,
    primary: usize,
    sets: Vec<PatternSet>,
}

lazy_static::lazy_static! {
    static ref BUILTIN_TABLE: PatternTable = PatternTableDef::builtin()
        .compile()
        .expect("builtin pattern table compiles");
}

impl PatternTable {
    /// Builtin table (compiled once per process)
    pub fn builtin() -> Self {
        BUILTIN_TABLE.clone()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        PatternTableDef::from_json(json)?.compile()
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        PatternTableDef::from_file(path)?.compile()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn primary(&self) -> &PatternSet {
        &self.sets[self.primary]
    }

    pub fn is_primary(&self, set: &PatternSet) -> bool {
        std::ptr::eq(set, self.primary())
    }

    pub fn sets(&self) -> &[PatternSet] {
        &self.sets
    }

    pub fn get(&self, name: &str) -> Option<&PatternSet> {
        self.sets.iter().find(|s| s.name == name)
    }
}

/// Matches "owner financing", "owner-financed", "OwnerFinance", ...
const SEP: &str = r"[\s\-/_]*";

/// Up to a few words between a financing term and its rejection, within one
/// sentence ("seller financing offers will not be accepted")
const REJECTION_GAP: &str = r"[^.!?]{0,40}?";

fn owner_financing_set() -> PatternSetDef {
    let financ = format!(r"{SEP}financ(?:e|ed|ing)\b");
    let subject = r"(?:owner|seller|creative)";

    PatternSetDef {
        name: OWNER_FINANCING_SET.into(),
        affirmative: vec![
            PatternRuleDef::new("owner financing", format!(r"\bowner{financ}")),
            PatternRuleDef::new("seller financing", format!(r"\bseller{financ}")),
            PatternRuleDef::new("creative financing", format!(r"\bcreative{financ}")),
            PatternRuleDef::new("owner carry", format!(r"\bowner{SEP}carry\b")),
            PatternRuleDef::new("seller carry", format!(r"\bseller{SEP}carry\b")),
            PatternRuleDef::new("owner terms", format!(r"\b(?:owner|seller){SEP}terms\b")),
            PatternRuleDef::new(
                "owner will finance",
                r"\b(?:owner|seller)\s+will\s+(?:finance|carry)\b",
            ),
            PatternRuleDef::new("rent to own", r"\brent[\s\-]+to[\s\-]+own\b"),
            PatternRuleDef::new("lease option", r"\blease[\s\-]+option\b"),
            PatternRuleDef::new("lease purchase", r"\blease[\s\-]+purchase\b"),
            PatternRuleDef::new("land contract", r"\bland\s+contract\b"),
            PatternRuleDef::new("contract for deed", r"\bcontract\s+for\s+deed\b"),
        ],
        negation_words: DEFAULT_NEGATION_WORDS.iter().map(|w| w.to_string()).collect(),
        disqualifying: vec![
            PatternRuleDef::new(
                "no owner financing",
                format!(r"\bno\s+{subject}{SEP}financ"),
            ),
            PatternRuleDef::new(
                "owner financing not available",
                format!(
                    r"\b{subject}{SEP}financ\w*{REJECTION_GAP}\b(?:not|never)\s+(?:be\s+)?(?:available|an\s+option|offered|offering|accepted|considered|entertained|interested)\b"
                ),
            ),
            PatternRuleDef::new(
                "owner financing refused",
                format!(
                    r"\b(?:cannot|can't|can\s+not|will\s+not|won't|does\s+not|do\s+not)\s+(?:do|offer|consider|accept|provide)\s+{subject}{SEP}financ"
                ),
            ),
            PatternRuleDef::new("cash only", r"\b(?:all\s+)?cash\s+(?:buyers?\s+|offers?\s+)?only\b"),
            PatternRuleDef::new("cash only", r"\bmust\s+be\s+cash\b"),
            PatternRuleDef::new("cash only", r"\bcash\s+required\b"),
            PatternRuleDef::new("cash only", r"\brequires?\s+cash\b"),
            PatternRuleDef::new(
                "conventional only",
                r"\bcash\s+(?:or|and)\s+conventional\s+(?:only|financing)\b",
            ),
            PatternRuleDef::new(
                "conventional only",
                r"\bconventional\s+(?:financing|loans?)\s+only\b",
            ),
        ],
    }
}

fn no_bank_terms_set() -> PatternSetDef {
    PatternSetDef {
        name: NO_BANK_TERMS_SET.into(),
        affirmative: vec![
            PatternRuleDef::new(
                "no bank qualifying",
                r"\bno\s+bank\s+(?:qualifying|qualification|needed|required)\b",
            ),
            PatternRuleDef::new("no credit check", r"\bno\s+credit\s+checks?\b"),
        ],
        // every phrase here starts with "no"; a preceding "No HOA, " must not cancel it
        negation_words: DEFAULT_NEGATION_WORDS
            .iter()
            .filter(|w| **w != "no")
            .map(|w| w.to_string())
            .collect(),
        disqualifying: Vec::new(),
    }
}
