//! Classifier entry point
//!
//! Combines the negation-scoped matcher and the discount assessment into one
//! [`ClassificationVerdict`]. Pure: no I/O and no state between calls, so a
//! single [`Classifier`] can be shared across threads.

use crate::discount::{self, DiscountAssessment, DiscountOptions};
use crate::matcher::{self, MatchEvidence, MatcherOptions};
use crate::patterns::PatternTable;
use serde::{Deserialize, Serialize};

/// Tunables for one classifier instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierOptions {
    #[serde(default)]
    pub matcher: MatcherOptions,
    #[serde(default)]
    pub discount: DiscountOptions,
}

/// Externally consumed result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationVerdict {
    pub is_owner_finance: bool,
    pub is_cash_deal: bool,
    /// Surviving labels, deduplicated, in scan order
    pub matched_keywords: Vec<String>,
    pub discount: Option<DiscountAssessment>,
    /// Label of the disqualifying rule, when the primary set vetoed the listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualified_by: Option<String>,
}

impl ClassificationVerdict {
    /// Whether the import pipeline should keep the listing
    pub fn is_kept(&self) -> bool {
        self.is_owner_finance || self.is_cash_deal
    }

    /// One-line explanation
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if self.is_owner_finance {
            parts.push(format!("owner finance: {}", self.matched_keywords.join(", ")));
        } else if let Some(rule) = &self.disqualified_by {
            parts.push(format!("rejected: {}", rule));
        }

        if let Some(d) = &self.discount {
            if d.is_deep_discount {
                parts.push(format!("cash deal: {:.1}% of estimate", d.percent_of_estimate));
            }
        }

        if parts.is_empty() {
            "no financing terms or deep discount".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Classifier bound to one compiled pattern table
#[derive(Debug, Clone)]
pub struct Classifier {
    table: PatternTable,
    options: ClassifierOptions,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PatternTable::builtin(), ClassifierOptions::default())
    }
}

lazy_static::lazy_static! {
    static ref DEFAULT_CLASSIFIER: Classifier = Classifier::default();
}

impl Classifier {
    pub fn new(table: PatternTable, options: ClassifierOptions) -> Self {
        Self { table, options }
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Scan every set, primary first.
    pub fn evidence(&self, description: &str) -> Vec<(&str, MatchEvidence)> {
        let primary = self.table.primary();
        std::iter::once(primary)
            .chain(self.table.sets().iter().filter(|s| !self.table.is_primary(s)))
            .map(|set| (set.name(), matcher::scan(description, set, &self.options.matcher)))
            .collect()
    }

    pub fn classify(
        &self,
        description: &str,
        list_price: Option<f64>,
        estimated_value: Option<f64>,
    ) -> ClassificationVerdict {
        let evidence = self.evidence(description);

        // primary set is always first
        let disqualified_by = evidence
            .first()
            .and_then(|(_, e)| e.disqualified_by.as_ref())
            .map(|m| m.keyword.clone());

        let mut matched_keywords: Vec<String> = Vec::new();
        for (_, set_evidence) in evidence.iter().filter(|(_, e)| !e.disqualified) {
            for keyword in set_evidence.keywords() {
                if !matched_keywords.iter().any(|k| k == keyword) {
                    matched_keywords.push(keyword.to_string());
                }
            }
        }

        let is_owner_finance = disqualified_by.is_none() && !matched_keywords.is_empty();

        let discount = discount::assess(list_price, estimated_value, &self.options.discount);
        let is_cash_deal = discount.map(|d| d.is_deep_discount).unwrap_or(false);

        ClassificationVerdict {
            is_owner_finance,
            is_cash_deal,
            matched_keywords,
            discount,
            disqualified_by,
        }
    }
}

/// Classify with the builtin table and default options.
pub fn classify(
    description: &str,
    list_price: Option<f64>,
    estimated_value: Option<f64>,
) -> ClassificationVerdict {
    DEFAULT_CLASSIFIER.classify(description, list_price, estimated_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{PatternRuleDef, PatternTableDef};

    #[test]
    fn test_sentence_boundary_keeps_offer() {
        let v = classify("Great property with no issues. Owner financing available.", None, None);
        assert!(v.is_owner_finance);
        assert_eq!(v.matched_keywords, vec!["owner financing"]);
    }

    #[test]
    fn test_true_disqualification() {
        let v = classify("Cash only. No owner financing available.", None, None);
        assert!(!v.is_owner_finance);
        assert!(v.matched_keywords.is_empty());
        assert!(v.disqualified_by.is_some());
    }

    #[test]
    fn test_proximity_suppression() {
        let v = classify("Property has no owner financing option here", None, None);
        assert!(!v.is_owner_finance);
    }

    #[test]
    fn test_discount_boundary() {
        let v = classify("", Some(69_999.0), Some(100_000.0));
        let d = v.discount.unwrap();
        assert!((d.percent_of_estimate - 69.999).abs() < 1e-9);
        assert!(d.is_deep_discount);
        assert!(v.is_cash_deal);

        let v = classify("", Some(70_000.0), Some(100_000.0));
        assert!(!v.discount.unwrap().is_deep_discount);
        assert!(!v.is_cash_deal);
    }

    #[test]
    fn test_missing_financial_data() {
        let v = classify("some text", Some(0.0), Some(0.0));
        assert!(v.discount.is_none());
        assert!(!v.is_cash_deal);
        assert!(!v.is_kept());
    }

    #[test]
    fn test_idempotent() {
        let text = "Seller carry possible, lease option too. Not a flood zone.";
        let a = classify(text, Some(80_000.0), Some(150_000.0));
        let b = classify(text, Some(80_000.0), Some(150_000.0));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_uppercase_offer() {
        let v = classify("NOW OFFERING OWNER FINANCE! Great home.", None, None);
        assert!(v.is_owner_finance);
        assert!(v.matched_keywords.iter().any(|k| k.starts_with("owner financ")));
    }

    #[test]
    fn test_combined_verdict() {
        let v = classify("Owner financing available with low down.", Some(60_000.0), Some(100_000.0));
        assert!(v.is_owner_finance);
        assert!(v.is_cash_deal);
        assert_eq!(
            v.summary(),
            "owner finance: owner financing; cash deal: 60.0% of estimate"
        );
    }

    #[test]
    fn test_keywords_deduplicated() {
        let v = classify("Owner financing. Really, owner financing!", None, None);
        assert_eq!(v.matched_keywords, vec!["owner financing"]);
    }

    #[test]
    fn test_secondary_set_keywords_survive_primary_veto() {
        let v = classify("No credit check. Cash buyers only.", None, None);
        assert!(!v.is_owner_finance);
        assert_eq!(v.disqualified_by.as_deref(), Some("cash only"));
        assert_eq!(v.matched_keywords, vec!["no credit check"]);
        assert_eq!(v.summary(), "rejected: cash only");
    }

    #[test]
    fn test_secondary_set_alone_qualifies() {
        let v = classify("No bank qualifying, 10% down.", None, None);
        assert!(v.is_owner_finance);
        assert_eq!(v.matched_keywords, vec!["no bank qualifying"]);
    }

    #[test]
    fn test_added_phrase_needs_no_code_change() {
        let mut def = PatternTableDef::builtin();
        def.sets[0]
            .affirmative
            .push(PatternRuleDef::new("wrap mortgage", r"\bwrap(?:around)?\s+mortgage\b"));
        let classifier = Classifier::new(def.compile().unwrap(), ClassifierOptions::default());

        let v = classifier.classify("Assumable wrap mortgage offered", None, None);
        assert!(v.is_owner_finance);
        assert_eq!(v.matched_keywords, vec!["wrap mortgage"]);
    }

    #[test]
    fn test_custom_options() {
        let options = ClassifierOptions {
            matcher: MatcherOptions {
                look_behind_window: 50,
                negation_distance: 5,
            },
            discount: DiscountOptions {
                deep_discount_threshold: 80.0,
            },
        };
        let classifier = Classifier::new(PatternTable::builtin(), options);
        let v = classifier.classify("no issues, owner financing", Some(75.0), Some(100.0));
        assert!(v.is_owner_finance);
        assert!(v.is_cash_deal);
    }

    #[test]
    fn test_summary_plain() {
        let v = classify("Nice yard.", Some(90_000.0), Some(100_000.0));
        assert_eq!(v.summary(), "no financing terms or deep discount");
    }

    #[test]
    fn test_serialized_keys() {
        let v = classify("rent to own", Some(50.0), Some(100.0));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["isOwnerFinance"], true);
        assert_eq!(json["isCashDeal"], true);
        assert_eq!(json["matchedKeywords"][0], "rent to own");
        assert_eq!(json["discount"]["percentOfEstimate"], 50.0);
        assert_eq!(json["discount"]["isDeepDiscount"], true);
        assert!(json.get("disqualifiedBy").is_none());
    }

    #[test]
    fn test_shared_across_threads() {
        let classifier = std::sync::Arc::new(Classifier::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = classifier.clone();
                std::thread::spawn(move || c.classify("Seller financing offered", None, None))
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_owner_finance);
        }
    }
}
