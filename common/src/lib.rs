//! OwnerFi listing classifier core
//!
//! Decides whether a scraped property listing is an owner-financing offer,
//! a deep-discount cash deal, both, or neither.

pub mod classifier;
pub mod discount;
pub mod error;
pub mod matcher;
pub mod patterns;

pub use classifier::{classify, ClassificationVerdict, Classifier, ClassifierOptions};
pub use discount::{DiscountAssessment, DiscountOptions, DEEP_DISCOUNT_THRESHOLD_PERCENT};
pub use error::{Error, Result};
pub use matcher::{KeywordMatch, MatchEvidence, MatcherOptions, SuppressedMatch};
pub use patterns::{PatternSet, PatternTable, PatternTableDef};
