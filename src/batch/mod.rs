use crate::scanner::Listing;
use indicatif::{ProgressBar, ProgressStyle};
use ownerfi_common::{ClassificationVerdict, Classifier};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A listing with its verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub verdict: ClassificationVerdict,
}

impl ClassifiedListing {
    /// Persistence rule: owner finance OR cash deal
    pub fn is_kept(&self) -> bool {
        self.verdict.is_kept()
    }
}

/// Counts over one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub owner_finance: usize,
    pub cash_deal: usize,
    /// Owner finance AND cash deal
    pub both: usize,
    pub disqualified: usize,
    pub kept: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ClassifiedListing]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            let v = &r.verdict;
            s.total += 1;
            s.owner_finance += v.is_owner_finance as usize;
            s.cash_deal += v.is_cash_deal as usize;
            s.both += (v.is_owner_finance && v.is_cash_deal) as usize;
            s.disqualified += v.disqualified_by.is_some() as usize;
            s.kept += v.is_kept() as usize;
            s
        })
    }
}

/// Classify every listing in parallel. Output order matches input order.
pub fn classify_listings(
    listings: Vec<Listing>,
    classifier: &Classifier,
    show_progress: bool,
) -> Vec<ClassifiedListing> {
    let progress = if show_progress {
        let pb = ProgressBar::new(listings.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} listings ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<ClassifiedListing> = listings
        .into_par_iter()
        .map(|listing| {
            let verdict = classifier.classify(
                listing.description.as_deref().unwrap_or(""),
                listing.price,
                listing.estimate,
            );
            progress.inc(1);
            ClassifiedListing { listing, verdict }
        })
        .collect();

    progress.finish_and_clear();

    let summary = BatchSummary::from_results(&results);
    tracing::info!(
        total = summary.total,
        owner_finance = summary.owner_finance,
        cash_deal = summary.cash_deal,
        disqualified = summary.disqualified,
        kept = summary.kept,
        "batch classified"
    );

    results
}
