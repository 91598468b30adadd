//! Metadata extraction from engine responses.
//!
//! Three independent passes turn a [`QaResponse`] into the metadata arrays
//! stored next to each answer:
//!
//! - `exact_citation`: trimmed quotes from the top evidence snippets
//! - `reference`: citations, preferably from the answer's `References` list
//! - `ref_details`: a study-type / population / evidence description per reference
//!
//! Every pass is fail-soft. Internal failures are [`ExtractionError`]s that
//! never leave this module; the pass returns its fallback array instead, so
//! all three arrays are always present. The arrays are derived separately
//! and are not guaranteed to have equal lengths.

mod citations;
mod quality;
mod references;

pub use citations::{trim_quote, MIN_QUOTE_CHARS, QUOTE_LIMIT};
pub use quality::{
    assess_reference, EvidenceWeight, Population, ReferenceAssessment, Rule, StudyDesign,
    POPULATION_RULES, STUDY_DESIGN_RULES,
};
pub use references::{references_from_answer, references_from_contexts};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::gateway::QaResponse;

/// Maximum entries per metadata array, and snippets examined per pass.
pub const MAX_ENTRIES: usize = 5;

pub const FALLBACK_EXACT_CITATION: &str = "Direct quotes from source papers not available";
pub const FALLBACK_REFERENCE: &str = "References extracted from peer-reviewed literature";
pub const FALLBACK_REF_DETAILS: &str =
    "Clinical research on ECMO pharmacokinetics. Quality: peer-reviewed evidence. Multiple sources analyzed.";

/// Why a pass fell back to its static value.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("response has no context snippets")]
    NoContexts,

    #[error("no references in the formatted answer or the contexts")]
    NoReferences,

    #[error("no references to assess")]
    NothingToAssess,
}

/// The three metadata arrays of one analysis result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub exact_citation: Vec<String>,
    pub reference: Vec<String>,
    pub ref_details: Vec<String>,
}

/// Runs all three passes over a response.
///
/// `ref_details` is computed from the same reference array returned in
/// `reference`.
pub fn extract_metadata(response: &QaResponse) -> Metadata {
    let reference = references(response);
    let ref_details = reference_details(&reference);

    Metadata {
        exact_citation: exact_citations(response),
        reference,
        ref_details,
    }
}

/// Quotes from the first [`MAX_ENTRIES`] context snippets.
pub fn exact_citations(response: &QaResponse) -> Vec<String> {
    fail_soft(
        "exact_citation",
        citations::collect(&response.contexts),
        FALLBACK_EXACT_CITATION,
    )
}

/// References from the formatted answer, else from the contexts.
pub fn references(response: &QaResponse) -> Vec<String> {
    fail_soft("reference", references::collect(response), FALLBACK_REFERENCE)
}

/// One quality description per reference, in order.
pub fn reference_details(references: &[String]) -> Vec<String> {
    fail_soft(
        "ref_details",
        quality::describe_all(references),
        FALLBACK_REF_DETAILS,
    )
}

fn fail_soft(
    pass: &'static str,
    result: Result<Vec<String>, ExtractionError>,
    fallback: &str,
) -> Vec<String> {
    match result {
        Ok(values) => values,
        Err(e) => {
            warn!(pass, reason = %e, "metadata pass degraded to fallback");
            vec![fallback.to_string()]
        }
    }
}

/// The first `n` characters of `s`, never splitting a character.
pub(crate) fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
