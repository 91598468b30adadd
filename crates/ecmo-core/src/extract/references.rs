use std::collections::HashSet;

use crate::gateway::{ContextSnippet, QaResponse};

use super::{take_chars, ExtractionError, MAX_ENTRIES};

/// A trimmed line starting with this opens the reference list.
const REFERENCES_HEADER: &str = "References";

/// Numbered list items kept from the reference list.
const NUMBERED_PREFIXES: [&str; 5] = ["1.", "2.", "3.", "4.", "5."];

/// Characters of snippet text searched for citation hints.
const HINT_WINDOW: usize = 100;

/// Characters of snippet text quoted in a placeholder citation.
const PLACEHOLDER_CHARS: usize = 80;

/// Substrings suggesting a snippet starts with a citation.
/// `20` is a crude year match (2000-2099).
const CITATION_HINTS: [&str; 2] = ["et al.", "20"];

pub(super) fn collect(response: &QaResponse) -> Result<Vec<String>, ExtractionError> {
    let from_answer = references_from_answer(&response.formatted_answer);
    if !from_answer.is_empty() {
        return Ok(from_answer);
    }

    let from_contexts = references_from_contexts(&response.contexts);
    if !from_contexts.is_empty() {
        return Ok(from_contexts);
    }

    Err(ExtractionError::NoReferences)
}

/// Reads up to [`MAX_ENTRIES`] numbered items from the `References` section.
///
/// For an item like `1. (smith2019): Smith J et al. ...` only the text after
/// the first colon is kept.
pub fn references_from_answer(formatted_answer: &str) -> Vec<String> {
    let mut references = Vec::new();
    let mut in_references = false;

    for line in formatted_answer.lines() {
        let line = line.trim();

        if line.starts_with(REFERENCES_HEADER) {
            in_references = true;
            continue;
        }

        if !in_references || line.is_empty() {
            continue;
        }

        if NUMBERED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            let reference = match line.split_once(':') {
                Some((_, rest)) => rest.trim(),
                None => line,
            };
            references.push(reference.to_string());
            if references.len() >= MAX_ENTRIES {
                break;
            }
        }
    }

    references
}

/// Derives citations from the first [`MAX_ENTRIES`] snippets.
///
/// A linked document's citation is preferred. Without one, a snippet whose
/// opening looks like a citation yields a placeholder. Each source is listed
/// once, keyed by document name, then citation, then position.
pub fn references_from_contexts(contexts: &[ContextSnippet]) -> Vec<String> {
    let mut references = Vec::new();
    let mut seen = HashSet::new();

    for context in contexts.iter().take(MAX_ENTRIES) {
        let mut citation = None;
        let mut key = None;

        if let Some(doc) = &context.doc {
            if !doc.citation.is_empty() {
                citation = Some(doc.citation.clone());
            }
            key = Some(if !doc.docname.is_empty() {
                doc.docname.clone()
            } else if !doc.citation.is_empty() {
                doc.citation.clone()
            } else {
                format!("doc_{}", references.len())
            });
        }

        if citation.is_none() {
            let head = take_chars(&context.text, HINT_WINDOW);
            if CITATION_HINTS.iter().any(|hint| head.contains(hint)) {
                citation = Some(format!(
                    "Reference extracted from: {}...",
                    take_chars(head, PLACEHOLDER_CHARS)
                ));
                key = Some(format!("context_{}", references.len()));
            }
        }

        if let (Some(citation), Some(key)) = (citation, key) {
            if seen.insert(key) {
                references.push(citation);
            }
        }

        if references.len() >= MAX_ENTRIES {
            break;
        }
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::SourceDocument;

    #[test]
    fn test_items_before_header_ignored() {
        let answer = "1. not a reference\nReferences\n2. Jones: Real one";
        assert_eq!(references_from_answer(answer), vec!["Real one"]);
    }

    #[test]
    fn test_item_without_colon_kept_whole() {
        let answer = "References\n\n  1. Smith J. Meropenem on ECMO. 2019  ";
        assert_eq!(
            references_from_answer(answer),
            vec!["1. Smith J. Meropenem on ECMO. 2019"]
        );
    }

    #[test]
    fn test_only_items_one_to_five() {
        let answer = "References\n6. six: x\n- bullet: y\n3. three: z";
        assert_eq!(references_from_answer(answer), vec!["z"]);
    }

    #[test]
    fn test_stops_at_five() {
        let mut answer = String::from("References\n");
        for round in 0..3 {
            for n in 1..=5 {
                answer.push_str(&format!("{n}. key{round}{n}: ref {round}-{n}\n"));
            }
        }
        let refs = references_from_answer(&answer);
        assert_eq!(refs.len(), MAX_ENTRIES);
        assert_eq!(refs[4], "ref 0-5");
    }

    #[test]
    fn test_doc_citation_preferred() {
        let contexts = vec![ContextSnippet::new("et al. 2019 text")
            .with_doc(SourceDocument::new("Smith J. Critical Care 2019", "smith2019"))];
        assert_eq!(references_from_contexts(&contexts), vec!["Smith J. Critical Care 2019"]);
    }

    #[test]
    fn test_same_document_listed_once() {
        let doc = SourceDocument::new("Smith J. 2019", "smith2019");
        let contexts = vec![
            ContextSnippet::new("first chunk").with_doc(doc.clone()),
            ContextSnippet::new("second chunk").with_doc(doc),
        ];
        assert_eq!(references_from_contexts(&contexts).len(), 1);
    }

    #[test]
    fn test_placeholder_from_text_hint() {
        let text = format!("Shekar et al. reported {}", "x".repeat(200));
        let refs = references_from_contexts(&[ContextSnippet::new(text.clone())]);
        assert_eq!(
            refs,
            vec![format!("Reference extracted from: {}...", &text[..80])]
        );
    }

    #[test]
    fn test_hint_must_be_in_first_hundred_chars() {
        let text = format!("{} et al. 2012", "x".repeat(120));
        assert!(references_from_contexts(&[ContextSnippet::new(text)]).is_empty());
    }

    #[test]
    fn test_empty_citation_falls_back_to_text() {
        let contexts = vec![ContextSnippet::new("Published 2015 in ASAIO")
            .with_doc(SourceDocument::new("", "asaio2015"))];
        assert_eq!(
            references_from_contexts(&contexts),
            vec!["Reference extracted from: Published 2015 in ASAIO..."]
        );
    }

    #[test]
    fn test_nothing_found_is_error() {
        let response = QaResponse {
            contexts: vec![ContextSnippet::new("no hints here at all")],
            ..Default::default()
        };
        assert!(matches!(collect(&response), Err(ExtractionError::NoReferences)));
    }
}
