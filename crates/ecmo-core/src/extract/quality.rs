use super::ExtractionError;

/// A keyword rule: matches when the lower-cased text contains any keyword.
#[derive(Debug, Clone, Copy)]
pub struct Rule<T> {
    pub keywords: &'static [&'static str],
    pub label: T,
}

impl<T: Copy> Rule<T> {
    fn matches(&self, text_lower: &str) -> bool {
        self.keywords.iter().any(|k| text_lower.contains(k))
    }
}

/// Returns the label of the first matching rule, or `default`.
fn first_match<T: Copy>(rules: &[Rule<T>], text_lower: &str, default: T) -> T {
    rules
        .iter()
        .find(|rule| rule.matches(text_lower))
        .map(|rule| rule.label)
        .unwrap_or(default)
}

/// Study design guessed from a citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyDesign {
    RandomizedControlledTrial,
    ProspectiveObservational,
    CaseReport,
    LiteratureReview,
    ClinicalGuideline,
    Pharmacokinetic,
    ClinicalResearch,
}

impl StudyDesign {
    pub fn label(&self) -> &'static str {
        match self {
            StudyDesign::RandomizedControlledTrial => "Randomized controlled trial",
            StudyDesign::ProspectiveObservational => "Prospective observational study",
            StudyDesign::CaseReport => "Case report/series",
            StudyDesign::LiteratureReview => "Literature review",
            StudyDesign::ClinicalGuideline => "Clinical guideline",
            StudyDesign::Pharmacokinetic => "Pharmacokinetic study",
            StudyDesign::ClinicalResearch => "Clinical research study",
        }
    }

    pub fn quality(&self) -> &'static str {
        match self {
            StudyDesign::RandomizedControlledTrial => "high-quality RCT",
            StudyDesign::ProspectiveObservational => "moderate-quality observational study",
            StudyDesign::CaseReport => "case-based evidence",
            StudyDesign::LiteratureReview => "narrative review",
            StudyDesign::ClinicalGuideline => "expert consensus guideline",
            StudyDesign::Pharmacokinetic => "specialized PK research",
            StudyDesign::ClinicalResearch => "peer-reviewed research",
        }
    }
}

/// Evaluated in order, first match wins; [`StudyDesign::ClinicalResearch`] otherwise.
pub const STUDY_DESIGN_RULES: &[Rule<StudyDesign>] = &[
    Rule {
        keywords: &["randomized", "rct"],
        label: StudyDesign::RandomizedControlledTrial,
    },
    Rule {
        keywords: &["prospective", "cohort"],
        label: StudyDesign::ProspectiveObservational,
    },
    Rule {
        keywords: &["case report", "case series"],
        label: StudyDesign::CaseReport,
    },
    Rule {
        keywords: &["review"],
        label: StudyDesign::LiteratureReview,
    },
    Rule {
        keywords: &["guideline"],
        label: StudyDesign::ClinicalGuideline,
    },
    Rule {
        keywords: &["pharmacokinetics"],
        label: StudyDesign::Pharmacokinetic,
    },
];

/// Patient population guessed from a citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    Pediatric,
    Adult,
    Unspecified,
}

impl Population {
    pub fn label(&self) -> &'static str {
        match self {
            Population::Pediatric => "pediatric ECMO patients",
            Population::Adult => "adult ECMO patients",
            Population::Unspecified => "ECMO patients",
        }
    }
}

/// Evaluated in order, first match wins; [`Population::Unspecified`] otherwise.
pub const POPULATION_RULES: &[Rule<Population>] = &[
    Rule {
        keywords: &["pediatric", "children"],
        label: Population::Pediatric,
    },
    Rule {
        keywords: &["adult"],
        label: Population::Adult,
    },
];

/// How much of the answer leans on a reference, by its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceWeight {
    Multiple,
    Single,
}

impl EvidenceWeight {
    /// References ranked below this are treated as cited multiple times.
    pub const MULTIPLE_CITATION_RANKS: usize = 3;

    pub fn for_rank(index: usize) -> Self {
        if index < Self::MULTIPLE_CITATION_RANKS {
            EvidenceWeight::Multiple
        } else {
            EvidenceWeight::Single
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvidenceWeight::Multiple => "multiple citations",
            EvidenceWeight::Single => "single citation",
        }
    }
}

/// Classification of one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceAssessment {
    pub design: StudyDesign,
    pub population: Population,
    pub evidence: EvidenceWeight,
}

impl ReferenceAssessment {
    pub fn describe(&self) -> String {
        format!(
            "{} on {}. Quality: {}. Evidence: {} from this source.",
            self.design.label(),
            self.population.label(),
            self.design.quality(),
            self.evidence.label()
        )
    }
}

/// Classifies the reference at `index` of the reference list.
pub fn assess_reference(index: usize, reference: &str) -> ReferenceAssessment {
    let lower = reference.to_lowercase();
    ReferenceAssessment {
        design: first_match(STUDY_DESIGN_RULES, &lower, StudyDesign::ClinicalResearch),
        population: first_match(POPULATION_RULES, &lower, Population::Unspecified),
        evidence: EvidenceWeight::for_rank(index),
    }
}

pub(super) fn describe_all(references: &[String]) -> Result<Vec<String>, ExtractionError> {
    if references.is_empty() {
        return Err(ExtractionError::NothingToAssess);
    }

    Ok(references
        .iter()
        .enumerate()
        .map(|(i, r)| assess_reference(i, r).describe())
        .collect())
}
