//! The fixed set of analysis fields.
//!
//! Each field is one clinical question asked about a drug: what it means,
//! what shape the answer should take, the question sent to the engine and
//! the system prompt that steers it. Templates carry a `{drug_name}`
//! placeholder filled in at call time.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Placeholder substituted with the lower-cased drug name.
pub const DRUG_PLACEHOLDER: &str = "{drug_name}";

/// Errors raised when looking up a field.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown field: {name}. Available fields: {available}")]
    UnknownField { name: String, available: String },
}

impl CatalogError {
    fn unknown(name: &str) -> Self {
        CatalogError::UnknownField {
            name: name.to_string(),
            available: FieldKind::ALL
                .iter()
                .map(|k| k.name())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// One of the seven analysis dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    EffectOnEcmo,
    FinalRecommendation,
    VolumeOfDistribution,
    CircuitSequestration,
    EcmoDosage,
    LogP,
    ProteinBinding,
}

impl FieldKind {
    /// All fields, in the order a full analysis runs them.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::EffectOnEcmo,
        FieldKind::FinalRecommendation,
        FieldKind::VolumeOfDistribution,
        FieldKind::CircuitSequestration,
        FieldKind::EcmoDosage,
        FieldKind::LogP,
        FieldKind::ProteinBinding,
    ];

    /// Canonical key, also used as the key in result documents.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::EffectOnEcmo => "Effect on ECMO",
            FieldKind::FinalRecommendation => "Final Recommendation",
            FieldKind::VolumeOfDistribution => "Volume of distribution (Vd)",
            FieldKind::CircuitSequestration => "Circuit sequestration",
            FieldKind::EcmoDosage => "ECMO dosage",
            FieldKind::LogP => "PK Properties -LogP",
            FieldKind::ProteinBinding => "PK Properties - Protein Binding",
        }
    }

    /// Short alias usable on the command line and in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            FieldKind::EffectOnEcmo => "effect",
            FieldKind::FinalRecommendation => "recommendation",
            FieldKind::VolumeOfDistribution => "vd",
            FieldKind::CircuitSequestration => "sequestration",
            FieldKind::EcmoDosage => "dosage",
            FieldKind::LogP => "logp",
            FieldKind::ProteinBinding => "protein-binding",
        }
    }

    /// Looks up a field by its canonical key only.
    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        FieldKind::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| CatalogError::unknown(name))
    }

    /// The full definition of this field.
    pub fn field(&self) -> AnalysisField {
        let (definition, structure, question_template, system_prompt_template) = match self {
            FieldKind::EffectOnEcmo => (
                "Summarize all the investigators' conclusions regarding the effect of ECMO on the drug.",
                "A single short sentence that summarizes the impact on ECMO, e.g. - no change, minimal impact on PK, significant impact on PK, significant sequestration is possible, effect unknown.",
                "What is the effect of ECMO on {drug_name}? Summarize all investigators' conclusions about how ECMO affects {drug_name} pharmacokinetics and pharmacodynamics.",
                "You are a clinical pharmacologist analyzing the effect of ECMO on {drug_name}. Focus on pharmacokinetic and pharmacodynamic changes. Provide a concise summary of all investigators' conclusions. Structure your response as a single short sentence indicating the impact level (no change, minimal impact, significant impact, significant sequestration possible, or effect unknown).",
            ),
            FieldKind::FinalRecommendation => (
                "Collect all recommendations on dose adjustment of the drug from the studies we provided.",
                "Generate/formulate a recommendation according to the accumulated data found on the drug. E.g., Standard dose, Dose at high end of normal range, increased dosing suggested: 2 gm IV (bolus) q8h, or 2 gm IV (over 4 hr) q12h, Insufficient data for a recommendation, Increased dosing suggested, Increase loading dose duration. Start at 6 mg/kg IV q12h x2 days (or after oxygenator change) and then reduce dose to 3–4 mg/kg q24h",
                "What are all the dosing recommendations for {drug_name} when used during ECMO in pediatric patients? Compile all dose adjustment recommendations from the available studies.",
                "You are a pediatric pharmacist compiling dosing recommendations for {drug_name} during ECMO. Review all available studies and synthesize a clear dosing recommendation. Include specific doses, routes, frequencies, and any special considerations for pediatric ECMO patients. Format as a clear recommendation statement.",
            ),
            FieldKind::VolumeOfDistribution => (
                "When using ECMO, is there a change in the drug's Vd compared to treatment without ECMO?",
                "A concise answer: no change / increased / decreased (add original quotations and references)",
                "How does ECMO affect the volume of distribution (Vd) of {drug_name}? Compare Vd values during ECMO versus standard treatment.",
                "You are analyzing pharmacokinetic changes for {drug_name} during ECMO. Focus specifically on volume of distribution changes. Compare Vd values between ECMO and non-ECMO conditions. Provide a concise answer: no change, increased, or decreased. Include exact quotations and references.",
            ),
            FieldKind::CircuitSequestration => (
                "Summarize the known evidence regarding sequestration of the drug in the ECMO circuit tubing.",
                "Summarize in one or two words: no sequestration / minimal / high (add in parentheses original quotations, tubing type if known, and references)",
                "What is the evidence for {drug_name} sequestration in ECMO circuit tubing? Include information about tubing types and sequestration levels.",
                "You are evaluating {drug_name} sequestration in ECMO circuits. Focus on circuit binding, tubing material effects, and drug loss. Categorize sequestration as: no sequestration, minimal, or high. Include original quotations, tubing types when available, and specific references.",
            ),
            FieldKind::EcmoDosage => (
                "What is the recommended dosing range for treatment on ECMO?",
                "Provide a short one-sentence answer with minimum and maximum dose by indication.",
                "What is the recommended dosing range for {drug_name} during ECMO treatment in pediatric patients? Include minimum and maximum doses by indication.",
                "You are determining therapeutic dosing ranges for {drug_name} during pediatric ECMO. Identify minimum and maximum recommended doses for different indications. Provide a concise one-sentence answer with specific dose ranges and indications.",
            ),
            FieldKind::LogP => (
                "Crop the LogP of the drug.",
                "Provide the absolute number.",
                "What is the LogP (partition coefficient) value for {drug_name}? Provide the specific numerical value.",
                "You are extracting pharmacokinetic properties for {drug_name}. Find and report the LogP (lipophilicity) value. Provide only the numerical value without additional explanation.",
            ),
            FieldKind::ProteinBinding => (
                "Crop the protein binding of the drug.",
                "Provide the percentage / percentage range.",
                "What is the protein binding percentage for {drug_name}? Provide the specific percentage or percentage range.",
                "You are extracting pharmacokinetic properties for {drug_name}. Find and report the protein binding percentage. Provide only the percentage value or range without additional explanation.",
            ),
        };

        AnalysisField {
            kind: *self,
            name: self.name(),
            definition,
            structure,
            question_template,
            system_prompt_template,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = CatalogError;

    /// Accepts the canonical key or the slug, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FieldKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted) || k.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::unknown(s))
    }
}

/// A single analysis field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisField {
    pub kind: FieldKind,
    /// Canonical key.
    pub name: &'static str,
    /// What the field captures.
    pub definition: &'static str,
    /// Expected shape of the answer.
    pub structure: &'static str,
    /// Question sent to the engine.
    pub question_template: &'static str,
    /// System prompt sent with the question.
    pub system_prompt_template: &'static str,
}

impl AnalysisField {
    /// Renders the question for a drug.
    pub fn question(&self, drug_name: &str) -> String {
        render(self.question_template, drug_name)
    }

    /// Renders the system prompt for a drug.
    pub fn system_prompt(&self, drug_name: &str) -> String {
        render(self.system_prompt_template, drug_name)
    }
}

fn render(template: &str, drug_name: &str) -> String {
    template.replace(DRUG_PLACEHOLDER, &drug_name.to_lowercase())
}

/// Looks up a field by its canonical key.
pub fn get_field(name: &str) -> Result<AnalysisField, CatalogError> {
    FieldKind::from_name(name).map(|kind| kind.field())
}

/// All field definitions in catalog order.
pub fn all_fields() -> Vec<AnalysisField> {
    FieldKind::ALL.iter().map(FieldKind::field).collect()
}
