use serde::{Deserialize, Serialize};

/// Sentinel stored for a place field when no gazetteer match was found.
pub const PLACE_NOT_FOUND: &str = "Not found";

/// Identity fields reconciled from the MRZ and the document's free text.
///
/// Every field except `date_of_issue` is populated once MRZ parsing
/// succeeds; the two place fields fall back to [`PLACE_NOT_FOUND`].
/// Serializes to the flat JSON shape persisted in the result cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub passport_type: String,
    pub issuing_country: String,
    pub surname: String,
    pub given_names: String,
    pub passport_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub gender: String,
    pub expiration_date: String,
    pub place_of_birth: String,
    pub place_of_issue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_issue: Option<String>,
}

/// Typed fields recovered from the two MRZ lines, before the free-text
/// reconciliation fills in places and issue date.
#[derive(Debug, Clone, PartialEq)]
pub struct MrzFields {
    pub passport_type: String,
    pub issuing_country: String,
    pub surname: String,
    pub given_names: String,
    pub passport_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub gender: String,
    pub expiration_date: String,
}

/// One text detection from the recognition collaborator, with the bounding
/// box reduced to the dimensions the span filter needs.
#[derive(Debug, Clone)]
pub struct OcrSpan {
    pub text: String,
    pub confidence: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything the recognition collaborators produced for one document:
/// the MRZ line pair when the region detector found one, the raw OCR spans
/// used as a fallback MRZ source, and the document's full free text.
#[derive(Debug, Clone, Default)]
pub struct RecognizedDocument {
    pub mrz_lines: Option<(String, String)>,
    pub spans: Vec<OcrSpan>,
    pub full_text: String,
}

/// A scored, position-tagged city match found while scanning tokenized text.
#[derive(Debug, Clone)]
pub struct GeoCandidate {
    pub city: String,
    pub state: String,
    pub score: u32,
    pub position: usize,
}

/// Place fields resolved by the geographic matcher. `None` means "unknown",
/// not failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceMatches {
    pub place_of_birth: Option<String>,
    pub place_of_issue: Option<String>,
}

/// One persisted row of the result cache, keyed by content hash.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub content_hash: String,
    pub file_name: String,
    pub record: IdentityRecord,
    pub created_at: String,
}
