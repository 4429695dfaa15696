use log::{debug, info};

use crate::matching::{GeoMatcher, IssueDateReconciler};
use crate::models::{IdentityRecord, MrzFields, OcrSpan, RecognizedDocument, PLACE_NOT_FOUND};
use crate::parsing::{correct_leading_digit, MrzParser};
use crate::utils::ExtractionError;

// Spans narrower than this (width over height) are vertical fragments or
// isolated characters, not running text.
const MIN_SPAN_ASPECT_RATIO: f64 = 1.2;
const MIN_SPAN_CONFIDENCE: f64 = 0.01;

/// Combines the MRZ parser, the geographic matcher and the issue-date
/// reconciler into one identity record per document.
pub struct DocumentReconciler {
    geo: GeoMatcher,
}

impl DocumentReconciler {
    pub fn new(geo: GeoMatcher) -> Self {
        DocumentReconciler { geo }
    }

    /// Reconcile one recognized document into an identity record.
    ///
    /// MRZ fields come from the detector's line pair when present, else
    /// from MRZ-looking OCR spans. Place fields and the issue date come
    /// from the document's free text; both are best-effort and default to
    /// the sentinel / `None` rather than failing.
    pub fn reconcile(&self, doc: &RecognizedDocument) -> Result<IdentityRecord, ExtractionError> {
        // Step 1: Parse the MRZ
        let fields = self.parse_mrz(doc)?;

        // Step 2: Re-apply the leading-digit correction; the fallback MRZ
        // source bypasses the parser's cleaning of composite reads.
        let passport_number = correct_leading_digit(&fields.passport_number);

        // Step 3: Locate places in the preprocessed free text
        let places = self.geo.extract(&GeoMatcher::preprocess(&doc.full_text));

        // Step 4: Disambiguate the issue date against the MRZ dates
        let date_of_issue = IssueDateReconciler::find_issue_date(
            &doc.full_text,
            &fields.date_of_birth,
            &fields.expiration_date,
        )?;

        let record = IdentityRecord {
            passport_type: fields.passport_type,
            issuing_country: fields.issuing_country,
            surname: fields.surname,
            given_names: fields.given_names,
            passport_number,
            nationality: fields.nationality,
            date_of_birth: fields.date_of_birth,
            gender: fields.gender,
            expiration_date: fields.expiration_date,
            place_of_birth: places
                .place_of_birth
                .unwrap_or_else(|| PLACE_NOT_FOUND.to_string()),
            place_of_issue: places
                .place_of_issue
                .unwrap_or_else(|| PLACE_NOT_FOUND.to_string()),
            date_of_issue,
        };
        info!(
            "reconciled document for passport number {}",
            record.passport_number
        );
        Ok(record)
    }

    fn parse_mrz(&self, doc: &RecognizedDocument) -> Result<MrzFields, ExtractionError> {
        if let Some((line1, line2)) = &doc.mrz_lines {
            return MrzParser::parse(line1, line2);
        }

        debug!("no MRZ region detected, falling back to OCR spans");
        let lines = mrz_lines_from_spans(&doc.spans);
        match lines.as_slice() {
            [line1, line2, ..] => MrzParser::parse(line1, line2),
            _ => Err(ExtractionError::MalformedMrz(
                "no MRZ region and fewer than two MRZ-like text spans".to_string(),
            )),
        }
    }
}

/// Fallback MRZ source: spans that look like running text and contain the
/// MRZ filler character, uppercased, in scan order.
fn mrz_lines_from_spans(spans: &[OcrSpan]) -> Vec<String> {
    spans
        .iter()
        .filter(|s| span_usable(s))
        .filter(|s| s.text.contains('<'))
        .map(|s| s.text.to_uppercase())
        .collect()
}

fn span_usable(span: &OcrSpan) -> bool {
    if span.height <= 0.0 {
        return false;
    }
    span.width / span.height >= MIN_SPAN_ASPECT_RATIO && span.confidence >= MIN_SPAN_CONFIDENCE
}
