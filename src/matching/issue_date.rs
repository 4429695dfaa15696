use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::utils::ExtractionError;

lazy_static! {
    // Tolerates stray spaces around the slashes, a common OCR artifact.
    static ref DATE_CANDIDATE: Regex = Regex::new(r"\d{1,2}\s*/\s*\d{1,2}\s*/\s*\d{2,4}").unwrap();
    static ref DMY_SHAPE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
    static ref WS: Regex = Regex::new(r"\s+").unwrap();
}

/// Disambiguates a free-text date as the date of issue by excluding the
/// dates already known from the MRZ (birth and expiry).
pub struct IssueDateReconciler;

impl IssueDateReconciler {
    /// Return the first date-like substring of `text`, normalized to
    /// `DD/MM/YYYY`, that is neither the date of birth nor the expiry
    /// date. Malformed candidates are skipped silently; `None` means no
    /// qualifying date, which is a normal outcome.
    pub fn find_issue_date(
        text: &str,
        date_of_birth: &str,
        expiration_date: &str,
    ) -> Result<Option<String>, ExtractionError> {
        let dob = parse_day_first(date_of_birth).ok_or_else(|| {
            ExtractionError::InvalidDate(format!("unparsable date of birth {:?}", date_of_birth))
        })?;
        let expiry = parse_day_first(expiration_date).ok_or_else(|| {
            ExtractionError::InvalidDate(format!("unparsable expiry date {:?}", expiration_date))
        })?;

        for found in DATE_CANDIDATE.find_iter(text) {
            let Some(normalized) = normalize_candidate(found.as_str()) else {
                continue;
            };
            let Some(date) = parse_day_first(&normalized) else {
                debug!("skipping unparsable date candidate {:?}", normalized);
                continue;
            };
            if date != dob && date != expiry {
                return Ok(Some(normalized));
            }
        }
        Ok(None)
    }
}

/// Normalize a raw candidate: strip whitespace, zero-pad day and month,
/// complete a 3-digit year with a leading `2` and a 2-digit year with the
/// current century (same-century assumption, a documented limitation).
fn normalize_candidate(raw: &str) -> Option<String> {
    let compact = WS.replace_all(raw, "");
    let parts: Vec<&str> = compact.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let day = zero_pad(parts[0]);
    let month = zero_pad(parts[1]);
    let year = match parts[2].len() {
        3 => format!("2{}", parts[2]),
        2 => format!("{}{}", Local::now().year() / 100, parts[2]),
        _ => parts[2].to_string(),
    };

    let normalized = format!("{}/{}/{}", day, month, year);
    DMY_SHAPE.is_match(&normalized).then_some(normalized)
}

fn zero_pad(part: &str) -> String {
    if part.len() == 1 {
        format!("0{}", part)
    } else {
        part.to_string()
    }
}

fn parse_day_first(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOB: &str = "05/04/2005";
    const EXPIRY: &str = "04/03/2030";

    #[test]
    fn returns_first_date_that_is_neither_dob_nor_expiry() {
        let text = "dob 05/04/2005 issued 15/06/2022 expires 04/03/2030";
        let found = IssueDateReconciler::find_issue_date(text, DOB, EXPIRY).unwrap();
        assert_eq!(found.as_deref(), Some("15/06/2022"));
    }

    #[test]
    fn excludes_two_digit_year_variants_of_known_dates() {
        // The known dates appear with two-digit years; the same-century
        // completion maps them back onto DOB and expiry, so the third date
        // wins.
        let text = "5/4/05 and 4/3/30 then 15/06/2022";
        let found = IssueDateReconciler::find_issue_date(text, DOB, EXPIRY).unwrap();
        assert_eq!(found.as_deref(), Some("15/06/2022"));
    }

    #[test]
    fn tolerates_spaces_around_slashes_and_pads_components() {
        let text = "issue 7 / 6 / 2022";
        let found = IssueDateReconciler::find_issue_date(text, DOB, EXPIRY).unwrap();
        assert_eq!(found.as_deref(), Some("07/06/2022"));
    }

    #[test]
    fn completes_three_digit_year_with_leading_two() {
        let text = "issued 15/06/022";
        let found = IssueDateReconciler::find_issue_date(text, DOB, EXPIRY).unwrap();
        assert_eq!(found.as_deref(), Some("15/06/2022"));
    }

    #[test]
    fn skips_unparsable_candidates() {
        // 31/02 is not a calendar date; the later candidate is returned.
        let text = "31/02/2022 then 15/06/2022";
        let found = IssueDateReconciler::find_issue_date(text, DOB, EXPIRY).unwrap();
        assert_eq!(found.as_deref(), Some("15/06/2022"));
    }

    #[test]
    fn no_qualifying_date_is_none() {
        let text = "dob 05/04/2005 expiry 04/03/2030 nothing else";
        let found = IssueDateReconciler::find_issue_date(text, DOB, EXPIRY).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn text_without_dates_is_none() {
        let found = IssueDateReconciler::find_issue_date("no dates here", DOB, EXPIRY).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn unparsable_known_dates_are_hard_errors() {
        assert!(matches!(
            IssueDateReconciler::find_issue_date("x", "not-a-date", EXPIRY),
            Err(ExtractionError::InvalidDate(_))
        ));
    }
}
