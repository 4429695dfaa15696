use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::MrzFields;
use crate::utils::ExtractionError;

/// Fixed line length of a TD3 (passport) machine-readable zone.
pub const MRZ_LINE_LEN: usize = 44;

lazy_static! {
    // Scanner noise seen in the given-names segment: runs of misread
    // filler characters and stray digits.
    static ref REPEATED_K: Regex = Regex::new(r"K{2,}").unwrap();
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();
}

/// Parser for the two-line passport MRZ, including correction of common
/// scanner misreads (digit/letter confusions, filler noise in names).
pub struct MrzParser;

impl MrzParser {
    /// Parse the two raw MRZ lines into typed identity fields.
    ///
    /// Lines shorter than 44 characters are right-padded with the `<`
    /// filler. Fails with [`ExtractionError::MalformedMrz`] when either
    /// line is empty before padding or the name field holds no usable
    /// surname.
    pub fn parse(line1: &str, line2: &str) -> Result<MrzFields, ExtractionError> {
        if line1.trim().is_empty() || line2.trim().is_empty() {
            return Err(ExtractionError::MalformedMrz(
                "MRZ line missing or empty".to_string(),
            ));
        }

        let line1 = pad_line(line1);
        let line2 = pad_line(line2);

        // Line 1: document type, issuing country, name field
        let passport_type = match clean(&field(&line1, 0, 1)).as_str() {
            "P" => "P".to_string(),
            other => {
                if !other.is_empty() {
                    debug!("coercing document type {:?} to P", other);
                }
                "P".to_string()
            }
        };
        let issuing_country = correct_country_code(&clean(&field(&line1, 2, 5)));
        let (surname, given_names) = parse_name_field(&field(&line1, 5, MRZ_LINE_LEN))?;

        // Line 2: number, nationality, dates, gender
        let passport_number = correct_leading_digit(&clean(&field(&line2, 0, 9)));
        let nationality = correct_country_code(&clean(&field(&line2, 10, 13)));
        let date_of_birth = parse_mrz_date(&field(&line2, 13, 19), true)?;
        let gender = decode_gender(&clean(&field(&line2, 20, 21)));
        let expiration_date = parse_mrz_date(&field(&line2, 21, 27), false)?;

        Ok(MrzFields {
            passport_type,
            issuing_country,
            surname,
            given_names,
            passport_number,
            nationality,
            date_of_birth,
            gender,
            expiration_date,
        })
    }
}

/// Rewrite a leading `2` to `Z` and a leading `5` to `S` in a passport
/// number. Passport numbers of the supported documents never start with a
/// digit; these two are the scanner's usual letter confusions.
pub fn correct_leading_digit(passport_number: &str) -> String {
    let mut chars = passport_number.chars();
    match chars.next() {
        Some('2') => format!("Z{}", chars.as_str()),
        Some('5') => format!("S{}", chars.as_str()),
        _ => passport_number.to_string(),
    }
}

fn pad_line(line: &str) -> Vec<char> {
    let mut chars: Vec<char> = line.chars().collect();
    while chars.len() < MRZ_LINE_LEN {
        chars.push('<');
    }
    chars
}

fn field(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end.min(chars.len())].iter().collect()
}

/// Strip everything but alphanumerics and uppercase the rest.
fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// The scanner reads the letter `I` as the digit `1` in country codes.
fn correct_country_code(code: &str) -> String {
    code.replace('1', "I")
}

/// Split the name field on the first double filler into surname and given
/// names, clean both, and recover the given names from the surname when
/// cleaning leaves them empty.
fn parse_name_field(raw: &str) -> Result<(String, String), ExtractionError> {
    let (surname_raw, names_raw) = match raw.find("<<") {
        Some(idx) => (&raw[..idx], &raw[idx + 2..]),
        None => (raw, " "),
    };

    let mut surname = surname_raw.replace('<', " ").trim().to_uppercase();
    let mut given_names = names_raw.replace('<', " ").trim().to_uppercase();
    given_names = REPEATED_K.replace_all(&given_names, "").into_owned();
    given_names = DIGIT_RUN.replace_all(&given_names, "").into_owned();

    if given_names.is_empty() {
        let words: Vec<&str> = surname.split_whitespace().collect();
        match words.as_slice() {
            [first, middle, last] => {
                given_names = (*middle).to_string();
                surname = format!("{} {}", first, last);
            }
            [first, last] => {
                given_names = (*first).to_string();
                surname = (*last).to_string();
            }
            _ => {}
        }
    }

    if surname.is_empty() {
        return Err(ExtractionError::MalformedMrz(
            "name field holds no usable surname".to_string(),
        ));
    }

    Ok((surname, given_names))
}

/// Parse a `YYMMDD` MRZ date field into `DD/MM/YYYY`.
///
/// The two-digit year is resolved within a 50-year window around the
/// current date; a date of birth that still lands in the future is shifted
/// back a century. Expiry dates are never shifted.
fn parse_mrz_date(raw: &str, is_dob: bool) -> Result<String, ExtractionError> {
    let digits = clean(raw);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ExtractionError::InvalidDate(format!(
            "unparsable MRZ date field {:?}",
            raw
        )));
    }

    let yy: i32 = digits[0..2].parse().unwrap_or_default();
    let month: u32 = digits[2..4].parse().unwrap_or_default();
    let day: u32 = digits[4..6].parse().unwrap_or_default();

    let now_year = Local::now().year();
    let mut year = resolve_two_digit_year(yy, now_year);
    if is_dob && year > now_year {
        year -= 100;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ExtractionError::InvalidDate(format!("invalid calendar date {:?}", raw))
    })?;
    Ok(date.format("%d/%m/%Y").to_string())
}

fn resolve_two_digit_year(yy: i32, now_year: i32) -> i32 {
    let mut year = yy + (now_year / 100) * 100;
    if year >= now_year + 50 {
        year -= 100;
    } else if year < now_year - 50 {
        year += 100;
    }
    year
}

/// Decode the MRZ sex code. `0` is a known misread of `M`; every other
/// unrecognized code falls back to `F`, matching the behavior the engine
/// was tuned against.
fn decode_gender(code: &str) -> String {
    match code.chars().next() {
        Some('M') => "M".to_string(),
        Some('F') => "F".to_string(),
        Some('0') => "M".to_string(),
        _ => "F".to_string(),
    }
}
