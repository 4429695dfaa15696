use std::collections::HashSet;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::matching::similarity::{partial_ratio, shared_trigrams};
use crate::models::{Gazetteer, GeoCandidate, PlaceMatches};

/// Words that, when seen near a token, raise its score: the labels printed
/// around the place and date fields of the documents this was tuned on.
const CONTEXT_KEYWORDS: &[&str] = &["birth", "issue", "issued", "place", "of", "date"];

/// Gazetteer cities that collide with common words and are never matched.
const EXCLUDED_CITIES: &[&str] = &["anand"];

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s<]|_").unwrap();
    static ref WS_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Tunables for the token scan. The defaults reproduce the constants the
/// matcher was calibrated with on a specific document layout (including the
/// +17 position offset and the 10-token header skip); they are not expected
/// to generalize to other layouts.
#[derive(Debug, Clone)]
pub struct GeoMatcherConfig {
    pub skip_leading_tokens: usize,
    pub position_offset: usize,
    pub context_before: usize,
    pub context_after: usize,
    pub min_token_len: usize,
    /// A fuzzy candidate is kept only when its score exceeds this.
    pub min_accept_score: u32,
}

impl Default for GeoMatcherConfig {
    fn default() -> Self {
        GeoMatcherConfig {
            skip_leading_tokens: 10,
            position_offset: 17,
            context_before: 12,
            context_after: 15,
            min_token_len: 3,
            min_accept_score: 80,
        }
    }
}

/// Locates place-of-birth and place-of-issue candidates in noisy OCR text
/// by scanning tokens against an injected gazetteer, combining exact
/// lookups, partial string similarity, 3-gram overlap and context-keyword
/// scoring.
pub struct GeoMatcher {
    gazetteer: Gazetteer,
    config: GeoMatcherConfig,
}

impl GeoMatcher {
    pub fn new(gazetteer: Gazetteer) -> Self {
        Self::with_config(gazetteer, GeoMatcherConfig::default())
    }

    pub fn with_config(gazetteer: Gazetteer, config: GeoMatcherConfig) -> Self {
        GeoMatcher { gazetteer, config }
    }

    /// Lowercase, replace non-word characters with spaces and collapse
    /// whitespace, preparing raw OCR output for the token scan.
    pub fn preprocess(text: &str) -> String {
        let lowered = text.to_lowercase();
        let spaced = NON_WORD.replace_all(&lowered, " ");
        WS_RUN.replace_all(&spaced, " ").trim().to_string()
    }

    /// Scan preprocessed text for place candidates and resolve them into
    /// place-of-birth / place-of-issue per the priority policy. Both fields
    /// are `None` when nothing qualifies; that is an expected outcome, not
    /// an error.
    pub fn extract(&self, text: &str) -> PlaceMatches {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let mut exact_matches: Vec<GeoCandidate> = Vec::new();
        let mut fuzzy_matches: Vec<GeoCandidate> = Vec::new();
        let mut detected_states: Vec<String> = Vec::new();

        // Token indices below are relative to the post-skip slice while the
        // context window indexes the full token list; the mismatch shifts
        // the window back by the skip amount. Kept as calibrated.
        for (i, token) in tokens
            .iter()
            .skip(self.config.skip_leading_tokens)
            .enumerate()
        {
            if token.chars().count() < self.config.min_token_len {
                continue;
            }
            let position = i + self.config.position_offset;

            if let Some(candidate) = self.find_exact_match(token, position) {
                debug!("exact match {:?} at {}", candidate.city, position);
                exact_matches.push(candidate);
            } else {
                let lo = i.saturating_sub(self.config.context_before);
                let hi = (i + self.config.context_after).min(tokens.len());
                let nearby = tokens[lo..hi].join(" ");
                if let Some(candidate) = self.find_best_fuzzy_match(token, &nearby, position) {
                    if candidate.score > self.config.min_accept_score {
                        debug!(
                            "fuzzy match {:?} (score {}) at {}",
                            candidate.city, candidate.score, position
                        );
                        fuzzy_matches.push(candidate);
                    }
                }
            }

            self.collect_state_matches(token, &mut detected_states);
        }

        exact_matches.sort_by_key(|c| c.position);
        fuzzy_matches.sort_by_key(|c| c.position);
        let mut seen = HashSet::new();
        detected_states.retain(|s| seen.insert(s.clone()));

        resolve_places(&exact_matches, &fuzzy_matches, &detected_states)
    }

    fn find_exact_match(&self, token: &str, position: usize) -> Option<GeoCandidate> {
        for entry in self.gazetteer.entries() {
            for city in &entry.cities {
                if token.eq_ignore_ascii_case(city) && !is_excluded_city(city) {
                    return Some(GeoCandidate {
                        city: city.clone(),
                        state: entry.state.clone(),
                        score: 100,
                        position,
                    });
                }
            }
        }
        None
    }

    fn find_best_fuzzy_match(
        &self,
        token: &str,
        nearby: &str,
        position: usize,
    ) -> Option<GeoCandidate> {
        let mut best: Option<GeoCandidate> = None;
        for entry in self.gazetteer.entries() {
            for city in &entry.cities {
                let city_lower = city.to_lowercase();
                if is_excluded_city(&city_lower) || !partial_city_match(token, &city_lower) {
                    continue;
                }
                let score = match_score(token, &city_lower, nearby);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(GeoCandidate {
                        city: city.clone(),
                        state: entry.state.clone(),
                        score,
                        position,
                    });
                }
            }
        }
        best
    }

    fn collect_state_matches(&self, token: &str, detected: &mut Vec<String>) {
        for entry in self.gazetteer.entries() {
            let state_lower = entry.state.to_lowercase();
            let first_word_match = state_lower.ends_with(" pradesh")
                && state_lower.split_whitespace().next() == Some(token);
            if token == state_lower || first_word_match {
                detected.push(entry.state.clone());
            }
        }
    }
}

fn is_excluded_city(city: &str) -> bool {
    let lower = city.to_lowercase();
    EXCLUDED_CITIES.contains(&lower.as_str())
}

/// A token qualifies against a city when it is a literal substring of the
/// city name, or when it is long enough for the partial ratio to be
/// meaningful and scores at least 90.
fn partial_city_match(token: &str, city_lower: &str) -> bool {
    city_lower.contains(token)
        || (token.chars().count() >= 4 && partial_ratio(token, city_lower) >= 90)
}

fn match_score(token: &str, city_lower: &str, nearby: &str) -> u32 {
    let mut score = 0;
    if partial_city_match(token, city_lower) {
        score += 80;
    }
    if city_lower.contains(token) {
        score += 20;
    }
    score += 5 * shared_trigrams(token, city_lower) as u32;
    if CONTEXT_KEYWORDS.iter().any(|k| nearby.contains(*k)) {
        score += 25;
    }
    score
}

fn resolve_places(
    exact: &[GeoCandidate],
    fuzzy: &[GeoCandidate],
    states: &[String],
) -> PlaceMatches {
    let mut places = PlaceMatches::default();
    if exact.len() >= 2 {
        places.place_of_birth = Some(format_place(&exact[0], &[]));
        places.place_of_issue = Some(format_place(&exact[1], &[]));
    } else if exact.len() == 1 {
        places.place_of_issue = Some(format_place(&exact[0], &[]));
        places.place_of_birth = states.first().cloned();
    } else if !fuzzy.is_empty() {
        places.place_of_issue = Some(format_place(&fuzzy[0], states));
        places.place_of_birth = states.first().cloned();
    }
    places
}

/// "City, State", preferring the first detected state over the candidate's
/// own gazetteer state when one is supplied.
fn format_place(candidate: &GeoCandidate, states: &[String]) -> String {
    match states.first() {
        Some(state) => format!("{}, {}", candidate.city, state),
        None => format!("{}, {}", candidate.city, candidate.state),
    }
}
