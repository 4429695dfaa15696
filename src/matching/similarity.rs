use std::collections::HashSet;

/// Partial-ratio similarity on a 0..=100 scale: the best alignment score of
/// the shorter string against any equal-length window of the longer one,
/// tolerant of surrounding characters.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if shorter.is_empty() {
        return if longer.is_empty() { 100 } else { 0 };
    }

    let mut best = 0;
    for start in 0..=(longer.len() - shorter.len()) {
        let window = &longer[start..start + shorter.len()];
        let lcs = lcs_length(shorter, window);
        let ratio = (200.0 * lcs as f64 / (shorter.len() + window.len()) as f64).round() as u32;
        if ratio > best {
            best = ratio;
            if best == 100 {
                break;
            }
        }
    }
    best
}

/// Longest common subsequence length, used as the match count in the
/// window ratio.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Count of character 3-grams the two strings share.
pub fn shared_trigrams(a: &str, b: &str) -> usize {
    let a_grams = trigrams(a);
    let b_grams = trigrams(b);
    a_grams.intersection(&b_grams).count()
}

fn trigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return HashSet::new();
    }
    chars.windows(3).map(|w| w.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(partial_ratio("mumbai", "mumbai"), 100);
    }

    #[test]
    fn substring_scores_100() {
        assert_eq!(partial_ratio("mumb", "mumbai"), 100);
        assert_eq!(partial_ratio("navi mumbai", "mumbai"), 100);
    }

    #[test]
    fn one_misread_character_stays_high() {
        // "mumbal" vs "mumbai": 5 of 6 characters align.
        assert!(partial_ratio("mumbal", "mumbai") >= 80);
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(partial_ratio("zzzz", "mumbai") < 50);
    }

    #[test]
    fn empty_input_scores_zero_against_nonempty() {
        assert_eq!(partial_ratio("", "mumbai"), 0);
        assert_eq!(partial_ratio("", ""), 100);
    }

    #[test]
    fn trigram_overlap_counts_distinct_grams() {
        // "mumbai" grams: mum umb mba bai; "mumbra" shares mum umb.
        assert_eq!(shared_trigrams("mumbai", "mumbra"), 2);
        assert_eq!(shared_trigrams("ab", "abc"), 0);
    }
}
