//! Lexical scoring of cover image paths.
//!
//! Each occurrence of a keyword in the path adds its weight. Words that
//! usually name the front cover count positive; words naming other scans
//! of the booklet count negative and weigh more.

/// Keyword table: (lowercase keyword, weight per occurrence).
const KEYWORDS: &[(&str, i32)] = &[
    ("cover", 2),
    ("front", 2),
    ("album", 2),
    ("back", -3),
    ("cd", -3),
    ("inlay", -3),
    ("inside", -3),
    ("logo", -3),
    ("single", -3),
    ("alternative", -3),
];

/// Score a path string; higher means more likely to be the front cover.
///
/// The whole string is scored, so directory names count too.
pub fn score(path: &str) -> i32 {
    let haystack = path.to_ascii_lowercase();
    KEYWORDS
        .iter()
        .map(|(word, weight)| count_occurrences(&haystack, word) as i32 * weight)
        .sum()
}

/// Count non-overlapping occurrences, resuming after each match.
fn count_occurrences(haystack: &str, word: &str) -> usize {
    // str::matches scans left to right and skips past every match
    haystack.matches(word).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_words() {
        assert_eq!(score("album_cover_front.jpg"), 6);
        assert_eq!(score("cover.jpg"), 2);
        assert_eq!(score("COVER.JPG"), 2);
    }

    #[test]
    fn test_negative_words() {
        assert_eq!(score("back_inlay.jpg"), -6);
        assert_eq!(score("Back.png"), -3);
        assert_eq!(score("logo.gif"), -3);
    }

    #[test]
    fn test_mixed_and_neutral() {
        assert_eq!(score("a.jpg"), 0);
        // cover +2, back -3
        assert_eq!(score("cover_back.jpg"), -1);
        // Directory components count as well
        assert_eq!(score("/music/Some Album/scans/front.jpg"), 4);
    }

    #[test]
    fn test_repeats_are_counted_without_overlap() {
        assert_eq!(score("covercover.jpg"), 4);
        assert_eq!(count_occurrences("cdcdcd", "cd"), 3);
        // "cdc" then resume after the match: only one "cdc" fits in "cdcdc"
        assert_eq!(count_occurrences("cdcdc", "cdc"), 1);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        // KELVIN SIGN does not fold to 'k'
        assert_eq!(score("bac\u{212A}.jpg"), 0);
        assert_eq!(score("BACK.jpg"), -3);
    }

    #[test]
    fn test_keywords_inside_words() {
        // "discover" contains "cover", "cdr" contains "cd"
        assert_eq!(score("discover.jpg"), 2);
        assert_eq!(score("cdr.png"), -3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Scoring is a pure function of the string
        #[test]
        fn score_is_deterministic(path in "[a-zA-Z0-9_ ./-]{0,64}") {
            prop_assert_eq!(score(&path), score(&path));
        }

        /// Case never changes the score
        #[test]
        fn score_ignores_case(path in "[a-zA-Z_./]{0,64}") {
            prop_assert_eq!(score(&path.to_uppercase()), score(&path.to_lowercase()));
        }

        /// Appending a positive keyword never lowers the score
        #[test]
        fn appending_cover_adds_two(path in "[x-z0-9_/]{0,32}") {
            let extended = format!("{}_cover", path);
            prop_assert_eq!(score(&extended), score(&path) + 2);
        }
    }
}
