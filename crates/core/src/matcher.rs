//! Fuzzy champion-name matching.

/// Levenshtein distance with unit costs, computed over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j]
            } else {
                1 + previous[j].min(previous[j + 1]).min(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Candidate closest to `query`, compared case-insensitively.
///
/// Ties go to the earliest candidate. Returns `None` only for an empty
/// candidate list.
pub fn closest_match<'a, S>(query: &str, candidates: &'a [S]) -> Option<&'a str>
where
    S: AsRef<str>,
{
    let needle = query.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let distance = edit_distance(&needle, &candidate.to_lowercase());
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((candidate, distance)),
        }
        if distance == 0 {
            break;
        }
    }

    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn distance_is_symmetric_and_reflexive() {
        let words = ["", "ahri", "Ahri", "MonkeyKing", "wukong", "Kai'Sa", "kaisa"];
        for a in words {
            assert_eq!(edit_distance(a, a), 0);
            for b in words {
                assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn exact_candidate_wins_case_insensitively() {
        let candidates = ["Akali", "Ahri", "Alistar"];
        assert_eq!(closest_match("AHRI", &candidates), Some("Ahri"));
    }

    #[test]
    fn picks_nearest_with_first_tie() {
        let candidates = vec!["Kaisa".to_string(), "Khazix".to_string()];
        assert_eq!(closest_match("Kai'Sa", &candidates), Some("Kaisa"));

        // "ab" is one edit from both; the first listed wins.
        let tied = ["aa", "bb"];
        assert_eq!(closest_match("ab", &tied), Some("aa"));
    }

    #[test]
    fn empty_candidates_yield_none() {
        let none: [&str; 0] = [];
        assert_eq!(closest_match("Ahri", &none), None);
    }
}
