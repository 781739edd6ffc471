//! Name resolution with fuzzy suggestions.

use strsim::jaro_winkler;

/// Minimum similarity for a suggestion (0.0-1.0).
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// The candidate most similar to `input`, if any is close enough.
pub fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let input_lower = input.to_lowercase();
    candidates
        .into_iter()
        .map(|candidate| (candidate, jaro_winkler(&input_lower, &candidate.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_names_are_suggested() {
        let names = ["lantern", "door", "bell"];
        assert_eq!(suggest("lanturn", names), Some("lantern".to_string()));
        assert_eq!(suggest("DOOR", names), Some("door".to_string()));
    }

    #[test]
    fn distant_names_are_not() {
        assert_eq!(suggest("xylophone", ["door", "bell"]), None);
    }
}
