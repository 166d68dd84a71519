//! "Did you mean?" suggestions using Jaro-Winkler similarity

use strsim::jaro_winkler;

/// Minimum similarity for a candidate to be suggested
const DEFAULT_THRESHOLD: f64 = 0.7;

/// Closest candidate above `threshold`
pub fn find_similar<'a>(input: &str, candidates: &[&'a str], threshold: f64) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (jaro_winkler(input, c), *c))
        .filter(|(score, _)| *score > threshold)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, name)| name)
}

/// Help text for an unknown report id
pub fn suggest_report(unknown: &str, known_ids: &[String]) -> String {
    let candidates: Vec<_> = known_ids.iter().map(String::as_str).collect();

    if let Some(id) = find_similar(unknown, &candidates, DEFAULT_THRESHOLD) {
        format!("Did you mean '{}'?\n\nList reports with: reconx list", id)
    } else if known_ids.is_empty() {
        "There are no reports yet.\n\nStart one with: reconx scan <target>".to_string()
    } else {
        format!(
            "Available reports: {}\n\nList reports with: reconx list",
            known_ids.join(", ")
        )
    }
}

/// Help text for an unknown vulnerability id within a report
pub fn suggest_vulnerability(unknown: &str, report_id: &str, known_ids: &[&str]) -> String {
    match find_similar(unknown, known_ids, DEFAULT_THRESHOLD) {
        Some(id) => format!("Did you mean '{}'?", id),
        None => format!("Show the findings with: reconx show {}", report_id),
    }
}
