use std::collections::HashMap;

/// Orders results for display
///
/// Shorter URLs come first; URLs of equal length are ordered
/// lexicographically.
pub fn sorted_entries(results: &HashMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = results
        .iter()
        .map(|(url, count)| (url.as_str(), *count))
        .collect();

    entries.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(b.0)));

    entries
}

/// Renders results as `<url> (<count>)` lines
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use site_census::output::render_report;
///
/// let mut results = HashMap::new();
/// results.insert("https://example.com/about".to_string(), 2);
/// results.insert("https://example.com".to_string(), 1);
///
/// assert_eq!(
///     render_report(&results),
///     "https://example.com (1)\nhttps://example.com/about (2)\n"
/// );
/// ```
pub fn render_report(results: &HashMap<String, u64>) -> String {
    sorted_entries(results)
        .into_iter()
        .map(|(url, count)| format!("{} ({})\n", url, count))
        .collect()
}

/// Prints results to stdout in report order
pub fn print_report(results: &HashMap<String, u64>) {
    print!("{}", render_report(results));
}
