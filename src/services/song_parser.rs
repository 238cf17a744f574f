/// Split a model reply into song references, one per non-blank line.
///
/// A single leading ordinal such as `"1. "` is removed. Order is preserved and
/// nothing is deduplicated or checked for plausibility.
pub fn parse(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_ordinal)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_ordinal(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }

    match rest.strip_prefix('.') {
        Some(after) => after.trim_start(),
        None => line,
    }
}
