//! Build range specs such as `"100-105,110,120-118"`.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Label(String),
    /// Inclusive integer range, walked from `from` toward `to`.
    Span { from: i64, to: i64 },
}

impl Entry {
    fn size(&self) -> u64 {
        match self {
            Entry::Label(_) => 1,
            Entry::Span { from, to } => from.abs_diff(*to).saturating_add(1),
        }
    }

    /// Offset of `x_label` within this entry.
    fn offset_of(&self, x_label: &str) -> Option<u64> {
        match self {
            Entry::Label(label) => (label == x_label).then_some(0),
            Entry::Span { from, to } => {
                let build = canonical_build_number(x_label)?;
                let (lo, hi) = if from <= to { (*from, *to) } else { (*to, *from) };
                (lo..=hi).contains(&build).then(|| from.abs_diff(build))
            }
        }
    }
}

/// Ordered list of build labels parsed from a range spec.
///
/// Order is the order of appearance in the spec and duplicates are kept; the
/// reorder stage relies on the first position of each label. Ranges are kept
/// as spans, so `1-4000000000` costs one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildList(Vec<Entry>);

impl BuildList {
    pub fn contains(&self, x_label: &str) -> bool {
        self.0.iter().any(|e| e.offset_of(x_label).is_some())
    }

    /// Position of the first occurrence of `x_label` in the expanded list.
    pub fn position(&self, x_label: &str) -> Option<u64> {
        let mut start = 0u64;
        for entry in &self.0 {
            if let Some(offset) = entry.offset_of(x_label) {
                return Some(start.saturating_add(offset));
            }
            start = start.saturating_add(entry.size());
        }
        None
    }

    /// Expanded labels in list order.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.0.iter().flat_map(|entry| -> Box<dyn Iterator<Item = String>> {
            match *entry {
                Entry::Label(ref label) => Box::new(std::iter::once(label.clone())),
                Entry::Span { from, to } if from <= to => {
                    Box::new((from..=to).map(|b| b.to_string()))
                }
                Entry::Span { from, to } => Box::new((to..=from).rev().map(|b| b.to_string())),
            }
        })
    }

    /// Number of labels in the expanded list.
    pub fn len(&self) -> u64 {
        self.0.iter().fold(0u64, |n, e| n.saturating_add(e.size()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A label only falls inside a span when it is the decimal form of a build
/// number, so `"0105"` does not match `100-110`.
fn canonical_build_number(x_label: &str) -> Option<i64> {
    let n = x_label.parse::<i64>().ok()?;
    (n.to_string() == x_label).then_some(n)
}

/// Parse a comma separated list of build labels and inclusive ranges.
///
/// Returns `None` for a missing or empty spec, meaning "no restriction".
/// `a-b` covers every integer from `a` to `b`, counting down when `b < a`.
/// Tokens that cannot be interpreted are dropped.
pub fn parse_build_list(spec: Option<&str>) -> Option<BuildList> {
    let spec = spec?;
    if spec.is_empty() {
        return None;
    }

    let mut out = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let parts: Vec<&str> = token.split('-').collect();
        match parts.as_slice() {
            [label] => out.push(Entry::Label((*label).to_string())),
            [from, to] => match (from.trim().parse::<i64>(), to.trim().parse::<i64>()) {
                (Ok(from), Ok(to)) => out.push(Entry::Span { from, to }),
                _ => debug!(token, "dropping range with non-integer bounds"),
            },
            _ => debug!(token, "dropping malformed range token"),
        }
    }
    Some(BuildList(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(spec: &str) -> Vec<String> {
        parse_build_list(Some(spec))
            .expect("spec should not be unrestricted")
            .labels()
            .collect()
    }

    #[test]
    fn test_ascending_range() {
        assert_eq!(labels("3-5"), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_descending_range() {
        assert_eq!(labels("5-3"), vec!["5", "4", "3"]);
    }

    #[test]
    fn test_single_build_range() {
        assert_eq!(labels("7-7"), vec!["7"]);
    }

    #[test]
    fn test_empty_and_missing_are_unrestricted() {
        assert_eq!(parse_build_list(None), None);
        assert_eq!(parse_build_list(Some("")), None);
    }

    #[test]
    fn test_empty_tokens_dropped() {
        assert!(labels(",,").is_empty());
        assert_eq!(labels("1,,2"), vec!["1", "2"]);
    }

    #[test]
    fn test_mixed_literals_and_ranges_keep_order() {
        assert_eq!(
            labels("20,10-12,release,11"),
            vec!["20", "10", "11", "12", "release", "11"]
        );
    }

    #[test]
    fn test_multi_part_tokens_dropped() {
        assert_eq!(labels("1-2-3,4"), vec!["4"]);
    }

    #[test]
    fn test_non_integer_range_dropped() {
        assert_eq!(labels("a-b,5"), vec!["5"]);
        assert_eq!(labels("-5"), Vec::<String>::new());
    }

    #[test]
    fn test_tokens_trimmed() {
        assert_eq!(labels(" 1 , 3 - 4 "), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_position_uses_first_occurrence() {
        let list = parse_build_list(Some("9,8,9")).unwrap();
        assert_eq!(list.position("9"), Some(0));
        assert_eq!(list.position("8"), Some(1));
        assert_eq!(list.position("7"), None);
        assert!(list.contains("8"));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_huge_range_is_not_expanded() {
        let list = parse_build_list(Some("1-4000000000,7")).unwrap();
        assert_eq!(list.len(), 4_000_000_001);
        assert!(list.contains("3999999999"));
        assert!(!list.contains("4000000001"));
        assert_eq!(list.position("4000000000"), Some(3_999_999_999));
        assert_eq!(list.position("7"), Some(6));
        assert_eq!(list.labels().take(3).collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_descending_span_positions() {
        let list = parse_build_list(Some("x,12-10")).unwrap();
        assert_eq!(list.position("x"), Some(0));
        assert_eq!(list.position("12"), Some(1));
        assert_eq!(list.position("10"), Some(3));
        assert_eq!(list.position("13"), None);
    }

    #[test]
    fn test_span_matches_only_canonical_numbers() {
        let list = parse_build_list(Some("100-110")).unwrap();
        assert!(list.contains("105"));
        assert!(!list.contains("0105"));
        assert!(!list.contains("+105"));
        assert!(!list.contains("release"));
    }
}
