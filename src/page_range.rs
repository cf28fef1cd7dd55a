use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A closed interval of 1-based page numbers. Always `1 <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Returns `None` unless `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start >= 1 && start <= end).then_some(PageRange { start, end })
    }

    pub fn single(page: u32) -> Option<Self> {
        Self::new(page, page)
    }

    /// Parse one token of a selection like "5" or "1-10".
    ///
    /// Anything that is not a well-formed page or ascending pair is rejected
    /// with `None`; callers drop such tokens and keep going.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.split_once('-') {
            Some((start, end)) => Self::new(parse_page_number(start)?, parse_page_number(end)?),
            None => Self::single(parse_page_number(s)?),
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// 1-based page numbers covered by this range, ascending.
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Human-readable label, e.g. "Page 5" or "Pages 1-3".
    pub fn describe(&self) -> String {
        if self.start == self.end {
            format!("Page {}", self.start)
        } else {
            format!("Pages {}-{}", self.start, self.end)
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_page_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|&n| n > 0)
}

/// Ranges in the order they were typed. Not sorted, not deduplicated: the
/// order decides the output page order and repeats produce repeated pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet(Vec<PageRange>);

impl RangeSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRange> {
        self.0.iter()
    }

    /// Number of pages the selection produces, repeats included.
    pub fn page_count(&self) -> u64 {
        self.0.iter().map(|r| u64::from(r.len())).sum()
    }

    /// Every selected 1-based page number in visitation order.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flat_map(PageRange::pages)
    }
}

impl FromIterator<PageRange> for RangeSet {
    fn from_iter<I: IntoIterator<Item = PageRange>>(iter: I) -> Self {
        RangeSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a PageRange;
    type IntoIter = std::slice::Iter<'a, PageRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Canonical form: "1-3, 5". Parsing it yields the same set.
impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}

impl FromStr for RangeSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_page_ranges(s))
    }
}

/// Parse a comma-separated selection like "1-3, 4, 6-8".
///
/// Never fails: malformed tokens, zero or reversed ranges are dropped and the
/// rest of the list is kept in order.
pub fn parse_page_ranges(s: &str) -> RangeSet {
    s.split(',').filter_map(PageRange::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranges(pairs: &[(u32, u32)]) -> RangeSet {
        pairs
            .iter()
            .map(|&(start, end)| PageRange { start, end })
            .collect()
    }

    #[test]
    fn test_single_page() {
        let range = PageRange::parse("5").unwrap();
        assert_eq!(range, PageRange { start: 5, end: 5 });
        assert_eq!(range.pages().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_page_range() {
        let range = PageRange::parse("1-5").unwrap();
        assert_eq!(range.pages().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn test_whitespace_around_hyphen() {
        assert_eq!(PageRange::parse("  2 -  4 "), PageRange::new(2, 4));
    }

    #[test]
    fn test_malformed_tokens_dropped() {
        assert_eq!(parse_page_ranges("1-3, abc, 5"), ranges(&[(1, 3), (5, 5)]));
    }

    #[test]
    fn test_invalid_pairs() {
        assert!(parse_page_ranges("5-2").is_empty());
        assert!(parse_page_ranges("0-3").is_empty());
        assert!(parse_page_ranges("-1").is_empty());
        assert!(parse_page_ranges("0").is_empty());
        assert!(parse_page_ranges("1-2-3").is_empty());
        assert!(parse_page_ranges("+4").is_empty());
        assert!(parse_page_ranges("3a").is_empty());
        assert!(parse_page_ranges("1-").is_empty());
        assert!(parse_page_ranges("99999999999").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_page_ranges("").is_empty());
        assert!(parse_page_ranges(" , ,, ").is_empty());
    }

    #[test]
    fn test_order_and_repeats_preserved() {
        let set = parse_page_ranges("3, 1-2, 3, 2-4");
        assert_eq!(set, ranges(&[(3, 3), (1, 2), (3, 3), (2, 4)]));
        assert_eq!(set.page_count(), 7);
        assert_eq!(
            set.page_numbers().collect::<Vec<_>>(),
            vec![3, 1, 2, 3, 2, 3, 4]
        );
    }

    #[test]
    fn test_canonical_round_trip() {
        for input in ["1-3, abc, 5", " 7 ,2-2,10 - 12,", "4-1, 9", ""] {
            let parsed = parse_page_ranges(input);
            let canonical = parsed.to_string();
            assert_eq!(parse_page_ranges(&canonical), parsed, "input {:?}", input);
        }
        assert_eq!(parse_page_ranges(" 7 ,2-2,10 - 12,").to_string(), "7, 2, 10-12");
    }

    #[test]
    fn test_describe() {
        assert_eq!(PageRange::new(5, 5).unwrap().describe(), "Page 5");
        assert_eq!(PageRange::new(1, 3).unwrap().describe(), "Pages 1-3");
    }

    #[test]
    fn test_from_str() {
        let set: RangeSet = "1-2,8".parse().unwrap();
        assert_eq!(set, ranges(&[(1, 2), (8, 8)]));
    }
}
