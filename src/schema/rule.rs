//! Rule parsing for multi-state 3D automata.
//!
//! Rules are written as `SURVIVE/BIRTH/STATES`, where SURVIVE and BIRTH are
//! comma-separated neighbor counts or inclusive ranges (`2-3`), and STATES is
//! the number of cell states including dead and fully alive. Whitespace is
//! ignored anywhere in the text.
//!
//! ```
//! use volume_life::schema::RuleSpec;
//!
//! let rule: RuleSpec = "2-3/3/3".parse().unwrap();
//! assert!(rule.survives(2) && rule.survives(3));
//! assert!(rule.born(3));
//! assert_eq!(rule.state_count(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

/// Largest neighbor count in a 3x3x3 Moore neighborhood (center excluded).
pub const MAX_NEIGHBORS: u32 = 26;

/// Well-known rules, addressable by name through [`RuleSpec::preset`].
pub const PRESETS: &[(&str, &str)] = &[
    ("445", "4/4/5"),
    ("amoeba", "9-26/5-7,12-13,15/5"),
    ("clouds", "13-26/13-14,17-19/2"),
    ("pyroclastic", "4-7/6-8/10"),
];

/// Survive/birth bitmasks plus a state count.
///
/// Bit `i` of a mask means "exactly `i` live neighbors satisfies this rule".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSpec {
    survive_mask: u32,
    birth_mask: u32,
    state_count: u32,
}

impl RuleSpec {
    /// Build a rule directly from masks.
    ///
    /// Masks may only use bits `0..=26`.
    pub fn new(survive_mask: u32, birth_mask: u32, state_count: u32) -> Result<Self, RuleError> {
        if state_count < 2 {
            return Err(RuleError::TooFewStates(state_count));
        }
        for mask in [survive_mask, birth_mask] {
            if mask >> (MAX_NEIGHBORS + 1) != 0 {
                return Err(RuleError::CountOutOfRange(31 - mask.leading_zeros()));
            }
        }
        Ok(Self {
            survive_mask,
            birth_mask,
            state_count,
        })
    }

    /// Parse rule text of the form `SURVIVE/BIRTH/STATES`.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let segments: Vec<&str> = compact.split('/').collect();
        let [survive, birth, states] = segments.as_slice() else {
            return Err(RuleError::SegmentCount(segments.len()));
        };

        let survive_mask = parse_range_list(survive)?;
        let birth_mask = parse_range_list(birth)?;
        let state_count = parse_number(states)?;

        Self::new(survive_mask, birth_mask, state_count)
    }

    /// Look up a named preset from [`PRESETS`].
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .and_then(|(_, text)| Self::parse(text).ok())
    }

    #[inline]
    pub fn survive_mask(&self) -> u32 {
        self.survive_mask
    }

    #[inline]
    pub fn birth_mask(&self) -> u32 {
        self.birth_mask
    }

    #[inline]
    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    /// The fully alive state, `state_count - 1`.
    #[inline]
    pub fn max_state(&self) -> u32 {
        self.state_count - 1
    }

    /// Whether an alive cell with `neighbors` live neighbors survives.
    #[inline]
    pub fn survives(&self, neighbors: u32) -> bool {
        neighbors <= MAX_NEIGHBORS && self.survive_mask & (1 << neighbors) != 0
    }

    /// Whether a dead cell with `neighbors` live neighbors is born.
    #[inline]
    pub fn born(&self, neighbors: u32) -> bool {
        neighbors <= MAX_NEIGHBORS && self.birth_mask & (1 << neighbors) != 0
    }
}

impl FromStr for RuleSpec {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleSpec {
    /// Canonical text form, e.g. `2-3/3/3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_range_list(f, self.survive_mask)?;
        f.write_str("/")?;
        write_range_list(f, self.birth_mask)?;
        write!(f, "/{}", self.state_count)
    }
}

/// Rule parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Rule must have exactly 3 '/'-separated segments, found {0}")]
    SegmentCount(usize),
    #[error("Invalid number '{0}' in rule")]
    InvalidNumber(String),
    #[error("Malformed range item '{0}'")]
    MalformedItem(String),
    #[error("Neighbor count {0} exceeds the maximum of 26")]
    CountOutOfRange(u32),
    #[error("State count must be at least 2, got {0}")]
    TooFewStates(u32),
}

fn parse_number(token: &str) -> Result<u32, RuleError> {
    token
        .parse::<u32>()
        .map_err(|_| RuleError::InvalidNumber(token.to_string()))
}

/// Parse `1,3,5-7` into a bitmask. Empty items contribute nothing.
fn parse_range_list(list: &str) -> Result<u32, RuleError> {
    let mut mask = 0u32;

    for item in list.split(',').filter(|item| !item.is_empty()) {
        let bounds: Vec<&str> = item.split('-').collect();
        let (start, end) = match bounds.as_slice() {
            [n] => {
                let n = parse_number(n)?;
                (n, n)
            }
            [a, b] => (parse_number(a)?, parse_number(b)?),
            _ => return Err(RuleError::MalformedItem(item.to_string())),
        };
        // Reversed ranges are empty, whatever their bounds.
        if start > end {
            continue;
        }
        if end > MAX_NEIGHBORS {
            return Err(RuleError::CountOutOfRange(end));
        }
        for n in start..=end {
            mask |= 1 << n;
        }
    }

    Ok(mask)
}

fn write_range_list(f: &mut fmt::Formatter<'_>, mask: u32) -> fmt::Result {
    let mut first = true;
    let mut n = 0;
    while n <= MAX_NEIGHBORS {
        if mask & (1 << n) == 0 {
            n += 1;
            continue;
        }
        let start = n;
        while n < MAX_NEIGHBORS && mask & (1 << (n + 1)) != 0 {
            n += 1;
        }
        if !first {
            f.write_str(",")?;
        }
        first = false;
        if start == n {
            write!(f, "{start}")?;
        } else {
            write!(f, "{start}-{n}")?;
        }
        n += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(mask: u32) -> Vec<u32> {
        (0..32).filter(|i| mask & (1 << i) != 0).collect()
    }

    #[test]
    fn test_parse_simple_range() {
        let rule = RuleSpec::parse("2-3/3/3").unwrap();
        assert_eq!(bits(rule.survive_mask()), vec![2, 3]);
        assert_eq!(bits(rule.birth_mask()), vec![3]);
        assert_eq!(rule.state_count(), 3);
        assert_eq!(rule.max_state(), 2);
    }

    #[test]
    fn test_parse_mixed_list() {
        let rule = RuleSpec::parse("1,3,5-7/4/5").unwrap();
        assert_eq!(bits(rule.survive_mask()), vec![1, 3, 5, 6, 7]);
        assert_eq!(bits(rule.birth_mask()), vec![4]);
        assert_eq!(rule.state_count(), 5);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let spaced = RuleSpec::parse("  1, 3 ,5 - 7 /\t4/ 5\n").unwrap();
        assert_eq!(spaced, RuleSpec::parse("1,3,5-7/4/5").unwrap());
    }

    #[test]
    fn test_empty_items_contribute_nothing() {
        let rule = RuleSpec::parse(",2,,3,/ /2").unwrap();
        assert_eq!(bits(rule.survive_mask()), vec![2, 3]);
        assert_eq!(rule.birth_mask(), 0);
        assert_eq!(rule.state_count(), 2);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let rule = RuleSpec::parse("5-2/3/2").unwrap();
        assert_eq!(rule.survive_mask(), 0);

        let rule = RuleSpec::parse("30-2/3/3").unwrap();
        assert_eq!(rule.survive_mask(), 0);
        assert_eq!(bits(rule.birth_mask()), vec![3]);

        let rule = RuleSpec::parse("1,40-27/3/3").unwrap();
        assert_eq!(bits(rule.survive_mask()), vec![1]);
    }

    #[test]
    fn test_duplicates_are_idempotent() {
        let rule = RuleSpec::parse("3,3,2-4/0/2").unwrap();
        assert_eq!(bits(rule.survive_mask()), vec![2, 3, 4]);
        assert_eq!(bits(rule.birth_mask()), vec![0]);
    }

    #[test]
    fn test_wrong_segment_count() {
        assert_eq!(RuleSpec::parse("2/3"), Err(RuleError::SegmentCount(2)));
        assert_eq!(RuleSpec::parse("2/3/4/5"), Err(RuleError::SegmentCount(4)));
        assert_eq!(RuleSpec::parse(""), Err(RuleError::SegmentCount(1)));
    }

    #[test]
    fn test_too_few_states() {
        assert_eq!(RuleSpec::parse("2/3/1"), Err(RuleError::TooFewStates(1)));
        assert_eq!(RuleSpec::parse("2/3/0"), Err(RuleError::TooFewStates(0)));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            RuleSpec::parse("a/3/3"),
            Err(RuleError::InvalidNumber(_))
        ));
        assert!(matches!(
            RuleSpec::parse("2/3/"),
            Err(RuleError::InvalidNumber(_))
        ));
        assert!(matches!(
            RuleSpec::parse("-1/3/3"),
            Err(RuleError::InvalidNumber(_))
        ));
        assert!(matches!(
            RuleSpec::parse("2/3/x"),
            Err(RuleError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_malformed_item() {
        assert_eq!(
            RuleSpec::parse("1-2-3/3/3"),
            Err(RuleError::MalformedItem("1-2-3".to_string()))
        );
    }

    #[test]
    fn test_count_out_of_range() {
        assert_eq!(
            RuleSpec::parse("27/3/3"),
            Err(RuleError::CountOutOfRange(27))
        );
        assert_eq!(
            RuleSpec::parse("2/20-40/3"),
            Err(RuleError::CountOutOfRange(40))
        );
        assert!(RuleSpec::parse("0-26/26/2").is_ok());
    }

    #[test]
    fn test_new_rejects_high_bits() {
        assert_eq!(
            RuleSpec::new(1 << 27, 0, 3),
            Err(RuleError::CountOutOfRange(27))
        );
        assert!(RuleSpec::new((1 << 27) - 1, 0, 3).is_ok());
    }

    #[test]
    fn test_display_canonical() {
        for text in ["2-3/3/3", "1,3,5-7/4/5", "/0/2", "0-26//10", "9-26/5-7,12-13,15/5"] {
            let rule = RuleSpec::parse(text).unwrap();
            assert_eq!(rule.to_string(), text);
            assert_eq!(text.parse::<RuleSpec>().unwrap(), rule);
        }
        let messy = RuleSpec::parse("3,2 / 3 / 3").unwrap();
        assert_eq!(messy.to_string(), "2-3/3/3");
    }

    #[test]
    fn test_survives_and_born() {
        let rule = RuleSpec::parse("4/4/5").unwrap();
        assert!(rule.survives(4));
        assert!(!rule.survives(3));
        assert!(rule.born(4));
        assert!(!rule.born(27));
    }

    #[test]
    fn test_presets_parse() {
        for (name, text) in PRESETS {
            let preset = RuleSpec::preset(name).unwrap();
            assert_eq!(preset, RuleSpec::parse(text).unwrap());
        }
        assert_eq!(RuleSpec::preset("AMOEBA"), RuleSpec::preset("amoeba"));
        assert!(RuleSpec::preset("unknown").is_none());
    }
}
