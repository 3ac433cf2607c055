use crate::address::ADDRESS_HEX_LEN;
use crate::difficulty::combinations;
use crate::error::CriteriaError;
use num_bigint::BigUint;

/// Prefix/suffix an address must carry to count as a match.
///
/// Both parts are lowercase hex and at most 64 digits long; one of them may
/// be empty but not both. The prefix is matched right after the `0x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    prefix: String,
    suffix: String,
}

impl SearchCriteria {
    /// Validate and lowercase a prefix/suffix pair
    pub fn new(prefix: &str, suffix: &str) -> Result<Self, CriteriaError> {
        let prefix = normalize("prefix", prefix)?;
        let suffix = normalize("suffix", suffix)?;

        if prefix.is_empty() && suffix.is_empty() {
            return Err(CriteriaError::Empty);
        }

        Ok(Self { prefix, suffix })
    }

    pub fn prefix_only(prefix: &str) -> Result<Self, CriteriaError> {
        Self::new(prefix, "")
    }

    pub fn suffix_only(suffix: &str) -> Result<Self, CriteriaError> {
        Self::new("", suffix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Total number of constrained hex digits
    pub fn len(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether `address` starts with `0x` + prefix and ends with suffix.
    ///
    /// Comparison ignores ASCII case; the criteria themselves are already
    /// lowercase, so no allocation happens in the hot loop.
    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        let bytes = address.as_bytes();
        if bytes.len() < 2 || !bytes[..2].eq_ignore_ascii_case(b"0x") {
            return false;
        }
        let body = &bytes[2..];

        // Early exit on prefix, most candidates fail here
        if body.len() < self.prefix.len()
            || !body[..self.prefix.len()].eq_ignore_ascii_case(self.prefix.as_bytes())
        {
            return false;
        }

        body.len() >= self.suffix.len()
            && body[body.len() - self.suffix.len()..].eq_ignore_ascii_case(self.suffix.as_bytes())
    }

    /// Size of the search space: `16^(len(prefix) + len(suffix))`
    pub fn combinations(&self) -> BigUint {
        combinations(self.len())
    }

    /// Human-readable pattern, e.g. `0xcafe...beef`
    pub fn pattern_description(&self) -> String {
        match (self.prefix.is_empty(), self.suffix.is_empty()) {
            (false, false) => format!("0x{}...{} (prefix + suffix)", self.prefix, self.suffix),
            (false, true) => format!("0x{}... (prefix)", self.prefix),
            (true, false) => format!("0x...{} (suffix)", self.suffix),
            (true, true) => "None".to_string(),
        }
    }

    /// Shorten an address to the matched parts, keeping at least four
    /// characters at either end: `0xcafe...beef`
    pub fn short_address(&self, address: &str) -> String {
        let head = 4.max(2 + self.prefix.len()).min(address.len());
        let tail = 4.max(self.suffix.len()).min(address.len());

        match (address.get(..head), address.get(address.len() - tail..)) {
            (Some(start), Some(end)) => format!("{}...{}", start, end),
            _ => address.to_string(),
        }
    }
}

fn normalize(field: &'static str, input: &str) -> Result<String, CriteriaError> {
    if let Some(ch) = input.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CriteriaError::InvalidCharacter { field, ch });
    }
    if input.len() > ADDRESS_HEX_LEN {
        return Err(CriteriaError::TooLong {
            field,
            len: input.len(),
        });
    }
    Ok(input.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0xab12345678901234567890123456789012345678901234567890123456789ecd";

    #[test]
    fn test_normalizes_case() {
        let criteria = SearchCriteria::new("AbC", "DeF").unwrap();
        assert_eq!(criteria.prefix(), "abc");
        assert_eq!(criteria.suffix(), "def");
        assert_eq!(criteria.len(), 6);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(SearchCriteria::new("", ""), Err(CriteriaError::Empty));
        assert_eq!(
            SearchCriteria::new("0xab", ""),
            Err(CriteriaError::InvalidCharacter { field: "prefix", ch: 'x' })
        );
        assert_eq!(
            SearchCriteria::new("ab", "g"),
            Err(CriteriaError::InvalidCharacter { field: "suffix", ch: 'g' })
        );

        let long = "a".repeat(65);
        assert_eq!(
            SearchCriteria::suffix_only(&long),
            Err(CriteriaError::TooLong { field: "suffix", len: 65 })
        );
        assert!(SearchCriteria::prefix_only(&"f".repeat(64)).is_ok());
    }

    #[test]
    fn test_prefix_matching() {
        let criteria = SearchCriteria::prefix_only("ab").unwrap();
        assert!(criteria.matches(ADDRESS));
        assert!(!criteria.matches("0xba12345678901234567890123456789012345678901234567890123456789ecd"));
        // The prefix is anchored after 0x, never before it
        assert!(!criteria.matches("ab12345678901234567890123456789012345678901234567890123456789ecd"));
    }

    #[test]
    fn test_suffix_matching() {
        let criteria = SearchCriteria::suffix_only("ecd").unwrap();
        assert!(criteria.matches(ADDRESS));
        assert!(!criteria.matches("0xab12345678901234567890123456789012345678901234567890123456789ece"));
    }

    #[test]
    fn test_combined_prefix_suffix() {
        let criteria = SearchCriteria::new("ab", "cd").unwrap();
        assert!(criteria.matches(ADDRESS));
        assert!(!criteria.matches("0xac12345678901234567890123456789012345678901234567890123456789ecd"));
        assert!(!criteria.matches("0xab12345678901234567890123456789012345678901234567890123456789ecc"));
    }

    #[test]
    fn test_case_insensitive_address() {
        let criteria = SearchCriteria::new("AB", "cd").unwrap();
        assert!(criteria.matches("0XAB12345678901234567890123456789012345678901234567890123456789ECD"));
    }

    #[test]
    fn test_short_inputs_do_not_panic() {
        let criteria = SearchCriteria::new("abcd", "ef").unwrap();
        assert!(!criteria.matches(""));
        assert!(!criteria.matches("0"));
        assert!(!criteria.matches("0xab"));
        assert_eq!(criteria.short_address("0xab"), "0xab...0xab");
    }

    #[test]
    fn test_combinations() {
        assert_eq!(SearchCriteria::prefix_only("ab").unwrap().combinations(), BigUint::from(256u32));
        assert_eq!(SearchCriteria::new("a", "b").unwrap().combinations(), BigUint::from(256u32));
    }

    #[test]
    fn test_display_helpers() {
        let criteria = SearchCriteria::new("cafe", "").unwrap();
        assert_eq!(criteria.pattern_description(), "0xcafe... (prefix)");
        assert_eq!(criteria.short_address(ADDRESS), "0xab12...9ecd");

        let criteria = SearchCriteria::new("", "789ecd").unwrap();
        assert_eq!(criteria.pattern_description(), "0x...789ecd (suffix)");
        assert_eq!(criteria.short_address(ADDRESS), "0xab...789ecd");
    }
}
