//! Parse options: resource limits and duplicate key policy.
//!
//! The defaults are strict; [`ParseOptions::lenient`] is meant for trusted
//! inputs such as generated fixtures.

/// What to do when an object repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail the parse with a Malformed-Document error.
    #[default]
    Reject,
    /// Keep the position of the first occurrence and the value of the last.
    LastWins,
}

/// Options controlling a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum total input size in bytes
    pub max_input_size: u64,
    /// Maximum nesting depth for arrays/objects
    pub max_nesting_depth: usize,
    /// Duplicate object key policy
    pub duplicate_keys: DuplicateKeys,
}

impl ParseOptions {
    /// Highest nesting depth any options accept.
    ///
    /// Parsing and dumping use heap stacks, but dropping or comparing a tree
    /// still recurses once per level.
    pub const MAX_NESTING_DEPTH: usize = 1024;

    /// Strict defaults.
    pub const fn strict() -> Self {
        Self {
            max_input_size: 64 * 1024 * 1024, // 64 MiB
            max_nesting_depth: 512,
            duplicate_keys: DuplicateKeys::Reject,
        }
    }

    /// Lenient options for trusted inputs.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 1024 * 1024 * 1024, // 1 GiB
            max_nesting_depth: Self::MAX_NESTING_DEPTH,
            duplicate_keys: DuplicateKeys::LastWins,
        }
    }

    /// Replace the nesting depth limit, capped at [`Self::MAX_NESTING_DEPTH`].
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = if depth > Self::MAX_NESTING_DEPTH {
            Self::MAX_NESTING_DEPTH
        } else {
            depth
        };
        self
    }

    /// Replace the input size limit.
    #[must_use]
    pub const fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.max_input_size = bytes;
        self
    }

    /// Replace the duplicate key policy.
    #[must_use]
    pub const fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_options() {
        let options = ParseOptions::strict();
        assert_eq!(options.max_input_size, 64 * 1024 * 1024);
        assert_eq!(options.max_nesting_depth, 512);
        assert_eq!(options.duplicate_keys, DuplicateKeys::Reject);
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_lenient_options() {
        let options = ParseOptions::lenient();
        assert_eq!(options.duplicate_keys, DuplicateKeys::LastWins);
        assert!(options.max_input_size > ParseOptions::strict().max_input_size);
        assert!(options.max_nesting_depth > ParseOptions::strict().max_nesting_depth);
    }

    #[test]
    fn test_builders() {
        let options = ParseOptions::strict()
            .with_max_nesting_depth(3)
            .with_max_input_size(10)
            .with_duplicate_keys(DuplicateKeys::LastWins);
        assert_eq!(options.max_nesting_depth, 3);
        assert_eq!(options.max_input_size, 10);
        assert_eq!(options.duplicate_keys, DuplicateKeys::LastWins);
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let options = ParseOptions::strict().with_max_nesting_depth(usize::MAX);
        assert_eq!(options.max_nesting_depth, ParseOptions::MAX_NESTING_DEPTH);
        assert_eq!(
            ParseOptions::lenient().max_nesting_depth,
            ParseOptions::MAX_NESTING_DEPTH
        );
    }
}
