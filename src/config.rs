//! Knobs for locating and rendering a calculation.
//!
//! ```
//! # use editor_calc::Config;
//! let config = Config::default().with_precision(40).with_max_depth(8);
//! assert_eq!(config.precision, 28);
//! assert_eq!(config.max_depth, 8);
//! ```

/// Significant digits kept from each operation unless configured otherwise.
pub const DEFAULT_PRECISION: u32 = 20;

/// Most significant digits a `Decimal` can hold.
pub const MAX_PRECISION: u32 = 28;

/// Nesting levels allowed around any sub-expression. Parentheses, function
/// calls and each chained binary operator take one level.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Significant digits each operation result is rounded to, within
    /// `1..=MAX_PRECISION`. Literals keep all of their digits.
    pub precision: u32,
    /// Nesting levels the parser accepts before failing.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self.precision = self.effective_precision();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// `precision` clamped into range, for configs built from literal fields.
    pub fn effective_precision(&self) -> u32 {
        self.precision.max(1).min(MAX_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[test]
    fn it_defaults_to_twenty_digits_and_256_levels() {
        let config = Config::default();
        assert_eq!(config.precision, 20);
        assert_eq!(config.max_depth, 256);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(12, 12)]
    #[case(28, 28)]
    #[case(100, 28)]
    fn it_clamps_precision(#[case] requested: u32, #[case] kept: u32) {
        assert_eq!(Config::default().with_precision(requested).precision, kept);
    }

    #[test]
    fn it_clamps_literal_fields_on_use() {
        let config = Config {
            precision: 0,
            ..Config::default()
        };
        assert_eq!(config.effective_precision(), 1);
    }
}
