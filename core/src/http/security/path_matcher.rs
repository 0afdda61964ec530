//! Ant-style URL Pattern Matching
//!
//! Access rules refer to request paths by pattern rather than by exact
//! string, using the ant syntax common in web security configuration.
//!
//! # Pattern Syntax
//!
//! - `?` matches exactly one character
//! - `*` matches zero or more characters within a path segment
//! - `**` matches zero or more path segments
//!
//! # Examples
//!
//! ```rust
//! use stocksim_security::http::security::path_matcher::PathPattern;
//!
//! let pattern = PathPattern::new("/account/**");
//! assert!(pattern.matches("/account/orders"));
//! assert!(pattern.matches("/account/orders/42/details"));
//!
//! let pattern = PathPattern::new("/users/*/profile");
//! assert!(pattern.matches("/users/123/profile"));
//! assert!(!pattern.matches("/users/123/456/profile"));
//! ```

/// Ant-style path pattern.
///
/// Trailing slashes are normalized on both patterns and paths, so
/// `/login` and `/login/` are equivalent.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    segments: Vec<PatternSegment>,
    case_sensitive: bool,
}

/// A segment of the pattern
#[derive(Debug, Clone, PartialEq)]
enum PatternSegment {
    /// Literal text (no wildcards)
    Literal(String),
    /// Single segment wildcard (*)
    SingleWildcard,
    /// Multi-segment wildcard (**)
    DoubleWildcard,
    /// Pattern with wildcards (*, ?)
    Pattern(String),
}

impl PathPattern {
    /// Create a new pattern.
    pub fn new(pattern: &str) -> Self {
        let segments = Self::parse_pattern(pattern);
        Self {
            pattern: pattern.to_string(),
            segments,
            case_sensitive: true,
        }
    }

    /// Create a case-insensitive pattern.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Get the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse pattern into segments
    fn parse_pattern(pattern: &str) -> Vec<PatternSegment> {
        let trimmed = pattern.trim_start_matches('/');

        if trimmed.is_empty() {
            return vec![PatternSegment::Literal(String::new())];
        }

        trimmed
            .split('/')
            .map(|part| {
                if part == "**" {
                    PatternSegment::DoubleWildcard
                } else if part == "*" {
                    PatternSegment::SingleWildcard
                } else if part.contains('*') || part.contains('?') {
                    PatternSegment::Pattern(part.to_string())
                } else {
                    PatternSegment::Literal(part.to_string())
                }
            })
            .collect()
    }

    /// Check if the given path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        self.match_segments(&self.segments, &path_segments, 0, 0)
    }

    /// Recursively match pattern segments against path segments
    fn match_segments(
        &self,
        pattern_segments: &[PatternSegment],
        path_segments: &[&str],
        pattern_idx: usize,
        path_idx: usize,
    ) -> bool {
        // Both exhausted - success
        if pattern_idx >= pattern_segments.len() && path_idx >= path_segments.len() {
            return true;
        }

        // Pattern exhausted but path remains - fail
        if pattern_idx >= pattern_segments.len() {
            return false;
        }

        match &pattern_segments[pattern_idx] {
            PatternSegment::DoubleWildcard => {
                // ** matches zero or more path segments
                for skip in 0..=path_segments.len().saturating_sub(path_idx) {
                    if self.match_segments(
                        pattern_segments,
                        path_segments,
                        pattern_idx + 1,
                        path_idx + skip,
                    ) {
                        return true;
                    }
                }
                false
            }

            PatternSegment::SingleWildcard => {
                if path_idx >= path_segments.len() {
                    return false;
                }
                self.match_segments(pattern_segments, path_segments, pattern_idx + 1, path_idx + 1)
            }

            PatternSegment::Pattern(pattern) => {
                if path_idx >= path_segments.len() {
                    return false;
                }
                if self.match_pattern(pattern, path_segments[path_idx]) {
                    self.match_segments(
                        pattern_segments,
                        path_segments,
                        pattern_idx + 1,
                        path_idx + 1,
                    )
                } else {
                    false
                }
            }

            PatternSegment::Literal(literal) => {
                if path_idx >= path_segments.len() {
                    // An empty literal only matches the root path
                    return literal.is_empty() && pattern_idx + 1 >= pattern_segments.len();
                }

                let path_segment = path_segments[path_idx];
                let matches = if self.case_sensitive {
                    literal == path_segment
                } else {
                    literal.eq_ignore_ascii_case(path_segment)
                };

                if matches {
                    self.match_segments(
                        pattern_segments,
                        path_segments,
                        pattern_idx + 1,
                        path_idx + 1,
                    )
                } else {
                    false
                }
            }
        }
    }

    /// Match a pattern segment containing * or ? against a path segment
    fn match_pattern(&self, pattern: &str, text: &str) -> bool {
        let pattern_chars: Vec<char> = if self.case_sensitive {
            pattern.chars().collect()
        } else {
            pattern.to_lowercase().chars().collect()
        };
        let text_chars: Vec<char> = if self.case_sensitive {
            text.chars().collect()
        } else {
            text.to_lowercase().chars().collect()
        };

        self.match_pattern_chars(&pattern_chars, &text_chars, 0, 0)
    }

    /// Recursively match pattern characters against text characters
    fn match_pattern_chars(
        &self,
        pattern: &[char],
        text: &[char],
        p_idx: usize,
        t_idx: usize,
    ) -> bool {
        // Both exhausted - success
        if p_idx >= pattern.len() && t_idx >= text.len() {
            return true;
        }

        // Pattern exhausted but text remains - fail
        if p_idx >= pattern.len() {
            return false;
        }

        match pattern[p_idx] {
            '*' => {
                // * matches zero or more characters
                for skip in 0..=(text.len() - t_idx) {
                    if self.match_pattern_chars(pattern, text, p_idx + 1, t_idx + skip) {
                        return true;
                    }
                }
                false
            }
            '?' => {
                // ? matches exactly one character
                if t_idx >= text.len() {
                    return false;
                }
                self.match_pattern_chars(pattern, text, p_idx + 1, t_idx + 1)
            }
            c => {
                if t_idx >= text.len() {
                    return false;
                }
                if c == text[t_idx] {
                    self.match_pattern_chars(pattern, text, p_idx + 1, t_idx + 1)
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = PathPattern::new("/login");
        assert!(pattern.matches("/login"));
        assert!(pattern.matches("/login/"));
        assert!(!pattern.matches("/logi"));
        assert!(!pattern.matches("/login/extra"));
    }

    #[test]
    fn test_single_wildcard() {
        let pattern = PathPattern::new("/users/*/profile");
        assert!(pattern.matches("/users/123/profile"));
        assert!(pattern.matches("/users/abc/profile"));
        assert!(!pattern.matches("/users/profile"));
        assert!(!pattern.matches("/users/123/456/profile"));
    }

    #[test]
    fn test_double_wildcard() {
        let pattern = PathPattern::new("/account/**");
        assert!(pattern.matches("/account/"));
        assert!(pattern.matches("/account/orders"));
        assert!(pattern.matches("/account/orders/42"));
        assert!(!pattern.matches("/other/path"));
    }

    #[test]
    fn test_double_wildcard_middle() {
        let pattern = PathPattern::new("/account/**/edit");
        assert!(pattern.matches("/account/edit"));
        assert!(pattern.matches("/account/orders/edit"));
        assert!(pattern.matches("/account/orders/42/edit"));
        assert!(!pattern.matches("/account/orders/42"));
    }

    #[test]
    fn test_question_mark() {
        let pattern = PathPattern::new("/file?.txt");
        assert!(pattern.matches("/file1.txt"));
        assert!(pattern.matches("/fileA.txt"));
        assert!(!pattern.matches("/file12.txt"));
        assert!(!pattern.matches("/file.txt"));
    }

    #[test]
    fn test_pattern_wildcard() {
        let pattern = PathPattern::new("/files/*.txt");
        assert!(pattern.matches("/files/report.txt"));
        assert!(!pattern.matches("/files/report.pdf"));
        assert!(!pattern.matches("/files/subdir/report.txt"));
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = PathPattern::new("/Login").case_insensitive();
        assert!(pattern.matches("/login"));
        assert!(pattern.matches("/LOGIN"));
    }

    #[test]
    fn test_root_path() {
        let pattern = PathPattern::new("/");
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/login"));
    }

    #[test]
    fn test_trailing_slash() {
        let pattern = PathPattern::new("/register/");
        assert!(pattern.matches("/register"));
        assert!(pattern.matches("/register/"));
    }

    #[test]
    fn test_mixed_wildcards() {
        let pattern = PathPattern::new("/api/*/items/**");
        assert!(pattern.matches("/api/v1/items/1"));
        assert!(pattern.matches("/api/v1/items/1/2/3"));
        assert!(!pattern.matches("/api/v1/v2/items/1"));
    }
}
