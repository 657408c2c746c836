// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output decoding and trimming helpers.

/// Trim captured output: surrounding whitespace first, then at most one
/// pair of apostrophes.
///
/// The apostrophe pass exists for tools that quote their own output. It
/// runs exactly once, so `''abc''` trims to `'abc'`, not `abc`.
pub fn trim_output(output: &str) -> &str {
    let trimmed = output.trim();
    let trimmed = trimmed.strip_suffix('\'').unwrap_or(trimmed);
    trimmed.strip_prefix('\'').unwrap_or(trimmed)
}

/// Decode captured bytes as text, replacing invalid UTF-8 rather than
/// failing.
pub(crate) fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_then_one_apostrophe_pair() {
        assert_eq!(trim_output("  'abc'  "), "abc");
    }

    #[test]
    fn strips_only_a_single_pair() {
        assert_eq!(trim_output("''abc''"), "'abc'");
    }

    #[test]
    fn plain_text_is_only_whitespace_trimmed() {
        assert_eq!(trim_output("  hello world\n"), "hello world");
    }

    #[test]
    fn unbalanced_apostrophes_are_stripped_independently() {
        assert_eq!(trim_output("'abc"), "abc");
        assert_eq!(trim_output("abc'"), "abc");
    }

    #[test]
    fn lone_apostrophe_trims_to_empty() {
        assert_eq!(trim_output(" ' "), "");
    }

    #[test]
    fn interior_apostrophes_survive() {
        assert_eq!(trim_output("it's fine"), "it's fine");
    }
}
