//! Placeholder tokens standing in for template expressions while the markup is minified.
//!
//! A token is `{prefix}x{index}x`. The prefix is chosen so that no literal segment
//! contains it and it has no proper prefix which is also its suffix, hence every
//! occurrence of the prefix in the joined markup starts one of the tokens.

use crate::error::MinifyErrorKind;

pub(crate) const PLACEHOLDER_BASE: &str = "litminifyph";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    prefix: String,
}

impl Placeholders {
    pub fn for_segments<S: AsRef<str>>(segments: &[S]) -> Placeholders {
        let mut prefix = PLACEHOLDER_BASE.to_owned();
        let mut attempt: u32 = 0;

        while segments.iter().any(|s| s.as_ref().contains(prefix.as_str())) {
            attempt += 1;
            prefix = format!("{PLACEHOLDER_BASE}{attempt}");
        }

        Placeholders { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn token(&self, index: usize) -> String {
        format!("{}x{}x", self.prefix, index)
    }

    /// Joins the literal segments, putting a token where each expression was
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let capacity = segments.iter().map(|s| s.as_ref().len()).sum::<usize>()
            + segments.len() * (self.prefix.len() + 4);
        let mut out = String::with_capacity(capacity);

        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                out.push_str(&self.token(index - 1));
            }
            out.push_str(segment.as_ref());
        }

        out
    }

    /// Splits minified markup back into `expressions + 1` literal segments.
    /// Every token must be present exactly once and in the original order.
    pub fn split(&self, markup: &str, expressions: usize) -> Result<Vec<String>, MinifyErrorKind> {
        let mut segments = Vec::with_capacity(expressions + 1);
        let mut rest = markup;

        while let Some(pos) = rest.find(self.prefix.as_str()) {
            let after_prefix = &rest[pos + self.prefix.len()..];
            let Some((index, token_tail)) = parse_token_tail(after_prefix) else {
                return Err(MinifyErrorKind::PlaceholderMismatch {
                    expected: expressions,
                    found: segments.len(),
                });
            };

            if index != segments.len() {
                return Err(MinifyErrorKind::PlaceholderOrder {
                    expected: segments.len(),
                    found: index,
                });
            }

            segments.push(rest[..pos].to_owned());
            rest = &after_prefix[token_tail..];
        }
        segments.push(rest.to_owned());

        let found = segments.len() - 1;
        if found != expressions {
            return Err(MinifyErrorKind::PlaceholderMismatch {
                expected: expressions,
                found,
            });
        }

        Ok(segments)
    }
}

/// Length of the token `input` starts with, whatever prefix counter it carries
pub(crate) fn token_len(input: &str) -> Option<usize> {
    let tail = input.strip_prefix(PLACEHOLDER_BASE)?;
    let counter = tail.bytes().take_while(u8::is_ascii_digit).count();
    let (_, consumed) = parse_token_tail(&tail[counter..])?;
    Some(PLACEHOLDER_BASE.len() + counter + consumed)
}

/// Parses `x{digits}x`, returning the index and the consumed length
fn parse_token_tail(input: &str) -> Option<(usize, usize)> {
    let digits = input.strip_prefix('x')?;
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 || digits.as_bytes().get(len) != Some(&b'x') {
        return None;
    }

    let index = digits[..len].parse().ok()?;
    Some((index, len + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_uses_base_prefix_when_free() {
        let placeholders = Placeholders::for_segments(&["<div>", "</div>"]);
        assert_eq!(PLACEHOLDER_BASE, placeholders.prefix());
        assert_eq!("litminifyphx0x", placeholders.token(0));
    }

    #[test]
    fn it_avoids_prefixes_present_in_segments() {
        let placeholders =
            Placeholders::for_segments(&["<p>litminifyph</p>", "litminifyph1 ", ""]);
        assert_eq!("litminifyph2", placeholders.prefix());
    }

    #[test]
    fn it_joins_and_splits_segments() {
        let segments = ["<a href=\"", "\">", "</a>"];
        let placeholders = Placeholders::for_segments(&segments);

        let joined = placeholders.join(&segments);
        assert_eq!("<a href=\"litminifyphx0x\">litminifyphx1x</a>", joined);
        assert_eq!(segments.to_vec(), placeholders.split(&joined, 2).unwrap());
    }

    #[test]
    fn it_handles_adjacent_and_edge_placeholders() {
        let segments = ["", "", ""];
        let placeholders = Placeholders::for_segments(&segments);

        let joined = placeholders.join(&segments);
        assert_eq!("litminifyphx0xlitminifyphx1x", joined);
        assert_eq!(vec!["", "", ""], placeholders.split(&joined, 2).unwrap());
    }

    #[test]
    fn it_detects_missing_placeholders() {
        let placeholders = Placeholders::for_segments(&["<p>", "", "</p>"]);

        let result = placeholders.split("<p>litminifyphx0x</p>", 2);
        assert!(matches!(
            result,
            Err(MinifyErrorKind::PlaceholderMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn it_detects_duplicated_placeholders() {
        let placeholders = Placeholders::for_segments(&["<p>", "</p>"]);

        let result = placeholders.split("<p>litminifyphx0xlitminifyphx0x</p>", 1);
        assert!(matches!(
            result,
            Err(MinifyErrorKind::PlaceholderOrder {
                expected: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn it_detects_reordered_placeholders() {
        let placeholders = Placeholders::for_segments(&["", "", ""]);

        let result = placeholders.split("litminifyphx1xlitminifyphx0x", 2);
        assert!(matches!(
            result,
            Err(MinifyErrorKind::PlaceholderOrder {
                expected: 0,
                found: 1
            })
        ));
    }

    #[test]
    fn it_detects_mangled_placeholders() {
        let placeholders = Placeholders::for_segments(&["<p>", "</p>"]);

        let result = placeholders.split("<p>litminifyphx0</p>", 1);
        assert!(matches!(
            result,
            Err(MinifyErrorKind::PlaceholderMismatch { .. })
        ));
    }

    #[test]
    fn it_measures_tokens_with_any_prefix_counter() {
        assert_eq!(Some(14), token_len("litminifyphx0x</td>"));
        assert_eq!(Some(16), token_len("litminifyph12x3x"));
        assert_eq!(None, token_len("litminifyph</p>"));
        assert_eq!(None, token_len("litminifyphx1"));
        assert_eq!(None, token_len("<p>litminifyphx0x"));
    }
}
