//! Hosts-file line normalization.
//!
//! Turns raw lines into [`Entry`] values. A line such as
//!
//! ```text
//! 0.0.0.0 ads.example.com tracker.example.com # trailing note
//! ```
//!
//! yields one domain entry per token, while `# comment` lines yield a
//! single comment entry when comments are kept.

/// Kind of a normalized entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Domain,
    Comment,
}

/// One logical domain or comment extracted from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Ordinal across all entries of the input, domains and comments alike.
    pub position: usize,
    pub kind: EntryKind,
    pub text: &'a str,
}

/// Extracts domains and comments from raw lines.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    blackhole: &'a str,
    keep_comments: bool,
}

impl<'a> Normalizer<'a> {
    pub fn new(blackhole: &'a str, keep_comments: bool) -> Self {
        Self {
            blackhole,
            keep_comments,
        }
    }

    /// Split one line into entry tokens, in line order.
    pub fn tokens<'l>(&self, line: &'l str) -> Tokens<'l> {
        if let Some(rest) = line.strip_prefix(self.blackhole) {
            if rest.starts_with(char::is_whitespace) {
                let body = match rest.find('#') {
                    Some(pos) => &rest[..pos],
                    None => rest,
                };
                let body = body.trim();
                if body == self.blackhole {
                    return Tokens::Empty;
                }
                return Tokens::Domains(body.split_whitespace());
            }
        }

        if self.keep_comments && line.starts_with('#') {
            return Tokens::Comment(Some(line));
        }

        Tokens::Empty
    }
}

/// Entry tokens of a single line.
pub enum Tokens<'l> {
    Empty,
    Comment(Option<&'l str>),
    Domains(std::str::SplitWhitespace<'l>),
}

impl<'l> Iterator for Tokens<'l> {
    type Item = (EntryKind, &'l str);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Tokens::Empty => None,
            Tokens::Comment(line) => line.take().map(|l| (EntryKind::Comment, l)),
            Tokens::Domains(words) => words.next().map(|w| (EntryKind::Domain, w)),
        }
    }
}

/// Assigns positions to entries as lines are fed in order.
///
/// Each pass over the input owns one of these; positions restart at zero.
#[derive(Debug)]
pub struct EntryCounter<'a> {
    normalizer: Normalizer<'a>,
    next: usize,
}

impl<'a> EntryCounter<'a> {
    pub fn new(normalizer: Normalizer<'a>) -> Self {
        Self {
            normalizer,
            next: 0,
        }
    }

    /// Normalize a line into positioned entries.
    pub fn feed<'c, 'l>(&'c mut self, line: &'l str) -> Positioned<'c, 'l> {
        Positioned {
            tokens: self.normalizer.tokens(line),
            next: &mut self.next,
        }
    }

    /// Number of entries seen so far.
    pub fn count(&self) -> usize {
        self.next
    }
}

/// Entries of one line, numbered by an [`EntryCounter`].
pub struct Positioned<'c, 'l> {
    tokens: Tokens<'l>,
    next: &'c mut usize,
}

impl<'c, 'l> Iterator for Positioned<'c, 'l> {
    type Item = Entry<'l>;

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, text) = self.tokens.next()?;
        let position = *self.next;
        *self.next += 1;
        Some(Entry {
            position,
            kind,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str, keep_comments: bool) -> Vec<(EntryKind, String)> {
        Normalizer::new("0.0.0.0", keep_comments)
            .tokens(line)
            .map(|(k, t)| (k, t.to_string()))
            .collect()
    }

    fn domains(line: &str) -> Vec<String> {
        tokens(line, false).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_single_domain() {
        assert_eq!(domains("0.0.0.0 example.com"), vec!["example.com"]);
        assert_eq!(domains("0.0.0.0\texample.com  "), vec!["example.com"]);
    }

    #[test]
    fn test_multiple_domains_per_line() {
        assert_eq!(
            domains("0.0.0.0 a.com b.com\tc.com"),
            vec!["a.com", "b.com", "c.com"]
        );
    }

    #[test]
    fn test_trailing_comment_stripped() {
        assert_eq!(domains("0.0.0.0 a.com # tracker"), vec!["a.com"]);
        assert_eq!(domains("0.0.0.0 a.com#tracker"), vec!["a.com"]);
        assert!(domains("0.0.0.0 # only a note").is_empty());
    }

    #[test]
    fn test_blackhole_alone_yields_nothing() {
        assert!(domains("0.0.0.0 0.0.0.0").is_empty());
        assert!(domains("0.0.0.0").is_empty());
        assert!(domains("0.0.0.0 ").is_empty());
    }

    #[test]
    fn test_prefix_must_be_followed_by_whitespace() {
        assert!(domains("0.0.0.01 a.com").is_empty());
        assert!(domains("127.0.0.1 a.com").is_empty());
        assert!(domains("example.com").is_empty());
        assert!(domains("").is_empty());
    }

    #[test]
    fn test_custom_blackhole() {
        let n = Normalizer::new("127.0.0.1", false);
        let got: Vec<_> = n.tokens("127.0.0.1 localhost.example").collect();
        assert_eq!(got, vec![(EntryKind::Domain, "localhost.example")]);
        assert_eq!(n.tokens("0.0.0.0 a.com").count(), 0);
    }

    #[test]
    fn test_comments() {
        assert!(tokens("# header", false).is_empty());
        assert_eq!(
            tokens("# header", true),
            vec![(EntryKind::Comment, "# header".to_string())]
        );
        assert!(tokens("  # indented", true).is_empty());
    }

    #[test]
    fn test_positions_span_comments() {
        let n = Normalizer::new("0.0.0.0", true);
        let mut counter = EntryCounter::new(n);
        let mut out = Vec::new();
        for line in ["# top", "0.0.0.0 a.com b.com", "junk", "0.0.0.0 c.com"] {
            out.extend(counter.feed(line));
        }
        let positions: Vec<_> = out.iter().map(|e| (e.position, e.text)).collect();
        assert_eq!(
            positions,
            vec![(0, "# top"), (1, "a.com"), (2, "b.com"), (3, "c.com")]
        );
        assert_eq!(counter.count(), 4);
    }

    #[test]
    fn test_dropped_comments_compact_positions() {
        let n = Normalizer::new("0.0.0.0", false);
        let mut counter = EntryCounter::new(n);
        let mut out = Vec::new();
        for line in ["# top", "0.0.0.0 a.com"] {
            out.extend(counter.feed(line));
        }
        assert_eq!(out[0].position, 0);
    }
}
