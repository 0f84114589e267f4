//! Package version parsing and ordering.
//!
//! Versions follow a PEP 440-like ordering:
//! - Segments are split on `.`, `-`, `_`, `+` and at digit/letter boundaries
//!   (`1.0rc1` is `1`, `0`, `rc`, `1`)
//! - Numeric segments compare as numbers, missing segments count as `0`
//! - Known qualifiers order `dev` < `alpha` < `beta` < `rc` < release < `post`
//! - Unknown text sorts below any number
//!
//! `*` characters and trailing `.` are stripped before parsing, so `1.2.*`
//! and `1.2.` both mean `1.2`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Suffix appended to a version to form the exclusive upper bound of `=v`.
const PATCH_CEILING: &str = "99999999999999";

/// A parsed, totally ordered package version.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    /// Lowercased so that derived equality matches the ordering.
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
enum QualifierKind {
    Dev,
    Alpha,
    Beta,
    Rc,
    Release,
    Post,
}

impl Version {
    pub fn parse(version: &str) -> Self {
        let original = version.trim().to_string();
        let segments = parse_segments(&clean(&original));
        Self { original, segments }
    }

    /// The version string as it was given.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// True when nothing remains after stripping `*` and trailing dots.
    pub fn is_wildcard(&self) -> bool {
        clean(&self.original).is_empty()
    }

    /// Exclusive upper bound of the `=v` range: `v.99999999999999`.
    pub fn patch_ceiling(&self) -> Version {
        let base = clean(&self.original);
        Version::parse(&format!("{base}.{PATCH_CEILING}"))
    }

    /// Segments with trailing release-equivalent parts removed.
    fn significant(&self) -> &[Segment] {
        let mut end = self.segments.len();
        while end > 0 && compare_segment_to_empty(&self.segments[end - 1]) == Ordering::Equal {
            end -= 1;
        }
        &self.segments[..end]
    }
}

fn clean(version: &str) -> String {
    let stripped: String = version.chars().filter(|&c| c != '*').collect();
    stripped.trim().trim_end_matches('.').to_string()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let ord = compare_segments(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(s), None) => compare_segment_to_empty(s),
        (None, Some(s)) => compare_segment_to_empty(s).reverse(),
        (Some(a), Some(b)) => compare_two_segments(a, b),
    }
}

fn compare_segment_to_empty(seg: &Segment) -> Ordering {
    match seg {
        Segment::Numeric(n) => n.cmp(&0),
        Segment::Qualifier(q) => q.cmp(&QualifierKind::Release),
        Segment::Text(_) => Ordering::Less,
    }
}

fn compare_two_segments(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
        (Segment::Qualifier(a), Segment::Qualifier(b)) => a.cmp(b),
        (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
        (Segment::Numeric(_), _) => Ordering::Greater,
        (_, Segment::Numeric(_)) => Ordering::Less,
        (Segment::Qualifier(q), Segment::Text(_)) => {
            if *q >= QualifierKind::Release {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Segment::Text(_), Segment::Qualifier(q)) => {
            if *q >= QualifierKind::Release {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

fn parse_segments(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        if !current.is_empty() {
            segments.push(classify(current));
            current.clear();
        }
    };

    for ch in version.chars() {
        if matches!(ch, '.' | '-' | '_' | '+') {
            flush(&mut current);
            continue;
        }
        let boundary = current
            .chars()
            .last()
            .is_some_and(|prev| prev.is_ascii_digit() != ch.is_ascii_digit());
        if boundary {
            flush(&mut current);
        }
        current.push(ch);
    }
    flush(&mut current);

    segments
}

fn classify(token: &str) -> Segment {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return Segment::Numeric(token.parse::<u64>().unwrap_or(u64::MAX));
    }
    let lower = token.to_lowercase();
    match lower.as_str() {
        "dev" => Segment::Qualifier(QualifierKind::Dev),
        "a" | "alpha" => Segment::Qualifier(QualifierKind::Alpha),
        "b" | "beta" => Segment::Qualifier(QualifierKind::Beta),
        "rc" | "c" | "pre" | "preview" => Segment::Qualifier(QualifierKind::Rc),
        "final" | "release" => Segment::Qualifier(QualifierKind::Release),
        "post" | "rev" | "r" => Segment::Qualifier(QualifierKind::Post),
        _ => Segment::Text(lower),
    }
}
