//! Spec strings and version predicates.
//!
//! A spec is a package name followed by comma-separated clauses:
//! `numpy>=1.16,<2`, `python 3.7.*`, `zlib 1.2.11 h7b6447c_3`. Parsing only
//! splits the text; [`Predicate::compile`] turns clauses into a test that can
//! be evaluated against many versions.

use std::fmt;

use crate::error::ResolveError;
use crate::version::Version;

/// Comparison operator of one clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Ge,
    Gt,
    Le,
    Lt,
    Ne,
    /// `=` and `==`: any release of the version prefix.
    Eq,
}

impl Operator {
    /// Longest prefixes first so `>=` is not read as `>`.
    const PREFIXES: [(&'static str, Operator); 7] = [
        (">=", Operator::Ge),
        ("<=", Operator::Le),
        ("!=", Operator::Ne),
        ("==", Operator::Eq),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        ("=", Operator::Eq),
    ];

    /// Split an operator off the front of `clause`.
    fn split_prefix(clause: &str) -> (Option<Operator>, &str) {
        for (prefix, op) in Self::PREFIXES {
            if let Some(rest) = clause.strip_prefix(prefix) {
                return (Some(op), rest);
            }
        }
        (None, clause)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Lt => "<",
            Operator::Ne => "!=",
            Operator::Eq => "=",
        }
    }
}

/// One `(operator, version)` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub op: Operator,
    pub version: Version,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

/// A parsed spec string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    /// Empty means any version.
    pub clauses: Vec<Clause>,
}

impl PackageSpec {
    pub fn parse(spec: &str) -> Result<Self, ResolveError> {
        let trimmed = spec.trim();
        let name_end = trimmed
            .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '=' | '!' | ','))
            .unwrap_or(trimmed.len());
        let name = &trimmed[..name_end];
        if name.is_empty() {
            return Err(ResolveError::malformed(spec, "missing package name"));
        }

        let mut clauses = Vec::new();
        for raw in trimmed[name_end..].split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if let Some(clause) = parse_clause(spec, raw)? {
                clauses.push(clause);
            }
        }

        Ok(Self {
            name: name.to_string(),
            clauses,
        })
    }

    pub fn predicate(&self) -> Predicate {
        Predicate::compile(&self.clauses)
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, clause) in self.clauses.iter().enumerate() {
            let sep = if i == 0 { " " } else { "," };
            write!(f, "{sep}{clause}")?;
        }
        Ok(())
    }
}

/// `None` for a wildcard-only clause such as `*`.
///
/// A second token after the version is a build string. It is ignored and a
/// clause without an operator becomes `=version`, matching how existing
/// environment files are written.
fn parse_clause(spec: &str, raw: &str) -> Result<Option<Clause>, ResolveError> {
    let (op, rest) = Operator::split_prefix(raw);
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let version = match tokens.as_slice() {
        [] => return Err(ResolveError::malformed(spec, format!("clause '{raw}' has no version"))),
        [version] | [version, _] => *version,
        _ => {
            return Err(ResolveError::malformed(
                spec,
                format!("clause '{raw}' has more than two tokens"),
            ))
        }
    };
    if version.starts_with(['<', '>', '=', '!']) {
        return Err(ResolveError::malformed(
            spec,
            format!("clause '{raw}' has a repeated operator"),
        ));
    }

    let version = Version::parse(version);
    if version.is_wildcard() {
        return Ok(None);
    }
    Ok(Some(Clause {
        op: op.unwrap_or(Operator::Eq),
        version,
    }))
}

/// A compiled conjunction of clauses.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    tests: Vec<Test>,
}

#[derive(Debug, Clone)]
enum Test {
    Ge(Version),
    Gt(Version),
    Le(Version),
    Lt(Version),
    Ne(Version),
    /// Half-open `[low, high)`.
    Range(Version, Version),
}

impl Predicate {
    pub fn compile(clauses: &[Clause]) -> Self {
        let tests = clauses
            .iter()
            .map(|clause| {
                let v = clause.version.clone();
                match clause.op {
                    Operator::Ge => Test::Ge(v),
                    Operator::Gt => Test::Gt(v),
                    Operator::Le => Test::Le(v),
                    Operator::Lt => Test::Lt(v),
                    Operator::Ne => Test::Ne(v),
                    Operator::Eq => {
                        let high = v.patch_ceiling();
                        Test::Range(v, high)
                    }
                }
            })
            .collect();
        Self { tests }
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.tests.iter().all(|test| match test {
            Test::Ge(v) => version >= v,
            Test::Gt(v) => version > v,
            Test::Le(v) => version <= v,
            Test::Lt(v) => version < v,
            Test::Ne(v) => version != v,
            Test::Range(low, high) => version >= low && version < high,
        })
    }
}
