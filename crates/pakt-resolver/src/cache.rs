//! Per-resolution memo of candidate versions.
//!
//! Many parents declare the same dependency spec; the set of catalog versions
//! that satisfies it is computed once per resolution. The cache is owned by
//! one [`GraphBuilder`](crate::graph::GraphBuilder) and so is tied to the
//! catalog that builder borrows.

use std::collections::HashMap;

use pakt_core::catalog::Catalog;

use crate::spec::{Clause, Predicate};
use crate::version::Version;

#[derive(Debug, Default)]
pub struct CandidateCache {
    entries: HashMap<(String, Vec<Clause>), Vec<String>>,
    hits: usize,
}

impl CandidateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog versions of `name` accepted by every clause.
    ///
    /// Returned in catalog key order. Unknown names yield an empty list.
    pub fn valid_packages(&mut self, catalog: &Catalog, name: &str, clauses: &[Clause]) -> Vec<String> {
        let key = (name.to_string(), clauses.to_vec());
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            return found.clone();
        }

        let predicate = Predicate::compile(clauses);
        let versions: Vec<String> = catalog
            .versions(name)
            .map(|versions| {
                versions
                    .keys()
                    .filter(|v| predicate.matches(&Version::parse(v)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        self.entries.insert(key, versions.clone());
        versions
    }

    /// Number of lookups answered from the memo.
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
