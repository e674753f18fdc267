//! Consolidation of measurement-result terms.
//!
//! Terms against `measurement.results.*` fields cannot be translated
//! independently: they must constrain the *same* entry of the results
//! array, which requires a single element match per group of terms.
//! Consolidation rewrites the flat term list into clauses, grouping all
//! result terms of each OR-segment (a maximal run of AND-connected terms)
//! into one [`Clause::Results`] at the position of the segment's first
//! result term. Result terms in different OR-segments stay in different
//! groups, so `isotope equals U-238 OR isotope equals Th-232` still means
//! either isotope rather than one entry carrying both.

use crate::{
    query::Query,
    term::{Connector, Term},
};

/// A translation clause: either a single non-result term or a consolidated
/// group of result terms.
#[derive(Debug, PartialEq)]
pub(crate) enum Clause<'a> {
    /// A term translated on its own.
    Plain(&'a Term),
    /// AND-grouped result terms, translated as one element match.
    Results(Vec<&'a Term>),
}

/// The consolidated clause list. Like the term model, `connectors[i]`
/// joins `clauses[i]` and `clauses[i + 1]`.
#[derive(Debug, PartialEq)]
pub(crate) struct Consolidated<'a> {
    /// The clauses, in term order.
    pub clauses: Vec<Clause<'a>>,
    /// The connectors between adjacent clauses.
    pub connectors: Vec<Connector>,
}

/// Rewrites a query's term list into consolidated clauses.
pub(crate) fn consolidate(query: &Query) -> Consolidated<'_> {
    let terms = query.terms();
    let connectors = query.connectors();

    // Each clause remembers the index of its first term so the surviving
    // connectors can be recovered afterwards: the connector *into* a
    // clause is the one that preceded its first term.
    let mut clauses: Vec<(usize, Clause<'_>)> = Vec::new();
    let mut group: Option<usize> = None;

    for (i, term) in terms.iter().enumerate() {
        if i > 0 && connectors[i - 1] == Connector::Or {
            group = None;
        }
        if term.field.is_result() {
            match group {
                Some(slot) => {
                    if let (_, Clause::Results(members)) = &mut clauses[slot] {
                        members.push(term);
                    }
                }
                None => {
                    group = Some(clauses.len());
                    clauses.push((i, Clause::Results(vec![term])));
                }
            }
        } else {
            clauses.push((i, Clause::Plain(term)));
        }
    }

    let kept = clauses
        .iter()
        .skip(1)
        .map(|(first, _)| connectors[first - 1])
        .collect();
    Consolidated {
        clauses: clauses.into_iter().map(|(_, clause)| clause).collect(),
        connectors: kept,
    }
}
