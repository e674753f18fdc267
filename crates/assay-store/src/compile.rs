//! Compilation of the query tree into the store's wire form.
//!
//! The wire form is a Mongo-style filter document: `$and`/`$or` boolean
//! arrays, `$text` full-text search, anchored case-insensitive `$regex`
//! patterns for string matches, `$not` for negated matches, `$elemMatch`
//! bodies for measurement-result groups, and `$lt`-family operators for
//! numbers and dates. Dates appear as canonical ISO strings, which order
//! correctly under plain string comparison. This module is the only place
//! regex strings are built; query text is escaped, so user input can never
//! smuggle pattern syntax into a filter.

use serde_json::{Map, Value, json};

use assay_query::{
    CompareOp, Number, QueryNode, ResultPredicate, StringPattern, ValueConstraint,
};
use assay_record::dates;

/// Compiles a query tree into a wire filter document.
pub fn compile(node: &QueryNode) -> Value {
    match node {
        QueryNode::MatchAll => json!({}),
        QueryNode::Text { search } => json!({"$text": {"$search": search}}),
        QueryNode::Match { field, pattern } => json!({field.as_str(): pattern_value(pattern)}),
        QueryNode::Compare { field, op, value } => {
            json!({field.as_str(): {operator(*op): number_value(*value)}})
        }
        QueryNode::CompareDate { field, op, date } => {
            // Date fields hold arrays; the comparison targets the first
            // (start) entry.
            let path = format!("{}.0", field.as_str());
            json!({path: {operator(*op): dates::to_iso(*date)}})
        }
        QueryNode::Results(bodies) => {
            let mut compiled: Vec<Value> = bodies.iter().map(element_match).collect();
            if compiled.len() == 1 {
                compiled.remove(0)
            } else {
                json!({"$or": compiled})
            }
        }
        QueryNode::And(children) => {
            json!({"$and": children.iter().map(compile).collect::<Vec<_>>()})
        }
        QueryNode::Or(children) => {
            json!({"$or": children.iter().map(compile).collect::<Vec<_>>()})
        }
    }
}

/// The wire operator for a comparison, with its `$` prefix.
fn operator(op: CompareOp) -> String {
    format!("${}", op.as_str())
}

/// An anchored substring pattern, case-insensitive.
fn contains_regex(text: &str) -> Value {
    json!({"$regex": format!("^.*{}.*$", regex::escape(text)), "$options": "i"})
}

/// An anchored whole-string pattern, case-insensitive.
fn equals_regex(text: &str) -> Value {
    json!({"$regex": format!("^{}$", regex::escape(text)), "$options": "i"})
}

/// The filter value for a string pattern.
fn pattern_value(pattern: &StringPattern) -> Value {
    match pattern {
        StringPattern::Contains(text) => contains_regex(text),
        StringPattern::Equals(text) => equals_regex(text),
        StringPattern::NotContains(text) => json!({"$not": equals_regex(text)}),
    }
}

/// A number as a wire value, preserving the int/float distinction.
fn number_value(number: Number) -> Value {
    match number {
        Number::Int(i) => json!(i),
        Number::Float(f) => json!(f),
    }
}

/// The `$elemMatch` filter for one per-variant result body.
///
/// Value constraints merge per slot, so a bounded window compiles to one
/// object with both operators, e.g. `{"value.0": {"$gt": 5, "$lt": 10}}`.
fn element_match(body: &ResultPredicate) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(body.variant.as_str()));
    for (field, pattern) in &body.fields {
        obj.insert(field.as_str().to_string(), pattern_value(pattern));
    }
    for ValueConstraint { slot, op, value } in &body.values {
        let entry = obj
            .entry(slot.as_str().to_string())
            .or_insert_with(|| json!({}));
        if let Some(ops) = entry.as_object_mut() {
            ops.insert(operator(*op), number_value(*value));
        }
    }
    json!({"measurement.results": {"$elemMatch": Value::Object(obj)}})
}
