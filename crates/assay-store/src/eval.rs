//! In-memory evaluation of wire filter documents.
//!
//! Implements the slice of the filter language that [`compile`] emits:
//! `$and`, `$or`, `$text`, `$regex`/`$options`, `$not`, `$elemMatch`, and
//! the `$eq`/`$lt`/`$lte`/`$gt`/`$gte` comparisons. Path resolution follows
//! document-database semantics: a dotted path descends through objects,
//! numeric segments index into arrays, and a non-numeric segment over an
//! array fans out across its elements, any of which may satisfy the
//! condition.
//!
//! [`compile`]: crate::compile::compile

use serde_json::{Map, Value};

/// Whether a document satisfies a filter. An empty filter matches
/// everything.
pub fn matches(filter: &Value, doc: &Value) -> bool {
    let Some(conditions) = filter.as_object() else {
        return false;
    };
    conditions.iter().all(|(key, condition)| match key.as_str() {
        "$and" => condition
            .as_array()
            .is_some_and(|children| children.iter().all(|child| matches(child, doc))),
        "$or" => condition
            .as_array()
            .is_some_and(|children| children.iter().any(|child| matches(child, doc))),
        "$text" => text_matches(condition, doc),
        _ => field_matches(doc, key, condition),
    })
}

/// Full-text search: any search token appearing in any string value of the
/// document, case-insensitively.
fn text_matches(condition: &Value, doc: &Value) -> bool {
    let Some(search) = condition.get("$search").and_then(Value::as_str) else {
        return false;
    };
    let mut corpus = Vec::new();
    collect_strings(doc, &mut corpus);
    search
        .split_whitespace()
        .any(|token| token_in_corpus(token, &corpus))
}

/// Whether a token appears in any corpus string, case-insensitively.
fn token_in_corpus(token: &str, corpus: &[String]) -> bool {
    let token = token.to_lowercase();
    corpus.iter().any(|text| text.contains(&token))
}

/// Gathers every string value in a document, lowercased.
fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => out.push(text.to_lowercase()),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}

/// Whether the value(s) at a dotted path satisfy a condition.
fn field_matches(doc: &Value, path: &str, condition: &Value) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let mut candidates = Vec::new();
    resolve(doc, &segments, &mut candidates);

    match condition {
        Value::Object(ops) if ops.keys().any(|key| key.starts_with('$')) => {
            // A negated condition holds when no value matches it, which
            // includes the path being absent altogether.
            if let Some(inner) = ops.get("$not") {
                return !candidates
                    .iter()
                    .any(|value| value_condition_holds(inner, value));
            }
            candidates
                .iter()
                .any(|value| operators_hold(ops, value))
        }
        scalar => candidates.iter().any(|value| values_equal(value, scalar)),
    }
}

/// Resolves a dotted path, fanning out over arrays.
fn resolve<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        // At the leaf an array stands for any of its elements.
        if let Value::Array(items) = value {
            out.extend(items.iter());
        }
        out.push(value);
        return;
    };
    match value {
        Value::Object(map) => {
            if let Some(next) = map.get(*head) {
                resolve(next, rest, out);
            }
        }
        Value::Array(items) => {
            if let Ok(index) = head.parse::<usize>() {
                if let Some(next) = items.get(index) {
                    resolve(next, rest, out);
                }
            } else {
                for item in items {
                    resolve(item, segments, out);
                }
            }
        }
        _ => {}
    }
}

/// Whether a single value satisfies a (possibly bare) condition.
fn value_condition_holds(condition: &Value, value: &Value) -> bool {
    match condition {
        Value::Object(ops) if ops.keys().any(|key| key.starts_with('$')) => {
            operators_hold(ops, value)
        }
        scalar => values_equal(value, scalar),
    }
}

/// Whether a value satisfies every operator in a condition object.
fn operators_hold(ops: &Map<String, Value>, value: &Value) -> bool {
    ops.iter().all(|(op, target)| match op.as_str() {
        "$regex" => regex_holds(target, ops.get("$options"), value),
        // Consumed together with its $regex sibling.
        "$options" => true,
        "$eq" => values_equal(value, target),
        "$lt" | "$lte" | "$gt" | "$gte" => {
            ordering_holds(op, value, target)
        }
        "$elemMatch" => elem_match_holds(target, value),
        "$not" => !value_condition_holds(target, value),
        _ => false,
    })
}

/// Whether a value matches a `$regex` pattern.
fn regex_holds(pattern: &Value, options: Option<&Value>, value: &Value) -> bool {
    let (Some(pattern), Some(text)) = (pattern.as_str(), value.as_str()) else {
        return false;
    };
    let insensitive = options
        .and_then(Value::as_str)
        .is_some_and(|flags| flags.contains('i'));
    let pattern = if insensitive {
        format!("(?i){pattern}")
    } else {
        pattern.to_string()
    };
    regex::Regex::new(&pattern).is_ok_and(|re| re.is_match(text))
}

/// Whether an ordering operator holds. Numbers compare numerically,
/// strings lexicographically (which is correct for ISO dates).
fn ordering_holds(op: &str, value: &Value, target: &Value) -> bool {
    let ordering = match (value, target) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        "$lt" => ordering.is_lt(),
        "$lte" => ordering.is_le(),
        "$gt" => ordering.is_gt(),
        "$gte" => ordering.is_ge(),
        _ => false,
    }
}

/// Whether any element of an array satisfies all of an `$elemMatch` body's
/// conditions.
fn elem_match_holds(body: &Value, value: &Value) -> bool {
    let (Some(conditions), Some(items)) = (body.as_object(), value.as_array()) else {
        return false;
    };
    items.iter().any(|item| {
        conditions
            .iter()
            .all(|(path, condition)| field_matches(item, path, condition))
    })
}

/// Equality with numeric coercion, so `5` and `5.0` compare equal.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => a == b,
    }
}
