//! Filter evaluation for `find`, plus the plain equality match used by
//! `update` and `delete`.
//!
//! A filter is a JSON object. Each top-level key is a field condition,
//! either a literal (`{"age": 20}`) or an operator object
//! (`{"age": {"$gte": 18, "$lt": 65}}`). `$or` holds alternative groups,
//! `$and` holds extra groups that must all match.

use crate::types::Content;
use serde_json::Value;
use std::cmp::Ordering;

const OR: &str = "$or";
const AND: &str = "$and";

pub trait Queryable {
    fn matches(&self, content: &Content) -> bool;
}

impl<F> Queryable for F
where
    F: Fn(&Content) -> bool,
{
    fn matches(&self, content: &Content) -> bool {
        self(content)
    }
}

/// A where-clause borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct Filter<'a> {
    clauses: &'a Content,
}

impl<'a> Filter<'a> {
    pub fn new(clauses: &'a Content) -> Self {
        Self { clauses }
    }
}

impl Queryable for Filter<'_> {
    fn matches(&self, content: &Content) -> bool {
        matches(content, self.clauses)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
    In,
    Nin,
    Exists,
}

impl Operator {
    pub fn parse(name: &str) -> Option<Operator> {
        match name {
            "$gt" => Some(Operator::Gt),
            "$gte" => Some(Operator::Gte),
            "$lt" => Some(Operator::Lt),
            "$lte" => Some(Operator::Lte),
            "$ne" => Some(Operator::Ne),
            "$in" => Some(Operator::In),
            "$nin" => Some(Operator::Nin),
            "$exists" => Some(Operator::Exists),
            _ => None,
        }
    }

    /// `field` is `None` when the document has no such key.
    pub fn evaluate(&self, field: Option<&Value>, arg: &Value) -> bool {
        match self {
            Operator::Gt => ordering(field, arg) == Some(Ordering::Greater),
            Operator::Gte => matches!(
                ordering(field, arg),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt => ordering(field, arg) == Some(Ordering::Less),
            Operator::Lte => matches!(
                ordering(field, arg),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Ne => !field.is_some_and(|f| strict_eq(f, arg)),
            Operator::In => arg
                .as_array()
                .is_some_and(|list| field.is_some_and(|f| contains(list, f))),
            Operator::Nin => arg
                .as_array()
                .is_some_and(|list| !field.is_some_and(|f| contains(list, f))),
            Operator::Exists => is_truthy(arg) == field.is_some(),
        }
    }
}

/// Full filter semantics: the implicit group of plain keys, then `$or`,
/// then `$and`.
pub fn matches(content: &Content, filter: &Content) -> bool {
    let implicit = filter
        .iter()
        .filter(|(key, _)| key.as_str() != OR && key.as_str() != AND)
        .all(|(key, condition)| condition_matches(content.get(key), condition));
    if !implicit {
        return false;
    }

    if let Some(alternatives) = filter.get(OR) {
        let Some(groups) = groups(OR, alternatives) else {
            return false;
        };
        if !groups.iter().any(|group| group_matches(content, group)) {
            return false;
        }
    }

    if let Some(required) = filter.get(AND) {
        let Some(groups) = groups(AND, required) else {
            return false;
        };
        if !groups.iter().all(|group| group_matches(content, group)) {
            return false;
        }
    }

    true
}

/// Top-level strict equality on every key of `filter`. No operators.
pub fn matches_exact(content: &Content, filter: &Content) -> bool {
    filter
        .iter()
        .all(|(key, expected)| content.get(key).is_some_and(|v| strict_eq(v, expected)))
}

fn groups<'a>(name: &str, value: &'a Value) -> Option<&'a Vec<Value>> {
    let groups = value.as_array();
    if groups.is_none() {
        log::warn!("{} expects an array of condition groups, got {}", name, value);
    }
    groups
}

fn group_matches(content: &Content, group: &Value) -> bool {
    match group.as_object() {
        Some(group) => group
            .iter()
            .all(|(key, condition)| condition_matches(content.get(key), condition)),
        None => {
            log::warn!("condition group must be an object, got {}", group);
            false
        }
    }
}

fn condition_matches(field: Option<&Value>, condition: &Value) -> bool {
    match operator_expr(condition) {
        Some(ops) => ops.iter().all(|(name, arg)| match Operator::parse(name) {
            Some(op) => op.evaluate(field, arg),
            None => {
                log::warn!("unsupported query operator {}", name);
                false
            }
        }),
        None => field.is_some_and(|f| strict_eq(f, condition)),
    }
}

/// An object whose keys all start with `$`. `{}` has no operators and so
/// accepts any field, present or not.
fn operator_expr(condition: &Value) -> Option<&Content> {
    condition
        .as_object()
        .filter(|ops| ops.keys().all(|k| k.starts_with('$')))
}

/// Equality without coercion between types. Numbers compare by value, so
/// `1` equals `1.0`.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_numbers(a, b) == Some(Ordering::Equal),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| strict_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| strict_eq(x, y)))
        }
        _ => a == b,
    }
}

fn contains(list: &[Value], value: &Value) -> bool {
    list.iter().any(|item| strict_eq(item, value))
}

fn ordering(field: Option<&Value>, arg: &Value) -> Option<Ordering> {
    match (field?, arg) {
        (a @ Value::Number(_), b @ Value::Number(_)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
