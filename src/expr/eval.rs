use regex::Regex;
use serde_json::{Map, Value as Json};

use super::ast::{AttrScope, BinOp, Expr, Value};

/// Attribute bindings for one evaluation: the catalog entry's own
/// fields (local) and the request's fields (target).
pub struct Scope<'a> {
    local: &'a Map<String, Json>,
    target: &'a Map<String, Json>,
}

impl<'a> Scope<'a> {
    pub fn new(local: &'a Map<String, Json>, target: &'a Map<String, Json>) -> Self {
        Self { local, target }
    }

    /// Attribute names are matched case-insensitively; registry records
    /// arrive with inconsistent key casing.
    fn lookup(&self, scope: AttrScope, name: &str) -> Value {
        let found = match scope {
            AttrScope::My => find(self.local, name),
            AttrScope::Target => find(self.target, name),
            AttrScope::Default => find(self.local, name).or_else(|| find(self.target, name)),
        };
        found.map(lift).unwrap_or(Value::Undefined)
    }
}

fn find<'m>(map: &'m Map<String, Json>, name: &str) -> Option<&'m Json> {
    map.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Lift a JSON field into an expression value. Lists and nested
/// records are not usable as operands and lift to `Undefined`.
fn lift(value: &Json) -> Value {
    match value {
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => n.as_i64().map(Value::Int).unwrap_or(Value::Undefined),
        Json::String(s) => Value::Str(s.clone()),
        Json::Null | Json::Array(_) | Json::Object(_) => Value::Undefined,
    }
}

impl Expr {
    /// Evaluate under `scope`. Total: every failure mode (missing
    /// attribute, type mismatch, bad regex) folds into
    /// `Value::Undefined` rather than an error.
    pub fn eval(&self, scope: &Scope) -> Value {
        match self {
            Expr::Literal(v) => v.clone(),
            Expr::Attr { scope: s, name } => scope.lookup(*s, name),
            Expr::Not(inner) => match inner.eval(scope).truth() {
                Some(b) => Value::Bool(!b),
                None => Value::Undefined,
            },
            Expr::Binary { op, left, right } => eval_binary(*op, left, right, scope),
        }
    }
}

fn eval_binary(op: BinOp, left: &Expr, right: &Expr, scope: &Scope) -> Value {
    match op {
        // False dominates &&, true dominates ||; undefined only
        // survives when the other side cannot decide.
        BinOp::And => {
            let l = left.eval(scope).truth();
            if l == Some(false) {
                return Value::Bool(false);
            }
            let r = right.eval(scope).truth();
            match (l, r) {
                (_, Some(false)) => Value::Bool(false),
                (Some(true), Some(true)) => Value::Bool(true),
                _ => Value::Undefined,
            }
        }
        BinOp::Or => {
            let l = left.eval(scope).truth();
            if l == Some(true) {
                return Value::Bool(true);
            }
            let r = right.eval(scope).truth();
            match (l, r) {
                (_, Some(true)) => Value::Bool(true),
                (Some(false), Some(false)) => Value::Bool(false),
                _ => Value::Undefined,
            }
        }
        _ => compare(op, left.eval(scope), right.eval(scope)),
    }
}

/// Relational operators over same-typed operands; anything else is
/// undefined. String comparison is case-sensitive.
fn compare(op: BinOp, left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => match op {
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            BinOp::Lt => Value::Bool(a < b),
            BinOp::Le => Value::Bool(a <= b),
            BinOp::Gt => Value::Bool(a > b),
            BinOp::Ge => Value::Bool(a >= b),
            _ => Value::Undefined,
        },
        (Value::Str(a), Value::Str(b)) => match op {
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            BinOp::Lt => Value::Bool(a < b),
            BinOp::Le => Value::Bool(a <= b),
            BinOp::Gt => Value::Bool(a > b),
            BinOp::Ge => Value::Bool(a >= b),
            BinOp::Match => regex_match(&a, &b),
            BinOp::NotMatch => match regex_match(&a, &b) {
                Value::Bool(matched) => Value::Bool(!matched),
                other => other,
            },
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            _ => Value::Undefined,
        },
        _ => Value::Undefined,
    }
}

/// An invalid pattern is indeterminate, not an error.
fn regex_match(subject: &str, pattern: &str) -> Value {
    match Regex::new(pattern) {
        Ok(re) => Value::Bool(re.is_match(subject)),
        Err(_) => Value::Undefined,
    }
}
