//! JSON validation/coercion engine.
//!
//! Every schema in this crate is decoded through this module: a [`Ctx`]
//! carries a borrowed [`serde_json::Value`] together with the path walked so
//! far, and [`Obj`] layers the per-field presence policies on top of it
//! (required, required-nullable, optional, optional-nullable, default on
//! absence, catch-and-fallback). Failures produce a [`ValidationError`]
//! naming the offending path and the expected vs actual shape.
//!
//! The engine is pure and synchronous. It never mutates its input, performs
//! no I/O, and holds no state between calls, so concurrent use needs no
//! coordination.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Issue, ValidationError};

/// Result of decoding one value or field.
pub type DecodeResult<T> = std::result::Result<T, ValidationError>;

/// Types that decode themselves from a JSON value.
pub trait FromJson: Sized {
    /// Decode from the value at `ctx`, reporting failures against its path.
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self>;
}

/// Decode a complete document rooted at `value`.
pub fn parse<T: FromJson>(value: &Value) -> DecodeResult<T> {
    T::from_json(&Ctx::root(value))
}

/// Decode a document whose error paths should start at `root` instead of
/// being anchored at the document root (useful when the value was extracted
/// from a larger envelope, e.g. `results`).
pub fn parse_at<T: FromJson>(value: &Value, root: &str) -> DecodeResult<T> {
    T::from_json(&Ctx::named(value, root))
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        ctx.array(|c| T::from_json(c))
    }
}

/// Decode a member of a closed set of unit variants, naming the whole set
/// on failure.
pub(crate) fn decode_closed_set<T: Copy>(
    ctx: &Ctx<'_>,
    all: &[T],
    as_str: impl Fn(&T) -> &'static str,
) -> DecodeResult<T> {
    let expected = || {
        let quoted: Vec<String> = all.iter().map(|v| format!("{:?}", as_str(v))).collect();
        format!("one of {}", quoted.join(", "))
    };
    let s = ctx.str().map_err(|_| ctx.error(expected()))?;
    all.iter()
        .copied()
        .find(|v| as_str(v) == s)
        .ok_or_else(|| ctx.error(expected()))
}

// =============================================================================
// VALUE DESCRIPTION
// =============================================================================

const STRING_PREVIEW_CHARS: usize = 40;

/// Human-readable description of what a JSON value actually is, used as the
/// "found" half of an issue.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => {
            if s.chars().count() > STRING_PREVIEW_CHARS {
                let preview: String = s.chars().take(STRING_PREVIEW_CHARS).collect();
                format!("string {:?}...", preview)
            } else {
                format!("string {:?}", s)
            }
        }
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

fn join_field(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn join_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

// =============================================================================
// DECODE CONTEXT
// =============================================================================

/// One JSON value plus the path that reached it.
#[derive(Debug, Clone)]
pub struct Ctx<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Ctx<'a> {
    /// Context for a document root (empty path).
    pub fn root(value: &'a Value) -> Self {
        Ctx {
            value,
            path: String::new(),
        }
    }

    /// Context with an explicit starting path.
    pub fn named(value: &'a Value, path: impl Into<String>) -> Self {
        Ctx {
            value,
            path: path.into(),
        }
    }

    /// The underlying value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// The path that reached this value. Empty at the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Failure at this path: `expected` vs what the value actually is.
    pub fn error(&self, expected: impl Into<String>) -> ValidationError {
        ValidationError::new(self.path.clone(), expected, describe(self.value))
    }

    /// Context for an element of this value, extending the path with `[index]`.
    pub fn element(&self, value: &'a Value, index: usize) -> Ctx<'a> {
        Ctx {
            value,
            path: join_index(&self.path, index),
        }
    }

    // ─── Primitive extractors ──────────────────────────────────────────────

    /// Borrowed string.
    pub fn str(&self) -> DecodeResult<&'a str> {
        match self.value {
            Value::String(s) => Ok(s.as_str()),
            _ => Err(self.error("a string")),
        }
    }

    /// Owned string.
    pub fn string(&self) -> DecodeResult<String> {
        self.str().map(str::to_string)
    }

    /// Owned, non-empty string.
    pub fn non_empty_string(&self) -> DecodeResult<String> {
        let s = self.str()?;
        if s.is_empty() {
            return Err(self.error("a non-empty string"));
        }
        Ok(s.to_string())
    }

    /// String in canonical UUID format. The original spelling is preserved;
    /// only the format is checked.
    pub fn uuid_string(&self) -> DecodeResult<String> {
        let s = self.str().map_err(|_| self.error("a UUID string"))?;
        if Uuid::parse_str(s).is_err() {
            return Err(self.error("a UUID string"));
        }
        Ok(s.to_string())
    }

    /// Boolean.
    pub fn boolean(&self) -> DecodeResult<bool> {
        match self.value {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.error("a boolean")),
        }
    }

    /// Any JSON number, as `f64`.
    pub fn number(&self) -> DecodeResult<f64> {
        match self.value {
            Value::Number(n) => n.as_f64().ok_or_else(|| self.error("a number")),
            _ => Err(self.error("a number")),
        }
    }

    /// Any JSON number, preserving its exact representation (an integer wire
    /// value stays an integer when re-serialized).
    pub fn number_raw(&self) -> DecodeResult<serde_json::Number> {
        match self.value {
            Value::Number(n) => Ok(n.clone()),
            _ => Err(self.error("a number")),
        }
    }

    fn number_raw_checked(
        &self,
        expected: &str,
        ok: impl FnOnce(f64) -> bool,
    ) -> DecodeResult<serde_json::Number> {
        let n = self.number_raw().map_err(|_| self.error(expected))?;
        if !n.as_f64().map(ok).unwrap_or(false) {
            return Err(self.error(expected));
        }
        Ok(n)
    }

    /// Number ≥ 0, representation preserved.
    pub fn number_raw_nonnegative(&self) -> DecodeResult<serde_json::Number> {
        self.number_raw_checked("a non-negative number", |v| v >= 0.0)
    }

    /// Number > 0, representation preserved.
    pub fn number_raw_positive(&self) -> DecodeResult<serde_json::Number> {
        self.number_raw_checked("a positive number", |v| v > 0.0)
    }

    /// Number ≥ `min`, representation preserved.
    pub fn number_raw_min(&self, min: f64) -> DecodeResult<serde_json::Number> {
        self.number_raw_checked(&format!("a number of at least {}", min), |v| v >= min)
    }

    /// Number within `[min, max]`, representation preserved.
    pub fn number_raw_in_range(
        &self,
        min: f64,
        max: f64,
    ) -> DecodeResult<serde_json::Number> {
        self.number_raw_checked(&format!("a number between {} and {}", min, max), |v| {
            v >= min && v <= max
        })
    }

    /// Integer (a JSON number without a fractional part).
    pub fn integer(&self) -> DecodeResult<i64> {
        match self.value {
            Value::Number(n) => n.as_i64().ok_or_else(|| self.error("an integer")),
            _ => Err(self.error("an integer")),
        }
    }

    /// Integer ≥ 0, narrowed to `u32` (counts, indexes, priorities).
    pub fn integer_nonnegative(&self) -> DecodeResult<u32> {
        let expected = "a non-negative integer";
        match self.value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| self.error(expected)),
            _ => Err(self.error(expected)),
        }
    }

    /// Integer > 0, narrowed to `u32` (years).
    pub fn integer_positive(&self) -> DecodeResult<u32> {
        let v = self
            .integer_nonnegative()
            .map_err(|_| self.error("a positive integer"))?;
        if v == 0 {
            return Err(self.error("a positive integer"));
        }
        Ok(v)
    }

    /// Integer within `[min, max]`.
    pub fn integer_in_range(&self, min: i64, max: i64) -> DecodeResult<i64> {
        let expected = format!("an integer between {} and {}", min, max);
        let n = self.integer().map_err(|_| self.error(expected.clone()))?;
        if n < min || n > max {
            return Err(self.error(expected));
        }
        Ok(n)
    }

    /// Membership in a closed set of string literals. Returns the matched
    /// literal borrowed from the input.
    pub fn literal(&self, allowed: &[&str]) -> DecodeResult<&'a str> {
        let describe_set = || {
            let quoted: Vec<String> = allowed.iter().map(|a| format!("{:?}", a)).collect();
            format!("one of {}", quoted.join(", "))
        };
        let s = self.str().map_err(|_| self.error(describe_set()))?;
        if !allowed.contains(&s) {
            return Err(self.error(describe_set()));
        }
        Ok(s)
    }

    // ─── Structural extractors ─────────────────────────────────────────────

    /// Whether this value is JSON `null`.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Object wrapper for field access.
    pub fn object(&self) -> DecodeResult<Obj<'a>> {
        match self.value {
            Value::Object(map) => Ok(Obj {
                map,
                path: self.path.clone(),
            }),
            _ => Err(self.error("an object")),
        }
    }

    /// `null` becomes `None`; anything else goes through `f`.
    pub fn nullable<T>(
        &self,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        if self.is_null() {
            Ok(None)
        } else {
            f(self).map(Some)
        }
    }

    /// Decode every element of an array through `f`, extending the path with
    /// the element index. All elements are visited even after a failure, so
    /// the resulting error names every bad index, not just the first.
    pub fn array<T>(
        &self,
        mut f: impl FnMut(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let items = match self.value {
            Value::Array(items) => items,
            _ => return Err(self.error("an array")),
        };
        let mut out = Vec::with_capacity(items.len());
        let mut issues: Vec<Issue> = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match f(&self.element(item, index)) {
                Ok(v) => out.push(v),
                Err(e) => issues.extend(e.issues),
            }
        }
        if issues.is_empty() {
            Ok(out)
        } else {
            Err(ValidationError::from_issues(issues))
        }
    }

    /// Like [`Ctx::array`], but an empty array is itself a failure.
    pub fn non_empty_array<T>(
        &self,
        f: impl FnMut(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let out = self.array(f)?;
        if out.is_empty() {
            return Err(self.error("a non-empty array"));
        }
        Ok(out)
    }

    /// Array of plain strings.
    pub fn strings(&self) -> DecodeResult<Vec<String>> {
        self.array(|c| c.string())
    }
}

// =============================================================================
// OBJECT FIELD POLICIES
// =============================================================================

/// An object value plus the path that reached it, exposing the per-field
/// presence policies.
///
/// The three policy families map onto the remote contract as follows:
/// - required / required-nullable: absence fails the document;
/// - optional / optional-nullable / optional-with-default: absence is fine;
/// - catch-and-fallback ([`Obj::catch`], [`Obj::catch_opt`]): a malformed or
///   absent value is replaced by a default and never fails the document.
#[derive(Debug, Clone)]
pub struct Obj<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Obj<'a> {
    /// The path of the object itself.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Context for `key` if the field is present (possibly `null`).
    pub fn get(&self, key: &str) -> Option<Ctx<'a>> {
        self.map.get(key).map(|value| Ctx {
            value,
            path: join_field(&self.path, key),
        })
    }

    /// Context for `key`; absence is a failure at the field's path.
    pub fn required(&self, key: &str) -> DecodeResult<Ctx<'a>> {
        self.get(key).ok_or_else(|| {
            ValidationError::new(
                join_field(&self.path, key),
                "a required value",
                "nothing",
            )
        })
    }

    /// Required field decoded through `f`.
    pub fn req<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        f(&self.required(key)?)
    }

    /// Required field that may be `null` (but not absent).
    pub fn req_nullable<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        self.required(key)?.nullable(f)
    }

    /// Optional field: absent is `None`, present (including `null`) decodes
    /// through `f`.
    pub fn opt<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        match self.get(key) {
            Some(ctx) => f(&ctx).map(Some),
            None => Ok(None),
        }
    }

    /// Optional field that may also be `null`; both absence and `null`
    /// decode to `None`.
    pub fn opt_nullable<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        match self.get(key) {
            Some(ctx) => ctx.nullable(f),
            None => Ok(None),
        }
    }

    /// Optional field with a default on absence. A present but malformed
    /// value still fails.
    pub fn opt_or<T>(
        &self,
        key: &str,
        default: T,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        match self.get(key) {
            Some(ctx) => f(&ctx),
            None => Ok(default),
        }
    }

    /// Catch-and-fallback: absent or malformed becomes `default`, and the
    /// failure never propagates. Sibling fields are unaffected either way.
    pub fn catch<T>(
        &self,
        key: &str,
        default: T,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> T {
        match self.get(key) {
            Some(ctx) => f(&ctx).unwrap_or(default),
            None => default,
        }
    }

    /// Catch-to-absent: absent stays `None`, malformed collapses to `None`
    /// instead of failing.
    pub fn catch_opt<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Ctx<'a>) -> DecodeResult<T>,
    ) -> Option<T> {
        self.get(key).and_then(|ctx| f(&ctx).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj_at<'a>(value: &'a Value) -> Obj<'a> {
        Ctx::root(value).object().unwrap()
    }

    #[test]
    fn test_paths_compose_through_fields_and_indexes() {
        let doc = json!({"icon": {"sizes": [10, "wide"]}});
        let icon = obj_at(&doc).req("icon", |c| c.object()).unwrap();
        let err = icon
            .req("sizes", |c| c.array(|e| e.number()))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["icon.sizes[1]"]);
        assert_eq!(err.issues[0].expected, "a number");
        assert_eq!(err.issues[0].found, "string \"wide\"");
    }

    #[test]
    fn test_required_vs_optional_absence() {
        let doc = json!({});
        let obj = obj_at(&doc);

        let err = obj.req("name", |c| c.string()).unwrap_err();
        assert_eq!(err.issues[0].path, "name");
        assert_eq!(err.issues[0].found, "nothing");

        assert_eq!(obj.opt("name", |c| c.string()).unwrap(), None);
    }

    #[test]
    fn test_nullable_accepts_null_but_not_absence() {
        let present_null = json!({"title": null});
        let absent = json!({});

        let got = obj_at(&present_null)
            .req_nullable("title", |c| c.string())
            .unwrap();
        assert_eq!(got, None);

        assert!(obj_at(&absent)
            .req_nullable("title", |c| c.string())
            .is_err());
    }

    #[test]
    fn test_opt_rejects_null_when_not_nullable() {
        let doc = json!({"childCount": null});
        let err = obj_at(&doc)
            .opt("childCount", |c| c.integer_nonnegative())
            .unwrap_err();
        assert_eq!(err.issues[0].path, "childCount");
        assert_eq!(err.issues[0].found, "null");
    }

    #[test]
    fn test_opt_nullable_collapses_null_and_absence() {
        let with_null = json!({"summary": null});
        let without = json!({});
        assert_eq!(
            obj_at(&with_null)
                .opt_nullable("summary", |c| c.string())
                .unwrap(),
            None
        );
        assert_eq!(
            obj_at(&without)
                .opt_nullable("summary", |c| c.string())
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_catch_substitutes_on_malformed_and_absent() {
        let malformed = json!({"width": "wide"});
        let absent = json!({});
        let valid = json!({"width": 7});
        let zero = serde_json::Number::from(0);

        assert_eq!(
            obj_at(&malformed).catch("width", zero.clone(), |c| c.number_raw_nonnegative()),
            zero
        );
        assert_eq!(
            obj_at(&absent).catch("width", zero.clone(), |c| c.number_raw_nonnegative()),
            zero
        );
        assert_eq!(
            obj_at(&valid).catch("width", zero, |c| c.number_raw_nonnegative()),
            serde_json::Number::from(7)
        );
    }

    #[test]
    fn test_catch_opt_collapses_malformed_to_none() {
        let malformed = json!({"leadingEdge": "yes"});
        let absent = json!({});
        let valid = json!({"leadingEdge": false});

        assert_eq!(
            obj_at(&malformed).catch_opt("leadingEdge", |c| c.boolean()),
            None
        );
        assert_eq!(obj_at(&absent).catch_opt("leadingEdge", |c| c.boolean()), None);
        assert_eq!(
            obj_at(&valid).catch_opt("leadingEdge", |c| c.boolean()),
            Some(false)
        );
    }

    #[test]
    fn test_opt_or_defaults_only_on_absence() {
        let absent = json!({});
        let malformed = json!({"position": 9});

        let got = obj_at(&absent)
            .opt_or("position", "bottom-right".to_string(), |c| c.string())
            .unwrap();
        assert_eq!(got, "bottom-right");

        assert!(obj_at(&malformed)
            .opt_or("position", "bottom-right".to_string(), |c| c.string())
            .is_err());
    }

    #[test]
    fn test_literal_membership() {
        let doc = json!("contains");
        let ctx = Ctx::root(&doc);
        assert_eq!(ctx.literal(&["=", "contains"]).unwrap(), "contains");

        let bad = json!("descends");
        let err = Ctx::root(&bad).literal(&["=", "contains"]).unwrap_err();
        assert_eq!(err.issues[0].expected, "one of \"=\", \"contains\"");
    }

    #[test]
    fn test_uuid_string_checks_format_only() {
        let ok = json!("DD09DF9A-37FB-4EF5-88DC-D8C3D0325BE2");
        let got = Ctx::root(&ok).uuid_string().unwrap();
        // Original spelling kept, not canonicalized to lowercase.
        assert_eq!(got, "DD09DF9A-37FB-4EF5-88DC-D8C3D0325BE2");

        let bad = json!("not-a-uuid");
        assert!(Ctx::root(&bad).uuid_string().is_err());
    }

    #[test]
    fn test_integer_rejects_fractional_numbers() {
        let doc = json!(3.5);
        assert!(Ctx::root(&doc).integer().is_err());
        assert_eq!(Ctx::root(&json!(3)).integer().unwrap(), 3);
    }

    #[test]
    fn test_integer_bounds() {
        assert!(Ctx::root(&json!(-1)).integer_nonnegative().is_err());
        assert_eq!(Ctx::root(&json!(0)).integer_nonnegative().unwrap(), 0);
        assert!(Ctx::root(&json!(0)).integer_positive().is_err());
        assert_eq!(Ctx::root(&json!(1987)).integer_positive().unwrap(), 1987);
        assert!(Ctx::root(&json!(101)).integer_in_range(0, 100).is_err());
    }

    #[test]
    fn test_number_bounds() {
        assert!(Ctx::root(&json!(-0.5)).number_raw_nonnegative().is_err());
        assert!(Ctx::root(&json!(0)).number_raw_positive().is_err());
        assert_eq!(
            Ctx::root(&json!(0.5)).number_raw_positive().unwrap().as_f64(),
            Some(0.5)
        );
        assert!(Ctx::root(&json!(0.5)).number_raw_min(1.0).is_err());

        // An integer wire value survives the bounds check as an integer.
        let kept = Ctx::root(&json!(100)).number_raw_in_range(0.0, 100.0).unwrap();
        assert_eq!(kept.to_string(), "100");
        assert!(Ctx::root(&json!(100.5)).number_raw_in_range(0.0, 100.0).is_err());
    }

    #[test]
    fn test_array_reports_every_failing_index() {
        let doc = json!(["ok", 1, "fine", false]);
        let err = Ctx::root(&doc).array(|c| c.string()).unwrap_err();
        assert_eq!(err.paths(), vec!["[1]", "[3]"]);
    }

    #[test]
    fn test_non_empty_array() {
        let doc = json!([]);
        let err = Ctx::root(&doc).non_empty_array(|c| c.string()).unwrap_err();
        assert_eq!(err.issues[0].expected, "a non-empty array");
    }

    #[test]
    fn test_describe_truncates_long_strings() {
        let long = "x".repeat(80);
        let described = describe(&json!(long));
        assert!(described.ends_with("..."));
        assert!(described.len() < 60);
    }

    #[test]
    fn test_parse_at_prefixes_paths() {
        #[derive(Debug)]
        struct Named;
        impl FromJson for Named {
            fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
                ctx.object()?.req("name", |c| c.string())?;
                Ok(Named)
            }
        }

        let err = parse_at::<Named>(&json!({}), "results[0]").unwrap_err();
        assert_eq!(err.issues[0].path, "results[0].name");
    }
}
