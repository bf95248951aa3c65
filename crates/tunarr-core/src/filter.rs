//! Search filter expressions: typed field predicates and the recursive
//! boolean tree combining them.
//!
//! The tree is never evaluated locally. It is validated on the way in,
//! held as typed values, and re-emitted verbatim into the outbound search
//! request body, so the value representation must survive a round trip
//! exactly (an integer stays an integer, operator literals keep their
//! wire spelling).

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Number, Value};

use crate::decode::{decode_closed_set, Ctx, DecodeResult, FromJson};

// =============================================================================
// OPERATORS
// =============================================================================

/// Operators accepted by string and faceted-string predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Eq,
    Ne,
    Contains,
    StartsWith,
    In,
    NotIn,
}

impl StringOp {
    /// Every string operator, in wire order.
    pub const ALL: [StringOp; 6] = [
        StringOp::Eq,
        StringOp::Ne,
        StringOp::Contains,
        StringOp::StartsWith,
        StringOp::In,
        StringOp::NotIn,
    ];

    /// The wire literal. Two of these contain a space; that is the remote
    /// service's spelling, not a typo.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringOp::Eq => "=",
            StringOp::Ne => "!=",
            StringOp::Contains => "contains",
            StringOp::StartsWith => "starts with",
            StringOp::In => "in",
            StringOp::NotIn => "not in",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<StringOp> {
        decode_closed_set(ctx, &Self::ALL, |op| op.as_str())
    }
}

/// Operators accepted by numeric and date predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    To,
}

impl NumericOp {
    /// Every numeric/date operator, in wire order.
    pub const ALL: [NumericOp; 7] = [
        NumericOp::Eq,
        NumericOp::Ne,
        NumericOp::Lt,
        NumericOp::Gt,
        NumericOp::Le,
        NumericOp::Ge,
        NumericOp::To,
    ];

    /// The wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOp::Eq => "=",
            NumericOp::Ne => "!=",
            NumericOp::Lt => "<",
            NumericOp::Gt => ">",
            NumericOp::Le => "<=",
            NumericOp::Ge => ">=",
            NumericOp::To => "to",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<NumericOp> {
        decode_closed_set(ctx, &Self::ALL, |op| op.as_str())
    }
}

/// Boolean combinator of an internal filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<Combinator> {
        decode_closed_set(ctx, &[Combinator::And, Combinator::Or], |c| c.as_str())
    }
}

impl JsonSchema for StringOp {
    fn schema_name() -> String {
        "StringFilterOp".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        string_enum_schema(&StringOp::ALL.map(|op| op.as_str()))
    }
}

impl JsonSchema for NumericOp {
    fn schema_name() -> String {
        "NumericFilterOp".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        string_enum_schema(&NumericOp::ALL.map(|op| op.as_str()))
    }
}

impl JsonSchema for Combinator {
    fn schema_name() -> String {
        "FilterCombinator".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        string_enum_schema(&["and", "or"])
    }
}

pub(crate) fn string_enum_schema(values: &[&str]) -> Schema {
    schema_from_json(json!({
        "type": "string",
        "enum": values,
    }))
}

fn schema_from_json(raw: Value) -> Schema {
    serde_json::from_value(raw).unwrap_or(Schema::Bool(true))
}

// =============================================================================
// FIELD SPECS
// =============================================================================

/// Value of a numeric or date predicate: a scalar or a pair.
///
/// A pair is conventional with the `to` operator and a scalar with the rest,
/// but the contract does not cross-check value shape against operator, so
/// neither does this type. Raw [`Number`]s keep the exact wire
/// representation for the round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValue {
    Scalar(Number),
    Range(Number, Number),
}

impl NumericValue {
    pub fn to_value(&self) -> Value {
        match self {
            NumericValue::Scalar(n) => Value::Number(n.clone()),
            NumericValue::Range(a, b) => {
                Value::Array(vec![Value::Number(a.clone()), Value::Number(b.clone())])
            }
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<NumericValue> {
        match ctx.value() {
            Value::Number(_) => ctx.number_raw().map(NumericValue::Scalar),
            Value::Array(items) if items.len() == 2 => {
                let a = ctx.element(&items[0], 0).number_raw()?;
                let b = ctx.element(&items[1], 1).number_raw()?;
                Ok(NumericValue::Range(a, b))
            }
            _ => Err(ctx.error("a number or a pair of numbers")),
        }
    }
}

impl JsonSchema for NumericValue {
    fn schema_name() -> String {
        "NumericFilterValue".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        schema_from_json(json!({
            "anyOf": [
                { "type": "number" },
                {
                    "type": "array",
                    "items": { "type": "number" },
                    "minItems": 2,
                    "maxItems": 2
                }
            ]
        }))
    }
}

/// One typed filter predicate over a named field.
///
/// Discriminated by the wire tag `type`. `facted_string` is the literal the
/// remote service uses (sic); it is accepted and re-emitted exactly as
/// spelled.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
#[schemars(tag = "type")]
pub enum FieldSpec {
    #[schemars(rename = "string")]
    String {
        key: String,
        name: String,
        op: StringOp,
        value: Vec<String>,
    },
    #[schemars(rename = "facted_string")]
    FacetedString {
        key: String,
        name: String,
        op: StringOp,
        value: Vec<String>,
    },
    #[schemars(rename = "numeric")]
    Numeric {
        key: String,
        name: String,
        op: NumericOp,
        value: NumericValue,
    },
    #[schemars(rename = "date")]
    Date {
        key: String,
        name: String,
        op: NumericOp,
        value: NumericValue,
    },
}

const FIELD_SPEC_KINDS: [&str; 4] = ["string", "facted_string", "numeric", "date"];

impl FieldSpec {
    /// Opaque identifier of the field the predicate applies to.
    pub fn key(&self) -> &str {
        match self {
            FieldSpec::String { key, .. }
            | FieldSpec::FacetedString { key, .. }
            | FieldSpec::Numeric { key, .. }
            | FieldSpec::Date { key, .. } => key,
        }
    }

    /// Display label of the field.
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::String { name, .. }
            | FieldSpec::FacetedString { name, .. }
            | FieldSpec::Numeric { name, .. }
            | FieldSpec::Date { name, .. } => name,
        }
    }

    /// The wire discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldSpec::String { .. } => "string",
            FieldSpec::FacetedString { .. } => "facted_string",
            FieldSpec::Numeric { .. } => "numeric",
            FieldSpec::Date { .. } => "date",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            FieldSpec::String {
                key,
                name,
                op,
                value,
            }
            | FieldSpec::FacetedString {
                key,
                name,
                op,
                value,
            } => json!({
                "type": self.kind(),
                "key": key,
                "name": name,
                "op": op.as_str(),
                "value": value,
            }),
            FieldSpec::Numeric {
                key,
                name,
                op,
                value,
            }
            | FieldSpec::Date {
                key,
                name,
                op,
                value,
            } => json!({
                "type": self.kind(),
                "key": key,
                "name": name,
                "op": op.as_str(),
                "value": value.to_value(),
            }),
        }
    }
}

impl FromJson for FieldSpec {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        let kind = obj.req("type", |c| c.literal(&FIELD_SPEC_KINDS))?;
        let key = obj.req("key", |c| c.non_empty_string())?;
        let name = obj.req("name", |c| c.non_empty_string())?;
        match kind {
            "string" => Ok(FieldSpec::String {
                key,
                name,
                op: obj.req("op", |c| StringOp::decode(c))?,
                value: obj.req("value", |c| c.strings())?,
            }),
            "facted_string" => Ok(FieldSpec::FacetedString {
                key,
                name,
                op: obj.req("op", |c| StringOp::decode(c))?,
                value: obj.req("value", |c| c.strings())?,
            }),
            "numeric" => Ok(FieldSpec::Numeric {
                key,
                name,
                op: obj.req("op", |c| NumericOp::decode(c))?,
                value: obj.req("value", |c| NumericValue::decode(c))?,
            }),
            _ => Ok(FieldSpec::Date {
                key,
                name,
                op: obj.req("op", |c| NumericOp::decode(c))?,
                value: obj.req("value", |c| NumericValue::decode(c))?,
            }),
        }
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

// =============================================================================
// FILTER TREE
// =============================================================================

/// A node in the recursive boolean filter tree: an `and`/`or` combinator
/// over child nodes, or a leaf predicate.
///
/// Depth and fan-out are unbounded by the schema, so both decoding and
/// re-serialization run on an explicit work stack instead of the call
/// stack.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
#[schemars(tag = "type", rename = "SearchFilterNode")]
pub enum FilterNode {
    #[schemars(rename = "op")]
    Op {
        op: Combinator,
        children: Vec<FilterNode>,
    },
    #[schemars(rename = "value")]
    Value {
        #[schemars(rename = "fieldSpec")]
        field_spec: FieldSpec,
    },
}

/// Parse state for one partially-converted `op` node.
struct ParseFrame<'a> {
    op: Combinator,
    children: Ctx<'a>,
    items: &'a [Value],
    next: usize,
    done: Vec<FilterNode>,
}

/// Serialize state for one partially-emitted `op` node.
struct EmitFrame<'n> {
    op: Combinator,
    children: &'n [FilterNode],
    next: usize,
    done: Vec<Value>,
}

impl FilterNode {
    /// Parse a filter tree from raw JSON.
    pub fn from_value(value: &Value) -> DecodeResult<FilterNode> {
        crate::decode::parse(value)
    }

    /// Re-emit the tree as JSON, preserving wire literals and exact numeric
    /// values.
    pub fn to_value(&self) -> Value {
        let mut frames: Vec<EmitFrame<'_>> = Vec::new();
        let mut current: &FilterNode = self;

        'emit: loop {
            let mut completed = match current {
                FilterNode::Value { field_spec } => leaf_object(field_spec),
                FilterNode::Op { op, children } => {
                    if children.is_empty() {
                        op_object(*op, Vec::new())
                    } else {
                        current = &children[0];
                        frames.push(EmitFrame {
                            op: *op,
                            children,
                            next: 1,
                            done: Vec::with_capacity(children.len()),
                        });
                        continue 'emit;
                    }
                }
            };

            loop {
                let Some(mut frame) = frames.pop() else {
                    return completed;
                };
                frame.done.push(completed);
                if frame.next < frame.children.len() {
                    current = &frame.children[frame.next];
                    frame.next += 1;
                    frames.push(frame);
                    continue 'emit;
                }
                completed = op_object(frame.op, frame.done);
            }
        }
    }
}

impl FromJson for FilterNode {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let mut frames: Vec<ParseFrame<'_>> = Vec::new();
        let mut current = ctx.clone();

        'parse: loop {
            let obj = current.object()?;
            let shallow = match obj.req("type", |c| c.literal(&["op", "value"]))? {
                "value" => Some(FilterNode::Value {
                    field_spec: obj.req("fieldSpec", |c| FieldSpec::from_json(c))?,
                }),
                _ => {
                    let op = obj.req("op", |c| Combinator::decode(c))?;
                    let children = obj.required("children")?;
                    let items = match children.value() {
                        Value::Array(items) => items.as_slice(),
                        _ => return Err(children.error("an array")),
                    };
                    if items.is_empty() {
                        Some(FilterNode::Op {
                            op,
                            children: Vec::new(),
                        })
                    } else {
                        current = children.element(&items[0], 0);
                        frames.push(ParseFrame {
                            op,
                            children,
                            items,
                            next: 1,
                            done: Vec::with_capacity(items.len()),
                        });
                        None
                    }
                }
            };

            let Some(mut completed) = shallow else {
                continue 'parse;
            };

            // Attach the finished node upward, folding exhausted frames.
            loop {
                let Some(mut frame) = frames.pop() else {
                    return Ok(completed);
                };
                frame.done.push(completed);
                if frame.next < frame.items.len() {
                    current = frame.children.element(&frame.items[frame.next], frame.next);
                    frame.next += 1;
                    frames.push(frame);
                    continue 'parse;
                }
                completed = FilterNode::Op {
                    op: frame.op,
                    children: frame.done,
                };
            }
        }
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn leaf_object(field_spec: &FieldSpec) -> Value {
    let mut map = Map::with_capacity(2);
    map.insert("type".to_string(), Value::String("value".to_string()));
    map.insert("fieldSpec".to_string(), field_spec.to_value());
    Value::Object(map)
}

fn op_object(op: Combinator, children: Vec<Value>) -> Value {
    let mut map = Map::with_capacity(3);
    map.insert("type".to_string(), Value::String("op".to_string()));
    map.insert("op".to_string(), Value::String(op.as_str().to_string()));
    map.insert("children".to_string(), Value::Array(children));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &Value) -> DecodeResult<FilterNode> {
        FilterNode::from_value(value)
    }

    #[test]
    fn test_two_child_and_node_parses_and_round_trips() {
        let input = json!({
            "type": "op",
            "op": "and",
            "children": [
                {
                    "type": "value",
                    "fieldSpec": {
                        "key": "year",
                        "name": "Year",
                        "type": "numeric",
                        "op": ">=",
                        "value": 2000
                    }
                },
                {
                    "type": "value",
                    "fieldSpec": {
                        "key": "genre",
                        "name": "Genre",
                        "type": "string",
                        "op": "contains",
                        "value": ["action"]
                    }
                }
            ]
        });

        let node = parse(&input).unwrap();
        let FilterNode::Op { op, children } = &node else {
            panic!("expected an op node");
        };
        assert_eq!(*op, Combinator::And);
        assert_eq!(children.len(), 2);
        assert!(matches!(
            &children[0],
            FilterNode::Value {
                field_spec: FieldSpec::Numeric {
                    op: NumericOp::Ge,
                    ..
                }
            }
        ));

        assert_eq!(node.to_value(), input);
    }

    #[test]
    fn test_round_trip_preserves_integer_representation() {
        let input = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "numeric",
                "op": "=",
                "value": 2000
            }
        });
        let emitted = parse(&input).unwrap().to_value();
        // Not 2000.0: the raw number representation survives.
        assert_eq!(emitted["fieldSpec"]["value"].to_string(), "2000");
    }

    #[test]
    fn test_mixed_nesting_round_trips_at_depth_five() {
        let leaf = |key: &str| {
            json!({
                "type": "value",
                "fieldSpec": {
                    "key": key,
                    "name": key,
                    "type": "string",
                    "op": "=",
                    "value": [key]
                }
            })
        };
        let input = json!({
            "type": "op",
            "op": "or",
            "children": [
                {
                    "type": "op",
                    "op": "and",
                    "children": [
                        leaf("a"),
                        {
                            "type": "op",
                            "op": "or",
                            "children": [
                                {
                                    "type": "op",
                                    "op": "and",
                                    "children": [leaf("b"), leaf("c")]
                                },
                                leaf("d")
                            ]
                        }
                    ]
                },
                leaf("e")
            ]
        });

        let node = parse(&input).unwrap();
        assert_eq!(node.to_value(), input);
    }

    #[test]
    fn test_string_spec_accepts_multi_word_operator_literals() {
        for op in ["starts with", "not in"] {
            let input = json!({
                "type": "value",
                "fieldSpec": {
                    "key": "title",
                    "name": "Title",
                    "type": "string",
                    "op": op,
                    "value": ["The"]
                }
            });
            let node = parse(&input).unwrap();
            assert_eq!(node.to_value(), input);
        }
    }

    #[test]
    fn test_string_spec_rejects_numeric_operator() {
        let input = json!({
            "type": "value",
            "fieldSpec": {
                "key": "title",
                "name": "Title",
                "type": "string",
                "op": "<=",
                "value": ["x"]
            }
        });
        let err = parse(&input).unwrap_err();
        assert_eq!(err.paths(), vec!["fieldSpec.op"]);
        assert!(err.issues[0].expected.contains("\"starts with\""));
    }

    #[test]
    fn test_numeric_spec_rejects_string_operator() {
        let input = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "date",
                "op": "contains",
                "value": 2000
            }
        });
        let err = parse(&input).unwrap_err();
        assert_eq!(err.paths(), vec!["fieldSpec.op"]);
        assert!(err.issues[0].expected.contains("\"to\""));
    }

    #[test]
    fn test_faceted_string_uses_wire_spelling() {
        let accepted = json!({
            "type": "value",
            "fieldSpec": {
                "key": "genre",
                "name": "Genre",
                "type": "facted_string",
                "op": "in",
                "value": ["action", "drama"]
            }
        });
        let node = parse(&accepted).unwrap();
        assert!(matches!(
            node,
            FilterNode::Value {
                field_spec: FieldSpec::FacetedString { .. }
            }
        ));
        assert_eq!(node.to_value(), accepted);

        // The corrected spelling is not part of the contract.
        let corrected = json!({
            "type": "value",
            "fieldSpec": {
                "key": "genre",
                "name": "Genre",
                "type": "faceted_string",
                "op": "in",
                "value": ["action"]
            }
        });
        let err = parse(&corrected).unwrap_err();
        assert_eq!(err.paths(), vec!["fieldSpec.type"]);
    }

    #[test]
    fn test_numeric_value_permissiveness_is_preserved() {
        // Scalar with "to": accepted.
        let scalar_to = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "numeric",
                "op": "to",
                "value": 1999
            }
        });
        assert!(parse(&scalar_to).is_ok());

        // Unordered pair with "to": accepted.
        let unordered = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "numeric",
                "op": "to",
                "value": [5, 2]
            }
        });
        let node = parse(&unordered).unwrap();
        assert_eq!(node.to_value(), unordered);

        // Pair with "=": also accepted.
        let pair_eq = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "numeric",
                "op": "=",
                "value": [1990, 2000]
            }
        });
        assert!(parse(&pair_eq).is_ok());
    }

    #[test]
    fn test_numeric_value_rejects_wrong_arity_and_types() {
        let triple = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "numeric",
                "op": "to",
                "value": [1, 2, 3]
            }
        });
        let err = parse(&triple).unwrap_err();
        assert_eq!(err.paths(), vec!["fieldSpec.value"]);
        assert_eq!(err.issues[0].expected, "a number or a pair of numbers");

        let stringy = json!({
            "type": "value",
            "fieldSpec": {
                "key": "year",
                "name": "Year",
                "type": "numeric",
                "op": "=",
                "value": ["2000", 2001]
            }
        });
        let err = parse(&stringy).unwrap_err();
        assert_eq!(err.paths(), vec!["fieldSpec.value[0]"]);
    }

    #[test]
    fn test_empty_key_or_name_rejected() {
        let input = json!({
            "type": "value",
            "fieldSpec": {
                "key": "",
                "name": "Year",
                "type": "numeric",
                "op": "=",
                "value": 2000
            }
        });
        let err = parse(&input).unwrap_err();
        assert_eq!(err.paths(), vec!["fieldSpec.key"]);
        assert_eq!(err.issues[0].expected, "a non-empty string");
    }

    #[test]
    fn test_unknown_node_type_rejected() {
        let err = parse(&json!({"type": "group", "children": []})).unwrap_err();
        assert_eq!(err.paths(), vec!["type"]);
        assert_eq!(err.issues[0].expected, "one of \"op\", \"value\"");

        let err = parse(&json!({"op": "and", "children": []})).unwrap_err();
        assert_eq!(err.paths(), vec!["type"]);
        assert_eq!(err.issues[0].found, "nothing");
    }

    #[test]
    fn test_empty_children_accepted() {
        let input = json!({"type": "op", "op": "or", "children": []});
        let node = parse(&input).unwrap();
        assert_eq!(
            node,
            FilterNode::Op {
                op: Combinator::Or,
                children: vec![]
            }
        );
        assert_eq!(node.to_value(), input);
    }

    #[test]
    fn test_child_errors_carry_indexed_paths() {
        let input = json!({
            "type": "op",
            "op": "and",
            "children": [
                {
                    "type": "value",
                    "fieldSpec": {
                        "key": "a",
                        "name": "A",
                        "type": "string",
                        "op": "=",
                        "value": ["x"]
                    }
                },
                {
                    "type": "value",
                    "fieldSpec": {
                        "key": "b",
                        "type": "string",
                        "op": "=",
                        "value": []
                    }
                }
            ]
        });
        let err = parse(&input).unwrap_err();
        assert_eq!(err.paths(), vec!["children[1].fieldSpec.name"]);
        assert_eq!(err.issues[0].found, "nothing");
    }

    #[test]
    fn test_bad_combinator_rejected() {
        let input = json!({"type": "op", "op": "xor", "children": []});
        let err = parse(&input).unwrap_err();
        assert_eq!(err.paths(), vec!["op"]);
        assert_eq!(err.issues[0].expected, "one of \"and\", \"or\"");
    }

    #[test]
    fn test_children_must_be_an_array() {
        let input = json!({"type": "op", "op": "and", "children": {"0": {}}});
        let err = parse(&input).unwrap_err();
        assert_eq!(err.paths(), vec!["children"]);
        assert_eq!(err.issues[0].expected, "an array");
    }

    #[test]
    fn test_wide_fan_out_round_trips() {
        let leaves: Vec<Value> = (0..64)
            .map(|i| {
                json!({
                    "type": "value",
                    "fieldSpec": {
                        "key": format!("k{i}"),
                        "name": format!("K{i}"),
                        "type": "numeric",
                        "op": "=",
                        "value": i
                    }
                })
            })
            .collect();
        let input = json!({"type": "op", "op": "or", "children": leaves});
        let node = parse(&input).unwrap();
        let FilterNode::Op { children, .. } = &node else {
            panic!("expected an op node");
        };
        assert_eq!(children.len(), 64);
        assert_eq!(node.to_value(), input);
    }
}
