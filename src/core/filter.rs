//! Equality filter construction.
//!
//! A flat `{dimension: value}` map becomes at most one GA4
//! `FilterExpression`: nothing, a single exact-match string filter, or an
//! `andGroup` of them. OR and NOT groups are never produced.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::catalog::MetricDescriptor;

/// `dimension == value`, compared as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityPredicate {
    /// Dimension API name.
    pub field: String,
    /// Expected value.
    pub value: String,
}

impl EqualityPredicate {
    /// Creates a predicate.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A non-empty filter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    /// Exactly one predicate.
    Equals(EqualityPredicate),
    /// Conjunction of two or more predicates.
    And(Vec<EqualityPredicate>),
}

impl FilterExpression {
    /// Predicates in evaluation order.
    #[must_use]
    pub fn predicates(&self) -> &[EqualityPredicate] {
        match self {
            Self::Equals(p) => std::slice::from_ref(p),
            Self::And(ps) => ps,
        }
    }
}

/// Outcome of building a filter: the expression plus the dropped keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuild {
    /// `None` when no key survived validation.
    pub expression: Option<FilterExpression>,
    /// Keys that are not supported by the metric, in input order.
    pub rejected: Vec<String>,
}

/// Builds an equality filter from `filters`, keeping only keys `metric` supports.
///
/// Predicate order follows the map's insertion order. Values are compared
/// as text: strings are used verbatim, anything else as its JSON text.
pub fn build_filter(filters: &IndexMap<String, Value>, metric: &MetricDescriptor) -> FilterBuild {
    let mut predicates = Vec::with_capacity(filters.len());
    let mut rejected = Vec::new();

    for (field, value) in filters {
        if metric.supports(field) {
            predicates.push(EqualityPredicate::new(field.as_str(), value_text(value)));
        } else {
            rejected.push(field.clone());
        }
    }

    let expression = match predicates.len() {
        0 => None,
        1 => predicates.pop().map(FilterExpression::Equals),
        _ => Some(FilterExpression::And(predicates)),
    };

    FilterBuild {
        expression,
        rejected,
    }
}

/// Text form of a filter value.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// GA4 Data API wire shape (v1beta `FilterExpression`).

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum WireExpression<'a> {
    Filter(WireFilter<'a>),
    AndGroup(WireGroup<'a>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFilter<'a> {
    field_name: &'a str,
    string_filter: WireStringFilter<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireStringFilter<'a> {
    match_type: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct WireGroup<'a> {
    expressions: Vec<WireExpression<'a>>,
}

impl<'a> From<&'a EqualityPredicate> for WireExpression<'a> {
    fn from(p: &'a EqualityPredicate) -> Self {
        Self::Filter(WireFilter {
            field_name: &p.field,
            string_filter: WireStringFilter {
                match_type: "EXACT",
                value: &p.value,
            },
        })
    }
}

impl Serialize for FilterExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Equals(p) => WireExpression::from(p),
            Self::And(ps) => WireExpression::AndGroup(WireGroup {
                expressions: ps.iter().map(WireExpression::from).collect(),
            }),
        };
        wire.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn descriptor() -> MetricDescriptor {
        MetricDescriptor::new("activeUsers", ["country", "city", "date"])
    }

    fn filters(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_map_is_no_filter() {
        let build = build_filter(&IndexMap::new(), &descriptor());
        assert!(build.expression.is_none());
        assert!(build.rejected.is_empty());
    }

    #[test]
    fn test_all_invalid_is_no_filter() {
        let build = build_filter(&filters(&[("foo", json!("x"))]), &descriptor());
        assert!(build.expression.is_none());
        assert_eq!(build.rejected, vec!["foo"]);
    }

    #[test]
    fn test_single_valid_key() {
        let build = build_filter(
            &filters(&[("country", json!("US")), ("foo", json!("x"))]),
            &descriptor(),
        );
        assert_eq!(
            build.expression,
            Some(FilterExpression::Equals(EqualityPredicate::new("country", "US")))
        );
        assert_eq!(build.rejected, vec!["foo"]);
    }

    #[test]
    fn test_conjunction_keeps_insertion_order() {
        let build = build_filter(
            &filters(&[("date", json!("20240101")), ("city", json!("Paris"))]),
            &descriptor(),
        );
        let Some(FilterExpression::And(predicates)) = build.expression else {
            unreachable!("expected a conjunction");
        };
        assert_eq!(
            predicates,
            vec![
                EqualityPredicate::new("date", "20240101"),
                EqualityPredicate::new("city", "Paris"),
            ]
        );
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "null");
        assert_eq!(value_text(&json!("US")), "US");
    }

    #[test]
    fn test_single_predicate_wire_shape() {
        let expr = FilterExpression::Equals(EqualityPredicate::new("country", "US"));
        let wire = serde_json::to_value(&expr).unwrap_or_default();
        assert_eq!(
            wire,
            json!({
                "filter": {
                    "fieldName": "country",
                    "stringFilter": { "matchType": "EXACT", "value": "US" }
                }
            })
        );
    }

    #[test]
    fn test_and_group_wire_shape() {
        let expr = FilterExpression::And(vec![
            EqualityPredicate::new("country", "US"),
            EqualityPredicate::new("city", "Austin"),
        ]);
        let wire = serde_json::to_value(&expr).unwrap_or_default();
        assert_eq!(
            wire["andGroup"]["expressions"][1]["filter"]["fieldName"],
            "city"
        );
        assert_eq!(
            wire["andGroup"]["expressions"]
                .as_array()
                .map_or(0, Vec::len),
            2
        );
    }

    proptest! {
        #[test]
        fn prop_predicates_are_exactly_the_valid_keys(
            keys in prop::collection::btree_set(
                prop::sample::select(vec!["country", "city", "date", "foo", "bar"]),
                0..5,
            )
        ) {
            let metric = descriptor();
            let map: IndexMap<String, Value> =
                keys.iter().map(|k| ((*k).to_string(), json!("v"))).collect();
            let build = build_filter(&map, &metric);

            let valid: Vec<&str> = keys.iter().copied().filter(|k| metric.supports(k)).collect();
            match &build.expression {
                None => prop_assert!(valid.is_empty()),
                Some(FilterExpression::Equals(p)) => {
                    prop_assert_eq!(valid.len(), 1);
                    prop_assert_eq!(p.field.as_str(), valid[0]);
                }
                Some(FilterExpression::And(ps)) => {
                    prop_assert!(ps.len() >= 2);
                    let fields: Vec<&str> = ps.iter().map(|p| p.field.as_str()).collect();
                    prop_assert_eq!(fields, valid);
                }
            }
            prop_assert_eq!(build.rejected.len(), keys.len() - build.expression.as_ref().map_or(0, |e| e.predicates().len()));
        }
    }
}
