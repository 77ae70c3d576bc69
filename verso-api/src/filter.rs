//! Query filter shared by every Verso list endpoint
//!
//! This module provides the `Filter` type that every list endpoint accepts,
//! together with its URL query-string codec. The wire layout is fixed:
//! `q[<field>]=<value>` pairs for structured constraints, `qs` for free-text
//! search, `l` and `p` for page size and page number, and `o[<field>]=<asc|desc>`
//! pairs for sort keys in precedence order.

use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sort direction for a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl FilterOrder {
    /// Wire representation of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOrder::Asc => "asc",
            FilterOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for FilterOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort specification: field name to direction, in precedence order.
///
/// Serializes as a JSON object whose key order is the sort precedence
/// (the backend applies the first key as the primary sort), so the map
/// must keep insertion order. Keys are unique; inserting a field that is
/// already present replaces its direction without moving it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec(Vec<(String, FilterOrder)>);

impl SortSpec {
    /// Empty sort specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-key sort specification.
    pub fn single(field: impl Into<String>, order: FilterOrder) -> Self {
        Self(vec![(field.into(), order)])
    }

    /// Append a sort key at the lowest precedence, or update the
    /// direction in place if the field is already a sort key.
    pub fn insert(&mut self, field: impl Into<String>, order: FilterOrder) {
        let field = field.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, existing_order)) => *existing_order = order,
            None => self.0.push((field, order)),
        }
    }

    /// Chain a lower-precedence sort key.
    pub fn then(mut self, field: impl Into<String>, order: FilterOrder) -> Self {
        self.insert(field, order);
        self
    }

    /// The highest-precedence sort key, if any.
    pub fn primary(&self) -> Option<(&str, FilterOrder)> {
        self.0.first().map(|(field, order)| (field.as_str(), *order))
    }

    /// Direction for a specific field, if it is a sort key.
    pub fn get(&self, field: &str) -> Option<FilterOrder> {
        self.0
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, order)| *order)
    }

    /// Whether the field is one of the sort keys.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|(existing, _)| existing == field)
    }

    /// Sort keys in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FilterOrder)> {
        self.0.iter().map(|(field, order)| (field.as_str(), *order))
    }

    /// Number of sort keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no sort keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Hand-written serde: serde_json's default map type is sorted, which would
// silently reorder the keys and change the sort precedence on the wire.
impl Serialize for SortSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, order) in &self.0 {
            map.serialize_entry(field, order)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SortSpecVisitor;

        impl<'de> serde::de::Visitor<'de> for SortSpecVisitor {
            type Value = SortSpec;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of field names to sort directions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries: Vec<(String, FilterOrder)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((field, order)) = access.next_entry::<String, FilterOrder>()? {
                    if entries.iter().any(|(existing, _)| *existing == field) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate sort field: {}",
                            field
                        )));
                    }
                    entries.push((field, order));
                }
                Ok(SortSpec(entries))
            }
        }

        deserializer.deserialize_map(SortSpecVisitor)
    }
}

/// Query filter shared by every Verso list endpoint.
///
/// Every field is optional; the default filter means "everything, default
/// order, first page". Field names are the Rust-side names, the wire names
/// (`q`, `qs`, `l`, `p`, `o`) are serde renames.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Structured constraints: field name to literal match value (wire `q`).
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, String>>,

    /// Free-text search string (wire `qs`). Independent of `query`;
    /// both may be present.
    #[serde(rename = "qs", skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,

    /// Maximum number of items per page (wire `l`). Absent means the
    /// backend default.
    #[serde(rename = "l", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// 1-based page number (wire `p`). Absent means the first page.
    #[serde(rename = "p", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Sort keys in precedence order (wire `o`).
    #[serde(rename = "o", skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl Filter {
    /// Filter with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a structured constraint (wire `q[field]=value`).
    pub fn field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), value.into());
        self
    }

    /// Set the free-text search string (wire `qs`).
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.query_string = Some(text.into());
        self
    }

    /// Set the page size (wire `l`).
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the 1-based page number (wire `p`).
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Append a sort key (wire `o[field]=direction`), lowest precedence
    /// last. Repeating a field updates its direction in place.
    pub fn order_by(mut self, field: impl Into<String>, order: FilterOrder) -> Self {
        self.sort.get_or_insert_with(SortSpec::new).insert(field, order);
        self
    }

    /// The page this filter resolves to: the explicit page, or the first.
    pub fn resolved_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Validate the filter against the wire contract.
    ///
    /// `l` and `p` must be positive; field names in `q` and `o` must be
    /// non-empty and bracket-free (brackets would be ambiguous inside the
    /// `q[...]`/`o[...]` key syntax); present-but-empty `q` and `o` are
    /// rejected since they cannot survive a wire round-trip.
    pub fn validate(&self) -> FilterResult<()> {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err(FilterError::InvalidValue {
                    field: "l".to_string(),
                    value: "0".to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        }
        if let Some(page) = self.page {
            if page == 0 {
                return Err(FilterError::InvalidValue {
                    field: "p".to_string(),
                    value: "0".to_string(),
                    reason: "pages are 1-based".to_string(),
                });
            }
        }
        if let Some(query) = &self.query {
            if query.is_empty() {
                return Err(FilterError::InvalidValue {
                    field: "q".to_string(),
                    value: "{}".to_string(),
                    reason: "must not be empty when present".to_string(),
                });
            }
            for field in query.keys() {
                validate_field_name("q", field)?;
            }
        }
        if let Some(sort) = &self.sort {
            if sort.is_empty() {
                return Err(FilterError::InvalidValue {
                    field: "o".to_string(),
                    value: "{}".to_string(),
                    reason: "must not be empty when present".to_string(),
                });
            }
            for (field, _) in sort.iter() {
                validate_field_name("o", field)?;
            }
        }
        Ok(())
    }

    /// Encode the filter as URL query pairs in canonical order:
    /// `q[*]` (sorted by field), `qs`, `l`, `p`, `o[*]` (precedence order).
    ///
    /// Encoding is deterministic: equal filters produce identical pairs.
    /// For any filter that passes [`Filter::validate`],
    /// [`Filter::from_query_pairs`] inverts this exactly.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(query) = &self.query {
            for (field, value) in query {
                pairs.push((format!("q[{}]", field), value.clone()));
            }
        }
        if let Some(query_string) = &self.query_string {
            pairs.push(("qs".to_string(), query_string.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("l".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("p".to_string(), page.to_string()));
        }
        if let Some(sort) = &self.sort {
            for (field, order) in sort.iter() {
                pairs.push((format!("o[{}]", field), order.as_str().to_string()));
            }
        }
        pairs
    }

    /// Decode URL query pairs into a filter.
    ///
    /// Strict: unknown parameters, duplicate scalars or bracket keys,
    /// malformed bracket syntax, non-positive `l`/`p`, and unrecognized
    /// sort directions are all errors. Pair order is irrelevant except
    /// among `o[*]` keys, where it fixes the sort precedence.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> FilterResult<Self> {
        let mut filter = Filter::default();
        for (key, value) in pairs {
            match key.as_str() {
                "qs" => {
                    if filter.query_string.is_some() {
                        return Err(FilterError::DuplicateParameter {
                            name: "qs".to_string(),
                        });
                    }
                    filter.query_string = Some(value.clone());
                }
                "l" => {
                    if filter.limit.is_some() {
                        return Err(FilterError::DuplicateParameter {
                            name: "l".to_string(),
                        });
                    }
                    filter.limit = Some(parse_positive("l", value)?);
                }
                "p" => {
                    if filter.page.is_some() {
                        return Err(FilterError::DuplicateParameter {
                            name: "p".to_string(),
                        });
                    }
                    filter.page = Some(parse_positive("p", value)?);
                }
                key if key.starts_with("q[") || key == "q" => {
                    let field = parse_bracket_key(key, "q")?;
                    let query = filter.query.get_or_insert_with(BTreeMap::new);
                    if query
                        .insert(field.to_string(), value.clone())
                        .is_some()
                    {
                        return Err(FilterError::DuplicateParameter {
                            name: key.to_string(),
                        });
                    }
                }
                key if key.starts_with("o[") || key == "o" => {
                    let field = parse_bracket_key(key, "o")?;
                    let order = match value.as_str() {
                        "asc" => FilterOrder::Asc,
                        "desc" => FilterOrder::Desc,
                        other => {
                            return Err(FilterError::InvalidValue {
                                field: key.to_string(),
                                value: other.to_string(),
                                reason: "expected asc or desc".to_string(),
                            })
                        }
                    };
                    let sort = filter.sort.get_or_insert_with(SortSpec::new);
                    if sort.contains_field(field) {
                        return Err(FilterError::DuplicateParameter {
                            name: key.to_string(),
                        });
                    }
                    sort.insert(field, order);
                }
                other => {
                    return Err(FilterError::UnknownParameter {
                        name: other.to_string(),
                    })
                }
            }
        }
        Ok(filter)
    }
}

/// Extract the field name from a `family[field]` query key.
fn parse_bracket_key<'a>(key: &'a str, family: &str) -> FilterResult<&'a str> {
    let field = key
        .strip_prefix(family)
        .and_then(|rest| rest.strip_prefix('['))
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| FilterError::MalformedKey {
            key: key.to_string(),
        })?;
    if field.is_empty() || field.contains('[') || field.contains(']') {
        return Err(FilterError::MalformedKey {
            key: key.to_string(),
        });
    }
    Ok(field)
}

/// Parse a positive integer parameter value.
fn parse_positive(name: &str, value: &str) -> FilterResult<u32> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err(FilterError::InvalidValue {
            field: name.to_string(),
            value: value.to_string(),
            reason: "must be positive".to_string(),
        }),
        Err(_) => Err(FilterError::InvalidValue {
            field: name.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer".to_string(),
        }),
    }
}

/// Validate a field name used inside a `q[...]` or `o[...]` key.
fn validate_field_name(family: &str, field: &str) -> FilterResult<()> {
    if field.is_empty() {
        return Err(FilterError::InvalidValue {
            field: family.to_string(),
            value: String::new(),
            reason: "field name must not be empty".to_string(),
        });
    }
    if field.contains('[') || field.contains(']') {
        return Err(FilterError::InvalidValue {
            field: family.to_string(),
            value: field.to_string(),
            reason: "field name must not contain brackets".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
