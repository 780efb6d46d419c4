//! Query parameters for the site's list endpoint.

use serde_json::{json, Value};

/// One filter condition, sent as `[field, operator, value]` or, for a child
/// table, `[child_doctype, field, operator, value]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub child_doctype: Option<String>,
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            child_doctype: None,
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, "=", value)
    }

    /// Case-insensitive substring match.
    pub fn contains(field: impl Into<String>, text: &str) -> Self {
        Self::new(field, "like", format!("%{}%", text))
    }

    /// Field holds a non-empty value.
    pub fn is_set(field: impl Into<String>) -> Self {
        Self::new(field, "is", "set")
    }

    /// Inclusive range.
    pub fn between(field: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::new(field, "between", json!([from.into(), to.into()]))
    }

    /// Apply the condition to a child table of the listed doctype.
    pub fn on_child(mut self, child_doctype: impl Into<String>) -> Self {
        self.child_doctype = Some(child_doctype.into());
        self
    }

    pub fn to_value(&self) -> Value {
        match &self.child_doctype {
            Some(child) => json!([child, self.field, self.operator, self.value]),
            None => json!([self.field, self.operator, self.value]),
        }
    }
}

/// Parameters of `GET /api/resource/<doctype>`.
///
/// `filters` are ANDed, `or_filters` are ORed, and the two groups are ANDed
/// together by the site. A `limit` of 0 returns every matching row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub or_filters: Vec<Filter>,
    pub fields: Vec<String>,
    pub order_by: Option<String>,
    pub limit: usize,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn or_filter(mut self, filter: Filter) -> Self {
        self.or_filters.push(filter);
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// URL-encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let encode_filters = |filters: &[Filter]| {
            Value::Array(filters.iter().map(Filter::to_value).collect()).to_string()
        };

        let mut params: Vec<(&str, String)> = Vec::new();
        if !self.filters.is_empty() {
            params.push(("filters", encode_filters(&self.filters)));
        }
        if !self.or_filters.is_empty() {
            params.push(("or_filters", encode_filters(&self.or_filters)));
        }
        if !self.fields.is_empty() {
            params.push(("fields", json!(self.fields).to_string()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("order_by", order_by.clone()));
        }
        params.push(("limit_page_length", self.limit.to_string()));

        params
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
