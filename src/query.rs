use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// A read against one table or view, in PostgREST terms: a column projection
/// (which may embed related tables), an optional ordering and an optional limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: String,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        // Projections are written across several lines for readability; the wire
        // format wants them compact.
        self.columns = columns.split_whitespace().collect();
        self
    }

    pub fn order(mut self, column: &str, direction: SortDirection) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some(order) = &self.order {
            let dir = match order.direction {
                SortDirection::Ascending => "asc",
                SortDirection::Descending => "desc",
            };
            params.push(("order", format!("{}.{dir}", order.column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Read-only access to the hosted backend.
pub trait QueryClient: Send + Sync {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Value>>;
}

pub struct PostgrestClient {
    base_url: String,
    api_key: String,
    client: &'static Client,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str, client: &'static Client) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            client,
        }
    }

    pub fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }
}

impl QueryClient for PostgrestClient {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Value>> {
        let resp = self
            .client
            .get(self.endpoint(&query.table))
            .query(&query.to_params())
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("request for {} failed", query.table))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body.trim()));
        }
        parse_rows_json(&body)
    }
}

pub fn parse_rows_json(raw: &str) -> Result<Vec<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(trimmed).context("invalid rows json")? {
        Value::Array(rows) => Ok(rows),
        other => Err(anyhow!(
            "expected an array of rows, got {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Splits a projection on top-level commas, leaving embedded column lists intact.
pub fn split_projection(columns: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in columns.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(columns[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = columns[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_compacts_multiline_projection() {
        let q = SelectQuery::from("players").select(
            "
            name,
            country:countries(name)
            ",
        );
        assert_eq!(q.columns, "name,country:countries(name)");
    }

    #[test]
    fn split_projection_keeps_embedded_lists() {
        let parts = split_projection("id,home:countries(name,fifa_ranking),stadium");
        assert_eq!(parts, vec!["id", "home:countries(name,fifa_ranking)", "stadium"]);
    }

    #[test]
    fn rows_json_must_be_an_array() {
        assert!(parse_rows_json("null").unwrap().is_empty());
        assert_eq!(parse_rows_json("[{\"id\":1}]").unwrap().len(), 1);
        let err = parse_rows_json("{\"message\":\"nope\"}").unwrap_err();
        assert!(err.to_string().contains("an object"));
    }
}
