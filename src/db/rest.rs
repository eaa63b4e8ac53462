//! Hosted store backend speaking the PostgREST dialect (as served by Supabase).

use serde_json::Value;
use std::time::Duration;

use super::backend::{Filter, Query, RecordStore, Table};
use super::StoreError;

pub struct RestStore {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            agent,
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
    }
}

fn filter_param(filter: &Filter) -> (String, String) {
    let condition = match &filter.value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{}", s),
        other => format!("eq.{}", other),
    };
    (filter.column.clone(), condition)
}

/// Query-string pairs for a select, in the order PostgREST documents them.
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(query.filters.iter().map(filter_param));

    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".to_string(), order));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

fn map_error(error: ureq::Error) -> StoreError {
    match error {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_json::<Value>()
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "no error message".to_string());
            StoreError::Remote { status, message }
        }
        ureq::Error::Transport(transport) => StoreError::Transport(transport.to_string()),
    }
}

impl RecordStore for RestStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }

    fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        query.validate()?;

        let mut request = self.authorize(self.agent.get(&self.table_url(query.table)));
        for (key, value) in query_params(query) {
            request = request.query(&key, &value);
        }

        let response = request.call().map_err(map_error)?;
        response
            .into_json::<Vec<Value>>()
            .map_err(|e| StoreError::Decode {
                table: query.table.name(),
                message: e.to_string(),
            })
    }

    fn insert(&self, table: Table, row: Value) -> Result<(), StoreError> {
        self.authorize(self.agent.post(&self.table_url(table)))
            .set("Prefer", "return=minimal")
            .send_json(row)
            .map_err(map_error)?;
        Ok(())
    }

    fn update(&self, table: Table, filter: &Filter, changes: Value) -> Result<(), StoreError> {
        table.check_column(&filter.column)?;
        let (column, condition) = filter_param(filter);

        self.authorize(self.agent.request("PATCH", &self.table_url(table)))
            .query(&column, &condition)
            .set("Prefer", "return=minimal")
            .send_json(changes)
            .map_err(map_error)?;
        Ok(())
    }
}
