use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ensure_success, ActivitySource, AuthoritySource, SourceError};
use crate::models::AuthorityInfo;

const RPC_URL: &str = "https://rpc.helius.xyz/";
/// Entries requested per `getSignaturesForAddress` page.
pub const SIGNATURE_PAGE_SIZE: usize = 1000;
/// Hard cap on pages walked, whatever the history length.
pub const MAX_SIGNATURE_PAGES: usize = 4;

/// Helius RPC. Without an API key every call short-circuits to its default.
pub struct HeliusClient {
    client: Client,
    api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRow {
    pub signature: String,
    #[serde(default)]
    pub block_time: Option<i64>,
}

impl HeliusClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    async fn rpc(&self, api_key: &str, id: &str, method: &str, params: Value) -> Result<Value, SourceError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self.client.post(RPC_URL)
            .query(&[("api-key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(SourceError::network)?;
        let resp = ensure_success("Helius RPC", resp)?;

        resp.json::<Value>().await.map_err(SourceError::parse)
    }

    async fn signature_page(&self, api_key: &str, address: &str, page: usize, before: Option<String>) -> Result<Vec<SignatureRow>, SourceError> {
        let mut options = json!({ "limit": SIGNATURE_PAGE_SIZE });
        if let Some(before) = before {
            options["before"] = Value::String(before);
        }

        let data = self
            .rpc(api_key, &format!("sig-page-{}", page), "getSignaturesForAddress", json!([address, options]))
            .await?;

        match data.get("result") {
            Some(Value::Array(rows)) => rows
                .iter()
                .map(|row| serde_json::from_value::<SignatureRow>(row.clone()).map_err(SourceError::parse))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }
}

/// Reads `result.value.data.parsed.info` of a `jsonParsed` mint account.
fn parse_authorities(data: &Value) -> AuthorityInfo {
    let info = data.pointer("/result/value/data/parsed/info");
    let field = |name: &str| {
        info.and_then(|i| i.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    AuthorityInfo {
        mint_authority: field("mintAuthority"),
        freeze_authority: field("freezeAuthority"),
    }
}

/// Walks an address's signature history backwards, one page at a time.
///
/// `fetch_page` receives the cursor (`None` for the newest page, then the
/// oldest signature of the previous page). The walk stops after
/// [`MAX_SIGNATURE_PAGES`], on an empty or short page, or on the first
/// failed page. Returns the oldest row observed.
pub async fn walk_signature_history<F, Fut>(mut fetch_page: F) -> Option<SignatureRow>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<SignatureRow>, SourceError>>,
{
    let mut before: Option<String> = None;
    let mut oldest: Option<SignatureRow> = None;

    for page in 0..MAX_SIGNATURE_PAGES {
        let rows = match fetch_page(page, before.clone()).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Signature walk stopped at page {}: {}", page, e);
                break;
            }
        };

        let page_len = rows.len();
        let Some(last) = rows.into_iter().last() else {
            break;
        };
        before = Some(last.signature.clone());
        oldest = Some(last);

        if page_len < SIGNATURE_PAGE_SIZE {
            break;
        }
    }

    oldest
}

#[async_trait]
impl AuthoritySource for HeliusClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_authorities(&self, mint: &str) -> Result<AuthorityInfo, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(AuthorityInfo::default());
        };

        let data = self
            .rpc(api_key, "mint-info", "getAccountInfo", json!([mint, { "encoding": "jsonParsed" }]))
            .await?;
        Ok(parse_authorities(&data))
    }
}

#[async_trait]
impl ActivitySource for HeliusClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_earliest_activity(&self, address: &str) -> Result<Option<DateTime<Utc>>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let oldest = walk_signature_history(move |page, before| self.signature_page(api_key, address, page, before)).await;

        Ok(oldest
            .and_then(|row| row.block_time)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::ready;

    fn page(prefix: &str, len: usize) -> Vec<SignatureRow> {
        (0..len)
            .map(|i| SignatureRow {
                signature: format!("{}-{}", prefix, i),
                block_time: Some(1_700_000_000 - i as i64),
            })
            .collect()
    }

    #[tokio::test]
    async fn walk_is_capped_at_four_pages() {
        let mut cursors = Vec::new();
        let oldest = walk_signature_history(|n, before| {
            cursors.push(before);
            ready(Ok(page(&format!("p{}", n), SIGNATURE_PAGE_SIZE)))
        })
        .await
        .unwrap();

        assert_eq!(cursors.len(), MAX_SIGNATURE_PAGES);
        assert_eq!(
            cursors,
            vec![
                None,
                Some("p0-999".to_string()),
                Some("p1-999".to_string()),
                Some("p2-999".to_string()),
            ]
        );
        assert_eq!(oldest.signature, "p3-999");
    }

    #[tokio::test]
    async fn short_page_ends_the_walk() {
        let mut calls = 0;
        let oldest = walk_signature_history(|_, _| {
            calls += 1;
            ready(Ok(page("only", 12)))
        })
        .await
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(oldest.signature, "only-11");
        assert_eq!(oldest.block_time, Some(1_700_000_000 - 11));
    }

    #[tokio::test]
    async fn failed_page_keeps_what_was_seen() {
        let mut calls = 0;
        let oldest = walk_signature_history(|n, _| {
            calls += 1;
            if n == 1 {
                ready(Err(SourceError::Status { provider: "Helius RPC", status: 429 }))
            } else {
                ready(Ok(page("first", SIGNATURE_PAGE_SIZE)))
            }
        })
        .await
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(oldest.signature, "first-999");
    }

    #[tokio::test]
    async fn empty_history_is_none() {
        let oldest = walk_signature_history(|_, _| ready(Ok(Vec::new()))).await;
        assert!(oldest.is_none());
    }

    #[test]
    fn reads_parsed_mint_info() {
        let data = json!({
            "jsonrpc": "2.0",
            "result": {"value": {"data": {"parsed": {"info": {
                "mintAuthority": "Auth1111111111111111111111111111111111111",
                "freezeAuthority": null,
                "supply": "1000"
            }}}}}
        });
        let info = parse_authorities(&data);
        assert_eq!(info.mint_authority.as_deref(), Some("Auth1111111111111111111111111111111111111"));
        assert!(info.freeze_authority.is_none());
    }

    #[test]
    fn rpc_errors_mean_no_authorities() {
        let data = json!({"jsonrpc": "2.0", "error": {"code": -32602, "message": "Invalid param"}});
        assert_eq!(parse_authorities(&data), AuthorityInfo::default());
    }

    #[tokio::test]
    async fn unconfigured_client_short_circuits() {
        let client = HeliusClient::new(Client::new(), None);
        assert!(!AuthoritySource::is_configured(&client));
        assert_eq!(client.fetch_authorities("mint").await.unwrap(), AuthorityInfo::default());
        assert_eq!(client.fetch_earliest_activity("mint").await.unwrap(), None);
    }
}
