use crate::error::{AnalysisError, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Blocking client with a bounded timeout for every request.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// GET a JSON document; non-success statuses are errors.
pub fn get_json(client: &Client, url: &str) -> Result<Value> {
    debug!("GET {url}");
    let value = client.get(url).send()?.error_for_status()?.json::<Value>()?;
    Ok(value)
}

pub fn get_text(client: &Client, url: &str) -> Result<String> {
    debug!("GET {url}");
    let text = client.get(url).send()?.error_for_status()?.text()?;
    Ok(text)
}

/// Build a URL with encoded query parameters.
pub fn with_query(url: &str, params: &[(&str, &str)]) -> Result<String> {
    reqwest::Url::parse_with_params(url, params)
        .map(|u| u.to_string())
        .map_err(|e| AnalysisError::InvalidInput(format!("{url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_encoded() {
        let url = with_query(
            "https://rest.uniprot.org/uniprotkb/search",
            &[("query", "gene:TP53 AND organism_name:human")],
        )
        .unwrap();
        assert!(url.starts_with("https://rest.uniprot.org/uniprotkb/search?query=gene%3ATP53"));
        assert!(!url.contains(' '));
    }
}
