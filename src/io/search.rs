use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::{
    NeighborSelector, ReferenceStrategy, StackAssembler, StackParamBuilder, StackQuerySpec,
};
use crate::io::session::Session;
use crate::types::{Product, Stack, StackError, StackResult};

/// Production SearchAPI host
pub const DEFAULT_HOST: &str = "api.daac.asf.alaska.edu";

const SEARCH_PATH: &str = "/services/search/param";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Blocking client for the CMR-backed SearchAPI
///
/// Issues one GET per search; pagination, retries, and HTTP status recovery
/// are the server's and the caller's problem respectively.
pub struct SearchClient {
    host: String,
    provider: Option<String>,
    session: Session,
    http: Client,
}

impl SearchClient {
    /// Client against the production SearchAPI
    pub fn new() -> StackResult<Self> {
        Self::with_host(DEFAULT_HOST)
    }

    /// Client against a non-production host, for dev/test deployments
    pub fn with_host(host: &str) -> StackResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(SearchClient {
            host: host.trim_end_matches('/').to_string(),
            provider: None,
            session: Session::new(),
            http,
        })
    }

    /// Constrain CMR results to a custom provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Authenticate subsequent requests with the given session
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Issue one search request and deserialize the GeoJSON response
    pub fn search(
        &self,
        spec: &StackQuerySpec,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> StackResult<Vec<Product>> {
        let mut params = spec.to_params();
        if let Some(provider) = self.provider.as_ref().or(spec.provider.as_ref()) {
            params.push(("provider".to_string(), provider.clone()));
        }
        if let Some(start) = start {
            params.push(("start".to_string(), start.to_rfc3339()));
        }
        if let Some(end) = end {
            params.push(("end".to_string(), end.to_rfc3339()));
        }
        params.push(("output".to_string(), "geojson".to_string()));

        let url = format!("https://{}{}", self.host, SEARCH_PATH);
        log::info!("Searching {} with {} parameters", url, params.len());

        let request = self.http.get(&url).query(&params);
        let response = self.session.apply(request).send()?;

        if !response.status().is_success() {
            return Err(StackError::Search(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let body: Value = response.json()?;
        parse_feature_collection(&body)
    }

    /// Find the baseline stack for a reference product
    ///
    /// Derives stack constraints from the reference, issues the search, and
    /// assembles the ordered, date-filtered stack. The reference is not
    /// force-included when a bound excludes its own acquisition date.
    pub fn stack(
        &self,
        reference: &Product,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        strategy: ReferenceStrategy,
    ) -> StackResult<Stack> {
        let spec = StackParamBuilder::build(reference)?;
        let candidates = self.search(&spec, start, end)?;
        log::info!(
            "Search returned {} candidates for reference {}",
            candidates.len(),
            reference.display_id()
        );

        StackAssembler::assemble(reference, &candidates, start, end, strategy)
    }

    /// The `depth` temporally nearest neighbors prior to the reference
    pub fn nearest_neighbors(&self, reference: &Product, depth: usize) -> StackResult<Vec<Product>> {
        if depth == 0 {
            return Err(StackError::InvalidDepth(depth));
        }

        let end = reference.start_time()?;
        let stack = self.stack(reference, None, Some(end), ReferenceStrategy::FailFast)?;
        NeighborSelector::nearest_prior_neighbors(reference, depth, &stack)
    }
}

/// Deserialize a SearchAPI GeoJSON FeatureCollection into products
pub fn parse_feature_collection(body: &Value) -> StackResult<Vec<Product>> {
    let features = body
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            StackError::Search("response is not a GeoJSON FeatureCollection".to_string())
        })?;

    features
        .iter()
        .cloned()
        .map(Product::from_feature)
        .collect()
}
