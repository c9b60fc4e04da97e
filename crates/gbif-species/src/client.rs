//! GBIF species API client

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{GbifError, Result};
use crate::paging::{Page, Paging};
use crate::request::{ApiRequest, Modifier, NameInput, RequestBuilder, UsageFilter};
use crate::response::{decode_page, decode_record, decode_records};
use crate::search::{MatchRequest, SearchRequest, SuggestRequest};
use crate::transport::{HttpResponse, ReqwestTransport, Transport};
use crate::types::*;

/// Client for the GBIF species and name parser APIs
///
/// Every operation issues exactly one request and decodes its response
/// before returning. The configuration is an immutable value; use
/// [`SpeciesClient::with_config`] to re-point an existing client.
pub struct SpeciesClient<T = ReqwestTransport> {
    config: ApiConfig,
    transport: T,
}

impl SpeciesClient<ReqwestTransport> {
    /// Create a client for the public GBIF API with the default transport
    pub fn new() -> Self {
        Self::with_transport(ApiConfig::default(), ReqwestTransport::new())
    }
}

impl Default for SpeciesClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> SpeciesClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Replace the configuration, keeping the transport
    pub fn with_config(self, config: ApiConfig) -> Self {
        Self {
            config,
            transport: self.transport,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request builder bound to this client's configuration
    pub fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config)
    }

    async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "GBIF request");
        self.transport.execute(request).await
    }

    /// Execute and require a success status.
    async fn send(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let response = self.execute(request).await?;
        if !response.is_success() {
            warn!(status = response.status, url = %request.url, "GBIF request failed");
            return Err(GbifError::Status {
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(response)
    }

    /// Execute a direct retrieval, mapping 404 to `None`.
    async fn fetch<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<Option<R>> {
        let response = self.execute(request).await?;
        if response.status == 404 {
            debug!(url = %request.url, "GBIF record not found");
            return Ok(None);
        }
        if !response.is_success() {
            warn!(status = response.status, url = %request.url, "GBIF request failed");
            return Err(GbifError::Status {
                status: response.status,
                body: response.body_text(),
            });
        }
        decode_record(&response.body).map(Some)
    }

    async fn fetch_page<R: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        paging: Paging,
    ) -> Result<Page<R>> {
        let response = self.send(request).await?;
        decode_page(&response.body, paging)
    }

    async fn usage_listing<R: DeserializeOwned>(
        &self,
        key: u64,
        modifier: Modifier,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<Page<R>> {
        let request = self
            .requests()
            .usage_listing(key, modifier, filter, Some(paging));
        self.fetch_page(&request, paging).await
    }

    // Direct retrieval

    /// Get a name usage by key, optionally with vernacular names in `language`
    pub async fn get_name_usage(&self, key: u64, language: Option<&str>) -> Result<Option<NameUsage>> {
        self.fetch(&self.requests().usage(key, language)).await
    }

    /// Get the parsed scientific name of a usage
    pub async fn get_parsed_name(&self, key: u64) -> Result<Option<ParsedName>> {
        self.fetch(&self.requests().usage_detail(key, Modifier::Name))
            .await
    }

    pub async fn get_metrics(&self, key: u64) -> Result<Option<NameUsageMetrics>> {
        self.fetch(&self.requests().usage_detail(key, Modifier::Metrics))
            .await
    }

    /// Get the verbatim record as published, keyed by term
    pub async fn get_verbatim(&self, key: u64) -> Result<Option<Map<String, Value>>> {
        self.fetch(&self.requests().usage_detail(key, Modifier::Verbatim))
            .await
    }

    // Listings

    /// List name usages, optionally narrowed by name, dataset and language
    pub async fn list_name_usages(
        &self,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<Page<NameUsage>> {
        let request = self.requests().name_usages(filter, paging);
        self.fetch_page(&request, paging).await
    }

    pub async fn get_children(
        &self,
        key: u64,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<Page<NameUsage>> {
        self.usage_listing(key, Modifier::Children, filter, paging)
            .await
    }

    /// Get all parent usages, highest rank first. Not paged.
    pub async fn get_parents(&self, key: u64, filter: &UsageFilter) -> Result<Vec<NameUsage>> {
        let request = self
            .requests()
            .usage_listing(key, Modifier::Parents, filter, None);
        let response = self.send(&request).await?;
        decode_records(&response.body)
    }

    /// Usages of the same name in other checklists
    pub async fn get_related(
        &self,
        key: u64,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<Page<NameUsage>> {
        self.usage_listing(key, Modifier::Related, filter, paging)
            .await
    }

    pub async fn get_synonyms(
        &self,
        key: u64,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<Page<NameUsage>> {
        self.usage_listing(key, Modifier::Synonyms, filter, paging)
            .await
    }

    /// Root usages of a checklist dataset
    pub async fn get_roots(
        &self,
        dataset_key: &str,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<Page<NameUsage>> {
        let request = self.requests().roots(dataset_key, filter, paging)?;
        self.fetch_page(&request, paging).await
    }

    pub async fn get_descriptions(&self, key: u64, paging: Paging) -> Result<Page<Description>> {
        self.usage_listing(key, Modifier::Descriptions, &UsageFilter::default(), paging)
            .await
    }

    pub async fn get_distributions(
        &self,
        key: u64,
        paging: Paging,
    ) -> Result<Page<Distribution>> {
        self.usage_listing(key, Modifier::Distributions, &UsageFilter::default(), paging)
            .await
    }

    pub async fn get_media(&self, key: u64, paging: Paging) -> Result<Page<Media>> {
        self.usage_listing(key, Modifier::Media, &UsageFilter::default(), paging)
            .await
    }

    pub async fn get_references(&self, key: u64, paging: Paging) -> Result<Page<Reference>> {
        self.usage_listing(key, Modifier::References, &UsageFilter::default(), paging)
            .await
    }

    pub async fn get_species_profiles(
        &self,
        key: u64,
        paging: Paging,
    ) -> Result<Page<SpeciesProfile>> {
        self.usage_listing(key, Modifier::SpeciesProfiles, &UsageFilter::default(), paging)
            .await
    }

    pub async fn get_vernacular_names(
        &self,
        key: u64,
        paging: Paging,
    ) -> Result<Page<VernacularName>> {
        self.usage_listing(key, Modifier::VernacularNames, &UsageFilter::default(), paging)
            .await
    }

    pub async fn get_type_specimens(
        &self,
        key: u64,
        paging: Paging,
    ) -> Result<Page<TypeSpecimen>> {
        self.usage_listing(key, Modifier::TypeSpecimens, &UsageFilter::default(), paging)
            .await
    }

    // Search, suggest and match

    /// Full text search with filters and facets
    pub async fn search(&self, request: &SearchRequest) -> Result<Page<SearchResult>> {
        let api_request = self.requests().search(request);
        self.fetch_page(&api_request, request.paging).await
    }

    /// Autocomplete on scientific names
    pub async fn suggest(&self, request: &SuggestRequest) -> Result<Vec<SuggestResult>> {
        let api_request = self.requests().suggest(request)?;
        let response = self.send(&api_request).await?;
        decode_records(&response.body)
    }

    /// Fuzzy match a name against the backbone
    ///
    /// A response with match type `NONE` is still returned; check
    /// [`NameUsageMatch::is_match`].
    pub async fn match_name(&self, request: &MatchRequest) -> Result<NameUsageMatch> {
        let api_request = self.requests().match_name(request)?;
        let response = self.send(&api_request).await?;
        decode_record(&response.body)
    }

    // Parsing

    /// Parse one or more scientific names into their components
    pub async fn parse_names(&self, input: &NameInput) -> Result<Vec<ParsedName>> {
        let request = self.requests().parse(input)?;
        let response = self.send(&request).await?;
        decode_records(&response.body)
    }

    pub async fn parse_name(&self, name: &str) -> Result<Option<ParsedName>> {
        let mut parsed = self.parse_names(&NameInput::from(name)).await?;
        Ok(if parsed.is_empty() {
            None
        } else {
            Some(parsed.remove(0))
        })
    }
}
