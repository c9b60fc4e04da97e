//! Request construction
//!
//! Every operation is first turned into an [`ApiRequest`], a plain
//! description of method, URL and body. Nothing here touches the network, so
//! the requests can be inspected and tested on their own.

use std::fmt;

use crate::config::ApiConfig;
use crate::error::{GbifError, Result};
use crate::paging::Paging;
use crate::params::QueryParams;
use crate::search::{MatchRequest, SearchRequest, SuggestRequest};

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// A fully built request, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub content_type: Option<&'static str>,
}

impl ApiRequest {
    pub fn get(url: String) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            body: None,
            content_type: None,
        }
    }

    pub fn post_text(url: String, body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            body: Some(body),
            content_type: Some("text/plain"),
        }
    }
}

/// Path segment addressing a sub-resource of a name usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Children,
    Parents,
    Related,
    Root,
    Synonyms,
    Name,
    Metrics,
    Verbatim,
    Descriptions,
    Distributions,
    Media,
    References,
    SpeciesProfiles,
    VernacularNames,
    TypeSpecimens,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Children => "children",
            Modifier::Parents => "parents",
            Modifier::Related => "related",
            Modifier::Root => "root",
            Modifier::Synonyms => "synonyms",
            Modifier::Name => "name",
            Modifier::Metrics => "metrics",
            Modifier::Verbatim => "verbatim",
            Modifier::Descriptions => "descriptions",
            Modifier::Distributions => "distributions",
            Modifier::Media => "media",
            Modifier::References => "references",
            Modifier::SpeciesProfiles => "speciesProfiles",
            Modifier::VernacularNames => "vernacularNames",
            Modifier::TypeSpecimens => "typeSpecimens",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `base/key`
pub fn resource_url(base: &str, key: impl fmt::Display) -> String {
    format!("{}/{}", base, key)
}

/// `base/key/modifier`
pub fn resource_url_with(base: &str, key: impl fmt::Display, modifier: Modifier) -> String {
    format!("{}/{}/{}", base, key, modifier)
}

/// Append `?query` when the parameter set emits at least one pair.
pub fn with_query(url: String, params: &QueryParams) -> String {
    let query = params.encode();
    if query.is_empty() {
        url
    } else {
        format!("{}?{}", url, query)
    }
}

/// Names handed to the parser
///
/// A single name is sent as a query parameter, a batch as a newline separated
/// body, and raw text as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameInput {
    Single(String),
    Batch(Vec<String>),
    Raw(String),
}

impl From<&str> for NameInput {
    fn from(name: &str) -> Self {
        NameInput::Single(name.to_string())
    }
}

impl From<Vec<String>> for NameInput {
    fn from(names: Vec<String>) -> Self {
        NameInput::Batch(names)
    }
}

/// Optional filters shared by listing operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageFilter {
    pub name: Option<String>,
    pub dataset_keys: Vec<String>,
    pub language: Option<String>,
}

impl UsageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn dataset_key(mut self, key: impl Into<String>) -> Self {
        self.dataset_keys.push(key.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn apply(&self, params: &mut QueryParams) {
        params
            .push_opt("name", self.name.as_deref())
            .extend("datasetKey", &self.dataset_keys)
            .push_opt("language", self.language.as_deref());
    }
}

/// Builds requests against the URLs of one configuration
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a ApiConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ApiConfig) -> Self {
        Self { config }
    }

    /// `GET {species}/{key}`
    pub fn usage(&self, key: u64, language: Option<&str>) -> ApiRequest {
        let mut params = QueryParams::new();
        params.push_opt("language", language);
        let url = resource_url(&self.config.species_url(), key);
        ApiRequest::get(with_query(url, &params))
    }

    /// `GET {species}/{key}/{modifier}` for single-object sub-resources
    pub fn usage_detail(&self, key: u64, modifier: Modifier) -> ApiRequest {
        ApiRequest::get(resource_url_with(&self.config.species_url(), key, modifier))
    }

    /// `GET {species}/{key}/{modifier}?...` for listing sub-resources
    pub fn usage_listing(
        &self,
        key: u64,
        modifier: Modifier,
        filter: &UsageFilter,
        paging: Option<Paging>,
    ) -> ApiRequest {
        let mut params = QueryParams::new();
        filter.apply(&mut params);
        if let Some(paging) = paging {
            paging.apply(&mut params);
        }
        let url = resource_url_with(&self.config.species_url(), key, modifier);
        ApiRequest::get(with_query(url, &params))
    }

    /// `GET {species}/root/{datasetKey}`
    pub fn roots(
        &self,
        dataset_key: &str,
        filter: &UsageFilter,
        paging: Paging,
    ) -> Result<ApiRequest> {
        if dataset_key.trim().is_empty() {
            return Err(GbifError::invalid("dataset key is required"));
        }
        let mut params = QueryParams::new();
        params.push_opt("language", filter.language.as_deref());
        paging.apply(&mut params);
        let url = resource_url(
            &self.config.species_url(),
            format!("{}/{}", Modifier::Root, urlencoding::encode(dataset_key)),
        );
        Ok(ApiRequest::get(with_query(url, &params)))
    }

    /// `GET {species}?name=&datasetKey=&language=`
    pub fn name_usages(&self, filter: &UsageFilter, paging: Paging) -> ApiRequest {
        let mut params = QueryParams::new();
        filter.apply(&mut params);
        paging.apply(&mut params);
        ApiRequest::get(with_query(self.config.species_url(), &params))
    }

    /// `GET {species}/search?...`
    pub fn search(&self, request: &SearchRequest) -> ApiRequest {
        let url = format!("{}/search", self.config.species_url());
        ApiRequest::get(with_query(url, &request.to_params()))
    }

    /// `GET {species}/suggest?...`
    pub fn suggest(&self, request: &SuggestRequest) -> Result<ApiRequest> {
        if request.q.trim().is_empty() {
            return Err(GbifError::invalid("suggest requires a query"));
        }
        let url = format!("{}/suggest", self.config.species_url());
        Ok(ApiRequest::get(with_query(url, &request.to_params())))
    }

    /// `GET {species}/match?...`
    pub fn match_name(&self, request: &MatchRequest) -> Result<ApiRequest> {
        if request.name.trim().is_empty() {
            return Err(GbifError::invalid("a name is required for matching"));
        }
        let url = format!("{}/match", self.config.species_url());
        Ok(ApiRequest::get(with_query(url, &request.to_params())))
    }

    /// Parser request, GET for a single name and POST for anything else
    pub fn parse(&self, input: &NameInput) -> Result<ApiRequest> {
        let url = self.config.parser_url();
        match input {
            NameInput::Single(name) => {
                if name.trim().is_empty() {
                    return Err(GbifError::invalid("cannot parse an empty name"));
                }
                let mut params = QueryParams::new();
                params.push("names", name);
                Ok(ApiRequest::get(with_query(url, &params)))
            }
            NameInput::Batch(names) => {
                let names: Vec<&str> = names
                    .iter()
                    .map(|n| n.as_str())
                    .filter(|n| !n.trim().is_empty())
                    .collect();
                if names.is_empty() {
                    return Err(GbifError::invalid("name batch is empty"));
                }
                Ok(ApiRequest::post_text(url, names.join("\n")))
            }
            NameInput::Raw(text) => {
                if text.trim().is_empty() {
                    return Err(GbifError::invalid("raw name text is empty"));
                }
                Ok(ApiRequest::post_text(url, text.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    const SPECIES: &str = "https://api.gbif.org/v1/species";

    fn config() -> ApiConfig {
        ApiConfig::default()
    }

    #[test]
    fn test_resource_url() {
        assert_eq!(resource_url(SPECIES, 1234), format!("{}/1234", SPECIES));
        assert_eq!(
            resource_url_with(SPECIES, 1234, Modifier::Name),
            format!("{}/1234/name", SPECIES)
        );
    }

    #[test]
    fn test_with_query_skips_question_mark_when_empty() {
        let url = with_query(SPECIES.to_string(), &QueryParams::new());
        assert_eq!(url, SPECIES);
    }

    #[test]
    fn test_usage_with_and_without_language() {
        let config = config();
        let builder = RequestBuilder::new(&config);
        assert_eq!(builder.usage(5231190, None).url, format!("{}/5231190", SPECIES));
        let req = builder.usage(5231190, Some("de"));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{}/5231190?language=de", SPECIES));
        assert!(req.body.is_none());
    }

    #[test]
    fn test_usage_listing_with_filters_and_paging() {
        let config = config();
        let filter = UsageFilter::new()
            .dataset_key("d7dddbf4-2cf0-4f39-9b2a-bb099caae36c")
            .dataset_key("7ddf754f-d193-4cc9-b351-99906754a03b")
            .language("en");
        let req = RequestBuilder::new(&config).usage_listing(
            2435099,
            Modifier::Related,
            &filter,
            Some(Paging::new(40, 20).unwrap()),
        );
        assert_eq!(
            req.url,
            format!(
                "{}/2435099/related?datasetKey=d7dddbf4-2cf0-4f39-9b2a-bb099caae36c\
                 &datasetKey=7ddf754f-d193-4cc9-b351-99906754a03b&language=en&offset=40&limit=20",
                SPECIES
            )
        );
    }

    #[test]
    fn test_parents_listing_without_paging() {
        let config = config();
        let req = RequestBuilder::new(&config).usage_listing(
            5231190,
            Modifier::Parents,
            &UsageFilter::new(),
            None,
        );
        assert_eq!(req.url, format!("{}/5231190/parents", SPECIES));
    }

    #[test]
    fn test_roots_requires_dataset_key() {
        let config = config();
        let builder = RequestBuilder::new(&config);
        let err = builder
            .roots("  ", &UsageFilter::new(), Paging::default())
            .unwrap_err();
        assert!(matches!(err, GbifError::InvalidArgument(_)));

        let req = builder
            .roots("d7dddbf4-2cf0-4f39-9b2a-bb099caae36c", &UsageFilter::new(), Paging::default())
            .unwrap();
        assert_eq!(
            req.url,
            format!(
                "{}/root/d7dddbf4-2cf0-4f39-9b2a-bb099caae36c?offset=0&limit=20",
                SPECIES
            )
        );
    }

    #[test]
    fn test_name_usages_listing() {
        let config = config();
        let filter = UsageFilter::new().name("Puma concolor");
        let req = RequestBuilder::new(&config).name_usages(&filter, Paging::default());
        assert_eq!(
            req.url,
            format!("{}?name=Puma%20concolor&offset=0&limit=20", SPECIES)
        );
    }

    #[test]
    fn test_search_request_url() {
        let config = config();
        let request = SearchRequest::new("Puma")
            .rank(Rank::Species)
            .rank(Rank::Genus)
            .paging(Paging::new(0, 5).unwrap());
        let req = RequestBuilder::new(&config).search(&request);
        assert_eq!(
            req.url,
            format!("{}/search?q=Puma&rank=SPECIES&rank=GENUS&offset=0&limit=5", SPECIES)
        );
    }

    #[test]
    fn test_suggest_and_match_require_text() {
        let config = config();
        let builder = RequestBuilder::new(&config);
        assert!(builder.suggest(&SuggestRequest::new("")).is_err());
        assert!(builder.match_name(&MatchRequest::new(" ")).is_err());
        let req = builder.match_name(&MatchRequest::new("Puma concolor")).unwrap();
        assert_eq!(req.url, format!("{}/match?name=Puma%20concolor", SPECIES));
    }

    #[test]
    fn test_parse_single_name_is_get() {
        let config = config();
        let req = RequestBuilder::new(&config)
            .parse(&NameInput::from("Abies alba Mill."))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "https://api.gbif.org/v1/parser/name?names=Abies%20alba%20Mill."
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn test_parse_batch_is_newline_joined_post() {
        let config = config();
        let input = NameInput::from(vec![
            "Abies alba Mill.".to_string(),
            "Puma concolor (Linnaeus, 1771)".to_string(),
        ]);
        let req = RequestBuilder::new(&config).parse(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.gbif.org/v1/parser/name");
        assert_eq!(
            req.body.as_deref(),
            Some("Abies alba Mill.\nPuma concolor (Linnaeus, 1771)")
        );
        assert_eq!(req.content_type, Some("text/plain"));
    }

    #[test]
    fn test_parse_raw_text_is_posted_unchanged() {
        let config = config();
        let text = "Abies alba Mill.\r\nQuercus robur L.".to_string();
        let req = RequestBuilder::new(&config)
            .parse(&NameInput::Raw(text.clone()))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body, Some(text));
    }

    #[test]
    fn test_parse_batch_skips_blank_entries() {
        let config = config();
        let input = NameInput::Batch(vec![
            "Abies alba Mill.".to_string(),
            "".to_string(),
            "  ".to_string(),
            "Quercus robur L.".to_string(),
        ]);
        let req = RequestBuilder::new(&config).parse(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.body.as_deref(),
            Some("Abies alba Mill.\nQuercus robur L.")
        );
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        let config = config();
        let builder = RequestBuilder::new(&config);
        for input in [
            NameInput::Single(String::new()),
            NameInput::Batch(vec![]),
            NameInput::Batch(vec!["".to_string(), " ".to_string()]),
            NameInput::Raw("\n".to_string()),
        ] {
            assert!(matches!(
                builder.parse(&input),
                Err(GbifError::InvalidArgument(_))
            ));
        }
    }
}
