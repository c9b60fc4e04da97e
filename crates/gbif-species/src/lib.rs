//! Rust client for the GBIF species and name parser APIs
//!
//! Retrieves name usages, synonyms, vernacular names, media, distributions
//! and classification listings from the versioned GBIF REST API, and exposes
//! the name parser and fuzzy name matching.
//!
//! Requests are plain values built by [`RequestBuilder`] from an immutable
//! [`ApiConfig`]; a pluggable [`Transport`] executes them and listing
//! responses come back as [`Page`]s carrying their own paging cursor.
//!
//! # Example
//!
//! ```no_run
//! use gbif_species::{Paging, SpeciesClient, UsageFilter};
//!
//! # async fn example() -> Result<(), gbif_species::GbifError> {
//! let client = SpeciesClient::new();
//!
//! let mut paging = Paging::with_limit(50)?;
//! loop {
//!     let page = client.get_children(212, &UsageFilter::new(), paging).await?;
//!     for usage in &page.results {
//!         println!("{:?}", usage.scientific_name);
//!     }
//!     match page.next_page() {
//!         Some(next) => paging = next,
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! ## Species
//! - `GET /species` - List name usages
//! - `GET /species/{key}` - Name usage by key
//! - `GET /species/{key}/{name|metrics|verbatim}`
//! - `GET /species/{key}/{children|parents|related|synonyms}`
//! - `GET /species/{key}/{descriptions|distributions|media|references|speciesProfiles|vernacularNames|typeSpecimens}`
//! - `GET /species/root/{datasetKey}` - Root usages of a checklist
//! - `GET /species/search`, `GET /species/suggest`, `GET /species/match`
//!
//! ## Parser
//! - `GET /parser/name?names=` - Parse a single name
//! - `POST /parser/name` - Parse a batch of names

mod client;
mod config;
mod error;
mod paging;
mod params;
mod request;
mod response;
mod search;
mod transport;
mod types;

pub use client::SpeciesClient;
pub use config::{resolve, ApiConfig, Resource, DEFAULT_ROOT, DEFAULT_VERSION};
pub use error::{GbifError, Result};
pub use paging::{Facet, FacetCount, Page, Paging, DEFAULT_LIMIT};
pub use params::{encode_param, QueryParams};
pub use request::{
    resource_url, resource_url_with, with_query, ApiRequest, HttpMethod, Modifier, NameInput,
    RequestBuilder, UsageFilter,
};
pub use response::{decode_page, decode_record, decode_records};
pub use search::{Filters, MatchRequest, SearchParameter, SearchRequest, SuggestRequest};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::{
    Description, Distribution, Media, NameUsage, NameUsageMatch, NameUsageMetrics, ParsedName,
    Rank, Reference, SearchResult, SearchVernacularName, SpeciesProfile, SuggestResult,
    TypeSpecimen, VernacularName,
};
