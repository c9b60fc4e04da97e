//! Structured search, suggest and match requests
//!
//! Each request keeps its filters in an enum keyed multimap and expands them
//! into repeated query parameters.

use std::fmt;

use crate::paging::Paging;
use crate::params::QueryParams;
use crate::types::Rank;

/// Filter and facet dimensions of the species search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchParameter {
    DatasetKey,
    ConstituentKey,
    Rank,
    HigherTaxonKey,
    Status,
    IsExtinct,
    Habitat,
    ThreatStatus,
    NameType,
    NomenclaturalStatus,
    Origin,
    Issue,
}

impl SearchParameter {
    pub fn as_param(self) -> &'static str {
        match self {
            SearchParameter::DatasetKey => "datasetKey",
            SearchParameter::ConstituentKey => "constituentKey",
            SearchParameter::Rank => "rank",
            SearchParameter::HigherTaxonKey => "highertaxonKey",
            SearchParameter::Status => "status",
            SearchParameter::IsExtinct => "isExtinct",
            SearchParameter::Habitat => "habitat",
            SearchParameter::ThreatStatus => "threat",
            SearchParameter::NameType => "nameType",
            SearchParameter::NomenclaturalStatus => "nomenclaturalStatus",
            SearchParameter::Origin => "origin",
            SearchParameter::Issue => "issue",
        }
    }
}

impl fmt::Display for SearchParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Filters keyed by search parameter, values kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    entries: Vec<(SearchParameter, Vec<String>)>,
}

impl Filters {
    pub fn add(&mut self, parameter: SearchParameter, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == parameter) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((parameter, vec![value])),
        }
    }

    pub fn get(&self, parameter: SearchParameter) -> &[String] {
        self.entries
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }

    fn apply(&self, params: &mut QueryParams) {
        for (parameter, values) in &self.entries {
            params.extend(parameter.as_param(), values);
        }
    }
}

/// Full text search over name usages (`/species/search`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub q: Option<String>,
    pub filters: Filters,
    pub facets: Vec<SearchParameter>,
    pub facet_min_count: Option<u32>,
    pub facet_multiselect: bool,
    pub highlight: bool,
    pub paging: Paging,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    /// A search without query text, narrowed by filters only
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, parameter: SearchParameter, value: impl Into<String>) -> Self {
        self.filters.add(parameter, value);
        self
    }

    pub fn rank(self, rank: Rank) -> Self {
        self.filter(SearchParameter::Rank, rank.as_str())
    }

    pub fn dataset_key(self, key: impl Into<String>) -> Self {
        self.filter(SearchParameter::DatasetKey, key)
    }

    pub fn facet(mut self, parameter: SearchParameter) -> Self {
        if !self.facets.contains(&parameter) {
            self.facets.push(parameter);
        }
        self
    }

    pub fn facet_min_count(mut self, count: u32) -> Self {
        self.facet_min_count = Some(count);
        self
    }

    pub fn facet_multiselect(mut self, enabled: bool) -> Self {
        self.facet_multiselect = enabled;
        self
    }

    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("q", self.q.as_deref());
        self.filters.apply(&mut params);
        params.extend("facet", self.facets.iter().map(|f| f.as_param()));
        if !self.facets.is_empty() {
            params.push_opt("facetMincount", self.facet_min_count);
            if self.facet_multiselect {
                params.push("facetMultiselect", true);
            }
        }
        if self.highlight {
            params.push("hl", true);
        }
        self.paging.apply(&mut params);
        params
    }
}

/// Autocomplete over scientific names (`/species/suggest`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    pub q: String,
    pub filters: Filters,
    pub limit: Option<u32>,
}

impl SuggestRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            filters: Filters::default(),
            limit: None,
        }
    }

    pub fn filter(mut self, parameter: SearchParameter, value: impl Into<String>) -> Self {
        self.filters.add(parameter, value);
        self
    }

    pub fn rank(self, rank: Rank) -> Self {
        self.filter(SearchParameter::Rank, rank.as_str())
    }

    pub fn status(self, status: impl Into<String>) -> Self {
        self.filter(SearchParameter::Status, status)
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("q", &self.q);
        self.filters.apply(&mut params);
        params.push_opt("limit", self.limit);
        params
    }
}

/// Fuzzy match of a name against the backbone (`/species/match`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub name: String,
    pub rank: Option<Rank>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub strict: bool,
    pub verbose: bool,
}

impl MatchRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rank: None,
            kingdom: None,
            phylum: None,
            class: None,
            order: None,
            family: None,
            genus: None,
            strict: false,
            verbose: false,
        }
    }

    pub fn rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn kingdom(mut self, kingdom: impl Into<String>) -> Self {
        self.kingdom = Some(kingdom.into());
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn genus(mut self, genus: impl Into<String>) -> Self {
        self.genus = Some(genus.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("name", &self.name)
            .push_opt("rank", self.rank.as_ref())
            .push_opt("kingdom", self.kingdom.as_deref())
            .push_opt("phylum", self.phylum.as_deref())
            .push_opt("class", self.class.as_deref())
            .push_opt("order", self.order.as_deref())
            .push_opt("family", self.family.as_deref())
            .push_opt("genus", self.genus.as_deref());
        if self.strict {
            params.push("strict", true);
        }
        if self.verbose {
            params.push("verbose", true);
        }
        params
    }
}
