//! Data types for GBIF species API responses
//!
//! The API leaves out fields freely from one record to the next, so every
//! field except a record's identity is optional. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Taxonomic rank
///
/// Ranks the client does not know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rank {
    Domain,
    Superkingdom,
    Kingdom,
    Subkingdom,
    Phylum,
    Subphylum,
    Superclass,
    Class,
    Subclass,
    Superorder,
    Order,
    Suborder,
    Superfamily,
    Family,
    Subfamily,
    Tribe,
    Genus,
    Subgenus,
    Section,
    Species,
    Subspecies,
    Variety,
    Form,
    Unranked,
    Other(String),
}

impl Rank {
    pub fn as_str(&self) -> &str {
        match self {
            Rank::Domain => "DOMAIN",
            Rank::Superkingdom => "SUPERKINGDOM",
            Rank::Kingdom => "KINGDOM",
            Rank::Subkingdom => "SUBKINGDOM",
            Rank::Phylum => "PHYLUM",
            Rank::Subphylum => "SUBPHYLUM",
            Rank::Superclass => "SUPERCLASS",
            Rank::Class => "CLASS",
            Rank::Subclass => "SUBCLASS",
            Rank::Superorder => "SUPERORDER",
            Rank::Order => "ORDER",
            Rank::Suborder => "SUBORDER",
            Rank::Superfamily => "SUPERFAMILY",
            Rank::Family => "FAMILY",
            Rank::Subfamily => "SUBFAMILY",
            Rank::Tribe => "TRIBE",
            Rank::Genus => "GENUS",
            Rank::Subgenus => "SUBGENUS",
            Rank::Section => "SECTION",
            Rank::Species => "SPECIES",
            Rank::Subspecies => "SUBSPECIES",
            Rank::Variety => "VARIETY",
            Rank::Form => "FORM",
            Rank::Unranked => "UNRANKED",
            Rank::Other(s) => s,
        }
    }
}

impl From<&str> for Rank {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "DOMAIN" => Rank::Domain,
            "SUPERKINGDOM" => Rank::Superkingdom,
            "KINGDOM" => Rank::Kingdom,
            "SUBKINGDOM" => Rank::Subkingdom,
            "PHYLUM" => Rank::Phylum,
            "SUBPHYLUM" => Rank::Subphylum,
            "SUPERCLASS" => Rank::Superclass,
            "CLASS" => Rank::Class,
            "SUBCLASS" => Rank::Subclass,
            "SUPERORDER" => Rank::Superorder,
            "ORDER" => Rank::Order,
            "SUBORDER" => Rank::Suborder,
            "SUPERFAMILY" => Rank::Superfamily,
            "FAMILY" => Rank::Family,
            "SUBFAMILY" => Rank::Subfamily,
            "TRIBE" => Rank::Tribe,
            "GENUS" => Rank::Genus,
            "SUBGENUS" => Rank::Subgenus,
            "SECTION" => Rank::Section,
            "SPECIES" => Rank::Species,
            "SUBSPECIES" => Rank::Subspecies,
            "VARIETY" => Rank::Variety,
            "FORM" => Rank::Form,
            "UNRANKED" => Rank::Unranked,
            _ => Rank::Other(s.to_string()),
        }
    }
}

impl From<String> for Rank {
    fn from(s: String) -> Self {
        Rank::from(s.as_str())
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Rank {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Rank::from(s))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name usage from `/species/{key}` and the usage listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameUsage {
    #[serde(deserialize_with = "de::required_key")]
    pub key: u64,
    pub nub_key: Option<u64>,
    pub name_key: Option<u64>,
    #[serde(rename = "taxonID")]
    pub taxon_id: Option<String>,
    pub source_taxon_key: Option<u64>,
    pub dataset_key: Option<String>,
    pub constituent_key: Option<String>,
    pub parent_key: Option<u64>,
    pub parent: Option<String>,
    pub accepted_key: Option<u64>,
    pub accepted: Option<String>,
    pub basionym_key: Option<u64>,
    pub basionym: Option<String>,
    pub scientific_name: Option<String>,
    pub canonical_name: Option<String>,
    pub vernacular_name: Option<String>,
    pub authorship: Option<String>,
    pub name_type: Option<String>,
    pub rank: Option<Rank>,
    pub origin: Option<String>,
    pub taxonomic_status: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub nomenclatural_status: Vec<String>,
    pub remarks: Option<String>,
    pub published_in: Option<String>,
    pub according_to: Option<String>,
    pub num_descendants: Option<u64>,
    pub synonym: Option<bool>,
    pub extinct: Option<bool>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub subgenus: Option<String>,
    pub species: Option<String>,
    pub kingdom_key: Option<u64>,
    pub phylum_key: Option<u64>,
    pub class_key: Option<u64>,
    pub order_key: Option<u64>,
    pub family_key: Option<u64>,
    pub genus_key: Option<u64>,
    pub subgenus_key: Option<u64>,
    pub species_key: Option<u64>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub issues: Vec<String>,
    pub last_crawled: Option<String>,
    pub last_interpreted: Option<String>,
}

/// Structured result of the name parser and `/species/{key}/name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedName {
    pub scientific_name: String,
    pub key: Option<u64>,
    pub r#type: Option<String>,
    pub genus_or_above: Option<String>,
    pub infra_generic: Option<String>,
    pub specific_epithet: Option<String>,
    pub infra_specific_epithet: Option<String>,
    pub cultivar_epithet: Option<String>,
    pub strain: Option<String>,
    pub notho: Option<String>,
    pub authorship: Option<String>,
    pub year: Option<String>,
    pub bracket_authorship: Option<String>,
    pub bracket_year: Option<String>,
    pub sensu: Option<String>,
    pub nom_status: Option<String>,
    pub remarks: Option<String>,
    pub rank_marker: Option<String>,
    pub rank: Option<Rank>,
    pub parsed: Option<bool>,
    pub parsed_partially: Option<bool>,
    pub authors_parsed: Option<bool>,
    pub canonical_name: Option<String>,
    pub canonical_name_with_marker: Option<String>,
    pub canonical_name_complete: Option<String>,
}

/// Counters from `/species/{key}/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameUsageMetrics {
    #[serde(deserialize_with = "de::required_key")]
    pub key: u64,
    pub num_children: Option<u64>,
    pub num_descendants: Option<u64>,
    pub num_synonyms: Option<u64>,
    pub num_phylum: Option<u64>,
    pub num_class: Option<u64>,
    pub num_order: Option<u64>,
    pub num_family: Option<u64>,
    pub num_genus: Option<u64>,
    pub num_subgenus: Option<u64>,
    pub num_species: Option<u64>,
}

/// Vernacular name from `/species/{key}/vernacularNames`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VernacularName {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub vernacular_name: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub area: Option<String>,
    pub life_stage: Option<String>,
    pub sex: Option<String>,
    pub plural: Option<bool>,
    pub preferred: Option<bool>,
    pub source: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Distribution from `/species/{key}/distributions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub location_id: Option<String>,
    pub locality: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    pub establishment_means: Option<String>,
    pub life_stage: Option<String>,
    pub temporal: Option<String>,
    pub threat_status: Option<String>,
    pub appendix_cites: Option<String>,
    pub source: Option<String>,
    pub remarks: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Description from `/species/{key}/descriptions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub key: Option<u64>,
    pub r#type: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub creator: Option<String>,
    pub contributor: Option<String>,
    pub license: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Media item from `/species/{key}/media`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub r#type: Option<String>,
    pub format: Option<String>,
    pub identifier: Option<String>,
    pub references: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub audience: Option<String>,
    pub created: Option<String>,
    pub creator: Option<String>,
    pub contributor: Option<String>,
    pub publisher: Option<String>,
    pub license: Option<String>,
    pub rights_holder: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Reference/citation from `/species/{key}/references`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub citation: Option<String>,
    pub r#type: Option<String>,
    pub source: Option<String>,
    pub doi: Option<String>,
    pub link: Option<String>,
    pub remarks: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Type specimen from `/species/{key}/typeSpecimens`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpecimen {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub scientific_name: Option<String>,
    pub type_designation_type: Option<String>,
    pub type_designated_by: Option<String>,
    pub rank: Option<Rank>,
    pub source: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Species profile from `/species/{key}/speciesProfiles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesProfile {
    #[serde(deserialize_with = "de::required_key")]
    pub taxon_key: u64,
    pub marine: Option<bool>,
    pub terrestrial: Option<bool>,
    pub freshwater: Option<bool>,
    pub extinct: Option<bool>,
    pub hybrid: Option<bool>,
    pub living_period: Option<String>,
    pub age_in_days: Option<u64>,
    pub size_in_millimeter: Option<f64>,
    pub mass_in_gram: Option<f64>,
    pub habitat: Option<String>,
    pub source: Option<String>,
    pub source_taxon_key: Option<u64>,
}

/// Vernacular name embedded in a search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVernacularName {
    pub vernacular_name: Option<String>,
    pub language: Option<String>,
}

/// Result from `/species/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(deserialize_with = "de::required_key")]
    pub key: u64,
    pub nub_key: Option<u64>,
    pub dataset_key: Option<String>,
    pub constituent_key: Option<String>,
    pub parent_key: Option<u64>,
    pub parent: Option<String>,
    pub accepted_key: Option<u64>,
    pub accepted: Option<String>,
    pub scientific_name: Option<String>,
    pub canonical_name: Option<String>,
    pub authorship: Option<String>,
    pub name_type: Option<String>,
    pub rank: Option<Rank>,
    pub origin: Option<String>,
    pub taxonomic_status: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub nomenclatural_status: Vec<String>,
    pub num_descendants: Option<u64>,
    pub num_occurrences: Option<u64>,
    pub extinct: Option<bool>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub habitats: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub threat_statuses: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub vernacular_names: Vec<SearchVernacularName>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub kingdom_key: Option<u64>,
    pub phylum_key: Option<u64>,
    pub class_key: Option<u64>,
    pub order_key: Option<u64>,
    pub family_key: Option<u64>,
    pub genus_key: Option<u64>,
    pub species_key: Option<u64>,
}

/// Result from `/species/suggest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResult {
    #[serde(deserialize_with = "de::required_key")]
    pub key: u64,
    pub name_key: Option<u64>,
    pub nub_key: Option<u64>,
    pub dataset_key: Option<String>,
    pub parent_key: Option<u64>,
    pub parent: Option<String>,
    pub scientific_name: Option<String>,
    pub canonical_name: Option<String>,
    pub rank: Option<Rank>,
    pub status: Option<String>,
    pub synonym: Option<bool>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub kingdom_key: Option<u64>,
    pub phylum_key: Option<u64>,
    pub class_key: Option<u64>,
    pub order_key: Option<u64>,
    pub family_key: Option<u64>,
    pub genus_key: Option<u64>,
    pub species_key: Option<u64>,
}

/// Outcome of fuzzy matching a name against the backbone (`/species/match`)
///
/// `usage_key` is absent when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameUsageMatch {
    pub usage_key: Option<u64>,
    pub accepted_usage_key: Option<u64>,
    pub scientific_name: Option<String>,
    pub canonical_name: Option<String>,
    pub rank: Option<Rank>,
    pub status: Option<String>,
    pub confidence: Option<u32>,
    pub match_type: Option<String>,
    pub note: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub synonym: bool,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub kingdom_key: Option<u64>,
    pub phylum_key: Option<u64>,
    pub class_key: Option<u64>,
    pub order_key: Option<u64>,
    pub family_key: Option<u64>,
    pub genus_key: Option<u64>,
    pub species_key: Option<u64>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub alternatives: Vec<NameUsageMatch>,
}

impl NameUsageMatch {
    /// True unless the service reported match type `NONE`
    pub fn is_match(&self) -> bool {
        self.usage_key.is_some() && self.match_type.as_deref() != Some("NONE")
    }
}

pub(crate) mod de {
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer};
    use std::fmt;

    /// An explicit `null` reads the same as a missing field
    pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Identity keys arrive as either a JSON number or a numeric string
    pub fn required_key<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a key")
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v).map_err(|_| de::Error::custom(format!("negative key {}", v)))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse::<u64>().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_round_trips_known_and_unknown() {
        assert_eq!(Rank::from("SPECIES"), Rank::Species);
        assert_eq!(Rank::from("genus"), Rank::Genus);
        assert_eq!(Rank::from("CULTIVAR"), Rank::Other("CULTIVAR".to_string()));
        assert_eq!(String::from(Rank::Other("CULTIVAR".to_string())), "CULTIVAR");
        assert_eq!(Rank::Subspecies.to_string(), "SUBSPECIES");
    }

    #[test]
    fn test_name_usage_deserialization() {
        let json = r#"{
            "key": 5231190,
            "nubKey": 5231190,
            "datasetKey": "d7dddbf4-2cf0-4f39-9b2a-bb099caae36c",
            "scientificName": "Passer domesticus (Linnaeus, 1758)",
            "canonicalName": "Passer domesticus",
            "rank": "SPECIES",
            "kingdom": "Animalia",
            "kingdomKey": 1,
            "taxonomicStatus": "ACCEPTED",
            "nomenclaturalStatus": [],
            "someFieldWeDoNotKnow": {"nested": true}
        }"#;

        let usage: NameUsage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.key, 5231190);
        assert_eq!(usage.kingdom.as_deref(), Some("Animalia"));
        assert_eq!(usage.rank, Some(Rank::Species));
        assert_eq!(usage.kingdom_key, Some(1));
        assert!(usage.family.is_none());
        assert!(usage.vernacular_name.is_none());
        assert!(usage.issues.is_empty());
    }

    #[test]
    fn test_string_key_accepted() {
        let usage: NameUsage = serde_json::from_str(r#"{"key": "2435099"}"#).unwrap();
        assert_eq!(usage.key, 2435099);
    }

    #[test]
    fn test_missing_or_null_key_rejected() {
        assert!(serde_json::from_str::<NameUsage>(r#"{"rank": "GENUS"}"#).is_err());
        assert!(serde_json::from_str::<NameUsage>(r#"{"key": null}"#).is_err());
        assert!(serde_json::from_str::<NameUsage>(r#"{"key": -3}"#).is_err());
    }

    #[test]
    fn test_null_collections_read_as_empty() {
        let usage: NameUsage = serde_json::from_str(
            r#"{"key": 1, "issues": null, "nomenclaturalStatus": null, "synonym": null}"#,
        )
        .unwrap();
        assert!(usage.issues.is_empty());
        assert!(usage.nomenclatural_status.is_empty());
        assert_eq!(usage.synonym, None);

        let result: SearchResult = serde_json::from_str(
            r#"{"key": 2, "habitats": null, "threatStatuses": null, "vernacularNames": null}"#,
        )
        .unwrap();
        assert!(result.habitats.is_empty());
        assert!(result.threat_statuses.is_empty());
        assert!(result.vernacular_names.is_empty());

        let m: NameUsageMatch =
            serde_json::from_str(r#"{"matchType": "NONE", "synonym": null, "alternatives": null}"#)
                .unwrap();
        assert!(!m.synonym);
        assert!(m.alternatives.is_empty());
    }

    #[test]
    fn test_parsed_name_deserialization() {
        let json = r#"{
            "scientificName": "Abies alba Mill.",
            "type": "SCIENTIFIC",
            "genusOrAbove": "Abies",
            "specificEpithet": "alba",
            "authorship": "Mill.",
            "parsed": true,
            "canonicalName": "Abies alba",
            "rankMarker": "sp."
        }"#;
        let name: ParsedName = serde_json::from_str(json).unwrap();
        assert_eq!(name.genus_or_above.as_deref(), Some("Abies"));
        assert_eq!(name.r#type.as_deref(), Some("SCIENTIFIC"));
        assert_eq!(name.parsed, Some(true));
        assert!(name.year.is_none());
    }

    #[test]
    fn test_match_none_is_not_a_match() {
        let json = r#"{"confidence": 100, "matchType": "NONE", "synonym": false}"#;
        let m: NameUsageMatch = serde_json::from_str(json).unwrap();
        assert!(!m.is_match());
        assert!(m.alternatives.is_empty());

        let json = r#"{"usageKey": 2435099, "matchType": "EXACT", "rank": "SPECIES"}"#;
        let m: NameUsageMatch = serde_json::from_str(json).unwrap();
        assert!(m.is_match());
        assert!(!m.synonym);
    }
}
