//! Endpoint resolution for the versioned GBIF API
//!
//! Every resource family lives under `{root}/{version}/{epithet}`. The root
//! and version are shared, each family owns its epithet.

/// Default API root
pub const DEFAULT_ROOT: &str = "https://api.gbif.org";
/// Default API version
pub const DEFAULT_VERSION: &str = "v1";

/// Logical resource families of the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Name usages and their sub-resources (`/species`)
    Species,
    /// Scientific name parser utility (`/parser/name`)
    Parser,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::Species, Resource::Parser];

    /// Epithet used when none has been configured
    pub fn default_epithet(self) -> &'static str {
        match self {
            Resource::Species => "species",
            Resource::Parser => "parser/name",
        }
    }
}

/// Join the three parts of a resource URL.
pub fn resolve(root: &str, version: &str, epithet: &str) -> String {
    format!("{}/{}/{}", root, version, epithet)
}

/// Client configuration
///
/// An immutable value: the `with_*` methods return a new configuration and
/// every URL is derived on demand, so a change of root or version is seen by
/// all resources at once. Nothing is validated here; a malformed root only
/// fails when a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    root: String,
    version: String,
    species_epithet: String,
    parser_epithet: String,
}

impl ApiConfig {
    pub fn new(root: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
            species_epithet: Resource::Species.default_epithet().to_string(),
            parser_epithet: Resource::Parser.default_epithet().to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn epithet(&self, resource: Resource) -> &str {
        match resource {
            Resource::Species => &self.species_epithet,
            Resource::Parser => &self.parser_epithet,
        }
    }

    pub fn with_root(&self, root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..self.clone()
        }
    }

    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Re-point a single resource family; the others keep their epithets.
    pub fn with_epithet(&self, resource: Resource, epithet: impl Into<String>) -> Self {
        let mut next = self.clone();
        match resource {
            Resource::Species => next.species_epithet = epithet.into(),
            Resource::Parser => next.parser_epithet = epithet.into(),
        }
        next
    }

    /// Base URL of a resource family
    pub fn url(&self, resource: Resource) -> String {
        resolve(&self.root, &self.version, self.epithet(resource))
    }

    pub fn species_url(&self) -> String {
        self.url(Resource::Species)
    }

    pub fn parser_url(&self) -> String {
        self.url(Resource::Parser)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT, DEFAULT_VERSION)
    }
}
