//! Typed records for the Verso resource catalog
//!
//! One record type per list endpoint, mirroring the backend payloads
//! field for field. Nullable wire fields are `Option` and serialize
//! unconditionally, so a `null` stays a present key. Fields the backend
//! leaves unmodeled are kept as raw JSON values rather than inventing
//! structure for them.

use crate::envelope::Envelope;
use crate::filter::Filter;
use serde::{Deserialize, Serialize};

/// The six list resources exposed by the Verso API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Deployments,
    Releases,
    Services,
    Installations,
    Customizations,
    Features,
}

impl ResourceKind {
    /// All resource kinds, in catalog order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Deployments,
        ResourceKind::Releases,
        ResourceKind::Services,
        ResourceKind::Installations,
        ResourceKind::Customizations,
        ResourceKind::Features,
    ];

    /// Wire name of the resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployments => "deployments",
            ResourceKind::Releases => "releases",
            ResourceKind::Services => "services",
            ResourceKind::Installations => "installations",
            ResourceKind::Customizations => "customizations",
            ResourceKind::Features => "features",
        }
    }

    /// URL path of the list endpoint for this resource.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Deployments => "/api/v1/deployments",
            ResourceKind::Releases => "/api/v1/releases",
            ResourceKind::Services => "/api/v1/services",
            ResourceKind::Installations => "/api/v1/installations",
            ResourceKind::Customizations => "/api/v1/customizations",
            ResourceKind::Features => "/api/v1/features",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deployment of a service version to an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: Option<i64>,
    pub deployed_at: String,
    pub version: Option<String>,
    pub service: Option<i64>,
    pub installation: String,
}

/// A service row. Carries the same deployment columns the backend joins
/// in, minus the installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Option<i64>,
    pub deployed_at: String,
    pub version: Option<String>,
    pub service: Option<i64>,
}

/// An installation as exposed to selection widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub value: Option<String>,
    pub label: Option<String>,
}

/// Reference to the installation a customization belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRef {
    pub code: String,
}

/// A customization record.
///
/// The backend mixes naming styles on this payload (`createdAt` next to
/// `old_code`); the renames below preserve it exactly. Loosely-typed
/// columns stay raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub notes: Option<String>,
    pub state: serde_json::Value,
    pub epic: serde_json::Value,
    pub category: serde_json::Value,
    pub product: serde_json::Value,
    pub deadline: serde_json::Value,
    pub updates: serde_json::Value,
    pub old_code: serde_json::Value,
    pub installation: InstallationRef,
}

/// A release record. The backend does not model releases, so the record
/// is an open map of whatever comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Release(pub serde_json::Map<String, serde_json::Value>);

/// A feature record. Open map, same as [`Release`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(pub serde_json::Map<String, serde_json::Value>);

// Request side of every list endpoint is the shared `Filter`; the
// response aliases keep the endpoint names in client signatures.
pub type GetDeploymentsRequest = Filter;
pub type GetDeploymentsResponse = Envelope<Deployment>;
pub type GetReleasesRequest = Filter;
pub type GetReleasesResponse = Envelope<Release>;
pub type GetServicesRequest = Filter;
pub type GetServicesResponse = Envelope<Service>;
pub type GetInstallationsRequest = Filter;
pub type GetInstallationsResponse = Envelope<Installation>;
pub type GetCustomizationsRequest = Filter;
pub type GetCustomizationsResponse = Envelope<Customization>;
pub type GetFeaturesRequest = Filter;
pub type GetFeaturesResponse = Envelope<Feature>;

// =============================================================================
// TESTS
// =============================================================================
