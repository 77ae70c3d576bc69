//! Consul service lookup types
//!
//! A deliberately thin secondary interface: one lookup keyed by four flat
//! string parameters. The answer shape is owned by the Consul agent, not
//! by this contract, so it stays opaque JSON.

use serde::{Deserialize, Serialize};

/// Parameters for the Consul service lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetServiceRequest {
    pub id: String,
    pub installation: String,
    pub service: String,
    pub dc: String,
}

impl GetServiceRequest {
    /// Encode as flat URL query pairs, in wire order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("id".to_string(), self.id.clone()),
            ("installation".to_string(), self.installation.clone()),
            ("service".to_string(), self.service.clone()),
            ("dc".to_string(), self.dc.clone()),
        ]
    }
}

/// Whatever the Consul agent knows about the service.
pub type GetServiceResponse = serde_json::Value;

// =============================================================================
// TESTS
// =============================================================================
