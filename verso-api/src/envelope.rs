//! Response envelope shared by every Verso list endpoint
//!
//! Every list endpoint answers with the same wrapper: a `data` array of
//! records plus a `meta.pagination` block. Both keys are required; a
//! payload missing either does not satisfy the contract and stays a
//! decode error.

use serde::{Deserialize, Serialize};

/// Pagination metadata for a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The 1-based page this response holds.
    pub page: u32,
    /// Total number of matching items across all pages.
    pub total: u64,
}

impl Pagination {
    /// Number of pages at the given page size. A zero page size yields
    /// zero pages.
    pub fn total_pages(&self, limit: u32) -> u64 {
        if limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(limit))
    }
}

/// Metadata block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub pagination: Pagination,
}

/// Standard list response: one page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    pub meta: Meta,
}

/// Backend call status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Ok,
    Error,
}

/// Error body returned by the backend on a failed call. The message is
/// optional on the wire; a bare status still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_contract_payload() {
        let json = r#"{
            "data": [{"value": "alpha", "label": "Alpha"}],
            "meta": {"pagination": {"page": 1, "total": 45}}
        }"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.meta.pagination.page, 1);
        assert_eq!(envelope.meta.pagination.total, 45);
    }

    #[test]
    fn test_envelope_rejects_missing_meta() {
        let json = r#"{"data": []}"#;
        let result: Result<Envelope<serde_json::Value>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_rejects_missing_pagination() {
        let json = r#"{"data": [], "meta": {}}"#;
        let result: Result<Envelope<serde_json::Value>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let pagination = Pagination { page: 1, total: 25 };
        assert_eq!(pagination.total_pages(10), 3);
        assert_eq!(pagination.total_pages(25), 1);
        assert_eq!(pagination.total_pages(26), 1);
        assert_eq!(pagination.total_pages(5), 5);
    }

    #[test]
    fn test_total_pages_empty_and_zero_limit() {
        let pagination = Pagination { page: 1, total: 0 };
        assert_eq!(pagination.total_pages(10), 0);

        let pagination = Pagination { page: 1, total: 9 };
        assert_eq!(pagination.total_pages(0), 0);
    }

    #[test]
    fn test_api_status_wire_values() {
        assert_eq!(serde_json::to_string(&ApiStatus::Ok).unwrap(), r#""ok""#);
        assert_eq!(
            serde_json::to_string(&ApiStatus::Error).unwrap(),
            r#""error""#
        );
        let status: ApiStatus = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(status, ApiStatus::Error);
    }

    #[test]
    fn test_error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(body.status, ApiStatus::Error);
        assert!(body.message.is_empty());

        let body: ErrorBody =
            serde_json::from_str(r#"{"status": "error", "message": "no such page"}"#).unwrap();
        assert_eq!(body.message, "no such page");
    }
}
