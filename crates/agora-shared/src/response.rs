//! Standardized API response types.
//!
//! Every response, success or failure, carries the `success` flag; failures
//! reduce to `{success: false, message}` with the matching status code.

use serde::{Deserialize, Serialize};

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// A bare acknowledgment with no payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub total_pages: u64,
    pub current_page: u64,
    pub total_results: u64,
}

/// Successful list response with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<T>,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, current_page: u64, limit: u64, total_results: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_results.div_ceil(limit)
        };
        Self {
            success: true,
            count: data.len(),
            pagination: Pagination {
                total_pages,
                current_page,
                total_results,
            },
            data,
        }
    }
}

/// Uniform error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let body = serde_json::to_value(ErrorResponse::new("nope")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn paged_response_rounds_pages_up() {
        let paged = PagedResponse::new(vec![1, 2], 1, 2, 5);
        assert_eq!(paged.pagination.total_pages, 3);
        assert_eq!(paged.count, 2);
    }
}
