//! Shared wire types for the Digest API.

use crate::analyze::AnalysisResult;
use crate::pdf::TocEntry;
use crate::pipeline::PartialSummary;
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: None,
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error.code = Some(code.into());
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(message, "invalid_request_error")
    }

    pub fn extraction_failed(message: impl Into<String>) -> Self {
        Self::new(message, "extraction_failed")
    }

    pub fn empty_document(message: impl Into<String>) -> Self {
        Self::new(message, "empty_document")
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::new(message, "unsupported_format")
    }

    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::new(message, "model_unavailable").with_code("service_unavailable")
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(message, "internal_error")
    }
}

/// Response body for `/process-pdf`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProcessPdfResponse {
    pub filename: String,
    pub page_count: u32,
    /// Detected document outline; empty when no headings were found
    pub toc: Vec<TocEntry>,
    /// First 500 characters of the extracted text
    pub text_preview: String,
    pub analysis: AnalysisResult,
    pub summary_parts: Vec<PartialSummary>,
    pub combined_summary: String,
    /// Wall-clock processing time in seconds
    pub processing_time: f64,
    pub timestamp: String,
}

/// Response body for `/summarize`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SummarizeResponse {
    pub analysis: AnalysisResult,
    pub summary_parts: Vec<PartialSummary>,
    pub combined_summary: String,
    pub processing_time: f64,
    pub timestamp: String,
}

/// Entry in the `/summary-styles` listing
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StyleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_available: bool,
}
