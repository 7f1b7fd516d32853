use serde::{Deserialize, Serialize};

/// Media type of an XLSX package.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A value typed into the form for one placeholder occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputValue {
    pub pattern: String,
    pub value: String,
    #[serde(default)]
    pub cell: String,
    #[serde(default)]
    pub sheet: String,
}

impl InputValue {
    /// Shorthand for a value not tied to a particular cell.
    #[must_use]
    pub fn new(pattern: &str, value: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            value: value.to_string(),
            ..Self::default()
        }
    }
}

/// Form submission: fill `file_id` with `input_values`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub file_id: String,
    #[serde(default)]
    pub input_values: Vec<InputValue>,
}

/// Outcome of a fill request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_file_id: Option<String>,
    /// Error category when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<crate::error::ErrorKind>,
}

impl ProcessResponse {
    pub(crate) fn failure(err: &crate::error::XlfillError) -> Self {
        Self {
            success: false,
            message: format!("Processing failed: {err}"),
            download_url: None,
            processed_file_id: None,
            error: Some(err.kind()),
        }
    }
}

/// Replace `pattern` in `sheet!cell` with `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionInstruction {
    pub pattern: String,
    pub sheet: String,
    pub cell: String,
    pub value: String,
}

/// A processed workbook ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
