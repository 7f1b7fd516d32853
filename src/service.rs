//! Request-boundary orchestration.
//!
//! [`TemplateService`] implements the analyse / process / download / delete
//! contracts consumed by a web front end. It is constructed once at startup
//! and shared (e.g. behind an `Arc`) by every request handler; the only
//! mutable state it holds lives in its two stores.

use std::path::Path;

use crate::config::Config;
use crate::error::{Result, XlfillError};
use crate::export::fill_package;
use crate::planner::{plan, ValueMap};
use crate::scanner::{analyze, scan};
use crate::store::{build_store, SharedStore};
use crate::types::{
    AnalysisResult, Download, ProcessRequest, ProcessResponse, XLSX_CONTENT_TYPE,
};

/// Read, scan, plan and patch `source` with `values`.
///
/// Patch failures degrade to the unmodified package (see
/// [`crate::export::fill_package`]); a warning is logged when non-empty
/// values were supplied but the output equals the input.
///
/// # Errors
/// [`XlfillError::MalformedPackage`] when `source` cannot be read.
pub fn fill_workbook(source: &[u8], values: &ValueMap) -> Result<Vec<u8>> {
    let workbook = crate::parser::open(source)?;
    let occurrences = scan(&workbook);
    let instructions = plan(&occurrences, values);
    let output = fill_package(source, &instructions);

    let expected_change = instructions.iter().any(|i| !i.value.is_empty());
    if expected_change && output == source {
        log::warn!(
            "{} substitution(s) requested but the package is unchanged; \
             placeholders may be split across formatting runs",
            instructions.len()
        );
    }
    log::info!(
        "filled {} occurrence(s) across {} sheet(s)",
        instructions.len(),
        workbook.sheets.len()
    );
    Ok(output)
}

pub struct TemplateService {
    config: Config,
    uploads: SharedStore,
    artifacts: SharedStore,
}

impl std::fmt::Debug for TemplateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateService")
            .field("config", &self.config)
            .field("uploads", &self.uploads.len())
            .field("artifacts", &self.artifacts.len())
            .finish()
    }
}

impl TemplateService {
    /// Build the service and both stores from `config`.
    ///
    /// # Errors
    /// Fails when a filesystem store directory cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        let uploads = build_store(&config.upload_store, "upload")?;
        let artifacts = build_store(&config.store, "processed")?;
        Ok(Self::with_stores(config, uploads, artifacts))
    }

    /// Build the service around existing stores.
    #[must_use]
    pub fn with_stores(config: Config, uploads: SharedStore, artifacts: SharedStore) -> Self {
        Self {
            config,
            uploads,
            artifacts,
        }
    }

    /// Liveness check.
    #[must_use]
    pub fn health(&self) -> &'static str {
        "healthy"
    }

    fn load_template(&self) -> Result<Vec<u8>> {
        let path = &self.config.template_path;
        std::fs::read(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => {
                XlfillError::TemplateMissing(path.display().to_string())
            }
            _ => err.into(),
        })
    }

    /// Analyse the configured template.
    ///
    /// # Errors
    /// [`XlfillError::TemplateMissing`] if the template file is absent,
    /// [`XlfillError::MalformedPackage`] if it cannot be read.
    pub fn analyze_template(&self) -> Result<AnalysisResult> {
        let bytes = self.load_template()?;
        let workbook = crate::parser::open(&bytes)?;
        Ok(analyze(&workbook, Some(&self.config.template_file_id)))
    }

    /// Validate, store and analyse an uploaded workbook.
    ///
    /// # Errors
    /// [`XlfillError::InvalidUpload`] for an empty payload or a name that does
    /// not end in `.xlsx`; [`XlfillError::MalformedPackage`] if the bytes are
    /// not a readable package.
    pub fn analyze_upload(&self, filename: &str, bytes: Vec<u8>) -> Result<AnalysisResult> {
        let has_xlsx_extension = Path::new(filename.trim())
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        if !has_xlsx_extension {
            return Err(XlfillError::InvalidUpload(format!(
                "only .xlsx files are accepted, got '{filename}'"
            )));
        }
        if bytes.is_empty() {
            return Err(XlfillError::InvalidUpload("empty file".to_string()));
        }

        let workbook = crate::parser::open(&bytes)?;
        let file_id = self.uploads.put(bytes)?;
        log::info!("stored upload '{filename}' as {file_id}");
        Ok(analyze(&workbook, Some(&file_id)))
    }

    fn source_bytes(&self, file_id: &str) -> Result<Vec<u8>> {
        if file_id == self.config.template_file_id {
            self.load_template()
        } else {
            self.uploads.get(file_id)
        }
    }

    fn try_process(&self, request: &ProcessRequest) -> Result<String> {
        let source = self.source_bytes(&request.file_id)?;
        let values = ValueMap::from_inputs(&request.input_values);
        let output = fill_workbook(&source, &values)?;
        self.artifacts.put(output)
    }

    /// Fill the requested source with the submitted values.
    ///
    /// Never fails; errors are reported in the response.
    pub fn process(&self, request: &ProcessRequest) -> ProcessResponse {
        match self.try_process(request) {
            Ok(id) => ProcessResponse {
                success: true,
                message: "Workbook processed successfully.".to_string(),
                download_url: Some(format!(
                    "{}/{id}",
                    self.config.download_prefix.trim_end_matches('/')
                )),
                processed_file_id: Some(id),
                error: None,
            },
            Err(err) => {
                log::error!("processing {} failed: {err}", request.file_id);
                ProcessResponse::failure(&err)
            }
        }
    }

    /// Fetch a processed workbook.
    ///
    /// # Errors
    /// [`XlfillError::ArtifactNotFound`] for an unknown id.
    pub fn download(&self, id: &str) -> Result<Download> {
        let bytes = self.artifacts.get(id)?;
        Ok(Download {
            file_name: format!("processed_{id}.xlsx"),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        })
    }

    /// Remove `id` from the upload and artifact stores.
    ///
    /// Returns which stores held it (`"upload"`, `"processed"`).
    ///
    /// # Errors
    /// [`XlfillError::ArtifactNotFound`] when neither store held it.
    pub fn delete(&self, id: &str) -> Result<Vec<&'static str>> {
        let mut deleted = Vec::new();
        if self.uploads.remove(id).is_ok() {
            deleted.push("upload");
        }
        if self.artifacts.remove(id).is_ok() {
            deleted.push("processed");
        }
        if deleted.is_empty() {
            return Err(XlfillError::ArtifactNotFound(id.to_string()));
        }
        Ok(deleted)
    }
}
