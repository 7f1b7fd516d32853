//! xlfill - fill `{{placeholders}}` in XLSX templates
//!
//! Finds every `{{name}}` token in a workbook and replaces it with a
//! user-supplied value by patching the package's raw XML, so formatting,
//! merges, formulas and layout are preserved exactly:
//! - Package reader for sheet names and populated cells
//! - Placeholder scanner with 1-based positions and column letters
//! - Case-insensitive substitution planning
//! - Byte-preserving ZIP patcher
//! - Ephemeral artifact store (memory or filesystem)
//!
//! # Usage
//!
//! ```no_run
//! use xlfill::planner::ValueMap;
//!
//! let template = std::fs::read("invoice.xlsx")?;
//! let analysis = xlfill::scanner::analyze(&xlfill::parser::open(&template)?, None);
//! println!("fields: {:?}", analysis.distinct_patterns());
//!
//! let values: ValueMap = [("Customer", "Jane Doe"), ("Date", "2026-10-16")]
//!     .into_iter()
//!     .collect();
//! let filled = xlfill::service::fill_workbook(&template, &values)?;
//! std::fs::write("invoice-filled.xlsx", filled)?;
//! # Ok::<(), xlfill::error::XlfillError>(())
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod planner;
pub mod scanner;
pub mod service;
pub mod store;
pub mod types;
pub mod xml_helpers;

pub use config::{Config, StoreConfig};
pub use error::{ErrorKind, Result, XlfillError};
pub use service::TemplateService;
pub use types::*;
