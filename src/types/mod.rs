//! Data types shared by the reader, scanner, planner and service layer.

mod analysis;
mod cell;
mod request;
mod workbook;

pub use analysis::*;
pub use cell::*;
pub use request::*;
pub use workbook::*;
