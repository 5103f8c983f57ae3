//! Report generation module.
//!
//! Saves the scaled table as CSV and a [`RunReport`] as JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use party_processing::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("output");
//! generator.save_table(&result.scaled, "CHES2019V3")?;
//! generator.save_report(&result, "CHES2019V3")?;
//! ```

mod generator;

pub use generator::{ReportGenerator, RunReport};
