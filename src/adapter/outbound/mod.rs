//! Outbound adapters: report rendering.

pub mod report;

pub use report::write_report;
