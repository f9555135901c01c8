//! HTML user interface

pub mod branding;
pub mod page;

pub use branding::Branding;
