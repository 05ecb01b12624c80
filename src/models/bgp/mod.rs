//! BGP path attributes and relevant structs.

pub mod attributes;
pub mod community;
pub mod labels;

pub use attributes::*;
pub use community::*;
pub use labels::*;
