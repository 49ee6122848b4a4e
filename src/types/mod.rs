//! Core types: memories, recall results, operation responses, options.

pub mod memory;
pub mod options;
pub mod recall;
pub mod responses;

pub use memory::*;
pub use options::*;
pub use recall::*;
pub use responses::*;
