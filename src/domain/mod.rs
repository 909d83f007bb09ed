//! Domain types and DTOs
//!
//! Rate table, pricing rules and the product work breakdown.

pub mod pricing_component;
pub mod product;
pub mod specialty;

// Re-export commonly used types
pub use pricing_component::*;
pub use product::*;
pub use specialty::*;
