// Core cell types for pdframe
pub mod value;

// Re-exports for convenience
pub use value::{ArithOp, DType, FromValue, Value, WideString};
