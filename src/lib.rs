pub mod cache;
pub mod extraction;
pub mod matching;
pub mod models;
pub mod parsing;
pub mod utils;

pub use extraction::DocumentReconciler;
