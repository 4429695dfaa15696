pub mod geo;
pub mod issue_date;
pub mod similarity;

pub use geo::{GeoMatcher, GeoMatcherConfig};
pub use issue_date::IssueDateReconciler;
