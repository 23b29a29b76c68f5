pub mod aggregator;
pub mod business_filter;
pub mod cleaner;
pub mod feature_enricher;
pub mod partition;
pub mod revenue_contribution;
pub mod window_annotator;

pub use aggregator::*;
pub use business_filter::*;
pub use cleaner::*;
pub use feature_enricher::*;
pub use revenue_contribution::*;
pub use window_annotator::*;
