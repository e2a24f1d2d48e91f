pub mod compute_completeness;
