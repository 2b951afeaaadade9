pub mod analyzer;
pub mod pair_selector;
pub mod signals;

pub use analyzer::{AnalyzeError, Analyzer, Providers};
pub use pair_selector::select_best_pair;
