//! Model selection driven by cross-validation.
//!
//! Every utility here takes a configured `Evaluator` and reuses it for each
//! candidate, so all candidates are scored on the same folds.

pub mod comparison;
pub mod feature_selection;
pub mod grid_search;

pub use self::comparison::{compare_models, Candidate, Comparison};
pub use self::feature_selection::{evaluate_feature_subsets, forward_selection, SelectionPath, SelectionStep};
pub use self::grid_search::{GridSearch, GridSearchResult};
