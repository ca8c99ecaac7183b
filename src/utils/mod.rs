//! Module for additional computational capabilities
pub mod math_utils;
pub mod special_functions;
pub mod test_helper;
pub mod uom_macros;
pub use math_utils::{centered_index_to_f64, f64_to_usize, usize_to_f64};
