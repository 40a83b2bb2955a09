pub mod clmm;
pub mod utils;
