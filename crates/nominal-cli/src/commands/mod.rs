pub mod dump;
pub mod fulfills;
pub mod hierarchy_loader;
pub mod nearest;
pub mod parse;
pub mod run_common;

#[cfg(test)]
mod hierarchy_loader_tests;
#[cfg(test)]
mod nearest_tests;
