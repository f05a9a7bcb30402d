//! Git-backed diff, history and content sources using git2-rs.

pub mod content;
pub mod diff;
pub mod history;

pub use content::WorkingTree;
pub use diff::{compare_files, working_tree_diff};
pub use history::GitHistory;
