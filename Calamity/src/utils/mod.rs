//! Utility functions

pub mod fs;
pub mod path;

pub use fs::{Placement, copy_or_replace, ensure_dir, move_or_replace};
pub use path::{absolutize, expand_user_path, normalize_path};
