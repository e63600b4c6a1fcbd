//! File access domain - lexical path confinement rules

mod path;

pub use path::{
    confine, has_parent_segment, is_confined, normalize_join, screen_requested_path,
    strip_leading_separators,
};
