//! File actions module.
//!
//! The delete module removes redundant copies from verified duplicate
//! groups, always preserving the first-seen member:
//! - Permanent deletion (default)
//! - Move to system trash (recoverable)
//!
//! ```no_run
//! use dupverify::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = permanent_delete(&path);
//! ```

pub mod delete;

pub use delete::{
    delete_duplicates, delete_group, delete_to_trash, permanent_delete, DeleteError,
    DeleteFailure, DeleteMethod, DeleteResult, DeletionReport, FileRemover, GroupDeletion,
};
