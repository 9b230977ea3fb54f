//! Flat parent-referencing records to ordered forests with breadcrumb path labels.
//!
//! ```
//! use pathtree::domain::{InputRecord, PathLabeler, TreeBuilder};
//!
//! let forest = TreeBuilder::new()
//!     .build(vec![
//!         InputRecord::new(1, None, "Africa"),
//!         InputRecord::new(2, Some(1.into()), "Nigeria"),
//!     ])
//!     .unwrap();
//! let labels: Vec<_> = PathLabeler::default()
//!     .label_paths(&forest)
//!     .into_iter()
//!     .map(|n| n.label)
//!     .collect();
//! assert_eq!(labels, ["Africa", "Africa > Nigeria"]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
