//! Domain layer: records, forest construction, labelling and search
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod labeler;
pub mod record;
pub mod search;
pub mod tree_traits;

pub use arena::{Forest, TreeNode};
pub use generational_arena::Index;
pub use builder::{CyclePolicy, SiblingOrder, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use labeler::{LabeledNode, PathLabeler, DEFAULT_SEPARATOR};
pub use record::{FieldNames, InputRecord, Record, RecordId};
pub use search::DEFAULT_MIN_PATTERN_LEN;
pub use tree_traits::{TreeNodeConvert, MAX_RENDER_DEPTH};
