//! XML configuration loading and merging.
//!
//! One load turns a root XML file plus everything it (transitively) imports
//! into a single [`ConfigTree`]:
//! 1. **Resolve** - imports are queued breadth-first: the root document
//!    first, then each imported file in declaration order, with newly
//!    discovered imports appended behind everything already pending.
//! 2. **Merge** - each document's top-level groups and params overwrite
//!    earlier keys of the same name. Because imports are processed after
//!    the file that declared them, an imported file's values take
//!    precedence over its importer's.
//! 3. **Cache** - the merged tree is persisted via [`crate::cache`] and
//!    read back on later loads for as long as the entry exists.
//!
//! ## Source vocabulary
//! - `Import` (`src`): merge another document, path relative to the
//!   importing file.
//! - `Group` (`name`): a nested mapping; groups replace, never deep-merge.
//! - `Param` (`name`, `value`): a scalar entry. A `name` ending in `[]`
//!   appends to an ordered list; inner text wrapped in `<![CDATA[...]]>`
//!   overrides the `value` attribute.

pub mod document;
mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, MAX_DOCUMENTS};
pub use merge::{merge_document, sort_by_value_desc};
pub use types::{ConfigTree, ConfigValue, Group};
