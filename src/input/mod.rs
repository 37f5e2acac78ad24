pub mod editor;
pub mod field;
pub mod validators;

pub use editor::{FieldEditor, KeyResult};
pub use field::{FieldKind, FieldSpec};
