pub mod action;
pub mod element;
pub mod error;
pub mod record;
pub mod selector;

pub use action::{Action, ActionKind, PopupRecord};
pub use element::{ElementDescriptor, ElementSnapshot};
pub use error::backend_error::BackendError;
pub use record::SessionRecord;
pub use selector::{Selector, Strategy};
