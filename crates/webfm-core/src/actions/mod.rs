//! Action eligibility and metadata.

pub mod eligibility;
pub mod registry;

pub use eligibility::{compute_actions, decode_names, encode_names, ActionId, ActionState};
pub use registry::{ActionCategory, ActionDescriptor, ActionRegistry};
