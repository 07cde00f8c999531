//! Listing decoding and the directory model.

pub mod decode;
pub mod entry;
pub mod model;

pub use decode::{
    action_error, decode_response, Decoded, DirectoryListing, FileDescriptor, HandlerKind,
    Response,
};
pub use entry::{EntryDescriptor, ModifiedAt, VersionStatus};
pub use model::DirectoryModel;
