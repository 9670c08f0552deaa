mod error;
mod inspector;

pub use error::InspectorError;
pub use inspector::{Inspector, InspectorBuilder};
pub use protolens_core as core;
pub use protolens_protobuf as protobuf;
