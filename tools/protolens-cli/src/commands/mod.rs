pub mod decode;
pub mod messages;
pub mod schema;
