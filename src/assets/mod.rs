pub mod decode;
pub mod store;
