pub mod quantize;
pub mod viewer;
