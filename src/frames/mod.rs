pub mod model;
pub mod pool;
