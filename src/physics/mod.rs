pub mod decay;
pub mod smoother;
pub mod spring;
pub mod state;
