pub mod convergence;
pub mod frame;
pub mod input;
pub mod pipeline;
