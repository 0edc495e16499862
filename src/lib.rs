pub mod gate_pipeline;
pub mod logger;
