// Debug module - diagnostic tooling

pub mod pipeline_tracer;
