pub mod bit_matrix;
pub mod dataset;
pub mod encoding;
pub mod pattern;
pub mod sampler;
