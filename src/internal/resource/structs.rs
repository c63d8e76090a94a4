pub mod chunk;
pub mod probe_error;
pub mod resource;

pub use chunk::Chunk;
pub use probe_error::ProbeError;
pub use resource::Resource;
