pub mod probe_resource;

pub use probe_resource::{inspect_probe_headers, probe_resource};
