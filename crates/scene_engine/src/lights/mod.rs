//! Stock light participants

pub mod ambient;
pub mod direct;

pub use ambient::AmbientLight;
pub use direct::DirectLight;
