pub mod cluster;
pub mod overlap;
pub mod range;
pub mod timeline;
pub mod zoom;
