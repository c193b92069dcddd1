//! Static catalog configuration shared by every request.

pub mod size_guide;
