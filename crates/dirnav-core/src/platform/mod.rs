//! Platform-specific functionality — drive enumeration and the path
//! primitives the navigation state machine is built on.

pub mod drives;
pub mod paths;

pub use drives::{enumerate_drives, DriveInfo, DriveType};
