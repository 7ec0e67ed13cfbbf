//! Foundation utilities shared across the pipeline
//!
//! Math types, frame timing, and logging setup.

pub mod logging;
pub mod math;
pub mod time;

pub use math::{Mat4, Mat4Ext, Point3, Vec2, Vec3, Vec4, EPSILON};
pub use time::FrameClock;
