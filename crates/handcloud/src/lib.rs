//! handcloud: the gesture-driven particle cloud core.
//!
//! - A fixed-size point cloud is generated once (uniform in a cube, white).
//! - Each hand-tracking result is reduced to a pinch distance and a hand
//!   height; height recolors every point, pinch sets a target scale.
//! - Each render frame eases the scale toward its target and spins the cloud
//!   about Y, but only while a hand is detected.
//!
//! Nothing here touches a GPU or a window; the viewer crate feeds
//! [`FrameDriver`] from its tracker and draws whatever [`FrameState`] it
//! returns.

pub mod cloud;
pub mod driver;
pub mod gesture;
pub mod landmarks;
pub mod params;
pub mod scale;

pub use cloud::{color_for_height, PointCloud};
pub use driver::{FrameDriver, FrameState, Phase, TrackingState, Transform};
pub use gesture::{extract, GestureSignal};
pub use landmarks::{Hand, HandResults, Landmark, LandmarkError};
pub use params::{CloudParams, GestureParams, ParamsError};
pub use scale::{advance, ScaleController};
