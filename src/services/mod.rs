pub mod camera;
pub mod feed_controller;

pub use camera::{Camera, CameraError, FileCamera};
pub use feed_controller::{PostFeedController, ScreenView, SubmitOutcome, SubmitRejection};
