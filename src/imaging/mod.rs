//! Camera side of the acquisition: issuing scheduled captures to the backend.

mod camera_controller;

#[cfg(test)]
mod tests;

pub use camera_controller::CameraController;
