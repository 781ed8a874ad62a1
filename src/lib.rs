//! Interactive panorama viewer: an equirectangular image on the inside of a
//! sphere, drag-to-look, wheel zoom, and clickable markers that either turn
//! the camera toward themselves or cross-fade to a second panorama.
//!
//! Everything except [`renderer`] and [`ui`] is plain state and runs without a GPU.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod config;
pub mod error;
pub mod i18n;
pub mod input;
pub mod marker;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod ui;
pub mod viewer;

pub use error::{Result, ViewerError};
