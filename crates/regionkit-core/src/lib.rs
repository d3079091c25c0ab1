//! Regionkit Core - region selection and avatar cropping
//!
//! This crate provides the geometry and state behind the region selection
//! canvas (rectangles and brush strokes in normalized coordinates), the
//! thumbnail pipeline that crops those regions out of the source image, and
//! the percentage-based avatar crop mapping.
//!
//! Nothing here depends on a browser; `regionkit-wasm` wraps it for JS.

pub mod avatar;
pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod handles;
pub mod region;
pub mod selector;
pub mod thumbnail;

pub use avatar::{map_avatar, AvatarCrop, AvatarCropEditor, AvatarLayout, AvatarProfile};
pub use config::SelectorConfig;
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{encode_png, to_data_url, EncodeError};
pub use geometry::{fit_canvas, normalize_pointer, CanvasBounds, NormPoint, NormRect, Size};
pub use handles::{apply_resize, hit_test, Handle};
pub use region::{Color, Region, RegionShape, Stroke};
pub use selector::{DrawMode, ImageLoad, LoadStatus, RegionSelector, SelectorEvent};
pub use thumbnail::{confirm_regions, render_thumbnail, ConfirmError, ConfirmOutcome, ThumbnailError};
