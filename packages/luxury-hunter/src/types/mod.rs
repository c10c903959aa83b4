pub mod extraction;
pub mod image;
pub mod item;
pub mod progress;

pub use extraction::{ExtractionResult, ProductTagResponse, UNKNOWN};
pub use image::{EncodedImage, ImageInput, ImageSource};
pub use item::{Item, ItemField, ItemId, ItemPatch, UnknownField};
pub use progress::BatchProgress;
