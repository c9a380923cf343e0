//! Page templates and generated assets for the artwork browsing site.

pub mod assets;
pub mod templates;

pub use assets::AssetPipeline;
pub use templates::{
    is_viewer_element, ArtworkPage, FeaturedArtwork, HomePage, TemplateEngine, TemplateError,
};
