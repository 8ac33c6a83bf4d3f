pub mod modules;
pub mod slides;

pub use modules::{
    load_catalog, load_catalog_from_directory, load_module_from_file, Catalog, ContentError,
    ModuleContent, ModuleSection, QuizQuestion,
};
pub use slides::{clamp_slide_index, SlideDeck, SlideManifest, SlideManifestError};
