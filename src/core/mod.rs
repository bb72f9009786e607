//! Core land-cover processing modules

pub mod indices;
pub mod classify;
pub mod smoothing;
pub mod legend;
pub mod pipeline;

// Re-export main types
pub use indices::{IndexCalculator, IndexParams, PixelBands, compute_indices};
pub use classify::{ClassRule, ClassifierThresholds, RuleClassifier, RULES, classify};
pub use smoothing::{ModeFilter, SmoothingParams, DEFAULT_SMOOTHING_RADIUS_M, smooth};
pub use legend::{LegendEntry, legend, legend_entry, palette_rgb};
pub use pipeline::{LandCoverPipeline, PipelineOutput, PipelineParams, classify_landcover, ground_pixel_size};
