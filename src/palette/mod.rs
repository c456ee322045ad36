// Palette module - dominant colors of a cover image
//
// Pipeline: RGBA pixels → ColorPoints → ColorQuantizer → Palette → Theme

pub mod color;
pub mod quantizer;
pub mod seeding;
pub mod theme;

pub use color::{ColorPoints, Rgb, Rgba};
pub use quantizer::{
    quantize, ColorQuantizer, Palette, PaletteEntry, QuantizeOutcome, DEFAULT_CLUSTER_COUNT,
    DEFAULT_MAX_ITERATIONS,
};
pub use seeding::{farthest_point_seeds, random_first_index};
pub use theme::Theme;
