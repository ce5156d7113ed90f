pub mod app_state;
pub mod color;
pub mod group;
pub mod image;
pub mod preferences;

// Re-export all public types for convenience
pub use app_state::{AppState, AppStateRequest, AppearanceMode, PixelClickCycle, RecolorRequest};
pub use color::{Hsl, PaletteColor, Rgba};
pub use group::{AppliedGroupSettings, ColorGroup, DEFAULT_TINT_COLOR, GroupKey, HexSet};
pub use image::ImageData;
pub use preferences::{ExportFormat, UserPreferences};
