mod render_config;
mod store;

pub use render_config::{BarStyle, DisplayMode, RenderConfig, DEFAULT_BAR_WIDTH};
pub use store::{cycle_value, Axis, ConfigStore, Direction, PersistedValues, WIDTH_OPTIONS};
