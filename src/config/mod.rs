mod settings;

pub use settings::{
    Command, Config, CycleAxis, CycleDirection, Settings, ENV_CACHE_DIR, ENV_CACHE_TTL,
    ENV_CONFIG, ENV_CREDENTIALS, ENV_DISPLAY, ENV_ENDPOINT, ENV_STYLE, ENV_WIDTH,
};
