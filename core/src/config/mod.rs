pub mod load;
pub mod types;

pub use load::{get_parabens_data_dir, load_default};
pub use types::{
    AppConfig, EncodeConfig, LoggingConfig, PathsConfig, ProgressConfig, RenderConfig,
};
