mod settings;

pub use settings::{PluginConfig, RecordConfig, Settings};
