mod settings;

pub use settings::{
    ChartSettings, EndpointSettings, HttpSettings, Settings, SettingsOverrides, UploadSettings,
    ENV_PRESIGN_URL, ENV_SETTLE_DELAY_MS, ENV_SUMMARY_URL,
};
