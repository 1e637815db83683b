use serde::Deserialize;

/// Default SDK log filter, matching the levels the vendor ships with.
pub const DEFAULT_LOG_FILTER: &str = "debug@VidyoClient debug@VidyoConnector info warning";

const DEFAULT_MAX_PARTICIPANTS: u32 = 8;

/// Parameters for one conference session, supplied at open time and
/// read-only afterwards.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
    #[serde(default)]
    pub portal: String,
    #[serde(default)]
    pub room_key: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub debug: bool,
}

fn default_max_participants() -> u32 {
    DEFAULT_MAX_PARTICIPANTS
}

fn default_log_level() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            portal: String::new(),
            room_key: String::new(),
            pin: String::new(),
            name: String::new(),
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            log_level: DEFAULT_LOG_FILTER.to_string(),
            debug: false,
        }
    }
}
