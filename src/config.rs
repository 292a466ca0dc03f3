use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::default_transfers_dir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiveConfig {
    pub transfers_dir: PathBuf,
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            transfers_dir: default_transfers_dir(),
        }
    }
}

impl ReceiveConfig {
    pub fn with_transfers_dir(transfers_dir: impl Into<PathBuf>) -> Self {
        Self {
            transfers_dir: transfers_dir.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::TRANSFERS_DIR_NAME;

    #[test]
    fn default_should_use_platform_transfers_dir() {
        let config = ReceiveConfig::default();
        assert_eq!(
            config.transfers_dir.file_name().and_then(|value| value.to_str()),
            Some(TRANSFERS_DIR_NAME)
        );
    }

    #[test]
    fn deserialize_should_fill_missing_fields_from_default() {
        let config: ReceiveConfig = serde_json::from_str("{}").expect("deserialize empty config");
        assert_eq!(config, ReceiveConfig::default());
    }

    #[test]
    fn with_transfers_dir_should_override_target() {
        let config = ReceiveConfig::with_transfers_dir("/tmp/airx-target");
        assert_eq!(config.transfers_dir, PathBuf::from("/tmp/airx-target"));
    }
}
