use aurorachrome_core::GridPreset;
use serde::{Deserialize, Serialize};

use crate::utils::StorageKey;

/// Player preferences that survive reloads.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub grid: GridPreset,
}

impl StorageKey for Settings {
    const KEY: &'static str = "aurorachrome:settings:v1";
}
