//! Caller-facing errors
//!
//! The simulation itself never fails: unknown entity ids are no-ops and
//! directions degrade to zero vectors. These variants cover the host-facing
//! calls that can be made out of order or with bad data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// `select_upgrade` was called while no upgrade menu is open
    #[error("no upgrade choice is pending")]
    NoPendingUpgrade,

    /// The chosen option is not one of the options currently offered
    #[error("upgrade option `{id}` is not on offer")]
    UpgradeNotOffered { id: String },

    /// Settings JSON failed to parse
    #[error("invalid settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("could not read settings: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings parsed but hold an unusable value
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
}
