use serde::{Deserialize, Serialize};

/// Date window for a build. Explicit `since`/`until` win over `lookback_days`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RangeParams {
    pub since: Option<String>,
    pub until: Option<String>,
    pub lookback_days: Option<u32>,
}
