//! 托盘行 ID

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 托盘行 ID，从 1 开始，本会话内单调递增且不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct RowId(pub u32);

impl RowId {
    pub fn value(&self) -> u32 {
        self.0
    }
}
