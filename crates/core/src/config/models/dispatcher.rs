use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// 选中设备被并发分发抢占时，重新选择的最大次数
    pub claim_attempts: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { claim_attempts: 5 }
    }
}

impl DispatcherConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.claim_attempts == 0 {
            return Err(anyhow::anyhow!("设备占用尝试次数必须大于0"));
        }

        Ok(())
    }
}
