//! Resource requests: slots, scheduling weight, shared memory, devices.

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::memory::MemorySize;

/// Device mode used when a device shorthand has no mode segment.
pub const DEFAULT_DEVICE_MODE: &str = "mrw";

/// A host device exposed to the container.
///
/// Accepts either `{host_path, container_path, mode}` or the shorthand string
/// `host_path:container_path[:mode]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceConfig {
    Short(String),
    Full {
        host_path: String,
        container_path: String,
        #[serde(default)]
        mode: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceExpconf {
    pub host_path: String,
    pub container_path: String,
    pub mode: String,
}

impl DeviceConfig {
    pub fn to_expconf(&self) -> Result<DeviceExpconf, TranslateError> {
        match self {
            Self::Short(raw) => parse_device(raw),
            Self::Full {
                host_path,
                container_path,
                mode,
            } => {
                if host_path.is_empty() || container_path.is_empty() {
                    return Err(TranslateError::MalformedDevice(format!(
                        "{host_path}:{container_path}"
                    )));
                }
                Ok(DeviceExpconf {
                    host_path: host_path.clone(),
                    container_path: container_path.clone(),
                    mode: mode.clone().unwrap_or_else(|| DEFAULT_DEVICE_MODE.to_string()),
                })
            }
        }
    }
}

fn parse_device(raw: &str) -> Result<DeviceExpconf, TranslateError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let (host, container, mode) = match parts.as_slice() {
        [h, c] => (*h, *c, DEFAULT_DEVICE_MODE),
        [h, c, m] if !m.is_empty() => (*h, *c, *m),
        _ => return Err(TranslateError::MalformedDevice(raw.to_string())),
    };
    if host.is_empty() || container.is_empty() {
        return Err(TranslateError::MalformedDevice(raw.to_string()));
    }
    Ok(DeviceExpconf {
        host_path: host.to_string(),
        container_path: container.to_string(),
        mode: mode.to_string(),
    })
}

/// The `resources:` section of a command configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub slots: Option<i64>,
    pub max_slots: Option<i64>,
    pub weight: Option<f64>,
    pub priority: Option<i32>,
    pub resource_pool: Option<String>,
    pub shm_size: Option<MemorySize>,
    pub devices: Vec<DeviceConfig>,
}

/// Execution form of the resource request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesExpconf {
    pub slots: i64,
    pub max_slots: Option<i64>,
    pub weight: f64,
    pub priority: Option<i32>,
    pub resource_pool: String,
    /// Shared-memory override in bytes.
    pub shm_size: Option<i64>,
    pub devices: Vec<DeviceExpconf>,
}

impl ResourcesConfig {
    /// Shared-memory override in bytes, if one is configured.
    pub fn shm_size_bytes(&self) -> Result<Option<i64>, TranslateError> {
        self.shm_size.as_ref().map(MemorySize::to_bytes).transpose()
    }

    pub fn to_expconf(&self) -> Result<ResourcesExpconf, TranslateError> {
        let slots = self.slots.unwrap_or(1);
        if slots < 0 {
            return Err(TranslateError::NegativeSlots(slots));
        }
        if let Some(max) = self.max_slots
            && max < slots
        {
            return Err(TranslateError::MaxSlotsBelowSlots { slots, max });
        }
        Ok(ResourcesExpconf {
            slots,
            max_slots: self.max_slots,
            weight: self.weight.unwrap_or(1.0),
            priority: self.priority,
            resource_pool: self.resource_pool.clone().unwrap_or_default(),
            shm_size: self.shm_size_bytes()?,
            devices: self
                .devices
                .iter()
                .map(DeviceConfig::to_expconf)
                .collect::<Result<_, _>>()?,
        })
    }
}
