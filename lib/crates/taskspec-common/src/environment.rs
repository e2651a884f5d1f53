//! Container environment declaration (image, variables, capabilities).

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Image used for CPU-only tasks when the configuration names none.
pub const DEFAULT_CPU_IMAGE: &str = "determinedai/environments:py-3.10-base-cpu";
/// Image used for CUDA tasks when the configuration names none.
pub const DEFAULT_CUDA_IMAGE: &str = "determinedai/environments:cuda-12.1-base-gpu";
/// Image used for ROCm tasks when the configuration names none.
pub const DEFAULT_ROCM_IMAGE: &str = "determinedai/environments:rocm-5.7-base-gpu";

/// Accelerator family a task runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Cpu,
    Cuda,
    Rocm,
}

/// `image:` as written by the user: one image for every device type, or one
/// per device type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageConfig {
    Shared(String),
    PerDevice(DeviceImagesConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceImagesConfig {
    pub cpu: Option<String>,
    pub cuda: Option<String>,
    pub rocm: Option<String>,
}

/// `environment_variables:` as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvironmentVariablesConfig {
    Shared(Vec<String>),
    PerDevice(DeviceEnvVarsConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceEnvVarsConfig {
    pub cpu: Vec<String>,
    pub cuda: Vec<String>,
    pub rocm: Vec<String>,
}

/// A port exposed through the platform proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPortConfig {
    pub proxy_port: u16,
    #[serde(default)]
    pub proxy_tcp: bool,
    #[serde(default)]
    pub unauthenticated: bool,
}

/// The `environment:` section of a command configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub image: Option<ImageConfig>,
    pub environment_variables: Option<EnvironmentVariablesConfig>,
    pub force_pull_image: bool,
    pub add_capabilities: Vec<String>,
    pub drop_capabilities: Vec<String>,
    pub proxy_ports: Vec<ProxyPortConfig>,
}

/// Fully resolved images, one per device type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageExpconf {
    pub cpu: String,
    pub cuda: String,
    pub rocm: String,
}

impl ImageExpconf {
    #[must_use]
    pub fn for_device(&self, device: DeviceType) -> &str {
        match device {
            DeviceType::Cpu => &self.cpu,
            DeviceType::Cuda => &self.cuda,
            DeviceType::Rocm => &self.rocm,
        }
    }
}

/// Fully resolved `KEY=VALUE` lists, one per device type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarsExpconf {
    pub cpu: Vec<String>,
    pub cuda: Vec<String>,
    pub rocm: Vec<String>,
}

impl EnvVarsExpconf {
    #[must_use]
    pub fn for_device(&self, device: DeviceType) -> &[String] {
        match device {
            DeviceType::Cpu => &self.cpu,
            DeviceType::Cuda => &self.cuda,
            DeviceType::Rocm => &self.rocm,
        }
    }
}

/// Execution form of the environment: every shorthand expanded, every
/// default filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentExpconf {
    pub image: ImageExpconf,
    pub environment_variables: EnvVarsExpconf,
    pub force_pull_image: bool,
    pub add_capabilities: Vec<String>,
    pub drop_capabilities: Vec<String>,
    pub proxy_ports: Vec<ProxyPortConfig>,
}

impl EnvironmentConfig {
    /// Expand into execution form.
    pub fn to_expconf(&self) -> Result<EnvironmentExpconf, TranslateError> {
        Ok(EnvironmentExpconf {
            image: resolve_images(self.image.as_ref()),
            environment_variables: resolve_env_vars(self.environment_variables.as_ref())?,
            force_pull_image: self.force_pull_image,
            add_capabilities: self.add_capabilities.clone(),
            drop_capabilities: self.drop_capabilities.clone(),
            proxy_ports: self.proxy_ports.clone(),
        })
    }
}

fn resolve_images(image: Option<&ImageConfig>) -> ImageExpconf {
    let pick = |value: Option<&String>, default: &str| {
        value.map_or_else(|| default.to_string(), Clone::clone)
    };
    match image {
        Some(ImageConfig::Shared(img)) => ImageExpconf {
            cpu: img.clone(),
            cuda: img.clone(),
            rocm: img.clone(),
        },
        Some(ImageConfig::PerDevice(d)) => ImageExpconf {
            cpu: pick(d.cpu.as_ref(), DEFAULT_CPU_IMAGE),
            cuda: pick(d.cuda.as_ref(), DEFAULT_CUDA_IMAGE),
            rocm: pick(d.rocm.as_ref(), DEFAULT_ROCM_IMAGE),
        },
        None => ImageExpconf {
            cpu: DEFAULT_CPU_IMAGE.to_string(),
            cuda: DEFAULT_CUDA_IMAGE.to_string(),
            rocm: DEFAULT_ROCM_IMAGE.to_string(),
        },
    }
}

fn resolve_env_vars(
    vars: Option<&EnvironmentVariablesConfig>,
) -> Result<EnvVarsExpconf, TranslateError> {
    let resolved = match vars {
        Some(EnvironmentVariablesConfig::Shared(list)) => EnvVarsExpconf {
            cpu: list.clone(),
            cuda: list.clone(),
            rocm: list.clone(),
        },
        Some(EnvironmentVariablesConfig::PerDevice(d)) => EnvVarsExpconf {
            cpu: d.cpu.clone(),
            cuda: d.cuda.clone(),
            rocm: d.rocm.clone(),
        },
        None => EnvVarsExpconf::default(),
    };
    for var in resolved
        .cpu
        .iter()
        .chain(&resolved.cuda)
        .chain(&resolved.rocm)
    {
        validate_env_var(var)?;
    }
    Ok(resolved)
}

fn validate_env_var(var: &str) -> Result<(), TranslateError> {
    match var.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(()),
        _ => Err(TranslateError::MalformedEnvVar(var.to_string())),
    }
}
