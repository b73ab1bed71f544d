//! Run configuration
//!
//! ```rust,ignore
//! use medserve_transform::config::TransformConfig;
//!
//! let config = TransformConfig::default().progress_interval(500);
//! let config = TransformConfig::from_yaml("transform.yaml")?;
//! ```

pub mod error;
pub mod transform_config;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use transform_config::{TransformConfig, CONFIG_VERSION};
pub use validation::Validatable;
