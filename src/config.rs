//! Configuration.
//!
//! Every field has a default, so a partial (or empty) TOML document is valid:
//!
//! ```toml
//! reload_policy = "reject"
//! height_offset = 2.0
//!
//! [viewport]
//! width = 400
//! height = 400
//! ```

use crate::component::Kind;
use crate::error::Result;
use crate::geometry::{size_format, Size};
use cgmath::Vector2;
use serde::{Deserialize, Serialize};

/// What a controller does with a reload issued while another is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadPolicy {
    /// Run it after the in-flight reload completes.
    Queue,
    /// Fail with [`Error::ReentrantReload`](crate::Error::ReentrantReload).
    Reject,
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        ReloadPolicy::Queue
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub reload_policy: ReloadPolicy,

    /// Extra height added to every measured list row.
    pub height_offset: f64,

    /// Row height for list items without a registered view or explicit size.
    pub list_item_height: f64,

    /// Cell height for grid items without a registered view or explicit size.
    pub grid_item_height: f64,

    /// Cell height for carousel items without a registered view or explicit size.
    pub carousel_item_height: f64,

    /// Initial controller viewport.
    #[serde(with = "size_format")]
    pub viewport: Size,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reload_policy: ReloadPolicy::default(),
            height_offset: 0.,
            list_item_height: 44.,
            grid_item_height: 88.,
            carousel_item_height: 88.,
            viewport: Vector2::new(320., 480.),
        }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Config> {
        Ok(toml::from_str(source)?)
    }

    /// Fallback item height for a spot variant.
    pub fn item_height(&self, kind: Kind) -> f64 {
        match kind {
            Kind::List => self.list_item_height,
            Kind::Grid => self.grid_item_height,
            Kind::Carousel => self.carousel_item_height,
        }
    }
}
