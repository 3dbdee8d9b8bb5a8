//! Header layout constants.
//!
//! A [`HeaderConfig`] carries every constant the geometry formulas read.
//! Build one from platform metrics with [`HeaderMetrics::for_platform`], load
//! one from TOML with [`HeaderConfig::from_toml_str`], or fill it in by hand
//! and call [`HeaderConfig::validate`].

use serde::Deserialize;

use crate::error::ConfigError;

// =============================================================================
// CONSTANTS
// =============================================================================

/// How far past the large height the header may stretch on overscroll.
pub const MAX_OVERSCROLL: f64 = 80.0;

/// Extra height of the large title row.
pub const LARGE_HEADER_TITLE_HEIGHT: f64 = 60.0;

/// Gap between the search input and the title block.
pub const SEARCH_INPUT_MARGIN: f64 = 5.0;

// =============================================================================
// PLATFORM METRICS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

impl Platform {
    /// Collapsed header height.
    pub const fn default_header_height(self) -> f64 {
        match self {
            Platform::Ios => 44.0,
            Platform::Android => 56.0,
        }
    }

    pub const fn search_input_height(self) -> f64 {
        match self {
            Platform::Ios => 36.0,
            Platform::Android => 40.0,
        }
    }
}

/// Derives header heights from platform metrics.
pub struct HeaderMetrics;

impl HeaderMetrics {
    /// Heights for a header on `platform`, with room for the search bar when
    /// `has_search` is set. The collapse distance is whatever the large
    /// header adds over the default one.
    pub fn for_platform(platform: Platform, has_search: bool) -> HeaderConfig {
        let default_height = platform.default_header_height();
        let search_input_height = platform.search_input_height();
        let search_block = if has_search {
            search_input_height + SEARCH_INPUT_MARGIN
        } else {
            0.0
        };
        let large_height = default_height + LARGE_HEADER_TITLE_HEIGHT + search_block;

        HeaderConfig {
            default_height,
            large_height,
            header_offset: large_height - default_height,
            max_overscroll: MAX_OVERSCROLL,
            search_input_height,
            search_input_margin: SEARCH_INPUT_MARGIN,
        }
    }
}

// =============================================================================
// HEADER CONFIG
// =============================================================================

/// Static layout constants of one header.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub default_height: f64,
    pub large_height: f64,
    /// Maximum collapse distance.
    pub header_offset: f64,
    pub max_overscroll: f64,
    pub search_input_height: f64,
    pub search_input_margin: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderMetrics::for_platform(Platform::Ios, false)
    }
}

impl HeaderConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    ///
    /// ```toml
    /// default_height = 56
    /// large_height = 116
    /// header_offset = 60
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: HeaderConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject constants that would produce nonsensical geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("default_height", self.default_height),
            ("large_height", self.large_height),
            ("header_offset", self.header_offset),
            ("max_overscroll", self.max_overscroll),
            ("search_input_height", self.search_input_height),
            ("search_input_margin", self.search_input_margin),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.default_height <= 0.0 {
            return Err(ConfigError::NonPositiveDefaultHeight(self.default_height));
        }
        if self.header_offset < 0.0 {
            return Err(ConfigError::NegativeHeaderOffset(self.header_offset));
        }
        if self.large_height < self.default_height {
            return Err(ConfigError::LargeBelowDefault {
                large: self.large_height,
                default: self.default_height,
            });
        }
        Ok(())
    }

    /// Upper bound of the container height.
    pub fn max_height(&self) -> f64 {
        self.large_height + self.max_overscroll
    }
}
