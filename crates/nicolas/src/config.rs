use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Process-wide layout constants.
///
/// Callers validate a config once (see [`LayoutConfig::validate`]); the layout functions trust it
/// and never re-check on each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub card_width: f64,
    /// Fixed stand-in for the rendered card height, which depends on how many fields a card
    /// shows and is only known at render time.
    pub estimated_card_height: f64,
    pub community_padding: f64,
    pub inter_community_gap: f64,
    pub intra_spacing_x: f64,
    pub intra_spacing_y: f64,
    /// Graphs with fewer nodes than this skip community detection entirely.
    pub min_community_size: usize,
    /// Graphs with at least this many nodes get a second (coarser) community level.
    pub large_graph_threshold: usize,
    pub leiden_resolution: f64,
    pub leiden_max_iterations: usize,
    pub sugiyama_iterations: usize,
    pub start_x: f64,
    pub start_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 300.0,
            estimated_card_height: 200.0,
            community_padding: 60.0,
            inter_community_gap: 120.0,
            intra_spacing_x: 350.0,
            intra_spacing_y: 280.0,
            min_community_size: 6,
            large_graph_threshold: 15,
            leiden_resolution: 1.0,
            leiden_max_iterations: 10,
            sugiyama_iterations: 4,
            start_x: 50.0,
            start_y: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Parses a (possibly partial) JSON object; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        positive("cardWidth", self.card_width)?;
        non_negative("estimatedCardHeight", self.estimated_card_height)?;
        non_negative("communityPadding", self.community_padding)?;
        non_negative("interCommunityGap", self.inter_community_gap)?;
        positive("intraSpacingX", self.intra_spacing_x)?;
        positive("intraSpacingY", self.intra_spacing_y)?;
        positive("leidenResolution", self.leiden_resolution)?;
        non_negative("startX", self.start_x)?;
        non_negative("startY", self.start_y)?;

        if self.min_community_size == 0 {
            return Err(Error::InvalidConfig {
                field: "minCommunitySize",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.large_graph_threshold < self.min_community_size {
            return Err(Error::InvalidConfig {
                field: "largeGraphThreshold",
                reason: format!(
                    "must not be below minCommunitySize ({})",
                    self.min_community_size
                ),
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::InvalidConfig {
            field,
            reason: format!("must be finite, got {v}"),
        });
    }
    if v < 0.0 {
        return Err(Error::InvalidConfig {
            field,
            reason: format!("must not be negative, got {v}"),
        });
    }
    Ok(())
}

fn positive(field: &'static str, v: f64) -> Result<()> {
    non_negative(field, v)?;
    if v == 0.0 {
        return Err(Error::InvalidConfig {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}
