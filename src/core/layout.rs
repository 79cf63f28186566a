use serde::{Deserialize, Serialize};

use crate::core::{Dimension, Viewport};
use crate::error::{ChartError, ChartResult};

/// Width:height proportion of the outer chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub x: f64,
    pub y: f64,
}

impl AspectRatio {
    #[must_use]
    pub fn ratio(self) -> f64 {
        self.x / self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 20.0,
            left: 45.0,
            right: 20.0,
        }
    }
}

/// Responsive sizing rules: breakpoint, per-bucket aspect ratios and tick
/// densities, fixed margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPolicy {
    #[serde(default = "default_breakpoint_px")]
    pub breakpoint_px: u32,
    #[serde(default = "default_desktop_aspect")]
    pub desktop_aspect: AspectRatio,
    #[serde(default = "default_mobile_aspect")]
    pub mobile_aspect: AspectRatio,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_desktop_tick_count")]
    pub desktop_tick_count: usize,
    #[serde(default = "default_mobile_tick_count")]
    pub mobile_tick_count: usize,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            breakpoint_px: default_breakpoint_px(),
            desktop_aspect: default_desktop_aspect(),
            mobile_aspect: default_mobile_aspect(),
            margins: Margins::default(),
            desktop_tick_count: default_desktop_tick_count(),
            mobile_tick_count: default_mobile_tick_count(),
        }
    }
}

fn default_breakpoint_px() -> u32 {
    640
}

fn default_desktop_aspect() -> AspectRatio {
    AspectRatio { x: 16.0, y: 9.0 }
}

fn default_mobile_aspect() -> AspectRatio {
    AspectRatio { x: 4.0, y: 3.0 }
}

fn default_desktop_tick_count() -> usize {
    10
}

fn default_mobile_tick_count() -> usize {
    5
}

impl LayoutPolicy {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, aspect) in [("desktop", self.desktop_aspect), ("mobile", self.mobile_aspect)] {
            if !aspect.x.is_finite() || !aspect.y.is_finite() || aspect.x <= 0.0 || aspect.y <= 0.0
            {
                return Err(ChartError::Configuration(format!(
                    "{name} aspect ratio must be finite and > 0"
                )));
            }
        }
        let margins = self.margins;
        if [margins.top, margins.bottom, margins.left, margins.right]
            .iter()
            .any(|margin| !margin.is_finite() || *margin < 0.0)
        {
            return Err(ChartError::Configuration(
                "layout margins must be finite and >= 0".to_owned(),
            ));
        }
        if self.desktop_tick_count == 0 || self.mobile_tick_count == 0 {
            return Err(ChartError::Configuration(
                "tick counts must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn bucket_for(self, width: u32) -> AspectBucket {
        if width < self.breakpoint_px {
            AspectBucket::Mobile
        } else {
            AspectBucket::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectBucket {
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCounts {
    pub x: usize,
    pub y: usize,
}

/// Everything derived from one width notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub bucket: AspectBucket,
    pub aspect: AspectRatio,
    pub outer: Viewport,
    pub inner: Dimension,
    pub margins: Margins,
    pub tick_counts: TickCounts,
}

/// Translates a host width into a [`Layout`]. Stateless; the chart engine
/// stores the latest result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutEngine {
    policy: LayoutPolicy,
}

impl LayoutEngine {
    pub fn new(policy: LayoutPolicy) -> ChartResult<Self> {
        Ok(Self {
            policy: policy.validate()?,
        })
    }

    #[must_use]
    pub fn policy(self) -> LayoutPolicy {
        self.policy
    }

    pub fn compute(self, width: u32) -> ChartResult<Layout> {
        let bucket = self.policy.bucket_for(width);
        let (aspect, ticks) = match bucket {
            AspectBucket::Desktop => (self.policy.desktop_aspect, self.policy.desktop_tick_count),
            AspectBucket::Mobile => (self.policy.mobile_aspect, self.policy.mobile_tick_count),
        };

        let outer_height = (f64::from(width) / aspect.ratio()).round();
        let margins = self.policy.margins;
        let inner = Dimension::new(
            f64::from(width) - (margins.left + margins.right),
            outer_height - (margins.top + margins.bottom),
        );
        if !inner.is_valid() || outer_height > f64::from(u32::MAX) {
            return Err(ChartError::InvalidViewport {
                width: i64::from(width),
                height: outer_height as i64,
            });
        }

        Ok(Layout {
            bucket,
            aspect,
            outer: Viewport::new(width, outer_height as u32),
            inner,
            margins,
            tick_counts: TickCounts { x: ticks, y: ticks },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AspectBucket, LayoutEngine, LayoutPolicy};
    use crate::core::{Dimension, Viewport};

    #[test]
    fn desktop_width_uses_wide_aspect() {
        let layout = LayoutEngine::default().compute(1024).expect("layout");
        assert_eq!(layout.bucket, AspectBucket::Desktop);
        assert_eq!(layout.outer, Viewport::new(1024, 576));
        assert_eq!(layout.inner, Dimension::new(959.0, 546.0));
        assert_eq!(layout.tick_counts.x, 10);
    }

    #[test]
    fn narrow_width_switches_to_mobile() {
        let layout = LayoutEngine::default().compute(400).expect("layout");
        assert_eq!(layout.bucket, AspectBucket::Mobile);
        assert_eq!(layout.outer, Viewport::new(400, 300));
        assert_eq!(layout.inner, Dimension::new(335.0, 270.0));
        assert_eq!(layout.tick_counts.y, 5);
    }

    #[test]
    fn breakpoint_itself_is_desktop() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.compute(640).expect("layout").bucket, AspectBucket::Desktop);
        assert_eq!(engine.compute(639).expect("layout").bucket, AspectBucket::Mobile);
    }

    #[test]
    fn widths_smaller_than_margins_are_rejected() {
        assert!(LayoutEngine::default().compute(60).is_err());
        assert!(LayoutEngine::default().compute(0).is_err());
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: LayoutPolicy =
            serde_json::from_str(r#"{"breakpointPx": 480}"#).expect("policy json");
        assert_eq!(policy.breakpoint_px, 480);
        assert_eq!(policy.desktop_tick_count, 10);
    }
}
