//! Drop shadow and inner shadow.
//!
//! Both variants share one pipeline over a selection synthesized from the
//! source alpha: spread, blur, contour, noise, shift by the light offset,
//! optional knockout, then a colorized fill through the selection.
//!
//! The rectangle chain runs backwards from the requested rectangle:
//!
//! ```text
//! src_rect     = rect moved against the offset (need) or along it (change)
//! noise_need   = src_rect    + 8                      if noise > 0
//! blur_need    = noise_need  + kernel_half(blur)      if blur > 0
//! spread_need  = blur_need   + kernel_half(spread)    if spread > 0
//! ```
//!
//! Each pixel stage writes exactly the rectangle the next stage reads.
//!
//! An effect paints only its shadow. With `keep_original` the layer's own
//! pixels come from the source plane of the style stack, so `change_rect`
//! reports the shadow geometry alone.

use log::trace;

use super::config::{EffectKind, GlobalLight, ShadowConfig};
use super::{EffectAlgorithm, StyleEnvironment};
use crate::error::Result;
use crate::filters::blur::gaussian_blur_selection;
use crate::filters::contour::apply_contour_correction;
use crate::filters::core::grow_rect_from_radius;
use crate::filters::morphology::apply_spread;
use crate::filters::noise::{apply_noise, NOISE_NEED_BORDER};
use crate::geometry::{Point, Rect};
use crate::raster::{PaintDevice, Painter, Selection};

/// Which way the rectangle chain is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Output rectangle to source dependency.
    Need,
    /// Source change to affected output.
    Change,
}

/// Intermediate rectangles of one shadow evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRects {
    pub offset: Point,
    pub spread_size: i32,
    pub blur_size: i32,
    pub src_rect: Rect,
    pub noise_need_rect: Rect,
    pub blur_need_rect: Rect,
    pub spread_need_rect: Rect,
}

impl ShadowRects {
    pub fn new(
        rect: Rect,
        config: &ShadowConfig,
        light: &GlobalLight,
        direction: Direction,
    ) -> Self {
        let offset = config.offset(light);
        let spread_size = config.spread_size();
        let blur_size = config.blur_size();

        let src_rect = match direction {
            Direction::Need => rect.translated(offset.negated()),
            Direction::Change => rect.translated(offset),
        };

        let noise_need_rect = if config.noise > 0 {
            src_rect.grown(NOISE_NEED_BORDER)
        } else {
            src_rect
        };

        let blur_need_rect = if blur_size > 0 {
            grow_rect_from_radius(noise_need_rect, blur_size)
        } else {
            noise_need_rect
        };

        let spread_need_rect = if spread_size > 0 {
            grow_rect_from_radius(blur_need_rect, spread_size)
        } else {
            blur_need_rect
        };

        ShadowRects {
            offset,
            spread_size,
            blur_size,
            src_rect,
            noise_need_rect,
            blur_need_rect,
            spread_need_rect,
        }
    }

    /// The rectangle the final selection is knocked out over, before
    /// clipping to the destination.
    pub fn knockout_rect(&self, config: &ShadowConfig) -> Rect {
        if config.inverts_selection() {
            self.spread_need_rect
        } else {
            self.src_rect
        }
    }
}

/// Shadow algorithm for one effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowEffect {
    kind: EffectKind,
}

impl ShadowEffect {
    pub fn new(kind: EffectKind) -> Self {
        ShadowEffect { kind }
    }

    pub fn drop_shadow() -> Self {
        ShadowEffect::new(EffectKind::DropShadow)
    }

    pub fn inner_shadow() -> Self {
        ShadowEffect::new(EffectKind::InnerShadow)
    }

    /// Builds the shifted shadow stencil for `rect`.
    pub fn shadow_selection(
        &self,
        src: &PaintDevice,
        rect: Rect,
        config: &ShadowConfig,
        env: &StyleEnvironment,
    ) -> Result<Selection> {
        let rects = ShadowRects::new(rect, config, &env.light, Direction::Need);

        let mut selection = src.read_alpha(rects.spread_need_rect)?;
        if config.inverts_selection() {
            selection.invert();
        }

        let knockout = if config.knocks_out {
            Some(selection.clone())
        } else {
            None
        };

        apply_spread(
            &mut selection,
            rects.blur_need_rect,
            rects.spread_size,
            config.spread_edge_hidden(),
        );
        if rects.blur_size > 0 {
            gaussian_blur_selection(&mut selection, rects.noise_need_rect, rects.blur_size);
        }

        apply_contour_correction(
            &mut selection,
            rects.noise_need_rect,
            &config.contour_lookup_table,
            config.anti_aliased,
            config.edge_hidden(),
        );

        apply_noise(&mut selection, rects.src_rect, config.noise, &env.noise)?;

        selection.translate(rects.offset);

        if let Some(original) = knockout {
            let area = rects.knockout_rect(config).intersected(&rect);
            selection.erase(&original, area);
        }

        Ok(selection)
    }
}

impl EffectAlgorithm for ShadowEffect {
    fn kind(&self) -> EffectKind {
        self.kind
    }

    fn need_rect(&self, rect: Rect, config: &ShadowConfig, light: &GlobalLight) -> Rect {
        if !config.effect_enabled {
            return rect;
        }
        let rects = ShadowRects::new(rect, config, light, Direction::Need);
        rect.united(&rects.spread_need_rect)
    }

    fn change_rect(&self, rect: Rect, config: &ShadowConfig, light: &GlobalLight) -> Rect {
        if !config.effect_enabled {
            return rect;
        }
        let rects = ShadowRects::new(rect, config, light, Direction::Change);
        if light.keep_original {
            rects.spread_need_rect
        } else {
            rect.united(&rects.spread_need_rect)
        }
    }

    fn apply(
        &self,
        src: &PaintDevice,
        painter: &mut Painter<'_>,
        rect: Rect,
        config: &ShadowConfig,
        env: &StyleEnvironment,
    ) -> Result<()> {
        if !config.effect_enabled || rect.is_empty() {
            return Ok(());
        }
        trace!("{:?}: apply over {:?}", self.kind, rect);

        let mut selection = self.shadow_selection(src, rect, config, env)?;
        if config.inverts_selection() {
            selection.mask_with_alpha(src, rect);
        }
        painter.fill_selection(
            rect,
            config.color,
            &selection,
            config.blend_mode,
            config.opacity_u8(),
        );
        Ok(())
    }
}
