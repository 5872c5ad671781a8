//! Effect configuration and the layer style that aggregates it.
//!
//! Configurations are plain immutable values built once per style edit.
//! [`LayerStyle::from_store`] is the only place defaults are applied;
//! missing properties take the documented default, wrong-typed properties
//! and out-of-range values are logged and replaced or clamped. Styles built
//! in code go through [`LayerStyle::clamped`] with the same ranges before
//! they reach a plane.

use std::ops::RangeInclusive;

use log::warn;

use super::store::{ConfigStore, PropertyValue};
use crate::filters::contour::{LookupTable, PASS_THROUGH_TABLE};
use crate::geometry::Point;
use crate::raster::composite::percent_to_u8;
use crate::raster::{Color, CompositeOp};

pub const ANGLE_RANGE: RangeInclusive<i32> = -360..=360;
pub const PERCENT_RANGE: RangeInclusive<i32> = 0..=100;
pub const DISTANCE_RANGE: RangeInclusive<i32> = 0..=30000;
pub const SIZE_RANGE: RangeInclusive<i32> = 0..=250;

/// Clamps `value` into `range`, logging when it had to.
fn clamp_logged(name: &str, value: i32, range: &RangeInclusive<i32>) -> i32 {
    if range.contains(&value) {
        return value;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    warn!("{}: {} is out of range {:?}; clamped to {}", name, value, range, clamped);
    clamped
}

/// Effect kinds known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
}

/// Where an effect plane sits relative to the layer's own content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    Before,
    After,
}

impl EffectKind {
    /// Property name prefix in the configuration store.
    pub fn prefix(self) -> &'static str {
        match self {
            EffectKind::DropShadow => "drop_shadow",
            EffectKind::InnerShadow => "inner_shadow",
        }
    }

    pub fn stacking(self) -> Stacking {
        match self {
            EffectKind::DropShadow => Stacking::Before,
            EffectKind::InnerShadow => Stacking::After,
        }
    }
}

/// Which `edge_hidden` value the spread stage uses.
///
/// Using the configured value for a drop shadow turns the whole spread area
/// solid, so the hard-coded `true` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadEdgeMode {
    #[default]
    AlwaysHidden,
    FromConfig,
}

/// Light direction shared by effects that opt into the global light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalLight {
    /// Degrees.
    pub global_angle: i32,
    pub keep_original: bool,
}

impl Default for GlobalLight {
    fn default() -> Self {
        GlobalLight {
            global_angle: 120,
            keep_original: false,
        }
    }
}

/// Configuration of one shadow-style effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowConfig {
    pub kind: EffectKind,
    pub effect_enabled: bool,
    pub blend_mode: CompositeOp,
    pub color: Color,
    /// Percent, 0..=100.
    pub opacity: i32,
    /// Degrees.
    pub angle: i32,
    pub use_global_light: bool,
    /// Pixels.
    pub distance: i32,
    /// Percent of `size` used to grow the silhouette before blurring.
    pub spread: i32,
    /// Pixels.
    pub size: i32,
    pub contour_lookup_table: LookupTable,
    pub anti_aliased: bool,
    /// Percent, 0..=100.
    pub noise: i32,
    pub knocks_out: bool,
    pub spread_edge: SpreadEdgeMode,
}

impl ShadowConfig {
    pub fn drop_shadow() -> Self {
        ShadowConfig {
            kind: EffectKind::DropShadow,
            effect_enabled: false,
            blend_mode: CompositeOp::Multiply,
            color: Color::BLACK,
            opacity: 75,
            angle: 120,
            use_global_light: true,
            distance: 21,
            spread: 0,
            size: 21,
            contour_lookup_table: PASS_THROUGH_TABLE,
            anti_aliased: false,
            noise: 0,
            knocks_out: false,
            spread_edge: SpreadEdgeMode::AlwaysHidden,
        }
    }

    pub fn inner_shadow() -> Self {
        ShadowConfig {
            kind: EffectKind::InnerShadow,
            ..ShadowConfig::drop_shadow()
        }
    }

    pub fn for_kind(kind: EffectKind) -> Self {
        match kind {
            EffectKind::DropShadow => ShadowConfig::drop_shadow(),
            EffectKind::InnerShadow => ShadowConfig::inner_shadow(),
        }
    }

    /// The inner variant works on the inverted silhouette.
    pub fn inverts_selection(&self) -> bool {
        self.kind == EffectKind::InnerShadow
    }

    pub fn edge_hidden(&self) -> bool {
        self.kind == EffectKind::DropShadow
    }

    /// The edge flag used by the spread stage.
    pub fn spread_edge_hidden(&self) -> bool {
        match self.spread_edge {
            SpreadEdgeMode::AlwaysHidden => true,
            SpreadEdgeMode::FromConfig => self.edge_hidden(),
        }
    }

    pub fn effective_angle(&self, light: &GlobalLight) -> i32 {
        if self.use_global_light {
            light.global_angle
        } else {
            self.angle
        }
    }

    /// Displacement of the shadow silhouette.
    pub fn offset(&self, light: &GlobalLight) -> Point {
        let angle = (self.effective_angle(light) as f64).to_radians();
        let distance = self.distance as f64;
        Point::new(
            -(distance * angle.cos()).round() as i32,
            (distance * angle.sin()).round() as i32,
        )
    }

    /// Share of `size` spent on spreading, rounded.
    pub fn spread_size(&self) -> i32 {
        (self.spread * self.size + 50) / 100
    }

    pub fn blur_size(&self) -> i32 {
        self.size - self.spread_size()
    }

    pub fn opacity_u8(&self) -> u8 {
        percent_to_u8(self.opacity)
    }

    /// The same configuration with every numeric field inside the range
    /// the store would accept.
    pub fn clamped(self) -> Self {
        let prefix = self.kind.prefix();
        let field = |key: &str| format!("{}/{}", prefix, key);
        ShadowConfig {
            opacity: clamp_logged(&field("opacity"), self.opacity, &PERCENT_RANGE),
            angle: clamp_logged(&field("angle"), self.angle, &ANGLE_RANGE),
            distance: clamp_logged(&field("distance"), self.distance, &DISTANCE_RANGE),
            spread: clamp_logged(&field("spread"), self.spread, &PERCENT_RANGE),
            size: clamp_logged(&field("size"), self.size, &SIZE_RANGE),
            noise: clamp_logged(&field("noise"), self.noise, &PERCENT_RANGE),
            ..self
        }
    }

    /// Reads the configuration for `kind` from `store`.
    pub fn from_store(store: &dyn ConfigStore, kind: EffectKind) -> Self {
        let defaults = ShadowConfig::for_kind(kind);
        let reader = PropertyReader {
            store,
            prefix: kind.prefix(),
        };

        let mut contour_lookup_table = defaults.contour_lookup_table;
        for (i, value) in contour_lookup_table.iter_mut().enumerate() {
            let key = format!("contour_lookup_table/value_{}", i);
            *value = reader.int(&key, *value as i32, 0..=255) as u8;
        }

        let knocks_out = match kind {
            EffectKind::DropShadow => reader.bool("knocks_out", defaults.knocks_out),
            EffectKind::InnerShadow => false,
        };

        let spread_edge = if reader.bool("honor_edge_hidden_in_spread", false) {
            SpreadEdgeMode::FromConfig
        } else {
            SpreadEdgeMode::AlwaysHidden
        };

        ShadowConfig {
            kind,
            effect_enabled: reader.bool("effect_enable", defaults.effect_enabled),
            blend_mode: reader.blend_mode("blend_mode", defaults.blend_mode),
            color: reader.color("color", defaults.color),
            opacity: reader.int("opacity", defaults.opacity, PERCENT_RANGE),
            angle: reader.int("angle", defaults.angle, ANGLE_RANGE),
            use_global_light: reader.bool("use_global_light", defaults.use_global_light),
            distance: reader.int("distance", defaults.distance, DISTANCE_RANGE),
            spread: reader.int("spread", defaults.spread, PERCENT_RANGE),
            size: reader.int("size", defaults.size, SIZE_RANGE),
            contour_lookup_table,
            anti_aliased: reader.bool("anti_aliased", defaults.anti_aliased),
            noise: reader.int("noise", defaults.noise, PERCENT_RANGE),
            knocks_out,
            spread_edge,
        }
    }
}

/// All effects of one layer plus their shared context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStyle {
    pub light: GlobalLight,
    pub drop_shadow: ShadowConfig,
    pub inner_shadow: ShadowConfig,
    /// Seed for the noise stage of every effect in this style.
    pub noise_seed: u64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        LayerStyle {
            light: GlobalLight::default(),
            drop_shadow: ShadowConfig::drop_shadow(),
            inner_shadow: ShadowConfig::inner_shadow(),
            noise_seed: 0,
        }
    }
}

impl LayerStyle {
    /// Effects in registration order.
    pub fn effects(&self) -> [&ShadowConfig; 2] {
        [&self.drop_shadow, &self.inner_shadow]
    }

    pub fn has_enabled_effects(&self) -> bool {
        self.effects().iter().any(|e| e.effect_enabled)
    }

    /// The same style with every effect clamped like [`from_store`](Self::from_store) does.
    pub fn clamped(self) -> Self {
        LayerStyle {
            light: GlobalLight {
                global_angle: clamp_logged(
                    "context/global_angle",
                    self.light.global_angle,
                    &ANGLE_RANGE,
                ),
                ..self.light
            },
            drop_shadow: self.drop_shadow.clamped(),
            inner_shadow: self.inner_shadow.clamped(),
            noise_seed: self.noise_seed,
        }
    }

    pub fn from_store(store: &dyn ConfigStore) -> Self {
        let reader = PropertyReader {
            store,
            prefix: "context",
        };
        let light = GlobalLight {
            global_angle: reader.int("global_angle", 120, ANGLE_RANGE),
            keep_original: reader.bool("keep_original", false),
        };
        let noise_seed = reader.int("noise_seed", 0, 0..=i32::MAX) as u64;

        LayerStyle {
            light,
            drop_shadow: ShadowConfig::from_store(store, EffectKind::DropShadow),
            inner_shadow: ShadowConfig::from_store(store, EffectKind::InnerShadow),
            noise_seed,
        }
    }
}

struct PropertyReader<'a> {
    store: &'a dyn ConfigStore,
    prefix: &'a str,
}

impl PropertyReader<'_> {
    fn lookup(&self, key: &str) -> (String, Option<PropertyValue>) {
        let name = format!("{}/{}", self.prefix, key);
        let value = self.store.get(&name);
        (name, value)
    }

    fn bool(&self, key: &str, default: bool) -> bool {
        match self.lookup(key) {
            (_, None) => default,
            (_, Some(PropertyValue::Bool(v))) => v,
            (name, Some(other)) => {
                warn!("{}: expected bool, got {}; using {}", name, other.type_name(), default);
                default
            }
        }
    }

    fn int(&self, key: &str, default: i32, range: RangeInclusive<i32>) -> i32 {
        match self.lookup(key) {
            (_, None) => default,
            (name, Some(PropertyValue::Int(v))) => clamp_logged(&name, v, &range),
            (name, Some(other)) => {
                warn!("{}: expected int, got {}; using {}", name, other.type_name(), default);
                default
            }
        }
    }

    fn color(&self, key: &str, default: Color) -> Color {
        match self.lookup(key) {
            (_, None) => default,
            (_, Some(PropertyValue::Color(c))) => c,
            (name, Some(PropertyValue::Text(text))) => Color::from_hex(&text).unwrap_or_else(|| {
                warn!("{}: cannot parse color {:?}; using {}", name, text, default);
                default
            }),
            (name, Some(other)) => {
                warn!("{}: expected color, got {}; using {}", name, other.type_name(), default);
                default
            }
        }
    }

    fn blend_mode(&self, key: &str, default: CompositeOp) -> CompositeOp {
        match self.lookup(key) {
            (_, None) => default,
            (name, Some(PropertyValue::Text(id))) => CompositeOp::from_id(&id).unwrap_or_else(|| {
                warn!("{}: unknown blend mode {:?}; using {}", name, id, default.id());
                default
            }),
            (name, Some(other)) => {
                warn!("{}: expected text, got {}; using {}", name, other.type_name(), default.id());
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer_effects::store::PropertyBag;

    #[test]
    fn test_offset_follows_angle() {
        let light = GlobalLight::default();
        let mut cfg = ShadowConfig::drop_shadow();
        cfg.use_global_light = false;
        cfg.distance = 10;

        cfg.angle = 0;
        assert_eq!(cfg.offset(&light), Point::new(-10, 0));

        cfg.angle = 90;
        assert_eq!(cfg.offset(&light), Point::new(0, 10));

        cfg.angle = 180;
        assert_eq!(cfg.offset(&light), Point::new(10, 0));
    }

    #[test]
    fn test_global_light_overrides_angle() {
        let light = GlobalLight {
            global_angle: 90,
            keep_original: false,
        };
        let mut cfg = ShadowConfig::drop_shadow();
        cfg.angle = 0;
        cfg.distance = 7;
        assert_eq!(cfg.effective_angle(&light), 90);
        assert_eq!(cfg.offset(&light), Point::new(0, 7));
        cfg.use_global_light = false;
        assert_eq!(cfg.effective_angle(&light), 0);
    }

    #[test]
    fn test_spread_and_blur_sizes() {
        let mut cfg = ShadowConfig::drop_shadow();
        cfg.size = 10;
        cfg.spread = 80;
        assert_eq!(cfg.spread_size(), 8);
        assert_eq!(cfg.blur_size(), 2);

        cfg.size = 7;
        cfg.spread = 1;
        assert_eq!(cfg.spread_size(), 0);
        assert_eq!(cfg.blur_size(), 7);

        cfg.size = 15;
        cfg.spread = 10;
        assert_eq!(cfg.spread_size(), 2);
    }

    #[test]
    fn test_variant_constants() {
        let drop = ShadowConfig::drop_shadow();
        assert!(!drop.inverts_selection());
        assert!(drop.edge_hidden());
        let inner = ShadowConfig::inner_shadow();
        assert!(inner.inverts_selection());
        assert!(!inner.edge_hidden());
        assert!(inner.spread_edge_hidden());
        let honest = ShadowConfig {
            spread_edge: SpreadEdgeMode::FromConfig,
            ..ShadowConfig::inner_shadow()
        };
        assert!(!honest.spread_edge_hidden());
    }

    #[test]
    fn test_empty_store_gives_defaults() {
        let style = LayerStyle::from_store(&PropertyBag::new());
        assert_eq!(style, LayerStyle::default());
    }

    #[test]
    fn test_from_store_reads_and_clamps() {
        let mut bag = PropertyBag::new();
        bag.set("drop_shadow/effect_enable", true)
            .set("drop_shadow/blend_mode", "screen")
            .set("drop_shadow/color", "#336699")
            .set("drop_shadow/opacity", 140)
            .set("drop_shadow/size", 15)
            .set("drop_shadow/noise", "loud")
            .set("drop_shadow/contour_lookup_table/value_3", 17)
            .set("inner_shadow/knocks_out", true)
            .set("inner_shadow/blend_mode", "no_such_mode")
            .set("context/global_angle", 45)
            .set("context/keep_original", true)
            .set("context/noise_seed", 77);

        let style = LayerStyle::from_store(&bag);
        let drop = &style.drop_shadow;
        assert!(drop.effect_enabled);
        assert_eq!(drop.blend_mode, CompositeOp::Screen);
        assert_eq!(drop.color, Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(drop.opacity, 100);
        assert_eq!(drop.size, 15);
        assert_eq!(drop.noise, 0);
        assert_eq!(drop.contour_lookup_table[3], 17);
        assert_eq!(drop.contour_lookup_table[4], 255);

        let inner = &style.inner_shadow;
        assert!(!inner.knocks_out);
        assert_eq!(inner.blend_mode, CompositeOp::Multiply);
        assert!(!inner.effect_enabled);

        assert_eq!(style.light.global_angle, 45);
        assert!(style.light.keep_original);
        assert_eq!(style.noise_seed, 77);
    }

    #[test]
    fn test_clamped_matches_store_ranges() {
        let wild = ShadowConfig {
            opacity: -5,
            angle: 1000,
            distance: i32::MAX,
            spread: 400,
            size: i32::MIN,
            noise: 101,
            ..ShadowConfig::inner_shadow()
        }
        .clamped();
        assert_eq!(wild.opacity, 0);
        assert_eq!(wild.angle, 360);
        assert_eq!(wild.distance, 30000);
        assert_eq!(wild.spread, 100);
        assert_eq!(wild.size, 0);
        assert_eq!(wild.noise, 100);
        assert_eq!(wild.kind, EffectKind::InnerShadow);

        let mut bag = PropertyBag::new();
        bag.set("drop_shadow/distance", i32::MAX);
        let stored = LayerStyle::from_store(&bag);
        let built = LayerStyle {
            drop_shadow: ShadowConfig {
                distance: i32::MAX,
                ..ShadowConfig::drop_shadow()
            },
            ..LayerStyle::default()
        }
        .clamped();
        assert_eq!(stored, built);

        let style = LayerStyle::default();
        assert_eq!(style.clone().clamped(), style);
    }

    #[test]
    fn test_stacking_order() {
        assert_eq!(EffectKind::DropShadow.stacking(), Stacking::Before);
        assert_eq!(EffectKind::InnerShadow.stacking(), Stacking::After);
    }
}
