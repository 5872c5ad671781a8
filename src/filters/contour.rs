//! Contour correction: remaps a selection's falloff through a 256-entry table.
//!
//! The user table is a gain per level (255 = unity), so the effective user
//! curve is `u(i) = i * table[q(i)] / 255` and the all-255 table is a
//! pass-through. With the edge hidden, `u(i)` is further multiplied by the
//! built-in falloff curve (`>> 8` fixed point). Without anti-aliasing the
//! table index is quantized to 2.55 steps, which gives 101 bands.

use crate::geometry::Rect;
use crate::raster::composite::mul_u8;
use crate::raster::Selection;

pub const LOOKUP_TABLE_SIZE: usize = 256;

/// 256-entry u8 lookup table.
pub type LookupTable = [u8; LOOKUP_TABLE_SIZE];

/// Table that leaves every level unchanged.
pub const PASS_THROUGH_TABLE: LookupTable = [255; LOOKUP_TABLE_SIZE];

const fn build_falloff() -> LookupTable {
    let mut table = [0u8; LOOKUP_TABLE_SIZE];
    let mut i = 0;
    while i < LOOKUP_TABLE_SIZE {
        let v = i * 11;
        table[i] = if v > 255 { 255 } else { v as u8 };
        i += 1;
    }
    table
}

/// Built-in falloff: a steep ramp that reaches full coverage at level 24.
pub const FALLOFF_TABLE: LookupTable = build_falloff();

/// Index quantization used when anti-aliasing is off.
#[inline]
fn quantize_index(i: usize) -> usize {
    let step = (i as f64 / 2.55) as i32 as f64;
    ((step * 2.55 + 0.5) as usize).min(LOOKUP_TABLE_SIZE - 1)
}

/// Composes the final remap table.
///
/// `user` holds gains, not curve values. Tables persisted as curves under
/// the `contour_lookup_table/value_<i>` keys (identity `i` by default) are
/// not value-compatible and must be converted before use.
pub fn build_contour(user: &LookupTable, anti_aliased: bool, edge_hidden: bool) -> LookupTable {
    let mut contour = [0u8; LOOKUP_TABLE_SIZE];
    for (i, out) in contour.iter_mut().enumerate() {
        let idx = if anti_aliased { i } else { quantize_index(i) };
        let user_level = mul_u8(i as u8, user[idx]);
        *out = if edge_hidden {
            ((FALLOFF_TABLE[i] as u32 * user_level as u32) >> 8) as u8
        } else {
            user_level
        };
    }
    contour
}

/// Remaps every selection value inside `rect`.
pub fn apply_contour_correction(
    selection: &mut Selection,
    rect: Rect,
    user: &LookupTable,
    anti_aliased: bool,
    edge_hidden: bool,
) {
    let contour = build_contour(user, anti_aliased, edge_hidden);
    selection.map_rect(rect, |v| contour[v as usize]);
}
