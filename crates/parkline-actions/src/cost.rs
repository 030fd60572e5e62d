//! Per-tile cost deltas and their accumulation.
//!
//! Pure functions over current and requested state. Query and Execute both
//! run them fresh against the world as it is when they are called.

use parkline_core::fixed::{Money, money};
use parkline_core::id::{EdgeStyle, SurfaceStyle};
use parkline_core::registry::ObjectRegistry;

/// Flat fee for changing a tile's edge style.
pub const EDGE_CHANGE_FEE: i32 = 100;

/// Cost of changing a tile's surface from `current` to `requested`.
///
/// Zero when nothing is requested, when the style is unchanged, or when the
/// requested style is not loaded.
pub fn surface_change_cost(
    objects: &ObjectRegistry,
    current: SurfaceStyle,
    requested: Option<SurfaceStyle>,
) -> Money {
    match requested {
        Some(style) if style != current => objects
            .surface(style)
            .map(|def| def.price)
            .unwrap_or(Money::ZERO),
        _ => Money::ZERO,
    }
}

/// Cost of changing a tile's edge from `current` to `requested`.
pub fn edge_change_cost(current: EdgeStyle, requested: Option<EdgeStyle>) -> Money {
    match requested {
        Some(style) if style != current => money(EDGE_CHANGE_FEE),
        _ => Money::ZERO,
    }
}

/// Running total of an action's cost.
///
/// Saturates instead of wrapping so an absurd range can never produce a
/// negative total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostAccumulator {
    total: Money,
}

impl CostAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, amount: Money) {
        self.total = self.total.saturating_add(amount);
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkline_core::registry::ObjectRegistryBuilder;

    fn objects() -> ObjectRegistry {
        let mut b = ObjectRegistryBuilder::new();
        b.register_surface("grass", money(10), true);
        b.register_surface("sand", money(20), false);
        b.build().unwrap()
    }

    #[test]
    fn surface_cost_only_on_change() {
        let objects = objects();
        let grass = SurfaceStyle(0);
        let sand = SurfaceStyle(1);
        assert_eq!(surface_change_cost(&objects, grass, Some(sand)), money(20));
        assert_eq!(surface_change_cost(&objects, sand, Some(sand)), Money::ZERO);
        assert_eq!(surface_change_cost(&objects, grass, None), Money::ZERO);
    }

    #[test]
    fn edge_fee_is_flat() {
        assert_eq!(edge_change_cost(EdgeStyle(0), Some(EdgeStyle(3))), money(100));
        assert_eq!(edge_change_cost(EdgeStyle(3), Some(EdgeStyle(3))), Money::ZERO);
        assert_eq!(edge_change_cost(EdgeStyle(3), None), Money::ZERO);
    }

    #[test]
    fn accumulator_sums_and_saturates() {
        let mut acc = CostAccumulator::new();
        acc.add(money(20));
        acc.add(money(100));
        assert_eq!(acc.total(), money(120));
        acc.add(Money::MAX);
        assert_eq!(acc.total(), Money::MAX);
    }
}
