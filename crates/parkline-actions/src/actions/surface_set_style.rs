use crate::action::GameAction;
use crate::context::GameContext;
use crate::cost::{CostAccumulator, edge_change_cost, surface_change_cost};
use crate::flags::ActionFlags;
use crate::result::{ActionError, ExpenditureType, GameActionResult, Rejection};
use log::error;
use parkline_core::id::{EdgeStyle, SurfaceStyle, decode_style};
use parkline_core::registry::ObjectCategory;
use parkline_core::strings::StringId;
use parkline_map::{CoordsXY, CoordsXYZ, GRASS_LENGTH_CLEAR_0, MapRange};
use serde::{Deserialize, Serialize};

/// Re-texture the land in a rectangular range: surface style, edge style,
/// or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSetStyleAction {
    range: MapRange,
    /// `None` leaves the surface unchanged.
    surface_style: Option<SurfaceStyle>,
    /// `None` leaves the edge unchanged.
    edge_style: Option<EdgeStyle>,
    flags: ActionFlags,
}

/// What executing would do to one tile.
#[derive(Debug, Clone, Copy)]
struct TileChange {
    pos: CoordsXY,
    surface: Option<SurfaceStyle>,
    edge: Option<EdgeStyle>,
    reset_grass: bool,
}

#[derive(Debug, Default)]
struct SurfacePlan {
    changes: Vec<TileChange>,
}

impl SurfaceSetStyleAction {
    pub fn new(
        range: MapRange,
        surface_style: Option<SurfaceStyle>,
        edge_style: Option<EdgeStyle>,
    ) -> Self {
        Self {
            range,
            surface_style,
            edge_style,
            flags: ActionFlags::NONE,
        }
    }

    /// Decode raw network parameters, where 0xFF means "unchanged".
    pub fn from_raw(range: MapRange, surface_style: u8, edge_style: u8) -> Self {
        Self::new(
            range,
            decode_style(surface_style, SurfaceStyle),
            decode_style(edge_style, EdgeStyle),
        )
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn range(&self) -> MapRange {
        self.range
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), Rejection> {
        let invalid = || {
            Rejection::new(
                ActionError::InvalidParameters,
                StringId::CantChangeLandType,
                StringId::None,
            )
        };

        if let Some(style) = self.surface_style {
            if !style.in_range() {
                error!("invalid surface style {}", style.0);
                return Err(invalid());
            }
            if !ctx
                .objects
                .is_loaded(ObjectCategory::TerrainSurface, style.0 as u16)
            {
                error!("surface style {} is not loaded", style.0);
                return Err(invalid());
            }
        }

        if let Some(style) = self.edge_style {
            if !style.in_range() {
                error!("invalid edge style {}", style.0);
                return Err(invalid());
            }
            if !ctx
                .objects
                .is_loaded(ObjectCategory::TerrainEdge, style.0 as u16)
            {
                error!("edge style {} is not loaded", style.0);
                return Err(invalid());
            }
        }
        Ok(())
    }

    /// Validate, price and list the per-tile changes. Shared by query and
    /// execute so the two can never disagree on cost or position.
    fn plan(
        &self,
        ctx: &GameContext,
        result: &mut GameActionResult,
    ) -> Result<SurfacePlan, Rejection> {
        self.validate(ctx)?;

        let map = &ctx.world.map;
        let range = self.range.clamp_to_map(map.size_max_xy());
        let mid = range.midpoint();
        result.position = Some(CoordsXYZ::new(mid.x, mid.y, map.tile_height(mid)));

        let privileged = ctx.world.is_editor_or_sandbox();
        if !privileged && ctx.world.park.forbid_landscape_changes {
            return Err(Rejection::new(
                ActionError::Disallowed,
                StringId::CantChangeLandType,
                StringId::ForbiddenByTheLocalAuthority,
            ));
        }

        let mut cost = CostAccumulator::new();
        let mut plan = SurfacePlan::default();
        for pos in range.iter_tiles() {
            if !privileged && !map.is_location_in_park(pos) {
                continue;
            }
            let Some(surface) = map.surface_at(pos) else {
                continue;
            };

            let surface_change = self
                .surface_style
                .filter(|&style| style != surface.surface_style());
            let edge_change = self.edge_style.filter(|&style| style != surface.edge_style());
            cost.add(surface_change_cost(
                &ctx.objects,
                surface.surface_style(),
                surface_change,
            ));
            cost.add(edge_change_cost(surface.edge_style(), edge_change));

            let final_style = surface_change.unwrap_or(surface.surface_style());
            let can_grow = ctx
                .objects
                .surface(final_style)
                .is_some_and(|def| def.can_grow);
            let reset_grass = can_grow && surface.grass_stage() != GRASS_LENGTH_CLEAR_0;

            if surface_change.is_some() || edge_change.is_some() || reset_grass {
                plan.changes.push(TileChange {
                    pos,
                    surface: surface_change,
                    edge: edge_change,
                    reset_grass,
                });
            }
        }

        result.cost = cost.total();
        Ok(plan)
    }

    fn base_result() -> GameActionResult {
        GameActionResult::new(ExpenditureType::Landscaping, StringId::CantChangeLandType)
    }
}

impl GameAction for SurfaceSetStyleAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: ActionFlags) {
        self.flags = flags;
    }

    fn paused_result(&self) -> GameActionResult {
        Self::base_result().finish(Err(Rejection::paused()))
    }

    fn query(&self, ctx: &GameContext) -> GameActionResult {
        let mut result = Self::base_result();
        let outcome = self.plan(ctx, &mut result).map(|_| ());
        result.finish(outcome)
    }

    fn execute(&self, ctx: &mut GameContext) -> GameActionResult {
        let mut result = Self::base_result();
        let plan = match self.plan(ctx, &mut result) {
            Ok(plan) => plan,
            Err(rejection) => return result.finish(Err(rejection)),
        };

        let map = &mut ctx.world.map;
        for change in plan.changes {
            let height = map.tile_height(change.pos);
            let Some(surface) = map.surface_at_mut(change.pos) else {
                continue;
            };
            if let Some(style) = change.surface {
                surface.set_surface_style(style);
            }
            if let Some(style) = change.edge {
                surface.set_edge_style(style);
            }
            if change.reset_grass {
                surface.set_grass_length(GRASS_LENGTH_CLEAR_0);
            }
            if change.surface.is_some() {
                map.remove_litter(change.pos, height);
            }
            map.invalidate_tile(change.pos);
        }
        result
    }
}
