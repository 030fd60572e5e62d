use crate::action::GameAction;
use crate::actions::{
    RideDemolishAction, RideSetNameAction, RideSetSettingAction, RideSetVehicleAction,
    RideSetVehicleType, RideSetting,
};
use crate::context::GameContext;
use crate::dispatcher::GameActions;
use crate::flags::ActionFlags;
use crate::result::{ActionError, ExpenditureType, GameActionResult, Rejection};
use log::{debug, warn};
use parkline_core::fixed::Money;
use parkline_core::id::{RideEntryIndex, RideId};
use parkline_core::strings::StringId;
use parkline_map::{COORDS_XY_HALF_TILE, CoordsXYZ};
use parkline_ride::design::TrackDesign;
use parkline_ride::placement::{CommitMode, PlacementError, PlacementRequest};
use parkline_ride::ride::{
    MAX_VEHICLES_PER_RIDE, NUM_COLOUR_SCHEMES, RIDE_LIFECYCLE_NOT_CUSTOM_DESIGN, TrackColour,
};
use serde::{Deserialize, Serialize};

/// Place a saved track design as a new ride.
///
/// Composite action: resolves the vehicle entry, creates the ride, places
/// the track (with scenery if every scenery object is available), then
/// configures the new ride from the design. A placement failure after the
/// ride exists demolishes it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDesignAction {
    loc: CoordsXYZ,
    design: TrackDesign,
    flags: ActionFlags,
}

impl TrackDesignAction {
    pub fn new(loc: CoordsXYZ, design: TrackDesign) -> Self {
        Self {
            loc,
            design,
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn design(&self) -> &TrackDesign {
        &self.design
    }

    fn base_result(&self) -> GameActionResult {
        let mut result =
            GameActionResult::new(ExpenditureType::RideConstruction, StringId::CantPlaceTrackDesign);
        result.position = Some(CoordsXYZ::new(
            self.loc.x.saturating_add(COORDS_XY_HALF_TILE),
            self.loc.y.saturating_add(COORDS_XY_HALF_TILE),
            self.loc.z,
        ));
        result
    }

    fn check_paused(&self, ctx: &GameContext) -> Result<(), Rejection> {
        if !self.flags.contains(ActionFlags::ALLOW_DURING_PAUSE)
            && ctx.world.is_paused_for_construction()
        {
            return Err(Rejection::paused());
        }
        Ok(())
    }

    /// The loaded entry the design's vehicle object maps to, if it may be used.
    ///
    /// For ride types with variant groups, an unusable entry falls back to
    /// the first usable entry (registry order) in the same group as the
    /// design's vehicle object. `None` lets ride creation pick a default.
    fn resolve_entry(&self, ctx: &GameContext) -> Option<RideEntryIndex> {
        let name = &self.design.vehicle_object;
        let entry = ctx
            .objects
            .ride_entry_by_name(name)
            .filter(|&entry| ctx.is_entry_available(entry));
        if entry.is_some() || !ctx.objects.ride_type_has_groups(self.design.ride_type) {
            return entry;
        }

        let item = ctx.objects.repository_item(name)?;
        ctx.objects
            .ride_entries_for_type(self.design.ride_type)
            .filter(|&(index, _)| ctx.is_entry_available(index))
            .find(|(_, def)| def.ride_group == item.ride_group)
            .map(|(index, _)| index)
    }

    fn request(&self, ctx: &GameContext, include_scenery: bool) -> PlacementRequest<'_> {
        PlacementRequest {
            design: &self.design,
            origin: self.loc,
            include_scenery,
            ignore_ownership: ctx.world.is_editor_or_sandbox(),
        }
    }

    /// Price the placement, first with scenery and, if some scenery object
    /// is unavailable, again without. Returns the cost and whether scenery
    /// is included.
    fn query_placement(&self, ctx: &GameContext) -> Result<(Money, bool), PlacementError> {
        let with_scenery = self.request(ctx, true);
        match ctx.placer.query(&ctx.world.map, &ctx.objects, &with_scenery) {
            Err(PlacementError::SceneryUnavailable(object)) => {
                debug!("scenery object '{object}' unavailable, placing design without scenery");
                let without = self.request(ctx, false);
                ctx.placer
                    .query(&ctx.world.map, &ctx.objects, &without)
                    .map(|cost| (cost, false))
            }
            other => other.map(|cost| (cost, true)),
        }
    }

    fn placement_rejection(error: &PlacementError) -> Rejection {
        Rejection::new(
            ActionError::Disallowed,
            StringId::CantPlaceTrackDesign,
            error.reason(),
        )
    }

    /// Undo a ride created earlier in this execute.
    fn demolish(&self, ctx: &mut GameContext, ride: RideId) {
        debug!("placement failed, demolishing ride {ride:?}");
        let result =
            GameActions::execute_nested(ctx, RideDemolishAction::new(ride).with_flags(self.flags));
        if let Some(error) = result.error {
            debug!("demolishing ride {ride:?} failed: {error}");
        }
    }

    fn run_query(&self, ctx: &GameContext, result: &mut GameActionResult) -> Result<(), Rejection> {
        self.check_paused(ctx)?;
        let entry = self.resolve_entry(ctx);
        ctx.world
            .rides
            .check_create(self.design.ride_type, entry, &ctx.objects, |e| {
                ctx.is_entry_available(e)
            })
            .map_err(|e| {
                Rejection::new(
                    ActionError::NoFreeElements,
                    StringId::CantCreateNewRideAttraction,
                    e.reason(),
                )
            })?;

        let (cost, _) = self
            .query_placement(ctx)
            .map_err(|e| Self::placement_rejection(&e))?;
        result.cost = cost;
        Ok(())
    }

    fn run_execute(
        &self,
        ctx: &mut GameContext,
        result: &mut GameActionResult,
    ) -> Result<(), Rejection> {
        self.check_paused(ctx)?;
        let entry = self.resolve_entry(ctx);

        let ignore_research = ctx.world.cheats.ignore_research_status;
        let research = &ctx.world.research;
        let (ride, _) = ctx
            .world
            .rides
            .create(self.design.ride_type, entry, &ctx.objects, |e| {
                ignore_research || research.is_invented(e)
            })
            .map_err(|e| {
                Rejection::new(
                    ActionError::NoFreeElements,
                    StringId::CantCreateNewRideAttraction,
                    e.reason(),
                )
            })?;

        if !ctx.world.rides.contains(ride) {
            warn!("created ride {ride:?} is not retrievable");
            return Err(Rejection::new(
                ActionError::Unknown,
                StringId::CantCreateNewRideAttraction,
                StringId::None,
            ));
        }

        let include_scenery = match self.query_placement(ctx) {
            Ok((_, include_scenery)) => include_scenery,
            Err(e) => {
                self.demolish(ctx, ride);
                return Err(Self::placement_rejection(&e));
            }
        };

        let mode = if self.flags.contains(ActionFlags::GHOST) {
            CommitMode::Ghost
        } else {
            CommitMode::Place
        };
        let request = self.request(ctx, include_scenery);
        let committed =
            ctx.placer
                .commit(&mut ctx.world.map, &ctx.objects, &request, ride, mode);
        let cost = match committed {
            Ok(cost) => cost,
            Err(e) => {
                self.demolish(ctx, ride);
                return Err(Self::placement_rejection(&e));
            }
        };

        self.configure(ctx, ride, entry);
        result.cost = cost;
        result.ride = Some(ride);
        Ok(())
    }

    /// Apply the design's configuration to the new ride. Steps are
    /// independent; a failed step is logged and the rest still run.
    fn configure(&self, ctx: &mut GameContext, ride: RideId, entry: Option<RideEntryIndex>) {
        let design = &self.design;
        let flags = self.flags;

        if let Some(entry) = entry {
            let colour = ctx.world.rides.unused_preset_vehicle_colour(entry, &ctx.objects);
            let action = RideSetVehicleAction::ride_entry(ride, entry, colour).with_flags(flags);
            log_step(ride, "ride entry", GameActions::execute_nested(ctx, action));
        }

        let setting = |setting, value| RideSetSettingAction::new(ride, setting, value).with_flags(flags);
        let vehicle = |kind, value: u8| {
            RideSetVehicleAction::new(ride, kind, value as u16).with_flags(flags)
        };

        let num_circuits = if design.num_circuits == 0 {
            1
        } else {
            design.num_circuits
        };

        log_step(
            ride,
            "mode",
            GameActions::execute_nested(ctx, setting(RideSetting::Mode, design.ride_mode)),
        );
        log_step(
            ride,
            "number of trains",
            GameActions::execute_nested(
                ctx,
                vehicle(RideSetVehicleType::NumTrains, design.number_of_trains),
            ),
        );
        log_step(
            ride,
            "cars per train",
            GameActions::execute_nested(
                ctx,
                vehicle(
                    RideSetVehicleType::NumCarsPerTrain,
                    design.number_of_cars_per_train,
                ),
            ),
        );
        for (name, kind, value) in [
            ("departure", RideSetting::Departure, design.depart_flags),
            ("min waiting time", RideSetting::MinWaitingTime, design.min_waiting_time),
            ("max waiting time", RideSetting::MaxWaitingTime, design.max_waiting_time),
            ("operation", RideSetting::Operation, design.operation_setting),
            ("lift hill speed", RideSetting::LiftHillSpeed, design.lift_hill_speed & 0x1F),
            ("circuits", RideSetting::NumCircuits, num_circuits),
        ] {
            log_step(ride, name, GameActions::execute_nested(ctx, setting(kind, value)));
        }

        if let Some(r) = ctx.world.rides.get_mut(ride) {
            r.set_to_default_inspection_interval();
            r.lifecycle_flags |= RIDE_LIFECYCLE_NOT_CUSTOM_DESIGN;
            r.colour_scheme_type = design.colour_scheme;
            r.entrance_style = design.entrance_style;
            for i in 0..NUM_COLOUR_SCHEMES {
                r.track_colours[i] = TrackColour {
                    main: design.track_spine_colour[i],
                    additional: design.track_rail_colour[i],
                    supports: design.track_support_colour[i],
                };
            }
            for i in 0..MAX_VEHICLES_PER_RIDE {
                r.vehicle_colours[i] = design.vehicle_colour(i);
            }
        }

        let rename = RideSetNameAction::new(ride, design.name.clone()).with_flags(flags);
        log_step(ride, "name", GameActions::execute_nested(ctx, rename));
    }
}

fn log_step(ride: RideId, step: &str, result: GameActionResult) {
    if let Some(error) = result.error {
        debug!(
            "configuring {step} of ride {ride:?} failed ({error}, {:?}); continuing",
            result.error_message
        );
    }
}

impl GameAction for TrackDesignAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: ActionFlags) {
        self.flags = flags;
    }

    fn paused_result(&self) -> GameActionResult {
        self.base_result().finish(Err(Rejection::paused()))
    }

    fn query(&self, ctx: &GameContext) -> GameActionResult {
        let mut result = self.base_result();
        let outcome = self.run_query(ctx, &mut result);
        result.finish(outcome)
    }

    fn execute(&self, ctx: &mut GameContext) -> GameActionResult {
        let mut result = self.base_result();
        let outcome = self.run_execute(ctx, &mut result);
        result.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use parkline_core::fixed::money;
    use parkline_core::id::RideType;
    use parkline_core::registry::ObjectRegistry;
    use parkline_map::{TileElement, TileMap, TrackElement};
    use parkline_ride::placement::TrackPlacer;
    use parkline_ride::ride::InspectionInterval;

    /// Prices every request but refuses to build anything.
    struct RefusingPlacer;

    impl TrackPlacer for RefusingPlacer {
        fn query(
            &self,
            _map: &TileMap,
            _objects: &ObjectRegistry,
            _request: &PlacementRequest<'_>,
        ) -> Result<Money, PlacementError> {
            Ok(money(50))
        }

        fn commit(
            &self,
            _map: &mut TileMap,
            _objects: &ObjectRegistry,
            _request: &PlacementRequest<'_>,
            _ride: RideId,
            _mode: CommitMode,
        ) -> Result<Money, PlacementError> {
            Err(PlacementError::TooHigh { x: 320, y: 320 })
        }
    }

    fn action() -> TrackDesignAction {
        TrackDesignAction::new(standard_origin(), standard_design())
    }

    #[test]
    fn query_prices_without_creating_ride() {
        let ctx = standard_context();
        let before = ctx.world.state_hash();
        let result = action().query(&ctx);
        assert!(result.is_ok(), "{result:?}");
        assert!(result.cost > Money::ZERO);
        assert!(ctx.world.rides.is_empty());
        assert_eq!(ctx.world.state_hash(), before);
    }

    #[test]
    fn query_and_execute_report_same_cost_and_position() {
        let mut ctx = standard_context();
        let queried = action().query(&ctx);
        let executed = action().execute(&mut ctx);
        assert!(executed.is_ok(), "{executed:?}");
        assert_eq!(queried.cost, executed.cost);
        assert_eq!(queried.position, executed.position);
        let origin = standard_origin();
        assert_eq!(
            executed.position,
            Some(CoordsXYZ::new(origin.x + 16, origin.y + 16, origin.z))
        );
        assert_eq!(executed.expenditure, ExpenditureType::RideConstruction);
    }

    #[test]
    fn execute_creates_configured_ride() {
        let mut ctx = standard_context();
        let mut design = standard_design();
        design.num_circuits = 0;
        design.lift_hill_speed = 0xE5;
        design.ride_mode = 4;
        design.number_of_trains = 2;
        design.min_waiting_time = 15;
        design.max_waiting_time = 45;
        design.track_spine_colour = [1, 2, 3, 4];
        design.track_rail_colour = [5, 6, 7, 8];
        design.track_support_colour = [9, 10, 11, 12];
        let result = TrackDesignAction::new(standard_origin(), design).execute(&mut ctx);
        let id = result.ride.unwrap();
        let ride = ctx.world.rides.get(id).unwrap();

        assert_eq!(ride.num_circuits, 1);
        assert_eq!(ride.lift_hill_speed, 0x05);
        assert_eq!(ride.mode, 4);
        assert_eq!(ride.num_trains, 2);
        assert_eq!((ride.min_waiting_time, ride.max_waiting_time), (15, 45));
        assert_eq!(ride.entry, wooden_cars());
        assert_eq!(ride.name, "Timber Wolf");
        assert_eq!(ride.inspection_interval, InspectionInterval::default());
        assert_ne!(ride.lifecycle_flags & RIDE_LIFECYCLE_NOT_CUSTOM_DESIGN, 0);
        assert_eq!(
            ride.track_colours[2],
            TrackColour {
                main: 3,
                additional: 7,
                supports: 11
            }
        );
        assert_eq!(ride.vehicle_colours[0], standard_design().vehicle_colours[0]);
    }

    #[test]
    fn execute_places_track_for_ride() {
        let mut ctx = standard_context();
        let result = action().execute(&mut ctx);
        let id = result.ride.unwrap();
        let origin = standard_origin().xy();
        let placed = ctx
            .world
            .map
            .elements_at(origin)
            .iter()
            .filter_map(TileElement::as_track)
            .any(|t| t.ride == id && !t.ghost);
        assert!(placed);
    }

    #[test]
    fn ghost_placement_flags_elements() {
        let mut ctx = standard_context();
        let result = action().with_flags(ActionFlags::GHOST).execute(&mut ctx);
        assert!(result.is_ok());
        assert!(
            ctx.world
                .map
                .elements_at(standard_origin().xy())
                .iter()
                .filter_map(TileElement::as_track)
                .all(|t| t.ghost)
        );
    }

    #[test]
    fn paused_game_rejects_placement() {
        let mut ctx = standard_context();
        ctx.world.paused = true;
        let result = action().execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::GamePaused));
        assert!(ctx.world.rides.is_empty());

        let result = action()
            .with_flags(ActionFlags::ALLOW_DURING_PAUSE)
            .execute(&mut ctx);
        assert!(result.is_ok());

        ctx.world.cheats.build_while_paused = true;
        let mut design = standard_design();
        design.name = "Second".to_string();
        let result = TrackDesignAction::new(CoordsXYZ::new(640, 640, 112), design).execute(&mut ctx);
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn failed_placement_demolishes_created_ride() {
        let mut ctx = standard_context();
        let origin = standard_origin();
        let blocker = create_monorail(&mut ctx);
        ctx.world
            .map
            .insert_element(
                origin.xy().offset_tiles(1, 0).unwrap(),
                TileElement::Track(TrackElement {
                    ride: blocker,
                    piece: 0,
                    base_height: (origin.z / 8) as u8,
                    ghost: false,
                }),
            )
            .unwrap();

        let query = action().query(&ctx);
        assert_eq!(query.error, Some(ActionError::Disallowed));
        assert_eq!(query.error_message, StringId::TrackInTheWay);

        let result = action().execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::Disallowed));
        assert_eq!(result.error_message, StringId::TrackInTheWay);
        assert!(result.ride.is_none());
        // Only the blocker is left; the ride created for the design is gone.
        assert_eq!(ctx.world.rides.len(), 1);
        assert!(ctx.world.rides.contains(blocker));
    }

    #[test]
    fn unavailable_scenery_is_dropped() {
        let mut ctx = standard_context();
        let mut design = standard_design();
        design.scenery.push(parkline_ride::DesignScenery {
            object: "palm_tree".to_string(),
            x: 0,
            y: 2,
            z: 0,
        });
        let without_scenery = {
            let mut d = design.clone();
            d.scenery.clear();
            TrackDesignAction::new(standard_origin(), d).query(&ctx).cost
        };
        let result = TrackDesignAction::new(standard_origin(), design).execute(&mut ctx);
        assert!(result.is_ok());
        assert_eq!(result.cost, without_scenery);
        let scenery_tile = standard_origin().xy().offset_tiles(0, 1).unwrap();
        assert!(
            !ctx.world
                .map
                .elements_at(scenery_tile)
                .iter()
                .any(|e| matches!(e, TileElement::Scenery(_)))
        );
    }

    #[test]
    fn available_scenery_is_placed_and_priced() {
        let mut ctx = standard_context();
        let with = action().query(&ctx).cost;
        let mut design = standard_design();
        design.scenery.clear();
        let without = TrackDesignAction::new(standard_origin(), design).query(&ctx).cost;
        assert_eq!(with - without, money(12));

        action().execute(&mut ctx);
        let scenery_tile = standard_origin().xy().offset_tiles(0, 1).unwrap();
        assert!(
            ctx.world
                .map
                .elements_at(scenery_tile)
                .iter()
                .any(|e| matches!(e, TileElement::Scenery(_)))
        );
    }

    #[test]
    fn ride_capacity_exhausted() {
        let mut ctx = standard_context();
        ctx.world.rides = parkline_ride::RideRegistry::with_capacity(0);
        let result = action().execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::NoFreeElements));
        assert_eq!(result.error_title, StringId::CantCreateNewRideAttraction);
        assert_eq!(result.error_message, StringId::TooManyRides);
    }

    #[test]
    fn uninvented_entry_falls_back_to_default() {
        let mut ctx = standard_context();
        ctx.world.research = parkline_ride::Research::new();
        ctx.world.research.invent(mine_cars());
        let result = action().execute(&mut ctx);
        assert!(result.is_ok(), "{result:?}");
        let ride = ctx.world.rides.get(result.ride.unwrap()).unwrap();
        assert_eq!(ride.entry, mine_cars());
    }

    #[test]
    fn ignore_research_uses_design_entry() {
        let mut ctx = standard_context();
        ctx.world.research = parkline_ride::Research::new();
        ctx.world.cheats.ignore_research_status = true;
        let result = action().execute(&mut ctx);
        let ride = ctx.world.rides.get(result.ride.unwrap()).unwrap();
        assert_eq!(ride.entry, wooden_cars());
    }

    #[test]
    fn grouped_entry_resolved_through_repository() {
        let mut ctx = standard_context();
        let mut design = standard_design();
        // Installed but not loaded; shares a group with the wooden cars.
        design.vehicle_object = "classic_wooden_cars".to_string();
        let action = TrackDesignAction::new(standard_origin(), design);
        assert_eq!(action.resolve_entry(&ctx), Some(wooden_cars()));

        ctx.world.research = parkline_ride::Research::new();
        ctx.world.research.invent(mine_cars());
        assert_eq!(action.resolve_entry(&ctx), None);
    }

    #[test]
    fn no_available_entry_fails_creation() {
        let mut ctx = standard_context();
        ctx.world.research = parkline_ride::Research::new();
        let result = action().execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::NoFreeElements));
        assert!(ctx.world.rides.is_empty());
    }

    #[test]
    fn cascade_failures_do_not_fail_placement() {
        let mut ctx = standard_context();
        let mut design = standard_design();
        design.number_of_trains = 0;
        design.ride_mode = 200;
        let result = TrackDesignAction::new(standard_origin(), design).execute(&mut ctx);
        assert!(result.is_ok());
        let ride = ctx.world.rides.get(result.ride.unwrap()).unwrap();
        assert_eq!(ride.num_trains, 1);
        assert_eq!(ride.mode, 0);
    }

    #[test]
    fn duplicate_design_name_keeps_generated_name() {
        let mut ctx = standard_context();
        let first = action().execute(&mut ctx);
        let second = TrackDesignAction::new(CoordsXYZ::new(640, 640, 112), standard_design())
            .execute(&mut ctx);
        assert!(first.is_ok() && second.is_ok());
        let name = &ctx.world.rides.get(second.ride.unwrap()).unwrap().name;
        assert_ne!(name, "Timber Wolf");
    }

    #[test]
    fn monorail_design_uses_its_entry() {
        let mut ctx = standard_context();
        let mut design = standard_design();
        design.ride_type = RideType(2);
        design.vehicle_object = "monorail_cars".to_string();
        let result = TrackDesignAction::new(standard_origin(), design).execute(&mut ctx);
        assert!(result.is_ok());
        let ride = ctx.world.rides.get(result.ride.unwrap()).unwrap();
        assert_eq!(ride.entry, monorail_cars());
    }

    #[test]
    fn failed_commit_demolishes_created_ride() {
        let base = standard_context();
        let mut ctx =
            GameContext::with_placer(standard_objects(), base.world, Box::new(RefusingPlacer));

        let query = action().query(&ctx);
        assert!(query.is_ok(), "{query:?}");
        assert_eq!(query.cost, money(50));

        let result = action().execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::Disallowed));
        assert_eq!(result.error_title, StringId::CantPlaceTrackDesign);
        assert_eq!(result.error_message, StringId::TooHigh);
        assert!(result.ride.is_none());
        assert!(ctx.world.rides.is_empty());
    }

    #[test]
    fn out_of_range_design_offsets_are_rejected() {
        let mut ctx = standard_context();
        let mut design = standard_design();
        design.track[1].x = 100_000_000;
        let action = TrackDesignAction::new(standard_origin(), design);

        let query = action.query(&ctx);
        assert_eq!(query.error, Some(ActionError::Disallowed));
        assert_eq!(query.error_message, StringId::OffEdgeOfMap);

        let result = action.execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::Disallowed));
        assert_eq!(result.error_message, StringId::OffEdgeOfMap);
        assert!(ctx.world.rides.is_empty());
    }

    #[test]
    fn origin_at_coordinate_limit_reports_position() {
        let ctx = standard_context();
        let loc = CoordsXYZ::new(i32::MAX, i32::MAX, 112);
        let result = TrackDesignAction::new(loc, standard_design()).query(&ctx);
        assert_eq!(result.error, Some(ActionError::Disallowed));
        assert_eq!(result.error_message, StringId::OffEdgeOfMap);
        assert_eq!(result.position, Some(loc));
    }
}
