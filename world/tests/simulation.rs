use std::time::Duration;

use long_snake_core::{
    AdvanceTrigger, Cell, Command, Config, Direction, DirectionRejection, Event,
    FoodPlacementError, GridBounds, Phase, SpeedScaling,
};
use long_snake_world::{self as world, query, World};

fn start(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Start, &mut events);
    events
}

fn send(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick_at(world: &mut World, millis: u64) -> Vec<Event> {
    send(
        world,
        Command::Tick {
            now: Duration::from_millis(millis),
        },
    )
}

fn advances(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::SnakeAdvanced { .. }))
        .count()
}

/// Arms the deadline if needed, then ticks exactly on each deadline `limit` times.
fn run_ticks(world: &mut World, clock: &mut Duration, limit: usize) -> Vec<Event> {
    let mut events = Vec::new();
    if query::next_deadline(world).is_none() {
        world::apply(world, Command::Tick { now: *clock }, &mut events);
    }
    for _ in 0..limit {
        *clock = query::next_deadline(world).expect("deadline armed");
        world::apply(world, Command::Tick { now: *clock }, &mut events);
    }
    events
}

fn cell_ahead(world: &World) -> Cell {
    let head = query::head(world).expect("session started");
    query::grid(world).wrap(head.offset(query::direction(world)))
}

/// Puts food on the cell the head reaches on the next tick and takes that tick.
fn feed_once(world: &mut World, clock: &mut Duration) -> Vec<Event> {
    let target = cell_ahead(world);
    let placed = send(world, Command::PlaceFood { cell: target });
    assert_eq!(placed, vec![Event::FoodPlaced { cell: target }]);
    run_ticks(world, clock, 1)
}

#[test]
fn start_lays_out_classic_body_heading_down() {
    let mut world = World::classic(7);
    assert_eq!(query::phase(&world), Phase::NotStarted);
    assert!(query::body(&world).is_empty());

    let events = start(&mut world);

    assert_eq!(query::phase(&world), Phase::Running);
    assert_eq!(
        query::body(&world),
        &[Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)]
    );
    assert_eq!(query::direction(&world), Direction::Down);
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::best_score(&world), 7);
    assert_eq!(
        events.first(),
        Some(&Event::SessionStarted {
            body: vec![Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)],
            direction: Direction::Down,
            best_score: 7,
        })
    );
    let food = query::food(&world).expect("food placed at start");
    assert!(query::grid(&world).contains(food));
}

#[test]
fn commands_before_start_leave_world_untouched() {
    let mut world = World::classic(0);

    assert!(tick_at(&mut world, 0).is_empty());
    assert!(tick_at(&mut world, 1_000).is_empty());
    assert_eq!(
        send(
            &mut world,
            Command::RequestDirectionChange {
                direction: Direction::Left
            }
        ),
        vec![Event::DirectionChangeRejected {
            requested: Direction::Left,
            current: Direction::Down,
            reason: DirectionRejection::NotRunning,
        }]
    );
    assert_eq!(
        send(
            &mut world,
            Command::PlaceFood {
                cell: Cell::new(0, 0)
            }
        ),
        vec![Event::FoodPlacementRejected {
            cell: Cell::new(0, 0),
            reason: FoodPlacementError::NotRunning,
        }]
    );
    assert_eq!(query::phase(&world), Phase::NotStarted);
    assert!(query::next_deadline(&world).is_none());
}

#[test]
fn one_advance_moves_head_down_and_shifts_the_rest() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let _ = send(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(0, 0),
        },
    );

    let _ = tick_at(&mut world, 0);
    let events = tick_at(&mut world, 300);

    assert_eq!(advances(&events), 1);
    assert_eq!(
        query::body(&world),
        &[Cell::new(11, 10), Cell::new(10, 10), Cell::new(10, 11)]
    );
    assert!(events.contains(&Event::SnakeAdvanced {
        head: Cell::new(11, 10),
        vacated: Some(Cell::new(10, 12)),
        trigger: AdvanceTrigger::Tick,
    }));
}

#[test]
fn tick_cadence_arms_waits_then_moves_once() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let body = query::body(&world).to_vec();

    let armed = tick_at(&mut world, 0);
    assert_eq!(
        armed,
        vec![Event::DeadlineArmed {
            deadline: Duration::from_millis(300)
        }]
    );
    assert_eq!(query::body(&world), body.as_slice());

    assert!(tick_at(&mut world, 290).is_empty());
    assert_eq!(query::body(&world), body.as_slice());

    let moved = tick_at(&mut world, 300);
    assert_eq!(advances(&moved), 1);
    assert_eq!(
        query::next_deadline(&world),
        Some(Duration::from_millis(600))
    );
}

#[test]
fn late_tick_does_not_catch_up_missed_intervals() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let _ = tick_at(&mut world, 0);

    let events = tick_at(&mut world, 1_000);

    assert_eq!(advances(&events), 1);
    assert_eq!(
        query::next_deadline(&world),
        Some(Duration::from_millis(1_300))
    );
}

#[test]
fn reversal_is_rejected_without_moving() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let body = query::body(&world).to_vec();

    let events = send(
        &mut world,
        Command::RequestDirectionChange {
            direction: Direction::Up,
        },
    );

    assert_eq!(
        events,
        vec![Event::DirectionChangeRejected {
            requested: Direction::Up,
            current: Direction::Down,
            reason: DirectionRejection::Reversal,
        }]
    );
    assert_eq!(query::direction(&world), Direction::Down);
    assert_eq!(query::body(&world), body.as_slice());
}

#[test]
fn redundant_request_is_rejected_without_moving() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let body = query::body(&world).to_vec();

    let events = send(
        &mut world,
        Command::RequestDirectionChange {
            direction: Direction::Down,
        },
    );

    assert_eq!(
        events,
        vec![Event::DirectionChangeRejected {
            requested: Direction::Down,
            current: Direction::Down,
            reason: DirectionRejection::Redundant,
        }]
    );
    assert_eq!(query::body(&world), body.as_slice());
}

#[test]
fn accepted_turn_moves_exactly_once_immediately() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let _ = tick_at(&mut world, 0);

    let events = send(
        &mut world,
        Command::RequestDirectionChange {
            direction: Direction::Left,
        },
    );

    assert_eq!(
        events,
        vec![
            Event::DirectionChanged {
                from: Direction::Down,
                to: Direction::Left,
            },
            Event::SnakeAdvanced {
                head: Cell::new(10, 9),
                vacated: Some(Cell::new(10, 12)),
                trigger: AdvanceTrigger::Turn,
            },
        ]
    );
    assert_eq!(query::direction(&world), Direction::Left);
    assert_eq!(
        query::body(&world),
        &[Cell::new(10, 9), Cell::new(10, 10), Cell::new(10, 11)]
    );
    assert_eq!(
        query::next_deadline(&world),
        Some(Duration::from_millis(300)),
        "turns leave the tick deadline alone"
    );
}

#[test]
fn turn_onto_food_does_not_consume_it() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let _ = send(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(10, 9),
        },
    );

    let events = send(
        &mut world,
        Command::RequestDirectionChange {
            direction: Direction::Left,
        },
    );

    assert_eq!(query::head(&world), Some(Cell::new(10, 9)));
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::body(&world).len(), 3);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::FoodConsumed { .. })));
}

#[test]
fn consumption_scores_and_grows_on_the_same_tick() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;

    let events = feed_once(&mut world, &mut clock);

    assert_eq!(query::score(&world), 1);
    assert_eq!(query::body(&world).len(), 4);
    assert!(events.contains(&Event::FoodConsumed {
        cell: Cell::new(11, 10)
    }));
    assert!(events.contains(&Event::ScoreChanged { score: 1 }));
    assert!(events.contains(&Event::SnakeGrew { length: 4 }));
    assert_eq!(
        query::body(&world),
        &[
            Cell::new(11, 10),
            Cell::new(10, 10),
            Cell::new(10, 11),
            Cell::new(10, 11)
        ]
    );
    let food = query::food(&world).expect("food replaced");
    assert!(!query::body(&world).contains(&food));
}

#[test]
fn growth_duplicate_is_pushed_out_on_the_next_move() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;
    let _ = feed_once(&mut world, &mut clock);

    let _ = send(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(0, 0),
        },
    );
    let events = run_ticks(&mut world, &mut clock, 1);

    assert_eq!(
        query::body(&world),
        &[
            Cell::new(12, 10),
            Cell::new(11, 10),
            Cell::new(10, 10),
            Cell::new(10, 11)
        ]
    );
    assert!(events.contains(&Event::SnakeAdvanced {
        head: Cell::new(12, 10),
        vacated: None,
        trigger: AdvanceTrigger::Tick,
    }));
}

#[test]
fn best_score_ratchets_only_past_the_stored_value() {
    let mut world = World::classic(2);
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;

    let first = feed_once(&mut world, &mut clock);
    let second = feed_once(&mut world, &mut clock);
    let third = feed_once(&mut world, &mut clock);

    let raised = |events: &[Event]| {
        events
            .iter()
            .any(|event| matches!(event, Event::BestScoreRaised { .. }))
    };
    assert!(!raised(&first));
    assert!(!raised(&second));
    assert!(third.contains(&Event::BestScoreRaised { score: 3 }));
    assert_eq!(query::best_score(&world), 3);
}

#[test]
fn body_length_never_shrinks_and_grows_once_per_meal() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;
    let mut expected = query::body(&world).len();

    for round in 0..20 {
        let events = if round % 3 == 0 {
            feed_once(&mut world, &mut clock)
        } else {
            run_ticks(&mut world, &mut clock, 2)
        };
        let meals = events
            .iter()
            .filter(|event| matches!(event, Event::FoodConsumed { .. }))
            .count();
        expected += meals;
        assert_eq!(query::body(&world).len(), expected);
    }
    assert_eq!(query::score(&world) as usize, expected - 3);
}

#[test]
fn heads_stay_inside_the_grid_while_wrapping() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let grid = query::grid(&world);
    let mut clock = Duration::ZERO;

    let mut heads = Vec::new();
    for direction in [Direction::Left, Direction::Up, Direction::Right] {
        let mut events = send(&mut world, Command::RequestDirectionChange { direction });
        events.extend(run_ticks(&mut world, &mut clock, 45));
        heads.extend(events.iter().filter_map(|event| match event {
            Event::SnakeAdvanced { head, .. } => Some(*head),
            _ => None,
        }));
    }

    assert!(heads.len() > 100);
    assert!(heads.iter().all(|head| grid.contains(*head)));
    assert!(heads.iter().any(|head| head.row() == 0));
    assert!(heads.iter().any(|head| head.row() == grid.max_row()));
    assert!(heads.iter().any(|head| head.column() == 0));
    assert!(heads.iter().any(|head| head.column() == grid.max_column()));
}

#[test]
fn moving_down_off_the_last_row_reenters_at_the_top() {
    let config = Config::classic().with_start_body(vec![Cell::new(38, 4)]);
    let mut world = World::new(config, 0).expect("valid config");
    let _ = start(&mut world);
    let _ = send(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(20, 20),
        },
    );

    let _ = tick_at(&mut world, 0);
    let _ = tick_at(&mut world, 300);

    assert_eq!(query::head(&world), Some(Cell::new(0, 4)));
}

#[test]
fn food_never_lands_on_the_body() {
    let config = Config::classic()
        .with_grid(GridBounds::new(3, 3))
        .with_start_body(vec![Cell::new(1, 1)]);
    let mut world = World::new(config, 0).expect("valid config");
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;
    let mut placements = 0;

    for _ in 0..40 {
        let ahead = cell_ahead(&world);
        let events = if query::occupancy_view(&world).is_free(ahead) {
            feed_once(&mut world, &mut clock)
        } else {
            run_ticks(&mut world, &mut clock, 1)
        };
        if events
            .iter()
            .any(|event| matches!(event, Event::FoodPlaced { .. }))
        {
            placements += 1;
            let food = query::food(&world).expect("food placed");
            assert!(!query::body(&world).contains(&food));
        }
    }

    assert!(placements >= 3);
    assert!(query::score(&world) >= 3);
}

#[test]
fn placing_food_on_the_body_or_off_grid_is_rejected() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let food = query::food(&world);

    let occupied = send(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(10, 11),
        },
    );
    let outside = send(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(39, 0),
        },
    );

    assert_eq!(
        occupied,
        vec![Event::FoodPlacementRejected {
            cell: Cell::new(10, 11),
            reason: FoodPlacementError::Occupied,
        }]
    );
    assert_eq!(
        outside,
        vec![Event::FoodPlacementRejected {
            cell: Cell::new(39, 0),
            reason: FoodPlacementError::OutOfBounds,
        }]
    );
    assert_eq!(query::food(&world), food);
}

#[test]
fn literal_speed_scaling_keeps_the_interval() {
    let mut world = World::classic(0);
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;

    for _ in 0..5 {
        let events = feed_once(&mut world, &mut clock);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::TickIntervalChanged { .. })));
    }
    assert_eq!(query::score(&world), 5);
    assert_eq!(query::tick_interval(&world), Duration::from_millis(300));
}

#[test]
fn continuous_speed_scaling_shortens_the_interval() {
    let config = Config::classic().with_speed_scaling(SpeedScaling::Continuous);
    let mut world = World::new(config, 0).expect("valid config");
    let _ = start(&mut world);
    let mut clock = Duration::ZERO;

    let first = feed_once(&mut world, &mut clock);
    assert!(first.contains(&Event::TickIntervalChanged {
        interval: Duration::from_millis(298)
    }));
    let _ = feed_once(&mut world, &mut clock);
    assert_eq!(query::tick_interval(&world), Duration::from_millis(294));
    assert_eq!(
        query::next_deadline(&world),
        Some(clock + Duration::from_millis(298)),
        "the deadline armed before a meal keeps the old interval"
    );
}
