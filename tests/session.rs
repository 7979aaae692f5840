use geocoin::persistence;
use geocoin::platform::MemoryStore;
use geocoin::world::{Cell, Command, Direction, GameEvent, Session, apply};
use geocoin::{GameConfig, latlng};

fn config() -> GameConfig {
    GameConfig {
        tile_width: 1e-4,
        visibility_radius: 3,
        spawn_probability: 1.0,
        start_location: latlng(0.00005, 0.00005),
        ..Default::default()
    }
}

fn cache_count(session: &Session, cell: Cell) -> Option<u32> {
    session.geocaches.get(&cell).map(|g| g.num_coins)
}

#[test]
fn collect_two_coins_and_reload() {
    let mut store = MemoryStore::new();
    let mut session = Session::new(config());
    let origin = Cell::new(0, 0);
    session.geocaches.upsert(origin, 5);

    apply(&mut session, &Command::Open(origin));
    apply(&mut session, &Command::Collect);
    apply(&mut session, &Command::Collect);
    apply(&mut session, &Command::Close);

    assert_eq!(cache_count(&session, origin), Some(3));
    assert_eq!(session.inventory.len(), 2);

    persistence::save(&session, &mut store).unwrap();
    let reloaded = persistence::load_or_new(config(), &mut store);
    assert_eq!(cache_count(&reloaded, origin), Some(3));
    assert_eq!(reloaded.inventory.len(), 2);
}

#[test]
fn leaving_and_returning_keeps_coin_count() {
    let mut session = Session::new(config());
    let origin = Cell::new(0, 0);
    session.geocaches.upsert(origin, 5);

    apply(&mut session, &Command::Open(origin));
    apply(&mut session, &Command::Collect);
    apply(&mut session, &Command::Close);

    // Walk far enough north that the origin leaves the window
    let mut despawned = false;
    for _ in 0..10 {
        let events = apply(&mut session, &Command::Move(Direction::North));
        despawned |= events.contains(&GameEvent::CacheDespawned { cell: origin });
    }
    assert!(despawned);
    assert!(!session.spawner.is_spawned(&origin));
    assert_eq!(cache_count(&session, origin), Some(4));

    // And back again
    let mut respawned = None;
    for _ in 0..10 {
        let events = apply(&mut session, &Command::Move(Direction::South));
        for event in events {
            match event {
                GameEvent::CacheSpawned { cell, num_coins, .. } if cell == origin => {
                    respawned = Some(num_coins);
                }
                _ => {}
            }
        }
    }
    assert_eq!(respawned, Some(4));

    let events = apply(&mut session, &Command::Open(origin));
    match events.last() {
        Some(GameEvent::CacheOpened { coins, .. }) => assert_eq!(coins.len(), 4),
        other => panic!("expected CacheOpened, got {:?}", other),
    }
    assert_eq!(session.path.len(), 21);
}

#[test]
fn coins_travel_between_caches() {
    let mut session = Session::new(config());
    let (a, b) = (Cell::new(0, 0), Cell::new(1, 0));
    session.geocaches.upsert(a, 2);
    session.geocaches.upsert(b, 0);

    apply(&mut session, &Command::Open(a));
    apply(&mut session, &Command::Collect);
    apply(&mut session, &Command::Collect);
    apply(&mut session, &Command::Open(b));
    apply(&mut session, &Command::Deposit);
    let events = apply(&mut session, &Command::Deposit);
    assert_eq!(events[1], GameEvent::InventoryChanged { count: 0 });

    let serials: Vec<u32> = session
        .open_cache()
        .unwrap()
        .coins
        .iter()
        .map(|c| c.serial)
        .collect();
    assert_eq!(serials, vec![0, 1]);
    assert_eq!(cache_count(&session, a), Some(0));
    assert_eq!(cache_count(&session, b), Some(2));
}

#[test]
fn reset_wipes_saved_progress() {
    let mut store = MemoryStore::new();
    let mut session = Session::new(config());
    let origin = Cell::new(0, 0);
    let initial = session.spawner.initial_coins(&origin);
    session.geocaches.upsert(origin, initial + 7);
    apply(&mut session, &Command::Open(origin));
    apply(&mut session, &Command::Collect);
    apply(&mut session, &Command::Move(Direction::East));
    persistence::save(&session, &mut store).unwrap();
    assert_eq!(cache_count(&session, origin), Some(initial + 6));

    // Reset, then the usual save that follows every command
    let events = apply(&mut session, &Command::Reset);
    assert!(events.contains(&GameEvent::GameReset));
    persistence::save(&session, &mut store).unwrap();

    let fresh = persistence::load_or_new(config(), &mut store);
    assert!(fresh.inventory.is_empty());
    assert_eq!(fresh.path, vec![config().start_location]);
    assert_eq!(fresh.location, config().start_location);
    assert_eq!(cache_count(&fresh, origin), Some(initial));
    assert_eq!(
        fresh.geocaches.snapshot(),
        Session::new(config()).geocaches.snapshot()
    );
}
