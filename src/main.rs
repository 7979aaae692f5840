//! Geocoin entry point
//!
//! The browser build drives a Leaflet map; the native build runs a short
//! scripted walk and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use geocoin::persistence;
    use geocoin::platform::{KeyValueStore, LocalStore, MemoryStore};
    use geocoin::world::{Cell, Command, Direction, GameEvent, Session, apply};
    use geocoin::{GameConfig, latlng};

    const GAMEPLAY_ZOOM_LEVEL: u32 = 19;

    // Leaflet bindings (Leaflet is loaded as the global `L` by index.html)
    #[wasm_bindgen(inline_js = "
        let map = null;
        let player = null;
        let trail = null;
        const caches = new Map();
        let popup = null;
        let handlers = null;

        export function init_map(lat, lng, zoom, on_cache_click, on_collect, on_deposit) {
            handlers = { on_cache_click, on_collect, on_deposit };
            map = L.map(document.getElementById('map'), {
                center: [lat, lng],
                zoom: zoom,
                minZoom: zoom,
                maxZoom: zoom,
                zoomControl: false,
                scrollWheelZoom: false,
            });
            L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
                maxZoom: 19,
                attribution: '&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>',
            }).addTo(map);
            player = L.marker([lat, lng]).bindTooltip('You are here.').addTo(map);
            trail = L.polyline([], { color: 'red' }).addTo(map);
        }

        export function draw_cache(key, i, j, south, west, north, east) {
            if (caches.has(key)) return;
            const rect = L.rectangle([[south, west], [north, east]]);
            rect.on('click', () => handlers.on_cache_click(i, j));
            rect.addTo(map);
            caches.set(key, rect);
        }

        export function remove_cache(key) {
            const rect = caches.get(key);
            if (rect) {
                rect.remove();
                caches.delete(key);
            }
        }

        export function move_player(lat, lng, path_json) {
            player.setLatLng([lat, lng]);
            trail.setLatLngs(JSON.parse(path_json));
            map.panTo([lat, lng]);
        }

        export function show_popup(key, label, coins) {
            const rect = caches.get(key);
            if (!rect) return;
            const div = document.createElement('div');
            div.innerHTML = `<div>There is a cache here at \"${label}\". It has <span id=\"value\">${coins}</span> coins.</div>
                <button id=\"collect\">collect</button> <button id=\"deposit\">deposit</button>`;
            div.querySelector('#collect').addEventListener('click', () => handlers.on_collect());
            div.querySelector('#deposit').addEventListener('click', () => handlers.on_deposit());
            popup = L.popup().setLatLng(rect.getBounds().getCenter()).setContent(div).openOn(map);
        }

        export function update_popup(coins) {
            const el = popup && popup.getElement() && popup.getElement().querySelector('#value');
            if (el) el.textContent = `${coins}`;
        }

        export function close_popup() {
            if (popup) {
                map.closePopup(popup);
                popup = null;
            }
        }

        export function clear_caches() {
            caches.forEach((rect) => rect.remove());
            caches.clear();
        }

        export function set_status(text) {
            document.getElementById('statusPanel').textContent = text;
        }

        export function watch_position(callback) {
            return navigator.geolocation.watchPosition(
                (pos) => callback(pos.coords.latitude, pos.coords.longitude),
                (err) => console.warn('Geolocation error:', err.message),
            );
        }

        export function clear_watch(id) {
            navigator.geolocation.clearWatch(id);
        }
    ")]
    extern "C" {
        fn init_map(
            lat: f64,
            lng: f64,
            zoom: u32,
            on_cache_click: &JsValue,
            on_collect: &JsValue,
            on_deposit: &JsValue,
        );
        fn draw_cache(key: &str, i: i32, j: i32, south: f64, west: f64, north: f64, east: f64);
        fn remove_cache(key: &str);
        fn move_player(lat: f64, lng: f64, path_json: &str);
        fn show_popup(key: &str, label: &str, coins: usize);
        fn update_popup(coins: u32);
        fn close_popup();
        fn clear_caches();
        fn set_status(text: &str);
        fn watch_position(callback: &JsValue) -> i32;
        fn clear_watch(id: i32);
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        store: Box<dyn KeyValueStore>,
        watch_id: Option<i32>,
    }

    impl Game {
        fn new(config: GameConfig, mut store: Box<dyn KeyValueStore>) -> Self {
            let session = persistence::load_or_new(config, &mut store);
            Self {
                session,
                store,
                watch_id: None,
            }
        }

        /// Apply a command, draw the result, and auto-save
        fn handle(&mut self, command: Command) {
            let events = apply(&mut self.session, &command);
            self.render(&events);
            if let Err(e) = persistence::save(&self.session, &mut self.store) {
                log::warn!("Save failed: {}", e);
            }
        }

        /// Draw the current session from scratch (after startup)
        fn render_all(&self) {
            let location = self.session.location;
            let path = serde_json::to_string(&self.session.path).unwrap_or_default();
            move_player(location.x, location.y, &path);
            self.render(&self.session.spawned_events());
            set_status(&self.session.inventory.status_line());
        }

        fn render(&self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::PlayerMoved { location } => {
                        let path = serde_json::to_string(&self.session.path).unwrap_or_default();
                        move_player(location.x, location.y, &path);
                    }
                    GameEvent::CacheSpawned { cell, bounds, .. } => {
                        draw_cache(
                            &cell.to_string(),
                            cell.i,
                            cell.j,
                            bounds.south_west.x,
                            bounds.south_west.y,
                            bounds.north_east.x,
                            bounds.north_east.y,
                        );
                    }
                    GameEvent::CacheDespawned { cell } => remove_cache(&cell.to_string()),
                    GameEvent::CacheOpened { cell, coins } => {
                        show_popup(&cell.to_string(), &cell.to_string(), coins.len());
                    }
                    GameEvent::CacheClosed { .. } => close_popup(),
                    GameEvent::CacheUpdated { num_coins, .. } => update_popup(*num_coins),
                    GameEvent::InventoryChanged { .. } => {
                        set_status(&self.session.inventory.status_line());
                    }
                    GameEvent::NothingToTransfer => log::info!("Nothing to transfer"),
                    GameEvent::GameReset => clear_caches(),
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Geocoin starting...");

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable, progress will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let config = GameConfig::load(&store);
        let start = config.start_location;
        let game = Rc::new(RefCell::new(Game::new(config, store)));

        let on_cache_click = {
            let game = game.clone();
            Closure::<dyn FnMut(i32, i32)>::new(move |i, j| {
                game.borrow_mut().handle(Command::Open(Cell::new(i, j)));
            })
        };
        let on_collect = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || game.borrow_mut().handle(Command::Collect))
        };
        let on_deposit = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || game.borrow_mut().handle(Command::Deposit))
        };

        init_map(
            start.x,
            start.y,
            GAMEPLAY_ZOOM_LEVEL,
            on_cache_click.as_ref(),
            on_collect.as_ref(),
            on_deposit.as_ref(),
        );
        on_cache_click.forget();
        on_collect.forget();
        on_deposit.forget();

        game.borrow().render_all();

        setup_movement_buttons(game.clone());
        setup_reset_button(game.clone());
        setup_sensor_button(game);

        log::info!("Geocoin running!");
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("No document, cannot wire #{}", id);
            return;
        };
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
        if let Err(e) = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref()) {
            log::warn!("Could not wire #{}: {:?}", id, e);
        }
        closure.forget();
    }

    fn setup_movement_buttons(game: Rc<RefCell<Game>>) {
        let buttons = [
            ("north", Direction::North),
            ("south", Direction::South),
            ("east", Direction::East),
            ("west", Direction::West),
        ];
        for (id, direction) in buttons {
            let game = game.clone();
            on_click(id, move |_event| {
                game.borrow_mut().handle(Command::Move(direction));
            });
        }
    }

    fn setup_reset_button(game: Rc<RefCell<Game>>) {
        on_click("reset", move |_event| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Erase all coins and travel history?")
                        .ok()
                })
                .unwrap_or(false);
            if confirmed {
                game.borrow_mut().handle(Command::Reset);
                log::info!("Game reset by player");
            }
        });
    }

    fn setup_sensor_button(game: Rc<RefCell<Game>>) {
        let on_position = {
            let game = game.clone();
            Closure::<dyn FnMut(f64, f64)>::new(move |lat, lng| {
                game.borrow_mut().handle(Command::MoveTo(latlng(lat, lng)));
            })
        };

        on_click("sensor", move |_event| {
            let mut g = game.borrow_mut();
            match g.watch_id.take() {
                Some(id) => {
                    clear_watch(id);
                    log::info!("Geolocation tracking off");
                }
                None => {
                    g.watch_id = Some(watch_position(on_position.as_ref()));
                    log::info!("Geolocation tracking on");
                }
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use geocoin::persistence;
    use geocoin::platform::MemoryStore;
    use geocoin::world::{Command, Direction, GameEvent, apply};

    env_logger::init();
    log::info!("Geocoin (native) starting...");
    log::info!("The map UI runs in the browser - use `trunk serve` for the web version");

    let mut store = MemoryStore::new();
    let config = geocoin::GameConfig::load(&store);
    let mut session = persistence::load_or_new(config, &mut store);

    // Walk until a cache shows up, then loot it
    let mut target = session.spawner.spawned().next().copied();
    let mut steps = 0;
    while target.is_none() && steps < 20 {
        apply(&mut session, &Command::Move(Direction::North));
        target = session.spawner.spawned().next().copied();
        steps += 1;
    }

    let Some(cell) = target else {
        println!("No caches nearby after {} steps", steps);
        return;
    };

    apply(&mut session, &Command::Open(cell));
    for _ in 0..3 {
        for event in apply(&mut session, &Command::Collect) {
            if let GameEvent::CacheUpdated { cell, num_coins } = event {
                println!("Cache {} now holds {} coins", cell, num_coins);
            }
        }
    }
    apply(&mut session, &Command::Close);
    println!("{}", session.inventory.status_line());

    if let Err(e) = persistence::save(&session, &mut store) {
        log::error!("Save failed: {}", e);
    }
}
