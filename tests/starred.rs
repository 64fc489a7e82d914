use matchday_terminal::starred::{StarredLeagues, STARRED_KEY};
use matchday_terminal::storage::KvStore;

#[test]
fn toggle_adds_then_removes() {
    let mut store = KvStore::in_memory();
    let mut starred = StarredLeagues::load(&store);
    assert!(starred.is_empty());

    starred.toggle(&mut store, "39").expect("toggle");
    assert!(starred.is_starred("39"));

    starred.toggle(&mut store, "39").expect("toggle");
    assert!(!starred.is_starred("39"));
    assert!(starred.is_empty());
}

#[test]
fn every_toggle_writes_through() {
    let mut store = KvStore::in_memory();
    let mut starred = StarredLeagues::load(&store);

    starred.toggle(&mut store, "39").expect("toggle");
    starred.toggle(&mut store, "140").expect("toggle");
    let persisted: Vec<String> = store.get_json(STARRED_KEY, Vec::new());
    assert_eq!(persisted, vec!["39", "140"]);

    starred.toggle(&mut store, "39").expect("toggle");
    let persisted: Vec<String> = store.get_json(STARRED_KEY, Vec::new());
    assert_eq!(persisted, vec!["140"]);
}

#[test]
fn order_of_starring_is_preserved() {
    let mut store = KvStore::in_memory();
    let mut starred = StarredLeagues::load(&store);
    starred.toggle(&mut store, "140").expect("toggle");
    starred.toggle(&mut store, "39").expect("toggle");
    starred.toggle(&mut store, "2").expect("toggle");
    assert_eq!(starred.ids(), ["140", "39", "2"]);
}

#[test]
fn load_drops_duplicates_from_persisted_state() {
    let mut store = KvStore::in_memory();
    store
        .set_json(STARRED_KEY, &vec!["39", "140", "39"])
        .expect("seed");

    let starred = StarredLeagues::load(&store);
    assert_eq!(starred.ids(), ["39", "140"]);
}

#[test]
fn load_survives_corrupt_state() {
    let mut store = KvStore::in_memory();
    store.set_json(STARRED_KEY, &"not an array").expect("seed");

    let starred = StarredLeagues::load(&store);
    assert!(starred.is_empty());
}

#[test]
fn generation_bumps_on_every_toggle() {
    let mut store = KvStore::in_memory();
    let mut starred = StarredLeagues::load(&store);
    assert_eq!(starred.generation(), 0);

    starred.toggle(&mut store, "39").expect("toggle");
    starred.toggle(&mut store, "39").expect("toggle");
    assert_eq!(starred.generation(), 2);
}
