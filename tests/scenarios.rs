//! End-to-end scenarios over the public API.

use keyset::requirements::require_all;
use keyset::{AddKeyResult, SetConfig, SetError, SortedSet, SortedSetMaker};
use tracing_subscriber::EnvFilter;

// Show library logs with RUST_LOG=keyset=trace
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn entries<V: Copy>(set: &SortedSet<V>) -> Vec<(String, V)> {
    set.iter()
        .map(|(key, data)| (String::from_utf8_lossy(key).into_owned(), *data))
        .collect()
}

#[test]
fn insert_three_out_of_order() {
    init_tracing();
    let mut set = SortedSet::new();
    set.add_key(b"b".to_vec(), 1);
    set.add_key(b"a".to_vec(), 2);
    set.add_key(b"c".to_vec(), 3);

    assert_eq!(set.len(), 3);
    assert_eq!(
        entries(&set),
        vec![("a".to_string(), 2), ("b".to_string(), 1), ("c".to_string(), 3)]
    );
    assert_eq!(set.lookup(b"a").map(|hit| *hit.data), Some(2));
    assert!(set.lookup(b"z").is_none());
}

#[test]
fn duplicate_insert() {
    let mut set = SortedSet::new();
    assert_eq!(set.add_key(b"a".to_vec(), 1), AddKeyResult::Unique);
    assert_eq!(set.add_key(b"a".to_vec(), 2), AddKeyResult::Duplicate);
    assert_eq!(set.len(), 1);
    assert_eq!(set.lookup(b"a").map(|hit| *hit.data), Some(1));
}

#[test]
fn difference_of_small_sets() {
    init_tracing();
    let mut a = SortedSet::new();
    for key in ["a", "b", "c"] {
        a.add_key_copy(key.as_bytes(), ());
    }
    let mut b = SortedSet::new();
    b.add_key_copy(b"b", ());

    let diff = a.difference(&b);
    assert_eq!(diff.flatten_keys(), vec![&b"a"[..], &b"c"[..]]);
}

#[test]
fn maker_with_four_keys() {
    init_tracing();
    let mut maker = SortedSetMaker::new(4);
    let complete: Vec<bool> = ["a", "b", "c", "d"]
        .iter()
        .map(|key| maker.add_key_copy(key.as_bytes(), ()))
        .collect();
    assert_eq!(complete, vec![false, false, false, true]);

    let set = maker.finalize();
    assert_eq!(set.flatten_keys(), vec![&b"a"[..], &b"b"[..], &b"c"[..], &b"d"[..]]);
}

#[test]
fn prefix_keys_do_not_collide() {
    let mut set = SortedSet::new();
    for key in ["abc", "ab", "abcd", "b"] {
        assert!(set.add_key_copy(key.as_bytes(), ()).is_unique());
    }
    assert_eq!(
        set.flatten_keys(),
        vec![&b"ab"[..], &b"abc"[..], &b"abcd"[..], &b"b"[..]]
    );
    assert!(set.lookup(b"a").is_none());
}

#[test]
fn seeded_config_round_trips_through_difference() {
    let config = SetConfig::builder().seed(3).max_level(8).build();
    let mut a = SortedSet::with_config(config.clone());
    for i in 0..64u16 {
        a.add_key(i.to_be_bytes().to_vec(), i);
    }
    let b = SortedSet::<u16>::new();

    let copy = a.difference(&b);
    assert_eq!(copy.config(), &config);
    assert!(copy.layers() <= 8);
    assert_eq!(entries(&copy), entries(&a));
}

#[test]
fn rebuild_instead_of_remove() {
    // Removal is expressed by building the difference
    let mut names = SortedSet::<u8>::new();
    let keys: [&[u8]; 3] = [b"one\0", b"two\0", b"three\0"];
    names.add_keys_copy(&keys, None, None);
    let mut drop_these = SortedSet::<()>::new();
    drop_these.add_key_copy(b"two", ());

    let kept = names.difference(&drop_these);
    let kept_keys: Vec<u8> = kept.iter().map(|(_, data)| *data).collect();
    assert_eq!(kept.flatten_keys(), vec![&b"one"[..], &b"three"[..]]);
    assert_eq!(kept_keys, vec![0, 0]);
}

#[test]
fn missing_layers_are_reported() {
    init_tracing();
    let required: [&[u8]; 2] = [b"VK_LAYER_KHRONOS_validation", b"VK_LAYER_LUNARG_monitor"];
    let available: [&[u8]; 1] = [b"VK_LAYER_LUNARG_monitor"];

    match require_all("layer", &required, &available) {
        Err(SetError::MissingRequirements { kind, missing }) => {
            assert_eq!(kind, "layer");
            assert_eq!(missing, vec!["VK_LAYER_KHRONOS_validation"]);
        }
        other => panic!("expected missing layer, got {other:?}"),
    }
}

#[test]
fn enabled_extensions_come_back_flattened() {
    init_tracing();
    let required: [&[u8]; 3] = [b"VK_KHR_swapchain", b"VK_KHR_surface", b"VK_KHR_surface"];
    let available: [&[u8]; 3] = [b"VK_KHR_surface", b"VK_EXT_debug_utils", b"VK_KHR_swapchain"];

    let enabled = require_all("extension", &required, &available).unwrap();
    assert_eq!(enabled.len(), 2);
    assert_eq!(
        enabled.into_keys(),
        vec![b"VK_KHR_surface".to_vec(), b"VK_KHR_swapchain".to_vec()]
    );
}
