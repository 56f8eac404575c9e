//! End-to-end scenarios across the public container surface.

use creel::{Buffer, ContainerError, Cursor, ObjectId, Registry, Shrink, Table};

#[test]
fn buffer_growth_scenario() {
    // capacity 2, three pushes: capacity steps to the next power of two.
    let mut b = Buffer::with_capacity(2).unwrap();
    b.push_back(10u32).unwrap();
    b.push_back(20).unwrap();
    b.push_back(30).unwrap();
    assert_eq!(b.capacity(), 4);
    assert_eq!(b.count(), 3);
    assert_eq!(
        (b.at(0), b.at(1), b.at(2)),
        (Some(&10), Some(&20), Some(&30))
    );
}

#[test]
fn table_duplicate_insert_scenario() {
    let mut t = Table::with_capacity(16).unwrap();
    t.insert(5, 100u32).unwrap();
    assert_eq!(t.insert(5, 200), Err(ContainerError::KeyExists { key: 5 }));
    assert_eq!(t.get(5), Some(&100));
}

#[test]
fn registry_reuse_scenario() {
    let mut r = Registry::with_capacity(4).unwrap();
    let id1 = r.push(1u32).unwrap();
    let id2 = r.push(2).unwrap();
    assert_eq!(r.pop(id1), Some(1));
    let id3 = r.push(3).unwrap();
    assert_eq!(id3, id1);
    assert!(r.exists(id2));
    assert!(r.exists(id1));
    assert_eq!(r.get(id1), Some(&3));
}

#[test]
fn registry_stores_buffer_payloads() {
    // Containers compose: a registry of buffers, each independently grown.
    let mut r: Registry<Buffer<u8>> = Registry::new();
    let mut payload = Buffer::new();
    payload.push_back(1u8).unwrap();
    payload.push_back(2).unwrap();
    let id = r.push(payload).unwrap();

    let stored = r.get_mut(id).unwrap();
    stored.push_back(3).unwrap();
    assert_eq!(r.get(id).unwrap().as_slice(), &[1, 2, 3]);
}

#[test]
fn table_values_outlive_buffer_reallocation() {
    // Values stay reachable no matter how often the backing slot buffer's
    // reserve capacity was grown by insert-time best-effort reservations.
    let mut t = Table::with_capacity(32).unwrap();
    for key in 0..24u32 {
        t.insert(key, key as u64 * 3).unwrap();
    }
    for key in 0..24u32 {
        assert_eq!(t.get(key), Some(&(key as u64 * 3)));
    }
    assert_eq!(t.count(), 24);
}

#[test]
fn cursor_protocol_is_uniform_across_containers() {
    let mut b = Buffer::new();
    b.push_back(1u32).unwrap();
    let mut t = Table::with_capacity(16).unwrap();
    t.insert(1, 1u32).unwrap();
    let mut r = Registry::new();
    r.push(1u32).unwrap();

    // One element each: begin == end, one step forward reaches the
    // sentinel, one step back returns.
    let mut cb = b.begin();
    assert_eq!(cb, b.end());
    b.cursor_next(&mut cb);
    assert_eq!(cb, Cursor::AfterLast);
    b.cursor_previous(&mut cb);
    assert_eq!(cb, b.end());

    let mut ct = t.begin();
    assert_eq!(ct, t.end());
    t.cursor_next(&mut ct);
    assert_eq!(ct, Cursor::AfterLast);
    t.cursor_previous(&mut ct);
    assert_eq!(ct, t.end());

    let mut cr = r.begin();
    assert_eq!(cr, r.end());
    r.cursor_next(&mut cr);
    assert_eq!(cr, Cursor::AfterLast);
    r.cursor_previous(&mut cr);
    assert_eq!(cr, r.end());
}

#[test]
fn shrink_then_regrow_preserves_contents() {
    let mut b = Buffer::with_capacity(32).unwrap();
    for v in 0..5u32 {
        b.push_back(v).unwrap();
    }
    assert_eq!(b.shrink_to_fit(), Ok(Shrink::Shrunk));
    assert_eq!(b.capacity(), 5);
    b.push_back(5).unwrap();
    assert_eq!(b.capacity(), 8);
    assert_eq!(b.as_slice(), &[0, 1, 2, 3, 4, 5]);
}

#[test]
fn none_identifier_is_inert() {
    let mut r = Registry::new();
    r.push(1u32).unwrap();
    assert!(!r.exists(ObjectId::NONE));
    assert_eq!(r.get(ObjectId::NONE), None);
    assert_eq!(r.pop(ObjectId::NONE), None);
    assert!(!r.release(ObjectId::NONE));
}
