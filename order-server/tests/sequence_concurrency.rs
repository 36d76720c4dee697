//! Numbers issued from many threads against one on-disk database

use order_server::db::Store;
use order_server::sequence::SequenceGenerator;
use shared::models::DocumentType;
use std::collections::BTreeSet;
use std::thread;

#[test]
fn concurrent_issuance_is_gap_free() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("orders.redb")).unwrap();
    let generator = SequenceGenerator::new(store);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = generator.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|_| generator.next(DocumentType::Order, "ORD", 2026).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let issued: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: BTreeSet<&String> = issued.iter().collect();
    assert_eq!(unique.len(), 200);

    let expected: BTreeSet<String> = (1..=200).map(|n| format!("ORD-2026-{n:04}")).collect();
    assert_eq!(unique.into_iter().cloned().collect::<BTreeSet<_>>(), expected);

    let current = generator.current(DocumentType::Order).unwrap().unwrap();
    assert_eq!(current.last_number, 200);
}

#[test]
fn numbers_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.redb");
    {
        let generator = SequenceGenerator::new(Store::open(&path).unwrap());
        generator.next(DocumentType::Quote, "COT", 2026).unwrap();
        generator.next(DocumentType::Quote, "COT", 2026).unwrap();
    }
    let generator = SequenceGenerator::new(Store::open(&path).unwrap());
    assert_eq!(
        generator.next(DocumentType::Quote, "COT", 2026).unwrap(),
        "COT-2026-0003"
    );
}
