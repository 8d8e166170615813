//! Integration tests for the log store

use proglog::{Error, Log, Record};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_append_then_read_hello() {
    let log = Log::new();

    assert_eq!(log.append(Record::new("hello")).unwrap(), 0);

    let record = log.read(0).unwrap();
    assert_eq!(record.value, "hello");
    assert_eq!(record.offset, 0);
}

#[test]
fn test_second_append_gets_next_offset() {
    let log = Log::new();

    assert_eq!(log.append(Record::new("hello")).unwrap(), 0);
    assert_eq!(log.append(Record::new("world")).unwrap(), 1);

    let record = log.read(1).unwrap();
    assert_eq!(record.value, "world");
    assert_eq!(record.offset, 1);
}

#[test]
fn test_read_past_end() {
    let log = Log::new();
    assert!(matches!(log.read(0), Err(Error::OffsetNotFound(0))));

    for value in ["a", "b", "c"] {
        log.append(Record::new(value)).unwrap();
    }

    assert!(matches!(log.read(3), Err(Error::OffsetNotFound(3))));
    assert!(matches!(log.read(1_000), Err(Error::OffsetNotFound(1_000))));
    assert_eq!(log.read(2).unwrap().value, "c");
}

#[test]
fn test_reads_are_stable() {
    let log = Log::new();
    for i in 0..100 {
        log.append(Record::new(format!("record-{}", i))).unwrap();
    }

    for _ in 0..3 {
        for i in 0..100u64 {
            let record = log.read(i).unwrap();
            assert_eq!(record.offset, i);
            assert_eq!(record.value, format!("record-{}", i));
        }
    }
    assert_eq!(log.len().unwrap(), 100);
}

#[test]
fn test_concurrent_appends_form_a_permutation() {
    let log = Arc::new(Log::new());
    let threads = 8;
    let per_thread = 250;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let log = log.clone();
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| {
                        let payload = format!("t{}-{}", t, i);
                        let offset = log.append(Record::new(payload.clone())).unwrap();
                        (offset, payload)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<(u64, String)> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let total = (threads * per_thread) as u64;
    let offsets: HashSet<u64> = results.iter().map(|(offset, _)| *offset).collect();
    assert_eq!(offsets.len() as u64, total);
    assert_eq!(offsets, (0..total).collect::<HashSet<_>>());
    assert_eq!(log.len().unwrap(), total);

    // every payload landed intact at the offset its caller was given
    for (offset, payload) in results {
        assert_eq!(log.read(offset).unwrap().value, payload);
    }
}

#[test]
fn test_concurrent_reads_during_appends() {
    let log = Arc::new(Log::new());
    log.append(Record::new("seed")).unwrap();

    let writer = {
        let log = log.clone();
        thread::spawn(move || {
            for i in 0..500 {
                log.append(Record::new(format!("w{}", i))).unwrap();
            }
        })
    };

    let reader = {
        let log = log.clone();
        thread::spawn(move || {
            for _ in 0..500 {
                let len = log.len().unwrap();
                // everything below the observed length must be readable
                assert_eq!(log.read(len - 1).unwrap().offset, len - 1);
                assert_eq!(log.read(0).unwrap().value, "seed");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(log.len().unwrap(), 501);
}
