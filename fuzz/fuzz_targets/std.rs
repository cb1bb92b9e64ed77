#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use hopdict::{Dictionary, Error};
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Arbitrary)]
enum Operation<K, V> {
    Put(K, V),
    Remove(K),
    Get(K),
    Contains(K),
    Update(K, V),
    Clear,
    Len,
    IsEmpty,
    Iterate,
    Snapshot,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    operations: Vec<Operation<u16, u32>>,
}

fn fuzz_dictionary(input: FuzzInput) {
    let mut std_map = StdHashMap::new();
    let mut dict = Dictionary::new();

    for op in input.operations {
        match op {
            Operation::Put(k, v) => {
                let std_result = std_map.insert(k, v);
                let dict_result = dict.put(k, v);
                assert_eq!(std_result, dict_result);
            }
            Operation::Remove(k) => {
                let std_result = std_map.remove(&k).ok_or(Error::KeyNotFound);
                let dict_result = dict.remove(&k);
                assert_eq!(std_result, dict_result);
            }
            Operation::Get(k) => {
                let std_result = std_map.get(&k).ok_or(Error::KeyNotFound);
                let dict_result = dict.get(&k);
                assert_eq!(std_result, dict_result);
            }
            Operation::Contains(k) => {
                assert_eq!(std_map.contains_key(&k), dict.contains(&k));
            }
            Operation::Update(k, v) => {
                let std_result = std_map.get_mut(&k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                let dict_result = dict.get_mut(&k).ok().map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                assert_eq!(std_result, dict_result);
            }
            Operation::Clear => {
                std_map.clear();
                dict.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), dict.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), dict.is_empty());
            }
            Operation::Iterate => {
                let mut visited = 0;
                dict.iterate(|k, v| {
                    assert_eq!(std_map.get(k), Some(v));
                    visited += 1;
                    true
                });
                assert_eq!(visited, std_map.len());
            }
            Operation::Snapshot => {
                let mut iter = dict.iterator();
                let mut visited = 0;
                while let Ok((k, v)) = iter.current() {
                    assert_eq!(std_map.get(k), Some(v));
                    iter.advance().unwrap();
                    visited += 1;
                }
                assert_eq!(visited, std_map.len());
                assert!(!iter.has_next());
            }
        }
    }

    // Final consistency checks
    for (k, v) in std_map.iter() {
        assert_eq!(dict.get(k), Ok(v));
    }
    assert_eq!(std_map.len(), dict.len());
    assert_eq!(std_map.is_empty(), dict.is_empty());
}

fuzz_target!(|data: FuzzInput| {
    fuzz_dictionary(data);
});
