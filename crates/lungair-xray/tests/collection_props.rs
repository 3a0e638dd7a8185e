mod common;

use std::collections::BTreeSet;

use common::{png_volume, Backend, CountingModel};
use lungair_xray::{DisplayLog, MemoryScene, NodeKind, XrayCollection};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(Vec<u8>),
    Select(u8),
    Segment,
    Remove(u8),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::collection::vec(0u8..5, 1..4).prop_map(Op::Insert),
        3 => (0u8..5).prop_map(Op::Select),
        2 => Just(Op::Segment),
        1 => (0u8..5).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn name(id: u8) -> String {
    format!("cxr{id}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_collection_invariants(ops in prop::collection::vec(op(), 1..20)) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mut collection = XrayCollection::<Backend, _, _>::new(DisplayLog::new(), MemoryScene::new());
        let model = CountingModel::default();
        let mut expected: BTreeSet<String> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(ids) => {
                    let batch: Vec<_> = ids
                        .iter()
                        .map(|&id| collection.create_xray(name(id), png_volume(&name(id), 2, 3)).unwrap())
                        .collect();
                    let result = collection.insert_many(batch);
                    let mut seen = expected.clone();
                    let mut failed = false;
                    for &id in &ids {
                        if !seen.insert(name(id)) {
                            failed = true;
                            break;
                        }
                    }
                    prop_assert_eq!(result.is_err(), failed);
                    for &id in &ids {
                        if !expected.insert(name(id)) {
                            break;
                        }
                    }
                }
                Op::Select(id) => {
                    let result = collection.select(&name(id));
                    prop_assert_eq!(result.is_ok(), expected.contains(&name(id)));
                }
                Op::Segment => {
                    let result = collection.segment_selected(&model);
                    prop_assert_eq!(result.is_ok(), collection.selected_name().is_some());
                }
                Op::Remove(id) => {
                    let result = collection.remove(&name(id));
                    prop_assert_eq!(result.is_ok(), expected.remove(&name(id)));
                }
                Op::Clear => {
                    collection.clear();
                    expected.clear();
                }
            }

            let names: BTreeSet<String> = collection.names().map(str::to_string).collect();
            prop_assert_eq!(&names, &expected);
            if let Some(selected) = collection.selected_name() {
                prop_assert!(collection.contains(selected));
            }
            prop_assert_eq!(collection.scene().count(NodeKind::Volume), collection.len());
            let segmented = collection.names().filter(|n| collection.get(n).is_some_and(|x| x.has_segmentation())).count();
            prop_assert_eq!(collection.scene().count(NodeKind::Segmentation), segmented);
        }
    }
}
