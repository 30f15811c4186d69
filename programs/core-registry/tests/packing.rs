use anchor_lang::prelude::Pubkey;
use core_registry::plugins::ExternalAdapterKey;
use core_registry::registry::{apply_delta, RecordId, RegistryLayout, Slot};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert { at: usize, header_len: u64, data_len: u64 },
    Remove(usize),
    Resize { index: usize, data_len: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), 1u64..16, 0u64..64).prop_map(|(at, header_len, data_len)| Op::Insert {
            at,
            header_len,
            data_len,
        }),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), 0u64..64).prop_map(|(index, data_len)| Op::Resize { index, data_len }),
    ]
}

fn id(n: u8) -> RecordId {
    RecordId::Adapter(ExternalAdapterKey::LifecycleHook(Pubkey::new_from_array(
        [n; 32],
    )))
}

fn assert_packed(layout: &RegistryLayout) {
    let mut cursor = layout.start();
    for placement in layout.placements().unwrap() {
        assert_eq!(placement.offset, cursor);
        assert!(placement.data_offset > placement.offset);
        cursor = placement.end().unwrap();
    }
    assert_eq!(cursor, layout.end().unwrap());
    layout.verify().unwrap();
}

proptest! {
    #[test]
    fn records_stay_packed(start in 1u64..512, ops in prop::collection::vec(op(), 1..40)) {
        let mut layout = RegistryLayout::new(start);
        let mut next_id = 0u8;

        for op in ops {
            match op {
                Op::Insert { at, header_len, data_len } => {
                    let at = at % (layout.len() + 1);
                    let before = layout.end().unwrap();
                    let grown = layout
                        .insert(at, Slot::new(id(next_id), header_len, data_len))
                        .unwrap();
                    next_id += 1;
                    prop_assert_eq!(grown, header_len + data_len);
                    prop_assert_eq!(layout.end().unwrap(), before + grown);
                }
                Op::Remove(index) if !layout.is_empty() => {
                    let victim = layout.slots()[index % layout.len()].id;
                    let before = layout.end().unwrap();
                    let released = layout.remove(&[victim]).unwrap();
                    prop_assert!(!layout.contains(&victim));
                    prop_assert_eq!(layout.end().unwrap(), before - released);
                }
                Op::Resize { index, data_len } if !layout.is_empty() => {
                    let index = index % layout.len();
                    let target = layout.slots()[index].id;
                    let before = layout.placements().unwrap();
                    let delta = layout.resize(&target, data_len).unwrap();
                    let after = layout.placements().unwrap();

                    for (position, (old, new)) in before.iter().zip(&after).enumerate() {
                        if position <= index {
                            prop_assert_eq!(old.offset, new.offset);
                        } else {
                            prop_assert_eq!(apply_delta(old.offset, delta).unwrap(), new.offset);
                        }
                    }
                    prop_assert_eq!(after[index].data_len, data_len);
                }
                Op::Remove(_) | Op::Resize { .. } => {}
            }
            assert_packed(&layout);
        }
    }

    #[test]
    fn same_length_resize_moves_nothing(
        sizes in prop::collection::vec((1u64..16, 0u64..64), 1..12),
        pick in any::<usize>(),
        data_len in 0u64..64,
    ) {
        let mut layout = RegistryLayout::new(119);
        for (n, (header_len, len)) in sizes.iter().enumerate() {
            layout.push(Slot::new(id(n as u8), *header_len, *len)).unwrap();
        }
        let target = layout.slots()[pick % layout.len()].id;

        layout.resize(&target, data_len).unwrap();
        let snapshot = layout.placements().unwrap();
        prop_assert_eq!(layout.resize(&target, data_len).unwrap(), 0);
        prop_assert_eq!(layout.placements().unwrap(), snapshot);
    }
}
