//! Property-based tests for the ordering planner
//!
//! Drives the planner the way the storage layer does (range shifts over
//! `(id, position)` rows) and checks it against a plain `Vec` model.

use podshelf_core::ordering::{
    append_position, is_dense, plan_insert, plan_move, plan_remove, play_next_position, Shift,
};
use proptest::prelude::*;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Append,
    InsertAt(usize),
    Remove(usize),
    Move(usize, usize),
    PlayNext { pick: usize, current: Option<usize> },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Append),
        (0usize..64).prop_map(Op::InsertAt),
        (0usize..64).prop_map(Op::Remove),
        (0usize..64, 0usize..64).prop_map(|(a, b)| Op::Move(a, b)),
        (0usize..64, proptest::option::of(0usize..64))
            .prop_map(|(pick, current)| Op::PlayNext { pick, current }),
    ]
}

/// Rows as stored: `(id, position)` in insertion order, never sorted
#[derive(Debug, Default)]
struct Rows {
    rows: Vec<(u32, i64)>,
    next_id: u32,
}

impl Rows {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn shift(&mut self, shift: Option<Shift>) {
        if let Some(shift) = shift {
            for row in &mut self.rows {
                row.1 = shift.apply(row.1);
            }
        }
    }

    fn position_of(&self, id: u32) -> Option<i64> {
        self.rows.iter().find(|(i, _)| *i == id).map(|(_, p)| *p)
    }

    fn id_at(&self, position: i64) -> Option<u32> {
        self.rows.iter().find(|(_, p)| *p == position).map(|(i, _)| *i)
    }

    fn fresh_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_at(&mut self, id: u32, target: i64) {
        let shift = plan_insert(target, self.len()).unwrap();
        self.shift(shift);
        self.rows.push((id, target));
    }

    fn remove(&mut self, id: u32) {
        let position = self.position_of(id).unwrap();
        let len = self.len();
        self.rows.retain(|(i, _)| *i != id);
        self.shift(plan_remove(position, len));
    }

    fn in_order(&self) -> Vec<u32> {
        let mut sorted = self.rows.clone();
        sorted.sort_by_key(|(_, p)| *p);
        sorted.into_iter().map(|(id, _)| id).collect()
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: positions stay dense and match a Vec model after any sequence of operations
    #[test]
    fn positions_stay_dense_and_match_model(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let mut rows = Rows::default();
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Append => {
                    let id = rows.fresh_id();
                    let position = append_position(rows.len());
                    rows.rows.push((id, position));
                    model.push(id);
                }
                Op::InsertAt(target) => {
                    let target = target % (rows.len() + 1);
                    let id = rows.fresh_id();
                    rows.insert_at(id, target as i64);
                    model.insert(target, id);
                }
                Op::Remove(index) => {
                    if model.is_empty() {
                        continue;
                    }
                    let id = model.remove(index % model.len());
                    rows.remove(id);
                }
                Op::Move(from, to) => {
                    if model.is_empty() {
                        continue;
                    }
                    let len = model.len();
                    let (from, to) = (from % len, to % len);
                    let id = model.remove(from);
                    model.insert(to, id);

                    let old = rows.position_of(id).unwrap();
                    let shift = plan_move(old, to as i64, len).unwrap();
                    rows.shift(shift);
                    rows.rows.iter_mut().find(|(i, _)| *i == id).unwrap().1 = to as i64;
                }
                Op::PlayNext { pick, current } => {
                    // Either re-queue an existing item or a brand new one
                    let id = if !model.is_empty() && pick % 2 == 0 {
                        model[pick % model.len()]
                    } else {
                        rows.fresh_id()
                    };
                    let current_id = match current {
                        Some(c) if !model.is_empty() => Some(model[c % model.len()]),
                        _ => None,
                    };

                    if rows.position_of(id).is_some() {
                        rows.remove(id);
                        model.retain(|i| *i != id);
                    }
                    let current_position = current_id.and_then(|c| rows.position_of(c));
                    let target = play_next_position(current_position);
                    rows.insert_at(id, target);
                    model.insert(target as usize, id);
                }
            }

            prop_assert!(is_dense(rows.rows.iter().map(|(_, p)| *p)), "positions not dense: {:?}", rows.rows);
            prop_assert_eq!(rows.in_order(), model.clone());
        }
    }

    /// Property: moving an item to its own position changes nothing
    #[test]
    fn move_to_own_position_is_noop(len in 1usize..50, index in 0usize..50) {
        let index = (index % len) as i64;
        prop_assert_eq!(plan_move(index, index, len).unwrap(), None);
    }

    /// Property: remove then re-append lands at the end
    #[test]
    fn remove_then_append_lands_last(len in 1usize..40, index in 0usize..40) {
        let mut rows = Rows::default();
        for _ in 0..len {
            let id = rows.fresh_id();
            let position = append_position(rows.len());
            rows.rows.push((id, position));
        }

        let victim = rows.id_at((index % len) as i64).unwrap();
        rows.remove(victim);
        let position = append_position(rows.len());
        rows.rows.push((victim, position));

        prop_assert_eq!(rows.position_of(victim), Some(len as i64 - 1));
        prop_assert!(is_dense(rows.rows.iter().map(|(_, p)| *p)));
    }

    /// Property: play-next without a current item goes to the front and shifts everyone up
    #[test]
    fn play_next_without_current_inserts_at_front(len in 0usize..40) {
        let mut rows = Rows::default();
        for _ in 0..len {
            let id = rows.fresh_id();
            let position = append_position(rows.len());
            rows.rows.push((id, position));
        }
        let before = rows.rows.clone();

        let new_id = rows.fresh_id();
        rows.insert_at(new_id, play_next_position(None));

        prop_assert_eq!(rows.position_of(new_id), Some(0));
        for (id, position) in before {
            prop_assert_eq!(rows.position_of(id), Some(position + 1));
        }
    }
}
