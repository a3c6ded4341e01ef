//! Display ordering for a stall's live queue.
//!
//! The view is the persisted active entries in position order, with `k`
//! buffer slots placed immediately after the last round-1 entry, where `k`
//! is the number of round-1 entries. Buffer slots have no identity and no
//! position; they are rebuilt on every call and never stored.

use serde::Serialize;

use crate::priority::Tier;

/// Anything that can be placed in a queue view.
pub trait QueueMember {
    fn tier(&self) -> Tier;
}

/// One slot of the rendered queue.
///
/// Serialises as `{"kind": "entry", ...entry fields}` or `{"kind": "buffer"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueSlot<T> {
    Entry(T),
    Buffer,
}

impl<T> QueueSlot<T> {
    pub fn is_buffer(&self) -> bool {
        matches!(self, Self::Buffer)
    }

    pub fn entry(&self) -> Option<&T> {
        match self {
            Self::Entry(e) => Some(e),
            Self::Buffer => None,
        }
    }
}

/// Number of buffer slots the view reserves for `entries`.
pub fn buffer_count<T: QueueMember>(entries: &[T]) -> usize {
    entries.iter().filter(|e| e.tier() == Tier::Round1).count()
}

/// Build the display view from entries already ordered by position.
///
/// Pure and deterministic: the same input always yields the same slots.
pub fn build_view<T: QueueMember>(entries: Vec<T>) -> Vec<QueueSlot<T>> {
    let k = buffer_count(&entries);
    let insert_after = entries.iter().rposition(|e| e.tier() == Tier::Round1);

    let mut slots = Vec::with_capacity(entries.len() + k);
    for (i, entry) in entries.into_iter().enumerate() {
        slots.push(QueueSlot::Entry(entry));
        if Some(i) == insert_after {
            slots.extend((0..k).map(|_| QueueSlot::Buffer));
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    struct Item {
        name: &'static str,
        tier: Tier,
    }

    impl QueueMember for Item {
        fn tier(&self) -> Tier {
            self.tier
        }
    }

    fn item(name: &'static str, tier: Tier) -> Item {
        Item { name, tier }
    }

    fn render(slots: &[QueueSlot<Item>]) -> Vec<&'static str> {
        slots
            .iter()
            .map(|s| s.entry().map(|e| e.name).unwrap_or("_"))
            .collect()
    }

    #[test]
    fn empty_queue_has_no_slots() {
        assert!(build_view::<Item>(Vec::new()).is_empty());
    }

    #[test]
    fn one_buffer_per_round_one_entry() {
        let view = build_view(vec![item("A", Tier::Round1), item("B", Tier::WalkIn)]);
        assert_eq!(render(&view), vec!["A", "_", "B"]);
    }

    #[test]
    fn buffers_follow_last_round_one() {
        let view = build_view(vec![
            item("A", Tier::Round1),
            item("B", Tier::Round1),
            item("C", Tier::Round1),
            item("D", Tier::Round2),
            item("E", Tier::WalkIn),
        ]);
        assert_eq!(render(&view), vec!["A", "B", "C", "_", "_", "_", "D", "E"]);
    }

    #[test]
    fn no_round_one_means_no_buffers() {
        let view = build_view(vec![item("C", Tier::Round2), item("B", Tier::WalkIn)]);
        assert_eq!(render(&view), vec!["C", "B"]);
        assert!(!view.iter().any(QueueSlot::is_buffer));
    }

    #[test]
    fn view_is_deterministic() {
        let entries = vec![
            item("A", Tier::Round1),
            item("B", Tier::Round3),
            item("C", Tier::WalkIn),
        ];
        assert_eq!(build_view(entries.clone()), build_view(entries));
    }

    #[test]
    fn slots_serialize_with_kind_tag() {
        let view = build_view(vec![item("A", Tier::Round1)]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json[0]["kind"], "entry");
        assert_eq!(json[0]["name"], "A");
        assert_eq!(json[0]["tier"], "round_1");
        assert_eq!(json[1], serde_json::json!({ "kind": "buffer" }));
    }
}
