#[cfg(test)]
mod units {
    use crate::event::{Event, EventKind, InteractionKind};
    use crate::sorter::Sorter;
    use std::collections::HashMap;

    fn counters(map: &HashMap<usize, u64>) -> impl Fn(usize) -> u64 + '_ {
        move |id| *map.get(&id).unwrap_or(&0)
    }

    #[test]
    fn pops_in_non_decreasing_time_order() {
        let mut sorter = Sorter::new(3);
        sorter.push(Event::single(EventKind::Cell, 3.0, 0, 0));
        sorter.push(Event::single(EventKind::Cell, 1.0, 1, 0));
        sorter.push(Event::single(EventKind::Cell, 2.0, 2, 0));

        let live = HashMap::new();
        let times: Vec<f64> = std::iter::from_fn(|| sorter.pop_next(counters(&live)))
            .map(|e| e.time)
            .collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn stale_event_is_silently_discarded() {
        let mut sorter = Sorter::new(2);
        sorter.push(Event::single(EventKind::Cell, 1.0, 0, 0));
        // particle 0's counter has since moved to 1, invalidating the
        // just-pushed event without ever touching the heap directly.
        let mut live = HashMap::new();
        live.insert(0usize, 1u64);
        assert!(sorter.pop_next(counters(&live)).is_none());
    }

    #[test]
    fn newer_push_supersedes_stale_global_entry() {
        let mut sorter = Sorter::new(2);
        sorter.push(Event::single(EventKind::Cell, 5.0, 0, 0));
        sorter.push(Event::single(
            EventKind::Interaction(InteractionKind::Core),
            2.0,
            0,
            0,
        ));
        let live = HashMap::new();
        let first = sorter.pop_next(counters(&live)).unwrap();
        assert_eq!(first.time, 2.0);
    }

    #[test]
    fn pair_event_requires_both_counters_to_match() {
        let mut sorter = Sorter::new(2);
        sorter.push(Event::pair(
            EventKind::Interaction(InteractionKind::Core),
            1.0,
            0,
            0,
            1,
            0,
        ));
        let mut live = HashMap::new();
        live.insert(1usize, 1u64);
        assert!(sorter.pop_next(counters(&live)).is_none());
    }

    #[test]
    fn rescale_times_multiplies_all_pending_events() {
        let mut sorter = Sorter::new(2);
        sorter.push(Event::single(EventKind::Cell, 4.0, 0, 0));
        sorter.rescale_times(0.5);
        let live = HashMap::new();
        let event = sorter.pop_next(counters(&live)).unwrap();
        assert!((event.time - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_sorter_pops_none() {
        let mut sorter = Sorter::new(1);
        let live = HashMap::new();
        assert!(sorter.pop_next(counters(&live)).is_none());
    }
}
