use super::slot::Slot;

// The hop window.
//
// An entry always lives within `HOP_RANGE - 1` slots past its home, which bounds
// every lookup to `HOP_RANGE` probes.
pub const HOP_RANGE: usize = 4;

// How far past the home slot the displacement search looks for a hole.
pub const SEARCH_RANGE: usize = 2 * HOP_RANGE;

// Returns the forward distance from slot `from` to slot `to`, wrapping around
// a table of `len` slots.
#[inline]
pub fn distance(from: usize, to: usize, len: usize) -> usize {
    (to + len - from) % len
}

// A linear probe sequence over a hop window.
pub struct Probe {
    // The current index in the probe sequence.
    pub i: usize,
    // The current length of the probe sequence.
    pub len: usize,
    // The length of the table.
    capacity: usize,
}

impl Probe {
    // Initialize the probe sequence at the home slot.
    #[inline]
    pub fn start(home: usize, capacity: usize) -> Probe {
        debug_assert!(home < capacity);

        Probe {
            i: home,
            len: 0,
            capacity,
        }
    }

    // Returns true while the probe is still inside the hop window.
    #[inline]
    pub fn in_window(&self) -> bool {
        self.len < HOP_RANGE
    }

    // Increment the probe sequence.
    #[inline]
    pub fn next(&mut self) {
        self.len += 1;
        self.i += 1;

        if self.i == self.capacity {
            self.i = 0;
        }
    }
}

// Returns the first empty slot in the hop window of `home`.
pub fn find_empty_in_window<K, V>(slots: &[Slot<K, V>], home: usize) -> Option<usize> {
    let mut probe = Probe::start(home, slots.len());

    while probe.in_window() {
        if slots[probe.i].is_empty() {
            return Some(probe.i);
        }

        probe.next();
    }

    None
}

// Finds a chain of moves that opens a slot inside the (full) hop window of `home`.
//
// The returned path starts at the nearest empty slot past the window and lists
// every position the hole moves through, ending inside the window. Moving the
// entry at `path[n + 1]` into `path[n]`, in order, keeps every moved entry within
// its own window and leaves `path.last()` empty.
//
// Returns `None` if there is no hole within `SEARCH_RANGE` or the hole cannot be
// brought into the window.
pub fn find_displacement_path<K, V>(slots: &[Slot<K, V>], home: usize) -> Option<Vec<usize>> {
    let len = slots.len();
    debug_assert!(len > SEARCH_RANGE);

    // Every slot in the window is occupied, so the first hole is at least
    // `HOP_RANGE` away.
    let mut hole = (HOP_RANGE..=SEARCH_RANGE)
        .map(|offset| (home + offset) % len)
        .find(|&i| slots[i].is_empty())?;

    let mut path = vec![hole];

    while distance(home, hole, len) >= HOP_RANGE {
        // Prefer the occupant farthest behind the hole, it moves the hole back
        // the most.
        hole = (1..HOP_RANGE)
            .rev()
            .map(|back| (hole + len - back) % len)
            .find(|&i| match slots[i].home() {
                Some(owner) => distance(owner, hole, len) < HOP_RANGE,
                None => false,
            })?;

        path.push(hole);
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::slot::Bucket;

    // Builds a table of `len` slots from `(index, home)` pairs. The key is the index.
    fn table(len: usize, occupied: &[(usize, usize)]) -> Vec<Slot<usize, ()>> {
        let mut slots: Vec<Slot<usize, ()>> = (0..len).map(|_| Slot::Empty).collect();
        for &(i, home) in occupied {
            slots[i] = Slot::Occupied(Bucket {
                key: i,
                value: (),
                home,
            });
        }
        slots
    }

    fn apply(slots: &mut [Slot<usize, ()>], path: &[usize]) {
        for hop in path.windows(2) {
            slots.swap(hop[0], hop[1]);
        }
    }

    #[test]
    fn distance_wraps() {
        assert_eq!(distance(2, 5, 10), 3);
        assert_eq!(distance(8, 1, 10), 3);
        assert_eq!(distance(4, 4, 10), 0);
    }

    #[test]
    fn probe_wraps_within_window() {
        let mut probe = Probe::start(8, 10);
        let mut seen = Vec::new();
        while probe.in_window() {
            seen.push(probe.i);
            probe.next();
        }
        assert_eq!(seen, [8, 9, 0, 1]);
    }

    #[test]
    fn empty_in_window() {
        let slots = table(10, &[(3, 3), (4, 3)]);
        assert_eq!(find_empty_in_window(&slots, 3), Some(5));
        assert_eq!(find_empty_in_window(&slots, 0), Some(0));

        let slots = table(10, &[(3, 3), (4, 3), (5, 3), (6, 3)]);
        assert_eq!(find_empty_in_window(&slots, 3), None);
    }

    #[test]
    fn single_move() {
        let mut slots = table(10, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        let path = find_displacement_path(&slots, 0).unwrap();
        assert_eq!(path, [4, 1]);

        apply(&mut slots, &path);
        assert!(slots[1].is_empty());
        assert_eq!(slots[4].home(), Some(1));
    }

    #[test]
    fn cascading_moves() {
        let occupied = [
            (0, 0),
            (1, 1),
            (2, 0),
            (3, 0),
            (4, 4),
            (5, 5),
            (6, 6),
            (7, 7),
        ];
        let mut slots = table(10, &occupied);
        let path = find_displacement_path(&slots, 0).unwrap();
        assert_eq!(path, [8, 5, 4, 1]);

        apply(&mut slots, &path);
        assert!(slots[1].is_empty());
        assert_eq!(slots[8].home(), Some(5));
        assert_eq!(slots[5].home(), Some(4));
        assert_eq!(slots[4].home(), Some(1));

        // Every entry is still inside its window.
        for (i, slot) in slots.iter().enumerate() {
            if let Some(home) = slot.home() {
                assert!(distance(home, i, slots.len()) < HOP_RANGE);
            }
        }
    }

    #[test]
    fn wrapping_path() {
        let mut slots = table(10, &[(8, 8), (9, 9), (0, 8), (1, 8)]);
        let path = find_displacement_path(&slots, 8).unwrap();
        assert_eq!(path, [2, 9]);

        apply(&mut slots, &path);
        assert!(slots[9].is_empty());
        assert_eq!(slots[2].home(), Some(9));
    }

    #[test]
    fn no_movable_entry() {
        let slots = table(10, &[(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(find_displacement_path(&slots, 0), None);
    }

    #[test]
    fn no_hole_in_range() {
        let occupied: Vec<_> = (0..=SEARCH_RANGE).map(|i| (i, i)).collect();
        let slots = table(10, &occupied);
        assert_eq!(find_displacement_path(&slots, 0), None);
    }
}
