//! Bounded top-K set of networks ordered by signal strength.

use crate::config;
use crate::wifi::NetworkObservation;
use heapless::Vec;

/// The strongest networks of one scan, strongest first.
///
/// Backed by a fixed array so a scan never allocates more than `N` slots
/// regardless of how many networks the radio reports. Entries with equal
/// strength keep the order in which they were offered.
#[derive(Debug, Clone, Default)]
pub struct RankedNetworkSet<const N: usize = { config::MAX_NETWORKS }> {
    entries: Vec<NetworkObservation, N>,
}

impl<const N: usize> RankedNetworkSet<N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Insert `observation` at its sorted position.
    ///
    /// When the set is full, an observation that is not strictly stronger
    /// than the weakest entry is dropped; otherwise the weakest entry is
    /// evicted to make room.
    pub fn offer(&mut self, observation: NetworkObservation) {
        if N == 0 {
            return;
        }
        if let Some(weakest) = self.weakest()
            && self.is_full()
            && observation.rssi <= weakest.rssi
        {
            return;
        }

        let pos = self
            .entries
            .iter()
            .position(|held| held.rssi < observation.rssi)
            .unwrap_or(self.entries.len());

        if self.is_full() {
            self.entries.pop();
        }

        if self.entries.insert(pos, observation).is_err() {
            unreachable!("a slot is free after the pop");
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetworkObservation> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&NetworkObservation> {
        self.entries.get(index)
    }

    pub fn weakest(&self) -> Option<&NetworkObservation> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    #[cfg(test)]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<'a, const N: usize> IntoIterator for &'a RankedNetworkSet<N> {
    type Item = &'a NetworkObservation;
    type IntoIter = std::slice::Iter<'a, NetworkObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wifi::SecurityClass;

    fn obs(name: &str, rssi: i32) -> NetworkObservation {
        NetworkObservation::new(name, rssi, SecurityClass::Wpa2)
    }

    fn names<const N: usize>(set: &RankedNetworkSet<N>) -> std::vec::Vec<&str> {
        set.iter().map(|o| o.ssid.as_str()).collect()
    }

    fn assert_descending<const N: usize>(set: &RankedNetworkSet<N>) {
        let rssi: std::vec::Vec<i32> = set.iter().map(|o| o.rssi).collect();
        assert!(
            rssi.windows(2).all(|w| w[0] >= w[1]),
            "not descending: {rssi:?}"
        );
        assert!(set.len() <= N);
    }

    #[test]
    fn orders_by_strength_descending() {
        let mut set: RankedNetworkSet = RankedNetworkSet::new();
        set.offer(NetworkObservation::new("A", -40, SecurityClass::Wpa2));
        set.offer(NetworkObservation::new("B", -70, SecurityClass::Open));
        set.offer(NetworkObservation::new("C", -55, SecurityClass::Wep));
        assert_eq!(names(&set), ["A", "C", "B"]);
        assert_eq!(set.capacity(), 10);
    }

    #[test]
    fn keeps_invariants_after_every_offer() {
        let mut set = RankedNetworkSet::<4>::new();
        let strengths = [-60, -30, -90, -30, -45, -100, -10, -60, -61, -59, -5, -95];
        for (i, rssi) in strengths.into_iter().enumerate() {
            set.offer(obs(&format!("n{i}"), rssi));
            assert_descending(&set);
        }
        let rssi: std::vec::Vec<i32> = set.iter().map(|o| o.rssi).collect();
        assert_eq!(rssi, [-5, -10, -30, -30]);
    }

    #[test]
    fn weaker_offer_is_dropped_when_full() {
        let mut set = RankedNetworkSet::<3>::new();
        set.offer(obs("a", -40));
        set.offer(obs("b", -50));
        set.offer(obs("c", -60));
        let before = names(&set).into_iter().map(String::from).collect::<std::vec::Vec<_>>();

        set.offer(obs("d", -61));
        set.offer(obs("e", -60));

        assert_eq!(names(&set), before);
        assert_eq!(set.weakest().map(|o| o.rssi), Some(-60));
    }

    #[test]
    fn stronger_offer_evicts_only_the_weakest() {
        let mut set = RankedNetworkSet::<3>::new();
        set.offer(obs("a", -40));
        set.offer(obs("b", -50));
        set.offer(obs("c", -60));

        set.offer(obs("d", -45));

        assert_eq!(names(&set), ["a", "d", "b"]);
        assert!(set.is_full());
    }

    #[test]
    fn full_set_inserts_at_front_middle_and_tail() {
        let mut set = RankedNetworkSet::<3>::new();
        for (name, rssi) in [("a", -50), ("b", -60), ("c", -70)] {
            set.offer(obs(name, rssi));
        }

        set.offer(obs("tail", -65));
        assert_eq!(names(&set), ["a", "b", "tail"]);
        set.offer(obs("mid", -55));
        assert_eq!(names(&set), ["a", "mid", "b"]);
        set.offer(obs("front", -10));
        assert_eq!(names(&set), ["front", "a", "mid"]);
        assert!(set.is_full());
    }

    #[test]
    fn ties_keep_first_observed() {
        let mut set = RankedNetworkSet::<5>::new();
        set.offer(obs("first", -50));
        set.offer(obs("second", -50));
        set.offer(obs("third", -50));
        assert_eq!(names(&set), ["first", "second", "third"]);
    }

    #[test]
    fn duplicate_names_are_kept() {
        let mut set = RankedNetworkSet::<5>::new();
        set.offer(obs("cafe", -50));
        set.offer(obs("cafe", -70));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn reset_empties_and_iteration_restarts() {
        let mut set = RankedNetworkSet::<5>::new();
        set.offer(obs("a", -50));
        set.offer(obs("b", -20));
        assert_eq!(set.iter().count(), 2);
        assert_eq!((&set).into_iter().count(), 2);
        assert_eq!(set.get(0).map(|o| o.ssid.as_str()), Some("b"));

        set.reset();
        assert!(set.is_empty());
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn zero_capacity_never_holds_anything() {
        let mut set = RankedNetworkSet::<0>::new();
        set.offer(obs("a", -1));
        assert!(set.is_empty());
    }
}
