use crate::message::NetworkAddress;

use rand::seq::SliceRandom;

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

/// The shared set of discovered peer addresses.
///
/// Implementations must tolerate concurrent inserts from several pipelines together with a
/// concurrent `size` read, and `size` must reflect every insert that has returned.
pub trait HostSet: Send + Sync {
    /// The maximum number of addresses held.
    fn capacity(&self) -> usize;

    fn size(&self) -> usize;

    /// Inserts an address, returning whether it was not already present.
    fn insert(&self, address: NetworkAddress) -> bool;
}

#[derive(Debug, Default)]
struct Buffer {
    members: HashSet<NetworkAddress>,
    order: VecDeque<NetworkAddress>,
}

/// A bounded host set. Once full, inserting a new address evicts the oldest one.
#[derive(Debug)]
pub struct Hosts {
    capacity: usize,
    buffer: Mutex<Buffer>,
}

impl Hosts {
    pub fn new(capacity: usize) -> Self {
        Hosts { capacity, buffer: Mutex::new(Buffer::default()) }
    }

    pub fn contains(&self, address: &NetworkAddress) -> bool {
        self.lock().members.contains(address)
    }

    /// Samples up to `k` distinct addresses at random.
    pub fn sample(&self, k: usize) -> Vec<NetworkAddress> {
        let buffer = self.lock();
        let mut rng = rand::thread_rng();
        let all: Vec<&NetworkAddress> = buffer.order.iter().collect();
        all.choose_multiple(&mut rng, k).map(|address| (*address).clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostSet for Hosts {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn size(&self) -> usize {
        self.lock().order.len()
    }

    fn insert(&self, address: NetworkAddress) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let mut buffer = self.lock();
        if buffer.members.contains(&address) {
            return false;
        }
        if buffer.order.len() >= self.capacity {
            if let Some(evicted) = buffer.order.pop_front() {
                debug!("evicting host {}", evicted);
                buffer.members.remove(&evicted);
            }
        }
        buffer.members.insert(address.clone());
        buffer.order.push_back(address);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::thread;

    fn address(port: u16) -> NetworkAddress {
        NetworkAddress::new(format!("10.0.0.1:{}", port).parse().unwrap(), 1)
    }

    #[test]
    fn test_insert_ignores_duplicates() {
        let hosts = Hosts::new(10);
        assert!(hosts.insert(address(1)));
        assert!(!hosts.insert(address(1)));
        assert_eq!(hosts.size(), 1);
        assert!(hosts.contains(&address(1)));
    }

    #[test]
    fn test_full_set_evicts_oldest() {
        let hosts = Hosts::new(2);
        hosts.insert(address(1));
        hosts.insert(address(2));
        hosts.insert(address(3));
        assert_eq!(hosts.size(), 2);
        assert!(!hosts.contains(&address(1)));
        assert!(hosts.contains(&address(3)));
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let hosts = Hosts::new(0);
        assert!(!hosts.insert(address(1)));
        assert_eq!(hosts.size(), 0);
    }

    #[test]
    fn test_sample() {
        let hosts = Hosts::new(10);
        for port in 0..5 {
            hosts.insert(address(port));
        }
        let sample = hosts.sample(3);
        assert_eq!(sample.len(), 3);
        assert!(sample.iter().all(|a| hosts.contains(a)));
        assert_eq!(hosts.sample(10).len(), 5);
    }

    #[test]
    fn test_concurrent_inserts() {
        let hosts = Arc::new(Hosts::new(1000));
        let handles: Vec<_> = (0..4u16)
            .map(|t| {
                let hosts = hosts.clone();
                thread::spawn(move || {
                    for i in 0..100u16 {
                        hosts.insert(address(t * 100 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(hosts.size(), 400);
    }
}
