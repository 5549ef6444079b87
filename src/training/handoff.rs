//! Capacity-1 overwrite channel between the trainer and the display.
//!
//! The producer never waits for the consumer: sending into a full slot
//! replaces the unconsumed value. The consumer polls and always gets the most
//! recent value, or nothing if no new value arrived since its last poll.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

struct Slot<T> {
    value: Mutex<Option<T>>,
    overwritten: AtomicUsize,
}

/// Producer half of a [`slot`].
pub struct FrameSender<T> {
    slot: Arc<Slot<T>>,
}

/// Consumer half of a [`slot`].
pub struct FrameReceiver<T> {
    slot: Arc<Slot<T>>,
}

/// Create a connected sender/receiver pair sharing one empty slot.
pub fn slot<T>() -> (FrameSender<T>, FrameReceiver<T>) {
    let slot = Arc::new(Slot {
        value: Mutex::new(None),
        overwritten: AtomicUsize::new(0),
    });
    (
        FrameSender { slot: slot.clone() },
        FrameReceiver { slot },
    )
}

impl<T> FrameSender<T> {
    /// Store `value`, replacing any value the receiver has not taken yet.
    /// Returns the displaced value so it is dropped outside the lock.
    pub fn send(&self, value: T) -> Option<T> {
        let displaced = self.slot.value.lock().replace(value);
        if displaced.is_some() {
            self.slot.overwritten.fetch_add(1, Ordering::Relaxed);
        }
        displaced
    }
}

impl<T> FrameReceiver<T> {
    /// Take the buffered value, if any. Never waits for the producer.
    pub fn try_recv(&self) -> Option<T> {
        self.slot.value.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.value.lock().is_none()
    }

    /// Number of values replaced before the receiver saw them.
    pub fn overwritten(&self) -> usize {
        self.slot.overwritten.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_slot_yields_nothing() {
        let (_tx, rx) = slot::<u32>();
        assert!(rx.is_empty());
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_second_send_overwrites_first() {
        let (tx, rx) = slot();
        assert_eq!(tx.send(1), None);
        assert_eq!(tx.send(2), Some(1));
        assert_eq!(rx.overwritten(), 1);

        assert_eq!(rx.try_recv(), Some(2));
        // Only one value was ever buffered.
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_receive_then_send_does_not_count_as_overwrite() {
        let (tx, rx) = slot();
        tx.send("a");
        assert_eq!(rx.try_recv(), Some("a"));
        assert_eq!(tx.send("b"), None);
        assert_eq!(rx.overwritten(), 0);
        assert!(!rx.is_empty());
    }

    #[test]
    fn test_value_survives_sender_drop() {
        let (tx, rx) = slot();
        tx.send(7);
        drop(tx);
        assert_eq!(rx.try_recv(), Some(7));
    }

    #[test]
    fn test_concurrent_consumer_sees_increasing_values() {
        let (tx, rx) = slot();
        let producer = thread::spawn(move || {
            for i in 0..10_000u32 {
                tx.send(i);
            }
        });

        let mut seen = Vec::new();
        while !producer.is_finished() {
            if let Some(v) = rx.try_recv() {
                seen.push(v);
            }
        }
        producer.join().unwrap();
        if let Some(v) = rx.try_recv() {
            seen.push(v);
        }

        assert_eq!(seen.last(), Some(&9_999));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.len() + rx.overwritten(), 10_000);
    }
}
