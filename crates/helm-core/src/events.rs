// src/events.rs
//! Touch event queue and raw-sample tracking.
//!
//! The queue is a bounded single-producer/single-consumer FIFO backed by
//! `heapless::spsc`, which is lock-free and safe against a producer that
//! preempts the consumer at any instruction boundary (touch sampling runs
//! at a higher priority than the UI loop). The producer half lives with
//! the touch-sampling context, the consumer half with the render loop.
//!
//! Overflow policy: lossy under overload. When the queue is full the
//! *offered* event is dropped, a counter is bumped, and a warning is
//! logged. Dropping input is preferable to blocking the sampler.

use heapless::spsc::{Consumer, Producer, Queue};
use log::warn;

use crate::ui::core::{TouchEvent, TouchPoint};

/// Queue capacity in events. One slot is reserved by the spsc layout.
pub const TOUCH_QUEUE_CAPACITY: usize = 32;

/// Backing storage for the touch event queue.
pub type TouchQueue = Queue<TouchEvent, TOUCH_QUEUE_CAPACITY>;

/// Split a queue into its producer and consumer halves.
pub fn split(queue: &mut TouchQueue) -> (TouchSender<'_>, TouchReceiver<'_>) {
    let (producer, consumer) = queue.split();
    (
        TouchSender {
            producer,
            dropped: 0,
        },
        TouchReceiver { consumer },
    )
}

/// Producer half of the touch event queue.
pub struct TouchSender<'q> {
    producer: Producer<'q, TouchEvent>,
    dropped: u32,
}

impl TouchSender<'_> {
    /// Enqueue an event. Returns `false` when the queue was full and the
    /// event was dropped.
    pub fn send(&mut self, event: TouchEvent) -> bool {
        match self.producer.enqueue(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("touch queue full, dropped {:?} ({} total)", event, self.dropped);
                false
            }
        }
    }

    /// Number of events dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Consumer half of the touch event queue.
pub struct TouchReceiver<'q> {
    consumer: Consumer<'q, TouchEvent>,
}

impl TouchReceiver<'_> {
    /// Dequeue the oldest event, or `None` when the queue is empty.
    pub fn recv(&mut self) -> Option<TouchEvent> {
        self.consumer.dequeue()
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converts raw panel samples into [`TouchEvent`] transitions.
///
/// A scan reports either the primary touch point or nothing. The tracker
/// turns the sample stream into `Press` on first contact, `Drag` when the
/// point moves while held, and `Release` (at the last known point) on
/// lift-off, since the controller reports no coordinates once the finger
/// is gone.
#[derive(Debug, Default)]
pub struct TouchTracker {
    down: Option<TouchPoint>,
}

impl TouchTracker {
    pub const fn new() -> Self {
        Self { down: None }
    }

    pub fn update(&mut self, sample: Option<TouchPoint>) -> Option<TouchEvent> {
        match (self.down, sample) {
            (None, Some(point)) => {
                self.down = Some(point);
                Some(TouchEvent::Press(point))
            }
            (Some(last), Some(point)) => {
                if point == last {
                    None
                } else {
                    self.down = Some(point);
                    Some(TouchEvent::Drag(point))
                }
            }
            (Some(last), None) => {
                self.down = None;
                Some(TouchEvent::Release(last))
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_preserves_fifo_order() {
        let mut queue = TouchQueue::new();
        let (mut sender, mut receiver) = split(&mut queue);

        let first = TouchEvent::Press(TouchPoint::new(1, 1));
        let second = TouchEvent::Release(TouchPoint::new(2, 2));
        assert!(sender.send(first));
        assert!(sender.send(second));

        assert_eq!(receiver.recv(), Some(first));
        assert_eq!(receiver.recv(), Some(second));
        assert_eq!(receiver.recv(), None);
    }

    #[test]
    fn overflow_drops_offered_event() {
        let mut queue = TouchQueue::new();
        let (mut sender, mut receiver) = split(&mut queue);

        let mut accepted = 0u32;
        for i in 0..(TOUCH_QUEUE_CAPACITY as u16 + 8) {
            if sender.send(TouchEvent::Press(TouchPoint::new(i, 0))) {
                accepted += 1;
            }
        }
        assert!(sender.dropped() > 0);
        assert_eq!(
            accepted + sender.dropped(),
            TOUCH_QUEUE_CAPACITY as u32 + 8
        );

        // The accepted prefix is delivered intact and in order.
        for i in 0..accepted as u16 {
            assert_eq!(receiver.recv(), Some(TouchEvent::Press(TouchPoint::new(i, 0))));
        }
        assert_eq!(receiver.recv(), None);
    }

    #[test]
    fn tracker_reports_press_drag_release() {
        let mut tracker = TouchTracker::new();

        assert_eq!(tracker.update(None), None);
        assert_eq!(
            tracker.update(Some(TouchPoint::new(10, 10))),
            Some(TouchEvent::Press(TouchPoint::new(10, 10)))
        );
        // Unmoved contact produces no event.
        assert_eq!(tracker.update(Some(TouchPoint::new(10, 10))), None);
        assert_eq!(
            tracker.update(Some(TouchPoint::new(12, 11))),
            Some(TouchEvent::Drag(TouchPoint::new(12, 11)))
        );
        // Release reports the last known point.
        assert_eq!(
            tracker.update(None),
            Some(TouchEvent::Release(TouchPoint::new(12, 11)))
        );
        assert_eq!(tracker.update(None), None);
    }
}
