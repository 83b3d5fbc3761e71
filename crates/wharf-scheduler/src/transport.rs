// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! # Transport
//!
//! The coordinator only sees two narrow seams: an `EventSource` it blocks on
//! for the next `Advance`, and a `NotificationSink` it reports to. Anything
//! implementing both can drive a run.
//!
//! Two implementations are provided:
//!
//! - `ChannelTransport`, the coordinator end of a pair of `std::sync::mpsc`
//!   channels. `channel_pair` also returns the `ClockLink` the driving
//!   thread uses.
//! - `MemoryTransport`, which replays queued events and records every
//!   notification. It is what embedders and tests use with
//!   `Coordinator::step`.

use crate::event::{Advance, Notification};
use std::{
    collections::VecDeque,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    time::Duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("the event source has been closed")]
    Closed,
    #[error("the notification receiver has hung up")]
    Disconnected,
    #[error("no message arrived within {0:?}")]
    Timeout(Duration),
}

pub trait EventSource<T> {
    /// Blocks until the next event is available.
    fn recv(&mut self) -> Result<Advance<T>, TransportError>;
}

pub trait NotificationSink<T> {
    fn send(&mut self, notification: Notification<T>) -> Result<(), TransportError>;
}

impl<T> NotificationSink<T> for Vec<Notification<T>> {
    #[inline]
    fn send(&mut self, notification: Notification<T>) -> Result<(), TransportError> {
        self.push(notification);
        Ok(())
    }
}

impl<T> EventSource<T> for VecDeque<Advance<T>> {
    #[inline]
    fn recv(&mut self) -> Result<Advance<T>, TransportError> {
        self.pop_front().ok_or(TransportError::Closed)
    }
}

/// Coordinator end of a channel transport.
#[derive(Debug)]
pub struct ChannelTransport<T> {
    advances: Receiver<Advance<T>>,
    notifications: Sender<Notification<T>>,
}

/// Clock end of a channel transport.
#[derive(Debug)]
pub struct ClockLink<T> {
    advances: Sender<Advance<T>>,
    notifications: Receiver<Notification<T>>,
}

/// Creates a connected transport.
pub fn channel_pair<T>() -> (ChannelTransport<T>, ClockLink<T>) {
    let (advance_tx, advance_rx) = mpsc::channel();
    let (notification_tx, notification_rx) = mpsc::channel();
    (
        ChannelTransport {
            advances: advance_rx,
            notifications: notification_tx,
        },
        ClockLink {
            advances: advance_tx,
            notifications: notification_rx,
        },
    )
}

impl<T> EventSource<T> for ChannelTransport<T> {
    #[inline]
    fn recv(&mut self) -> Result<Advance<T>, TransportError> {
        self.advances.recv().map_err(|_| TransportError::Closed)
    }
}

impl<T> NotificationSink<T> for ChannelTransport<T> {
    #[inline]
    fn send(&mut self, notification: Notification<T>) -> Result<(), TransportError> {
        self.notifications
            .send(notification)
            .map_err(|_| TransportError::Disconnected)
    }
}

impl<T> ClockLink<T> {
    pub fn advance(&self, advance: Advance<T>) -> Result<(), TransportError> {
        self.advances
            .send(advance)
            .map_err(|_| TransportError::Disconnected)
    }

    pub fn recv(&self) -> Result<Notification<T>, TransportError> {
        self.notifications
            .recv()
            .map_err(|_| TransportError::Closed)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Notification<T>, TransportError> {
        self.notifications
            .recv_timeout(timeout)
            .map_err(|err| match err {
                RecvTimeoutError::Timeout => TransportError::Timeout(timeout),
                RecvTimeoutError::Disconnected => TransportError::Closed,
            })
    }

    /// Collects notifications up to and including the next
    /// `TimestepComplete`. `timeout` bounds the wait for each message.
    pub fn await_completion(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Vec<Notification<T>>, TransportError> {
        let mut received = Vec::new();
        loop {
            let notification = match timeout {
                Some(timeout) => self.recv_timeout(timeout)?,
                None => self.recv()?,
            };
            let done = notification.is_timestep_complete();
            received.push(notification);
            if done {
                return Ok(received);
            }
        }
    }
}

/// Replays queued events and records notifications in memory.
#[derive(Debug, Clone)]
pub struct MemoryTransport<T> {
    pending: VecDeque<Advance<T>>,
    sent: Vec<Notification<T>>,
}

impl<T> Default for MemoryTransport<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryTransport<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    #[inline]
    pub fn with_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Advance<T>>,
    {
        Self {
            pending: events.into_iter().collect(),
            sent: Vec::new(),
        }
    }

    #[inline]
    pub fn push_event(&mut self, advance: Advance<T>) {
        self.pending.push_back(advance);
    }

    #[inline]
    pub fn sent(&self) -> &[Notification<T>] {
        &self.sent
    }

    /// Removes and returns every notification recorded so far.
    #[inline]
    pub fn drain_sent(&mut self) -> Vec<Notification<T>> {
        std::mem::take(&mut self.sent)
    }
}

impl<T> EventSource<T> for MemoryTransport<T> {
    #[inline]
    fn recv(&mut self) -> Result<Advance<T>, TransportError> {
        self.pending.recv()
    }
}

impl<T> NotificationSink<T> for MemoryTransport<T> {
    #[inline]
    fn send(&mut self, notification: Notification<T>) -> Result<(), TransportError> {
        self.sent.send(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wharf_model::{
        index::DockIndex,
        ship::{Direction, ShipId},
    };

    type IntegerType = i64;

    #[test]
    fn test_channel_pair_round_trip() {
        let (mut transport, clock) = channel_pair::<IntegerType>();
        clock.advance(Advance::new(0, 2)).unwrap();
        assert_eq!(transport.recv().unwrap(), Advance::new(0, 2));

        transport
            .send(Notification::Docked {
                dock: DockIndex::new(0),
                ship: ShipId(1),
                direction: Direction::Arriving,
            })
            .unwrap();
        transport
            .send(Notification::TimestepComplete { timestep: 0 })
            .unwrap();

        let received = clock.await_completion(Some(Duration::from_secs(5))).unwrap();
        assert_eq!(received.len(), 2);
        assert!(received[1].is_timestep_complete());
    }

    #[test]
    fn test_hang_ups_are_reported() {
        let (mut transport, clock) = channel_pair::<IntegerType>();
        drop(clock);
        assert_eq!(transport.recv(), Err(TransportError::Closed));
        assert_eq!(
            transport.send(Notification::TimestepComplete { timestep: 0 }),
            Err(TransportError::Disconnected)
        );
    }

    #[test]
    fn test_clock_times_out_without_notifications() {
        let (_transport, clock) = channel_pair::<IntegerType>();
        assert_eq!(
            clock.recv_timeout(Duration::from_millis(10)),
            Err(TransportError::Timeout(Duration::from_millis(10)))
        );
    }

    #[test]
    fn test_memory_transport_replays_and_records() {
        let mut transport =
            MemoryTransport::with_events([Advance::<IntegerType>::new(1, 0), Advance::finish(2)]);
        assert_eq!(transport.recv().unwrap().timestep, 1);
        assert!(transport.recv().unwrap().finished);
        assert_eq!(transport.recv(), Err(TransportError::Closed));

        transport
            .send(Notification::TimestepComplete { timestep: 1 })
            .unwrap();
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.drain_sent().len(), 1);
        assert!(transport.sent().is_empty());
    }
}
