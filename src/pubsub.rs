use bytes::Bytes;
use glob_match::glob_match;
use std::collections::HashMap;
use std::str;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;

use crate::frame::Frame;

type Subscribers = HashMap<u64, UnboundedSender<Frame>>;

/// Channel and pattern subscriptions, keyed by session id. Published messages are pushed into
/// each subscriber's out-of-band channel, so a slow subscriber never stalls the publisher.
#[derive(Default)]
pub struct Broker {
    channels: Mutex<HashMap<Bytes, Subscribers>>,
    patterns: Mutex<HashMap<Bytes, Subscribers>>,
}

impl Broker {
    pub fn new() -> Broker {
        Broker::default()
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<Bytes, Subscribers>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn patterns(&self) -> MutexGuard<'_, HashMap<Bytes, Subscribers>> {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Idempotent: subscribing twice keeps a single registration.
    pub fn subscribe(&self, channel: Bytes, session: u64, sender: UnboundedSender<Frame>) {
        self.channels()
            .entry(channel)
            .or_default()
            .insert(session, sender);
    }

    pub fn unsubscribe(&self, channel: &Bytes, session: u64) {
        remove(&mut self.channels(), channel, session);
    }

    pub fn psubscribe(&self, pattern: Bytes, session: u64, sender: UnboundedSender<Frame>) {
        self.patterns()
            .entry(pattern)
            .or_default()
            .insert(session, sender);
    }

    pub fn punsubscribe(&self, pattern: &Bytes, session: u64) {
        remove(&mut self.patterns(), pattern, session);
    }

    /// Delivers `payload` to every subscriber of `channel` and of every matching pattern.
    /// Returns the number of deliveries.
    pub fn publish(&self, channel: &Bytes, payload: &Bytes) -> usize {
        let mut delivered = 0;

        if let Some(subscribers) = self.channels().get(channel) {
            let message = Frame::Array(vec![
                Frame::bulk("message"),
                Frame::Bulk(channel.clone()),
                Frame::Bulk(payload.clone()),
            ]);
            delivered += deliver(subscribers, &message);
        }

        let Ok(name) = str::from_utf8(channel) else {
            return delivered;
        };

        for (pattern, subscribers) in self.patterns().iter() {
            let matches = str::from_utf8(pattern).is_ok_and(|pattern| glob_match(pattern, name));
            if !matches {
                continue;
            }

            let message = Frame::Array(vec![
                Frame::bulk("pmessage"),
                Frame::Bulk(pattern.clone()),
                Frame::Bulk(channel.clone()),
                Frame::Bulk(payload.clone()),
            ]);
            delivered += deliver(subscribers, &message);
        }

        delivered
    }

    /// Drops every subscription a session holds. Runs when its connection goes away.
    pub fn unsubscribe_all<'a>(
        &self,
        session: u64,
        channels: impl IntoIterator<Item = &'a Bytes>,
        patterns: impl IntoIterator<Item = &'a Bytes>,
    ) {
        {
            let mut map = self.channels();
            for channel in channels {
                remove(&mut map, channel, session);
            }
        }

        let mut map = self.patterns();
        for pattern in patterns {
            remove(&mut map, pattern, session);
        }
    }

    /// Channels with at least one subscriber, optionally filtered by a glob pattern.
    pub fn channel_names(&self, pattern: Option<&str>) -> Vec<Bytes> {
        self.channels()
            .keys()
            .filter(|channel| match pattern {
                Some(pattern) => {
                    str::from_utf8(channel).is_ok_and(|name| glob_match(pattern, name))
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn numsub(&self, channel: &Bytes) -> usize {
        self.channels().get(channel).map_or(0, HashMap::len)
    }

    /// Number of distinct patterns subscribed to.
    pub fn numpat(&self) -> usize {
        self.patterns().len()
    }
}

fn deliver(subscribers: &Subscribers, message: &Frame) -> usize {
    subscribers
        .values()
        .filter(|sender| sender.send(message.clone()).is_ok())
        .count()
}

fn remove(map: &mut HashMap<Bytes, Subscribers>, key: &Bytes, session: u64) {
    if let Some(subscribers) = map.get_mut(key) {
        subscribers.remove(&session);
        if subscribers.is_empty() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn publish_reaches_channel_and_pattern_subscribers() {
        let broker = Broker::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        broker.subscribe(Bytes::from("news"), 1, tx1.clone());
        broker.subscribe(Bytes::from("news"), 1, tx1);
        broker.psubscribe(Bytes::from("n*"), 2, tx2);

        let delivered = broker.publish(&Bytes::from("news"), &Bytes::from("hi"));

        assert_eq!(delivered, 2);
        assert_eq!(
            rx1.try_recv().unwrap(),
            Frame::Array(vec![
                Frame::bulk("message"),
                Frame::bulk("news"),
                Frame::bulk("hi"),
            ])
        );
        assert!(rx1.try_recv().is_err());
        assert_eq!(
            rx2.try_recv().unwrap(),
            Frame::Array(vec![
                Frame::bulk("pmessage"),
                Frame::bulk("n*"),
                Frame::bulk("news"),
                Frame::bulk("hi"),
            ])
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let broker = Broker::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        broker.subscribe(Bytes::from("a"), 1, tx.clone());
        broker.psubscribe(Bytes::from("*"), 1, tx);
        broker.unsubscribe_all(1, [&Bytes::from("a")], [&Bytes::from("*")]);

        assert_eq!(broker.publish(&Bytes::from("a"), &Bytes::from("x")), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(broker.numpat(), 0);
        assert!(broker.channel_names(None).is_empty());
    }

    #[test]
    fn dropped_receivers_are_not_counted() {
        let broker = Broker::new();
        let (tx, rx) = mpsc::unbounded_channel();
        broker.subscribe(Bytes::from("a"), 1, tx);
        drop(rx);

        assert_eq!(broker.publish(&Bytes::from("a"), &Bytes::from("x")), 0);
        assert_eq!(broker.numsub(&Bytes::from("a")), 1);
    }
}
