use tokio::sync::watch;

/// Observable state cell. Exactly one writer publishes at a time; any number of
/// readers can take the current value or subscribe for changes.
pub struct StateHolder<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn current(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Stores the value even when nobody is subscribed.
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_observe_published_values() {
        let holder = StateHolder::new(0u32);
        let mut rx = holder.subscribe();

        holder.publish(7);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 7);
        assert_eq!(holder.current(), 7);
    }

    #[test]
    fn publish_without_subscribers_still_updates_current() {
        let holder = StateHolder::new("loading");
        holder.publish("loaded");
        assert_eq!(holder.current(), "loaded");
    }
}
