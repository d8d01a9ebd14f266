//! Crash notification for the background accept task.

use tokio::sync::mpsc;

/// Sends on the owner's crash channel when dropped while armed.
///
/// The accept task holds one of these for its whole life. A requested
/// shutdown disarms it first, so only unexpected exits (bind failure,
/// panic, abort) reach the channel.
#[derive(Debug)]
pub struct CrashNotifier {
    tx: Option<mpsc::Sender<()>>,
}

impl CrashNotifier {
    pub fn new(tx: Option<mpsc::Sender<()>>) -> Self {
        Self { tx }
    }

    /// The exit that follows is expected; do not notify.
    pub fn disarm(&mut self) {
        self.tx = None;
    }
}

impl Drop for CrashNotifier {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            // Never block: a full or closed channel means the owner already
            // knows or no longer cares.
            if tx.try_send(()).is_err() {
                tracing::debug!("Crash signal not delivered");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armed_drop_notifies() {
        let (tx, mut rx) = mpsc::channel(1);
        let notifier = CrashNotifier::new(Some(tx));
        drop(notifier);
        assert_eq!(rx.try_recv(), Ok(()));
    }

    #[test]
    fn test_disarmed_drop_is_silent() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut notifier = CrashNotifier::new(Some(tx));
        notifier.disarm();
        drop(notifier);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_does_not_block() {
        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(()).unwrap();
        drop(CrashNotifier::new(Some(tx)));
        drop(CrashNotifier::new(None));
    }
}
