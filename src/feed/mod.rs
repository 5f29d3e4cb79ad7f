//! Live price feed
//!
//! Polls a [`PriceSource`] for one symbol at a time: once immediately, then a
//! fixed interval after each fetch completes, with no backoff on failure.
//! The running poll is an owned [`PollHandle`]; restarting or stopping the
//! feed aborts it before anything new is spawned, so at most one poll task
//! exists per feed.

pub mod remote;

pub use remote::GatewayClient;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::common::errors::Result;
use crate::common::traits::PriceSource;
use crate::common::types::PriceQuote;
use crate::view::FeedCommand;

/// Default delay between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Buffer size of the feed event channel
const EVENT_CHANNEL_SIZE: usize = 16;

/// Outcome of one poll, tagged with the generation that issued it
#[derive(Debug)]
pub struct FeedEvent {
    pub generation: u64,
    pub symbol: String,
    pub outcome: Result<PriceQuote>,
}

/// Cancellable handle to a running poll task; aborts the task on drop
#[derive(Debug)]
pub struct PollHandle {
    symbol: String,
    generation: u64,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Drives polling for a calculator view
pub struct LivePriceFeed<S: PriceSource + 'static> {
    source: Arc<S>,
    interval: Duration,
    events: mpsc::Sender<FeedEvent>,
    current: Option<PollHandle>,
}

impl<S: PriceSource + 'static> LivePriceFeed<S> {
    /// Create a feed and the receiver its events arrive on
    pub fn new(source: Arc<S>, interval: Duration) -> (Self, mpsc::Receiver<FeedEvent>) {
        let (events, receiver) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let feed = Self {
            source,
            interval,
            events,
            current: None,
        };
        (feed, receiver)
    }

    /// Carry out a command from the view
    pub fn apply(&mut self, command: FeedCommand) {
        match command {
            FeedCommand::Restart { symbol, generation } => {
                self.stop();
                info!("Polling {} every {:?}", symbol, self.interval);
                self.current = Some(self.spawn(symbol, generation));
            }
            FeedCommand::Stop => self.stop(),
        }
    }

    /// Cancel the running poll, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.current.take() {
            debug!(
                "Cancelling poll for {} (generation {})",
                handle.symbol(),
                handle.generation()
            );
            handle.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Symbol of the running poll
    pub fn watching(&self) -> Option<&str> {
        self.current.as_ref().map(|h| h.symbol())
    }

    fn spawn(&self, symbol: String, generation: u64) -> PollHandle {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let interval = self.interval;
        let task_symbol = symbol.clone();

        let task = tokio::spawn(async move {
            loop {
                let outcome = source.fetch_price(&task_symbol).await;
                if let Err(e) = &outcome {
                    warn!("Price poll for {} failed: {}", task_symbol, e);
                }

                let event = FeedEvent {
                    generation,
                    symbol: task_symbol.clone(),
                    outcome,
                };
                if events.send(event).await.is_err() {
                    debug!("Feed receiver dropped, stopping poll");
                    break;
                }

                tokio::time::sleep(interval).await;
            }
        });

        PollHandle {
            symbol,
            generation,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::GatewayError;
    use crate::common::types::ProviderKind;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingSource {
        calls: Mutex<HashMap<String, usize>>,
    }

    impl CountingSource {
        fn calls(&self, symbol: &str) -> usize {
            self.calls.lock().unwrap().get(symbol).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl PriceSource for CountingSource {
        async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
            *self.calls.lock().unwrap().entry(symbol.to_string()).or_default() += 1;
            match symbol {
                "BTCUSDT" => Ok(PriceQuote::new(symbol, dec!(67000), ProviderKind::Binance)),
                "ETHUSDT" => Ok(PriceQuote::new(symbol, dec!(3400), ProviderKind::Binance)),
                other => Err(GatewayError::UnsupportedSymbol(other.to_string())),
            }
        }
    }

    fn restart(symbol: &str, generation: u64) -> FeedCommand {
        FeedCommand::Restart {
            symbol: symbol.to_string(),
            generation,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_fetch_then_fixed_interval() {
        let source = Arc::new(CountingSource::default());
        let (mut feed, mut rx) = LivePriceFeed::new(source.clone(), DEFAULT_POLL_INTERVAL);

        feed.apply(restart("BTCUSDT", 1));
        let first = rx.recv().await.unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(first.outcome.unwrap().price, dec!(67000));

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(source.calls("BTCUSDT"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_keep_polling() {
        let source = Arc::new(CountingSource::default());
        let (mut feed, mut rx) = LivePriceFeed::new(source.clone(), DEFAULT_POLL_INTERVAL);

        feed.apply(restart("DOGEUSDT", 1));
        assert!(rx.recv().await.unwrap().outcome.is_err());
        assert!(rx.recv().await.unwrap().outcome.is_err());
        assert_eq!(source.calls("DOGEUSDT"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_scheduled_fetches() {
        let source = Arc::new(CountingSource::default());
        let (mut feed, mut rx) = LivePriceFeed::new(source.clone(), DEFAULT_POLL_INTERVAL);

        feed.apply(restart("BTCUSDT", 1));
        rx.recv().await.unwrap();
        feed.apply(FeedCommand::Stop);
        assert!(!feed.is_running());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls("BTCUSDT"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_symbol_switch_replaces_poll() {
        let source = Arc::new(CountingSource::default());
        let (mut feed, mut rx) = LivePriceFeed::new(source.clone(), DEFAULT_POLL_INTERVAL);

        feed.apply(restart("BTCUSDT", 1));
        rx.recv().await.unwrap();
        feed.apply(restart("ETHUSDT", 2));
        assert_eq!(feed.watching(), Some("ETHUSDT"));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls("BTCUSDT"), 1);

        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.symbol, "ETHUSDT");
            assert_eq!(event.generation, 2);
        }
    }
}
