//! Labeled fan-out / join.
//!
//! Every call is registered with a label before anything is awaited. Settling
//! waits for all of them and hands each outcome back next to the label it was
//! issued under, so callers never correlate outcomes by completion order.

use futures::future::{join_all, BoxFuture};

/// A fixed set of labeled calls awaiting settlement
pub struct FanOut<L, T> {
    calls: Vec<(L, BoxFuture<'static, T>)>,
}

impl<L, T> FanOut<L, T> {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn push(&mut self, label: L, call: BoxFuture<'static, T>) {
        self.calls.push((label, call));
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drive every call concurrently until all have settled
    pub async fn settle(self) -> Vec<(L, T)> {
        join_all(
            self.calls
                .into_iter()
                .map(|(label, call)| async move { (label, call.await) }),
        )
        .await
    }
}

impl<L, T> Default for FanOut<L, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_outcomes_keep_their_labels() {
        let mut fanout = FanOut::new();
        fanout.push(
            "slow",
            async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                1
            }
            .boxed(),
        );
        fanout.push("fast", async { 2 }.boxed());
        assert_eq!(fanout.len(), 2);

        let settled = fanout.settle().await;
        assert_eq!(settled, vec![("slow", 1), ("fast", 2)]);
    }

    #[tokio::test]
    async fn test_failures_settle_independently() {
        let mut fanout: FanOut<&str, Result<u32, String>> = FanOut::new();
        fanout.push("ok", async { Ok(1) }.boxed());
        fanout.push("err", async { Err("boom".to_string()) }.boxed());

        let settled = fanout.settle().await;
        assert_eq!(settled[0], ("ok", Ok(1)));
        assert_eq!(settled[1], ("err", Err("boom".to_string())));
    }

    #[tokio::test]
    async fn test_empty_fanout() {
        let fanout: FanOut<String, ()> = FanOut::default();
        assert!(fanout.is_empty());
        assert!(fanout.settle().await.is_empty());
    }
}
