// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strand_core::StreamItem;
use strand_stream::ChunkByExt;
use strand_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, unwrap_stream, unwrap_value,
};
use tokio::time::{sleep, timeout};

/// Counts how many times the wrapped source is dropped.
struct DropCounting<S> {
    inner: S,
    drops: Arc<AtomicUsize>,
}

impl<S: Stream + Unpin> Stream for DropCounting<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl<S> Drop for DropCounting<S> {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

async fn wait_until(condition: impl Fn() -> bool) -> anyhow::Result<()> {
    timeout(Duration::from_millis(500), async {
        while !condition() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_dropping_everything_cancels_source_once() -> anyhow::Result<()> {
    // Arrange
    let drops = Arc::new(AtomicUsize::new(0));
    let (tx, stream) = test_channel::<i32>();
    let source = DropCounting {
        inner: Box::pin(stream),
        drops: drops.clone(),
    };
    let mut groups = source.chunk_runs();

    tx.send(1)?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    let values = group.subscribe()?;

    // Act
    drop(groups);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(values);

    // Assert
    wait_until(|| tx.is_closed()).await?;
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    sleep(Duration::from_millis(50)).await;
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_dropping_downstream_without_subscriptions_cancels_source() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let groups = stream.chunk_runs();

    // Act
    drop(groups);

    // Assert
    wait_until(|| tx.is_closed()).await?;
    assert!(tx.send(1).is_err());

    Ok(())
}

#[tokio::test]
async fn test_group_subscription_keeps_source_alive() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<(char, i32)>();
    let mut groups = stream.chunk_by(|(key, _): &(char, i32)| *key);

    tx.send(('a', 1))?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    let mut values = group.subscribe()?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), ('a', 1));

    // Act
    drop(groups);
    tx.send(('a', 2))?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), ('a', 2));
    assert!(!tx.is_closed());

    Ok(())
}

#[tokio::test]
async fn test_new_keys_are_dropped_once_downstream_is_gone() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<(char, i32)>();
    let mut groups = stream.chunk_by(|(key, _): &(char, i32)| *key);

    tx.send(('a', 1))?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    let mut values = group.subscribe()?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), ('a', 1));

    // Act
    drop(groups);
    tx.send(('b', 2))?;
    tx.send(('a', 3))?;

    // Assert - ('b', 2) opened no group, so the run keyed 'a' is still open
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), ('a', 3));
    assert_no_element_emitted(&mut values, 100).await;

    Ok(())
}

#[tokio::test]
async fn test_group_ending_releases_its_interest() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let mut groups = stream.chunk_runs();

    tx.send(1)?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    let mut values = group.subscribe()?;

    // Act
    drop(tx);

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), 1);
    assert_stream_ended(&mut values, 500).await;
    assert_stream_ended(&mut groups, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_late_subscription_after_cancellation_sees_buffered_run() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let mut groups = stream.chunk_runs();

    tx.send(4)?;
    tx.send(4)?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));

    // Act - releasing the only interest cancels the source
    drop(groups);
    wait_until(|| tx.is_closed()).await?;
    let mut values = group.subscribe()?;

    // Assert
    assert!(matches!(unwrap_stream(&mut values, 500).await, StreamItem::Value(4)));
    assert!(matches!(unwrap_stream(&mut values, 500).await, StreamItem::Value(4)));
    assert_stream_ended(&mut values, 500).await;

    Ok(())
}
