// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use std::time::Duration;
use strand_core::StreamItem;
use tokio::time::{sleep, timeout};

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Waits for the next item, panicking if the stream ends or nothing arrives in time.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected StreamItem but stream ended"),
        Err(_) => panic!("Timeout: No item received within {timeout_ms} ms"),
    }
}

pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(e)) => panic!("Expected Value but got Error: {e}"),
        None => panic!("Expected Value but stream ended"),
    }
}

pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected stream to end but it returned a value"),
        Err(_) => panic!("Timeout: Stream did not end within {timeout_ms} ms"),
    }
}

/// Drains a stream to its end, keeping the values and panicking on the first error.
pub async fn collect_values<S, T>(stream: S, timeout_ms: u64) -> Vec<T>
where
    S: Stream<Item = StreamItem<T>>,
{
    let collected = timeout(
        Duration::from_millis(timeout_ms),
        stream.collect::<Vec<_>>(),
    )
    .await
    .unwrap_or_else(|_| panic!("Timeout: Stream did not end within {timeout_ms} ms"));

    collected
        .into_iter()
        .map(|item| unwrap_value(Some(item)))
        .collect()
}
