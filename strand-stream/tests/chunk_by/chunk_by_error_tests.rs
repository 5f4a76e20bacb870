// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use strand_core::{StrandError, StreamItem};
use strand_stream::{ChunkByExt, NaturalOrder};
use strand_test_utils::{
    assert_stream_ended, test_channel, test_channel_with_errors, unwrap_stream, unwrap_value,
};

#[tokio::test]
async fn test_source_error_reaches_every_group_and_downstream() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<i32>();
    let mut groups = stream.chunk_runs();

    tx.send(StreamItem::Value(1))?;
    let first = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    tx.send(StreamItem::Value(2))?;
    let second = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));

    let mut first_values = first.subscribe()?;
    let mut second_values = second.subscribe()?;

    // Act
    tx.send(StreamItem::Error(StrandError::stream_error("source failed")))?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut first_values, 500).await)), 1);
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut second_values, 500).await)), 2);

    for item in [
        unwrap_stream(&mut first_values, 500).await,
        unwrap_stream(&mut second_values, 500).await,
        unwrap_stream(&mut groups, 500).await.map(|g| *g.key()),
    ] {
        assert!(matches!(
            item,
            StreamItem::Error(StrandError::StreamProcessingError { ref context })
                if context == "source failed"
        ));
    }

    assert_stream_ended(&mut first_values, 500).await;
    assert_stream_ended(&mut second_values, 500).await;
    assert_stream_ended(&mut groups, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_nothing_is_delivered_after_an_error() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<i32>();
    let mut groups = stream.chunk_runs();

    tx.send(StreamItem::Value(1))?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    let mut values = group.subscribe()?;

    // Act
    tx.send(StreamItem::Error(StrandError::stream_error("first")))?;
    let _ = tx.send(StreamItem::Value(1));
    let _ = tx.send(StreamItem::Value(5));

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), 1);
    assert!(unwrap_stream(&mut values, 500).await.is_error());
    assert_stream_ended(&mut values, 500).await;

    assert!(unwrap_stream(&mut groups, 500).await.is_error());
    assert_stream_ended(&mut groups, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_key_selector_failure_is_tagged() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let mut groups = stream.try_chunk_by(
        |v: &i32| {
            if *v < 0 {
                Err(StrandError::stream_error("negative key"))
            } else {
                Ok(*v)
            }
        },
        |v: i32| Ok(v),
        NaturalOrder,
    );

    tx.send(3)?;
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    let mut values = group.subscribe()?;

    // Act
    tx.send(-1)?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut values, 500).await)), 3);

    let group_error = unwrap_stream(&mut values, 500).await;
    let downstream_error = unwrap_stream(&mut groups, 500).await;
    for item in [group_error, downstream_error.map(|g| *g.key())] {
        match item {
            StreamItem::Error(StrandError::SelectorError { selector, context }) => {
                assert_eq!(selector, "key");
                assert!(context.contains("negative key"));
            }
            other => panic!("expected a key selector error, got {other:?}"),
        }
    }

    assert_stream_ended(&mut values, 500).await;
    assert_stream_ended(&mut groups, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_element_selector_failure_after_group_opened() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let mut groups = stream.try_chunk_by(
        |v: &i32| Ok(v % 2),
        |v: i32| {
            if v == 0 {
                Err(StrandError::stream_error("zero"))
            } else {
                Ok(100 / v)
            }
        },
        NaturalOrder,
    );

    // Act - the handle for key 0 is emitted before its element fails to project
    tx.send(0)?;

    // Assert
    let group = unwrap_value(Some(unwrap_stream(&mut groups, 500).await));
    assert_eq!(*group.key(), 0);

    let mut values = group.subscribe()?;
    match unwrap_stream(&mut values, 500).await {
        StreamItem::Error(error) => {
            assert!(error.is_selector_error());
            assert_eq!(error.to_string(), "element selector failed: Stream processing error: zero");
        }
        StreamItem::Value(v) => panic!("expected an error, got {v}"),
    }
    assert!(unwrap_stream(&mut groups, 500).await.is_error());

    Ok(())
}

#[tokio::test]
async fn test_selector_errors_are_not_wrapped_twice() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel::<i32>();
    let mut groups = stream.try_chunk_by(
        |_: &i32| Err::<i32, _>(StrandError::key_selector_error("already tagged")),
        |v: i32| Ok(v),
        NaturalOrder,
    );

    // Act
    tx.send(1)?;

    // Assert
    match unwrap_stream(&mut groups, 500).await {
        StreamItem::Error(error) => {
            assert_eq!(error.to_string(), "key selector failed: already tagged");
        }
        StreamItem::Value(group) => panic!("unexpected group {:?}", group.key()),
    }

    Ok(())
}
