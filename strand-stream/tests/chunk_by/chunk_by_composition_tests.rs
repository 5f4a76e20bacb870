// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{future, stream, StreamExt};
use strand_core::StreamItem;
use strand_stream::ChunkByExt;
use strand_test_utils::test_data::{
    case_insensitive_less, expected_reference_groups, reference_source, trim_key,
};
use strand_test_utils::{collect_values, test_channel};

#[tokio::test]
async fn test_flattened_groups_with_header_and_footer() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<String>();
    let lines = source
        .chunk_by_ordered(
            |v: &String| trim_key(v),
            |v: String| v,
            |a: &String, b: &String| case_insensitive_less(a, b),
        )
        .flat_map(|item| match item {
            StreamItem::Value(group) => {
                let header = StreamItem::Value(format!("group: {}", group.key()));
                let footer = StreamItem::Value("----".to_string());
                let body = match group.subscribe() {
                    Ok(subscription) => subscription.boxed(),
                    Err(e) => stream::once(future::ready(StreamItem::Error(e.into()))).boxed(),
                };
                stream::once(future::ready(header))
                    .chain(body)
                    .chain(stream::once(future::ready(footer)))
                    .boxed()
            }
            StreamItem::Error(e) => stream::once(future::ready(StreamItem::Error(e))).boxed(),
        });

    // Act
    for marble in reference_source() {
        tx.send(marble)?;
    }
    drop(tx);
    let actual = collect_values(lines, 1000).await;

    // Assert
    let expected: Vec<String> = expected_reference_groups()
        .into_iter()
        .flat_map(|(key, values)| {
            std::iter::once(format!("group: {key}"))
                .chain(values.into_iter().map(str::to_string))
                .chain(std::iter::once("----".to_string()))
        })
        .collect();
    assert_eq!(actual, expected);

    Ok(())
}

#[tokio::test]
async fn test_group_keys_only() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<i32>();
    let keys = source
        .chunk_by(|v: &i32| v.signum())
        .map(|item| item.map(|group| group.into_key()));

    // Act
    for value in [-3, -1, 0, 4, 9, -2] {
        tx.send(value)?;
    }
    drop(tx);

    // Assert
    assert_eq!(collect_values(keys, 500).await, vec![-1, 0, 1, -1]);

    Ok(())
}

#[tokio::test]
async fn test_group_sizes_consumed_in_order() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<u8>();
    let sizes = source
        .chunk_runs()
        .filter_map(|item| future::ready(item.ok()))
        .then(|group| async move {
            let values = collect_values(group.subscribe().ok()?, 500).await;
            Some((*group.key(), values.len()))
        });

    // Act
    for byte in b"aaabccdd" {
        tx.send(*byte)?;
    }
    drop(tx);
    let sizes: Vec<_> = sizes.collect().await;

    // Assert
    assert_eq!(
        sizes,
        vec![
            Some((b'a', 3)),
            Some((b'b', 1)),
            Some((b'c', 2)),
            Some((b'd', 2)),
        ]
    );

    Ok(())
}
