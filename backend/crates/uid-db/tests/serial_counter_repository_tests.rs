mod common;

use common::create_test_store;

use uid_core::{CoreError, RecordStore};
use uid_db::{DbError, SerialCounterRepository};

use googletest::prelude::*;

#[tokio::test]
async fn given_new_prefix_when_reserving_then_block_starts_after_floor() {
    // Given
    let store = create_test_store().await;

    // When
    let first = store.reserve_serials("cl", 4, 3).await.unwrap();

    // Then: Serials 5, 6 and 7 are reserved
    assert_that!(first, eq(5));
    let counters = store.serial_counters().await.unwrap();
    assert_eq!(counters, vec![("cl".to_string(), 7)]);
}

#[tokio::test]
async fn given_existing_counter_when_reserving_then_blocks_never_overlap() {
    // Given
    let store = create_test_store().await;
    store.reserve_serials("cl", 0, 2).await.unwrap();

    // When: A lower floor does not rewind the counter
    let second = store.reserve_serials("cl", 0, 1).await.unwrap();
    let third = store.reserve_serials("cl", 1, 1).await.unwrap();

    // Then
    assert_that!(second, eq(3));
    assert_that!(third, eq(4));
}

#[tokio::test]
async fn given_floor_above_counter_when_reserving_then_counter_jumps_to_floor() {
    // Given: Data written outside the counter already uses serial 10
    let store = create_test_store().await;
    store.reserve_serials("ad", 0, 1).await.unwrap();

    // When
    let first = store.reserve_serials("ad", 10, 1).await.unwrap();

    // Then
    assert_that!(first, eq(11));
}

#[tokio::test]
async fn given_counters_for_several_prefixes_when_listed_then_each_is_independent() {
    // Given
    let store = create_test_store().await;
    store.reserve_serials("pm", 0, 2).await.unwrap();
    store.reserve_serials("ad", 0, 1).await.unwrap();

    // When
    let counters = store.serial_counters().await.unwrap();

    // Then
    assert_eq!(
        counters,
        vec![("ad".to_string(), 1), ("pm".to_string(), 2)]
    );
}

#[tokio::test]
async fn given_floor_beyond_column_range_when_reserving_then_serials_are_exhausted() {
    // Given
    let store = create_test_store().await;

    // When
    let result = SerialCounterRepository::reserve(store.pool(), "cl", u64::MAX, 1).await;

    // Then
    assert!(matches!(result, Err(DbError::SerialExhausted { ref prefix, .. }) if prefix == "cl"));
}

#[tokio::test]
async fn given_counter_at_column_limit_when_reserving_then_row_is_left_untouched() {
    // Given
    let store = create_test_store().await;
    let top = i64::MAX as u64;
    store.reserve_serials("cl", top - 1, 1).await.unwrap();

    // When
    let result = store.reserve_serials("cl", 0, 1).await;

    // Then
    assert!(matches!(result, Err(CoreError::SerialExhausted { .. })));
    let counters = store.serial_counters().await.unwrap();
    assert_eq!(counters, vec![("cl".to_string(), top)]);
}
