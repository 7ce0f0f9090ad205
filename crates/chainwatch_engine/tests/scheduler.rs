use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chainwatch_engine::RefreshScheduler;
use tokio::time::sleep;

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

/// Lets the timer task run after the clock moved.
async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn stop_before_first_tick_never_fires() {
    chainwatch_logging::initialize_for_tests();
    let (count, on_tick) = counter();
    let mut scheduler = RefreshScheduler::new("refresh");

    scheduler.start(Duration::from_millis(5_000), on_tick);
    assert!(scheduler.next_fire_time().is_some());
    scheduler.stop();
    assert!(!scheduler.is_armed());
    assert_eq!(scheduler.time_until_next_tick(), None);
    assert_eq!(scheduler.next_fire_time(), None);

    sleep(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn fires_at_cadence_and_reports_time_to_next_tick() {
    chainwatch_logging::initialize_for_tests();
    let (count, on_tick) = counter();
    let mut scheduler = RefreshScheduler::new("refresh");

    scheduler.start(Duration::from_millis(1_000), on_tick);
    assert_eq!(
        scheduler.time_until_next_tick(),
        Some(Duration::from_millis(1_000))
    );

    sleep(Duration::from_millis(3_500)).await;
    settle().await;

    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert_eq!(
        scheduler.time_until_next_tick(),
        Some(Duration::from_millis(500))
    );
    assert_eq!(scheduler.interval(), Some(Duration::from_millis(1_000)));
}

#[tokio::test(start_paused = true)]
async fn rearming_drops_the_old_cadence() {
    chainwatch_logging::initialize_for_tests();
    let (count, on_tick) = counter();
    let on_tick = Arc::new(on_tick);
    let mut scheduler = RefreshScheduler::new("refresh");

    let tick = on_tick.clone();
    scheduler.start(Duration::from_millis(5_000), move || tick());
    sleep(Duration::from_millis(3_000)).await;

    let tick = on_tick.clone();
    scheduler.start(Duration::from_millis(1_000), move || tick());
    sleep(Duration::from_millis(1_000)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // 5s after the first arming the old timer would have fired; it must not.
    sleep(Duration::from_millis(1_500)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_stops_the_timer() {
    chainwatch_logging::initialize_for_tests();
    let (count, on_tick) = counter();
    {
        let mut scheduler = RefreshScheduler::new("refresh");
        scheduler.start(Duration::from_millis(100), on_tick);
    }

    sleep(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_not_armed() {
    chainwatch_logging::initialize_for_tests();
    let (count, on_tick) = counter();
    let mut scheduler = RefreshScheduler::new("refresh");

    scheduler.start(Duration::ZERO, on_tick);
    assert!(!scheduler.is_armed());

    sleep(Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
