use super::*;

#[test]
fn defaults_match_documented_constants() {
    let swipe = SwipeConfig::default();
    assert_eq!(swipe.threshold, 50.0);
    assert_eq!(swipe.velocity_threshold, 0.3);
    assert_eq!(swipe.time_threshold_ms, 300);
    assert_eq!(swipe.directional_threshold, 2.0);

    let long_press = LongPressConfig::default();
    assert_eq!(long_press.delay_ms, 500);
    assert_eq!(long_press.move_threshold, 10.0);
    assert_eq!(long_press.progress_interval_ms, 16);

    let pull = PullToRefreshConfig::default();
    assert_eq!(pull.pull_threshold, 80.0);
    assert_eq!(pull.max_pull, 120.0);
}

#[test]
fn defaults_validate() {
    assert!(SwipeConfig::default().validate().is_ok());
    assert!(LongPressConfig::default().validate().is_ok());
    assert!(PullToRefreshConfig::default().validate().is_ok());
    assert!(SwipeToDismissConfig::default().validate().is_ok());
}

#[test]
fn negative_swipe_threshold_is_rejected() {
    let err = SwipeConfig::default()
        .with_threshold(-1.0)
        .validate()
        .unwrap_err();
    assert_eq!(
        err,
        GestureError::InvalidConfig {
            field: "threshold",
            reason: "must be finite and non-negative",
        }
    );
}

#[test]
fn directional_ratio_below_one_is_rejected() {
    let result = SwipeConfig::default()
        .with_directional_threshold(0.5)
        .validate();
    assert!(matches!(
        result,
        Err(GestureError::InvalidConfig {
            field: "directional_threshold",
            ..
        })
    ));
}

#[test]
fn zero_long_press_delay_is_rejected() {
    assert!(LongPressConfig::default().with_delay_ms(0).validate().is_err());
    assert!(LongPressConfig::default()
        .with_progress_interval_ms(0)
        .validate()
        .is_err());
    assert!(LongPressConfig::default()
        .with_move_threshold(f32::NAN)
        .validate()
        .is_err());
}

#[test]
fn max_pull_below_threshold_is_rejected() {
    let result = PullToRefreshConfig::default()
        .with_pull_threshold(100.0)
        .with_max_pull(60.0)
        .validate();
    assert!(matches!(
        result,
        Err(GestureError::InvalidConfig {
            field: "max_pull",
            ..
        })
    ));
}

#[test]
fn dismiss_config_validates_inner_swipe() {
    let config = SwipeToDismissConfig::default()
        .with_swipe(SwipeConfig::default().with_time_threshold_ms(0));
    assert!(config.validate().is_err());
}
