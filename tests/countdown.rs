use ngsc_terminal::countdown::{CountdownMirror, format_clock};

#[test]
fn seeded_mirror_counts_down_and_fires_exactly_once() {
    let mut mirror = CountdownMirror::new();
    mirror.seed(125);
    assert!(mirror.is_running());
    assert_eq!(mirror.display(), "02:05");

    let mut fired = 0;
    for _ in 0..124 {
        if mirror.tick() {
            fired += 1;
        }
    }
    assert_eq!(fired, 0);
    assert_eq!(mirror.remaining(), 1);

    assert!(mirror.tick(), "125th tick should fire the period end");
    assert_eq!(mirror.remaining(), 0);
    assert!(!mirror.is_running());

    // Stopped at zero: further ticks never fire again.
    for _ in 0..10 {
        assert!(!mirror.tick());
    }
    assert_eq!(mirror.remaining(), 0);
}

#[test]
fn seed_after_stop_restarts_the_mirror() {
    let mut mirror = CountdownMirror::new();
    mirror.seed(30);
    mirror.stop();
    assert!(!mirror.is_running());
    assert!(!mirror.tick());
    assert_eq!(mirror.remaining(), 30);

    mirror.seed(5);
    assert!(mirror.is_running());
    assert_eq!(mirror.remaining(), 5);
    assert!(!mirror.tick());
    assert_eq!(mirror.remaining(), 4);
}

#[test]
fn reseed_overwrites_whatever_was_left() {
    let mut mirror = CountdownMirror::new();
    mirror.seed(10);
    mirror.tick();
    mirror.tick();
    assert_eq!(mirror.remaining(), 8);

    // Authoritative server value wins, up or down.
    mirror.seed(90);
    assert_eq!(mirror.remaining(), 90);
    mirror.seed(2);
    assert_eq!(mirror.remaining(), 2);
}

#[test]
fn zero_seed_does_not_run_or_fire() {
    let mut mirror = CountdownMirror::new();
    mirror.seed(0);
    assert!(!mirror.is_running());
    assert!(!mirror.tick());
}

#[test]
fn clock_formatting_is_minutes_and_seconds() {
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(9), "00:09");
    assert_eq!(format_clock(70), "01:10");
    assert_eq!(format_clock(600), "10:00");
}
