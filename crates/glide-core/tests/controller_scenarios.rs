// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Gesture and momentum scenarios driven through the public controller API.

use approx::assert_abs_diff_eq;
use glide_core::{
    ChangeCause, DVec2, HostSpace, Transform2D, ViewportController, ViewportEvent,
};
use glide_dry_tests::{ControllerBuilder, GestureDriver, RecordingObserver, FRAME_DT};

fn tilted() -> ViewportController {
    ControllerBuilder::new()
        .anchor(DVec2::new(400.0, 300.0))
        .transform(Transform2D::new(DVec2::new(5.0, -3.0), 2.0, 0.4))
        .build()
        .expect("valid config")
}

#[test]
fn pinch_release_decays_scale_velocity() {
    let mut c = ControllerBuilder::new()
        .scale_friction(0.75)
        .build()
        .expect("valid config");

    c.begin_pinch(DVec2::ZERO);
    c.update_pinch(2.0);
    assert_abs_diff_eq!(c.transform().scale, 0.5, epsilon = 1e-12);
    assert_eq!(c.transform().translation, DVec2::ZERO);

    c.end_pinch(50.0);
    assert_abs_diff_eq!(c.velocity().scale, 0.25, epsilon = 1e-12);

    c.advance(FRAME_DT);
    assert_abs_diff_eq!(c.velocity().scale, 0.1875, epsilon = 1e-9);
    assert_abs_diff_eq!(c.transform().scale, 0.3125, epsilon = 1e-9);

    c.advance(FRAME_DT);
    assert_abs_diff_eq!(c.velocity().scale, 0.140_625, epsilon = 1e-9);
    assert_abs_diff_eq!(c.transform().scale, 0.171_875, epsilon = 1e-9);

    let frames = GestureDriver::new(&mut c).settle(200);
    assert!(frames.is_some());
    assert_eq!(c.velocity().scale, 0.0);
    assert_eq!(c.transform().scale, c.config().min_scale);
}

#[test]
fn pinch_keeps_focal_point_under_the_fingers() {
    let mut c = tilted();
    let focal = DVec2::new(120.0, 80.0);
    let start = c.transform();
    let focal_scene = c.host_space().host_to_scene(&start, focal);

    c.begin_pinch(focal);
    for factor in [1.2, 1.7, 0.6] {
        c.update_pinch(factor);
        let back = c.host_space().scene_to_host(&c.transform(), focal_scene);
        assert_abs_diff_eq!(back.x, focal.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, focal.y, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(c.transform().scale, 2.0 / 0.6, epsilon = 1e-12);
}

#[test]
fn rotate_keeps_pivot_under_the_fingers() {
    let mut c = tilted();
    let focal = DVec2::new(610.0, 95.0);
    let pivot = c.host_space().host_to_scene(&c.transform(), focal);

    c.begin_rotate(focal);
    for angle in [0.1, 0.35, -0.2, 1.0] {
        c.update_rotate(angle);
        let back = c.host_space().scene_to_host(&c.transform(), pivot);
        assert_abs_diff_eq!(back.x, focal.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, focal.y, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(c.transform().rotation, 1.4, epsilon = 1e-12);
}

#[test]
fn pan_moves_content_with_the_finger() {
    let mut c = tilted();
    let from = DVec2::new(300.0, 200.0);
    let to = DVec2::new(340.0, 170.0);
    let grabbed = c.host_space().host_to_scene(&c.transform(), from);

    GestureDriver::new(&mut c).drag(from, to, 4);
    let now_under_finger = c.host_space().host_to_scene(&c.transform(), to);
    assert_abs_diff_eq!(now_under_finger.x, grabbed.x, epsilon = 1e-9);
    assert_abs_diff_eq!(now_under_finger.y, grabbed.y, epsilon = 1e-9);
}

#[test]
fn pan_momentum_continues_the_drag() {
    let mut c = tilted();
    let before = c.transform().translation;
    GestureDriver::new(&mut c).drag(DVec2::new(100.0, 100.0), DVec2::new(160.0, 100.0), 3);
    let dragged = c.transform().translation - before;

    c.end_pan(DVec2::new(600.0, 0.0));
    let released = c.transform().translation;
    c.advance(FRAME_DT);
    let coasted = c.transform().translation - released;

    assert!(coasted.length() > 0.0);
    assert!(dragged.dot(coasted) > 0.0, "{dragged:?} vs {coasted:?}");
}

#[test]
fn locked_pan_never_moves_and_leaves_no_momentum() {
    let mut c = ControllerBuilder::new().lock_pan().build().expect("valid");
    GestureDriver::new(&mut c).drag(DVec2::ZERO, DVec2::new(-250.0, 90.0), 10);
    assert_eq!(c.transform().translation, DVec2::ZERO);
    c.end_pan(DVec2::new(900.0, -400.0));
    assert!(c.velocity().is_zero());
}

#[test]
fn locked_zoom_and_rotation_ignore_updates() {
    let mut c = ControllerBuilder::new()
        .lock_zoom()
        .lock_rotation()
        .build()
        .expect("valid");
    GestureDriver::new(&mut c)
        .pinch(DVec2::new(10.0, 10.0), 3.0, 5)
        .twist(DVec2::new(10.0, 10.0), 1.2, 5);
    c.end_pinch(40.0);
    c.end_rotate(40.0);
    assert_eq!(c.transform(), Transform2D::IDENTITY);
    assert!(c.velocity().is_zero());
}

#[test]
fn cancel_restores_gesture_start() {
    let mut c = tilted();
    let start = c.transform();

    c.begin_pan(DVec2::new(10.0, 10.0));
    c.update_pan(DVec2::new(60.0, -20.0));
    assert_ne!(c.transform(), start);
    c.cancel_pan();
    assert_eq!(c.transform(), start);

    c.begin_pinch(DVec2::new(10.0, 10.0));
    c.update_pinch(0.5);
    c.cancel_pinch();
    assert_eq!(c.transform(), start);

    c.begin_rotate(DVec2::new(10.0, 10.0));
    c.update_rotate(0.9);
    c.cancel_rotate();
    assert_eq!(c.transform(), start);
    assert!(c.active_gestures().is_idle());
    assert!(c.velocity().is_zero());
}

#[test]
fn stop_inertia_is_idempotent() {
    let mut c = ControllerBuilder::new().build().expect("valid");
    c.begin_rotate(DVec2::ZERO);
    c.end_rotate(30.0);
    c.begin_pan(DVec2::ZERO);
    c.end_pan(DVec2::new(300.0, 10.0));
    assert!(c.is_moving());

    c.stop_inertia();
    let first = (c.transform(), c.velocity());
    c.stop_inertia();
    assert_eq!((c.transform(), c.velocity()), first);
    assert!(c.velocity().is_zero());
    assert!(!c.is_moving());
}

#[test]
fn beginning_one_gesture_keeps_other_axes_coasting() {
    let mut c = ControllerBuilder::new().build().expect("valid");
    c.begin_pinch(DVec2::ZERO);
    c.update_pinch(1.5);
    c.end_pinch(20.0);
    c.begin_rotate(DVec2::ZERO);
    c.end_rotate(20.0);
    let scale_velocity = c.velocity().scale;
    assert!(scale_velocity != 0.0);

    c.begin_pan(DVec2::ZERO);
    assert_eq!(c.velocity().scale, scale_velocity);
    assert!(c.velocity().rotation != 0.0);

    c.begin_rotate(DVec2::ZERO);
    assert_eq!(c.velocity().rotation, 0.0);
    assert_eq!(c.velocity().scale, scale_velocity);
}

#[test]
fn decay_does_not_depend_on_frame_rate() {
    let fling = |c: &mut ViewportController| {
        c.begin_pan(DVec2::ZERO);
        c.end_pan(DVec2::new(600.0, 0.0));
    };
    let mut slow = ControllerBuilder::new().build().expect("valid");
    let mut fast = ControllerBuilder::new().build().expect("valid");
    fling(&mut slow);
    fling(&mut fast);

    for _ in 0..15 {
        slow.advance(1.0 / 30.0);
    }
    for _ in 0..60 {
        fast.advance(1.0 / 120.0);
    }
    assert!(slow.velocity().translation.x > 0.0);
    assert_abs_diff_eq!(
        slow.velocity().translation.x,
        fast.velocity().translation.x,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        slow.transform().translation.x,
        fast.transform().translation.x,
        epsilon = 1e-9
    );

    // Coasting to rest covers the same distance at any frame rate: 6 pt per
    // reference frame with friction 0.9 sums to 54, less the snapped tail.
    let mut rest = Vec::new();
    for hz in [30.0, 60.0, 120.0] {
        let mut c = ControllerBuilder::new().build().expect("valid");
        fling(&mut c);
        let mut frames = 0;
        while c.is_moving() {
            c.advance(1.0 / hz);
            frames += 1;
            assert!(frames < 10_000, "still coasting at {hz} Hz");
        }
        let x = c.transform().translation.x;
        assert_abs_diff_eq!(x, -54.0, epsilon = 0.1);
        rest.push(x);
    }
    assert_abs_diff_eq!(rest[0], rest[1], epsilon = 0.02);
    assert_abs_diff_eq!(rest[1], rest[2], epsilon = 0.02);
}

#[test]
fn pinch_and_twist_share_a_focal_point() {
    let mut c = ControllerBuilder::new()
        .anchor(DVec2::new(400.0, 300.0))
        .build()
        .expect("valid");
    let focal = DVec2::new(100.0, 100.0);
    let p = c.host_space().host_to_scene(&c.transform(), focal);

    c.begin_pinch(focal);
    c.begin_rotate(focal);
    for (angle, factor) in [(0.5, 1.5), (0.8, 1.2), (-0.3, 0.7)] {
        c.update_rotate(angle);
        let back = c.host_space().scene_to_host(&c.transform(), p);
        assert_abs_diff_eq!(back.x, focal.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, focal.y, epsilon = 1e-9);

        c.update_pinch(factor);
        let back = c.host_space().scene_to_host(&c.transform(), p);
        assert_abs_diff_eq!(back.x, focal.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, focal.y, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(c.transform().scale, 1.0 / 0.7, epsilon = 1e-12);
    assert_abs_diff_eq!(c.transform().rotation, -0.3, epsilon = 1e-12);
}

#[test]
fn cancelling_one_gesture_keeps_the_other() {
    let mut c = ControllerBuilder::new()
        .anchor(DVec2::new(400.0, 300.0))
        .build()
        .expect("valid");
    let focal = DVec2::new(100.0, 100.0);
    let p = c.host_space().host_to_scene(&c.transform(), focal);

    c.begin_pinch(focal);
    c.update_pinch(2.0);
    c.begin_rotate(focal);
    c.update_rotate(0.6);

    c.cancel_rotate();
    assert_abs_diff_eq!(c.transform().scale, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(c.transform().rotation, 0.0, epsilon = 1e-12);
    let back = c.host_space().scene_to_host(&c.transform(), p);
    assert_abs_diff_eq!(back.x, focal.x, epsilon = 1e-9);
    assert_abs_diff_eq!(back.y, focal.y, epsilon = 1e-9);

    // The pinch keeps running after its partner is gone.
    c.update_pinch(4.0);
    assert_abs_diff_eq!(c.transform().scale, 0.25, epsilon = 1e-12);

    c.cancel_pinch();
    assert_abs_diff_eq!(c.transform().scale, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(c.transform().translation.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c.transform().translation.y, 0.0, epsilon = 1e-9);
    assert!(c.active_gestures().is_idle());
}

#[test]
fn cancelling_a_pan_keeps_a_concurrent_twist() {
    let mut c = tilted();
    let start = c.transform();

    c.begin_rotate(DVec2::new(200.0, 200.0));
    c.update_rotate(0.4);
    let twisted = c.transform();
    c.begin_pan(DVec2::new(10.0, 10.0));
    c.update_pan(DVec2::new(70.0, -30.0));
    c.update_pan(DVec2::new(90.0, -45.0));

    c.cancel_pan();
    assert_abs_diff_eq!(c.transform().translation.x, twisted.translation.x, epsilon = 1e-9);
    assert_abs_diff_eq!(c.transform().translation.y, twisted.translation.y, epsilon = 1e-9);
    assert_abs_diff_eq!(c.transform().rotation, start.rotation + 0.4, epsilon = 1e-12);
    assert!(c.active_gestures().rotate);
}

#[test]
fn observers_see_paired_notifications_and_one_settle() {
    let mut c = ControllerBuilder::new().build().expect("valid");
    let rec = RecordingObserver::attach(&mut c);

    GestureDriver::new(&mut c).drag(DVec2::ZERO, DVec2::new(30.0, 0.0), 3);
    c.end_pan(DVec2::new(200.0, 0.0));
    assert!(GestureDriver::new(&mut c).settle(500).is_some());

    let events = rec.events();
    let mut iter = events.iter().filter(|e| !matches!(e, ViewportEvent::InertiaSettled));
    while let Some(will) = iter.next() {
        let did = iter.next();
        match (will, did) {
            (
                ViewportEvent::WillChange { cause: a, current },
                Some(ViewportEvent::DidChange {
                    cause: b, previous, ..
                }),
            ) => {
                assert_eq!(a, b);
                assert_eq!(current, previous);
            }
            other => panic!("unpaired notification: {other:?}"),
        }
    }

    let causes = rec.did_change_causes();
    assert_eq!(&causes[..3], &[ChangeCause::Pan; 3]);
    assert!(causes[3..].iter().all(|c| *c == ChangeCause::Inertia));
    assert_eq!(rec.settled_count(), 1);
    assert!(matches!(events.last(), Some(ViewportEvent::InertiaSettled)));
}

#[test]
fn unsubscribed_observer_stops_receiving() {
    let mut c = ControllerBuilder::new().build().expect("valid");
    let rec = RecordingObserver::attach(&mut c);
    let id = rec.id().expect("attached");
    assert!(c.unsubscribe(id));
    assert!(!c.unsubscribe(id));
    c.set_immediate(DVec2::new(3.0, 4.0), 2.0, 0.0, false, None);
    assert!(rec.is_empty());
}

#[test]
fn animated_reset_is_interrupted_by_touch() {
    let mut c = ControllerBuilder::new().build().expect("valid");
    c.set_immediate(DVec2::new(100.0, 0.0), 4.0, 0.0, true, Some(0.5));
    GestureDriver::new(&mut c).frames(3);
    let midway = c.transform();
    assert!(midway.translation.x > 0.0 && midway.translation.x < 100.0);

    c.stop_inertia();
    assert!(!c.is_animating());
    GestureDriver::new(&mut c).frames(10);
    assert_eq!(c.transform(), midway);
}

#[test]
fn reset_during_gesture_drops_the_gesture() {
    let mut c = ControllerBuilder::new().build().expect("valid");
    c.begin_pan(DVec2::ZERO);
    c.set_immediate(DVec2::new(7.0, 7.0), 1.0, 0.0, false, None);
    assert!(c.active_gestures().is_idle());
    c.update_pan(DVec2::new(50.0, 50.0));
    assert_eq!(c.transform().translation, DVec2::new(7.0, 7.0));
}
