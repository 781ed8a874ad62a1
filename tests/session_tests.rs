// Mount/unmount lifecycle: resources are released exactly once and nothing
// moves after unmount.

use glam::Vec2;
use panorama_tour::animation::AnimationMode;
use panorama_tour::config::{MarkerConfig, ViewerConfig};
use panorama_tour::marker::{MarkerAction, MarkerShape};
use panorama_tour::session::{SessionState, ViewerSession};
use panorama_tour::viewer::PanoramaViewer;
use panorama_tour::ViewerError;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

/// Stands in for the GPU renderer; counts how often it is released.
struct FakeGpu {
    releases: Rc<Cell<u32>>,
}

impl Drop for FakeGpu {
    fn drop(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

fn mounted() -> (ViewerSession<FakeGpu>, Rc<Cell<u32>>) {
    mounted_with(MarkerAction::Recenter, 1)
}

fn mounted_with(action: MarkerAction, panoramas: usize) -> (ViewerSession<FakeGpu>, Rc<Cell<u32>>) {
    let mut config = ViewerConfig::default();
    config.markers = vec![MarkerConfig {
        position: [150.0, 40.0, -200.0],
        shape: MarkerShape::Sprite { size: [40.0, 40.0] },
        action,
        label: None,
        icon: None,
    }];
    config.panoramas = (0..panoramas)
        .map(|i| PathBuf::from(format!("pano{}.jpg", i)))
        .collect();
    let releases = Rc::new(Cell::new(0));
    let gpu = FakeGpu {
        releases: releases.clone(),
    };
    (
        ViewerSession::mount(PanoramaViewer::new(&config), gpu),
        releases,
    )
}

fn tap_marker(session: &mut ViewerSession<FakeGpu>) {
    let viewer = session.viewer_mut("test").unwrap();
    let pixel = viewer
        .scene
        .camera
        .project(viewer.scene.markers[0].position, viewer.viewport())
        .unwrap();
    viewer.pointer_down(pixel);
    assert!(viewer.pointer_up(pixel).is_some());
}

#[test]
fn unmount_mid_animation_freezes_state() {
    let (mut session, releases) = mounted();
    tap_marker(&mut session);
    assert!(matches!(session.viewer().mode(), AnimationMode::Recentering { .. }));
    session.frame(1.0 / 60.0).unwrap();

    let position = session.viewer().scene.camera.position;
    let mode = session.viewer().mode();

    session.unmount();
    assert_eq!(session.state(), SessionState::Unmounted);
    assert_eq!(releases.get(), 1);

    for _ in 0..10 {
        assert!(matches!(session.frame(1.0 / 60.0), Err(ViewerError::Unmounted("frame"))));
    }
    assert!(session.viewer_mut("pointer down").is_err());
    assert!(session.resources_mut("draw").is_err());
    assert_eq!(session.viewer().scene.camera.position, position);
    assert_eq!(session.viewer().mode(), mode);
}

#[test]
fn unmount_mid_cross_fade_freezes_blend() {
    let (mut session, releases) = mounted_with(MarkerAction::CrossFade, 2);
    tap_marker(&mut session);
    assert!(matches!(session.viewer().mode(), AnimationMode::Transitioning { .. }));
    for _ in 0..5 {
        session.frame(1.0 / 60.0).unwrap();
    }

    let blend = session.viewer().scene.sphere.blend();
    let current = session.viewer().scene.sphere.current_texture();
    assert!(blend > 0.0 && blend < 1.0);

    session.unmount();
    assert_eq!(releases.get(), 1);
    for _ in 0..600 {
        assert!(session.frame(1.0 / 60.0).is_err());
    }
    assert_eq!(session.viewer().scene.sphere.blend(), blend);
    assert_eq!(session.viewer().scene.sphere.current_texture(), current);
    assert!(matches!(session.viewer().mode(), AnimationMode::Transitioning { .. }));
}

#[test]
fn unmount_while_auto_rotating_freezes_azimuth() {
    let (mut session, releases) = mounted();
    for _ in 0..240 {
        session.frame(1.0 / 60.0).unwrap();
    }
    assert_eq!(session.viewer().mode(), AnimationMode::AutoRotating);

    let azimuth = session.viewer().scene.camera.azimuth();
    session.unmount();
    assert_eq!(releases.get(), 1);
    for _ in 0..600 {
        assert!(session.frame(1.0 / 60.0).is_err());
    }
    assert_eq!(session.viewer().scene.camera.azimuth(), azimuth);
    assert_eq!(session.viewer().mode(), AnimationMode::AutoRotating);
}

#[test]
fn resources_released_exactly_once() {
    let (mut session, releases) = mounted();
    session.unmount();
    session.unmount();
    assert_eq!(releases.get(), 1);
    drop(session);
    assert_eq!(releases.get(), 1);
}

#[test]
fn dropping_a_mounted_session_releases_resources() {
    let (session, releases) = mounted();
    drop(session);
    assert_eq!(releases.get(), 1);
}

#[test]
fn late_events_report_unmounted() {
    let (mut session, _) = mounted();
    session.unmount();
    let err = session.viewer_mut("wheel").unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(err.to_string(), "wheel delivered to an unmounted surface");
}

#[test]
fn mounted_session_drives_frames() {
    let (mut session, releases) = mounted();
    let viewer = session.viewer_mut("resize").unwrap();
    viewer.resize(Vec2::new(800.0, 600.0));
    let frame = session.frame(1.0 / 60.0).unwrap();
    assert_eq!(frame.mode, AnimationMode::Idle);
    assert_eq!(releases.get(), 0);
}
