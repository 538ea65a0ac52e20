use glam::Vec2;
use lab_engine::{
    Acidity, DrawCmd, LabConfig, LabError, Laboratory, ModuleId, RecordingProvider, Summary,
    SurfaceKind, VirtualFrames,
};

fn provider() -> RecordingProvider {
    RecordingProvider::new(Vec2::new(800.0, 400.0))
}

fn lab_with(provider: RecordingProvider) -> Laboratory<VirtualFrames> {
    Laboratory::new(LabConfig::default(), VirtualFrames::new(), provider)
}

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn gravity_drop_end_to_end() {
    let provider = provider();
    let log = provider.log();
    let mut lab = lab_with(provider);
    lab.open("gravity").unwrap();
    lab.set_control("height", 80.0).unwrap();
    lab.start().unwrap();
    let refreshes = lab.run_until_idle(10_000);
    assert!(refreshes > 0);
    assert!(!lab.is_running());
    assert_eq!(log.last_kind(), Some(SurfaceKind::Dom));

    match lab.summary() {
        Some(Summary::Fall {
            height,
            final_velocity,
            fall_time,
            measured_velocity,
            measured_time,
        }) => {
            assert_eq!(*height, 80.0);
            assert!(approx(*final_velocity, (2.0f32 * 9.8 * 80.0).sqrt(), 1e-2));
            assert!(approx(*fall_time, (2.0f32 * 80.0 / 9.8).sqrt(), 1e-2));
            assert!(approx(*measured_velocity, *final_velocity, 0.2));
            assert!(approx(*measured_time, *fall_time, 0.02));
        }
        other => panic!("unexpected summary {other:?}"),
    }

    // Reset clears the result and returns to the initial frame.
    lab.reset().unwrap();
    assert!(lab.summary().is_none());
}

#[test]
fn projectile_forty_five_degrees() {
    let mut lab = lab_with(provider());
    lab.open("projectile").unwrap();
    lab.start().unwrap();
    lab.run_until_idle(10_000);
    match lab.summary() {
        Some(Summary::Launch {
            max_height,
            range,
            flight_time,
            measured_range,
            ..
        }) => {
            assert!(approx(*range, 255.10, 1e-2));
            assert!(approx(*max_height, 63.78, 1e-2));
            assert!(approx(*flight_time, 7.21, 1e-2));
            assert!(approx(*measured_range, *range, 1.0));
        }
        other => panic!("unexpected summary {other:?}"),
    }
}

#[test]
fn opening_another_module_silences_the_first() {
    let provider = provider();
    let log = provider.log();
    let mut lab = lab_with(provider);
    lab.open("wave").unwrap();
    lab.start().unwrap();
    lab.advance();
    lab.advance();
    let wave_session = lab.session().unwrap().id();

    lab.open("ph").unwrap();
    assert_eq!(lab.scheduler().pending_len(), 0);
    assert_ne!(lab.session().unwrap().id(), wave_session);

    log.clear();
    for _ in 0..5 {
        assert_eq!(lab.advance(), 0);
    }
    assert!(log.is_empty());
}

#[test]
fn close_revokes_every_handle() {
    let mut lab = lab_with(provider());
    lab.open("magnetic").unwrap();
    lab.start().unwrap();
    lab.close();
    lab.close();
    assert!(lab.session().is_none());
    assert_eq!(lab.scheduler().pending_len(), 0);
    assert_eq!(lab.advance(), 0);
}

#[test]
fn unknown_module_keeps_the_running_session() {
    let mut lab = lab_with(provider());
    lab.open("pendulum").unwrap();
    lab.start().unwrap();
    lab.advance();
    let pendulum = lab.session().unwrap().id();

    let err = lab.open("telescope").unwrap_err();
    assert!(matches!(err, LabError::UnknownModule(ref key) if key == "telescope"));
    let session = lab.session().unwrap();
    assert_eq!(session.id(), pendulum);
    assert_eq!(session.module(), ModuleId::Pendulum);
    assert!(lab.is_running());
    assert_eq!(lab.scheduler().pending_len(), 1);
    assert_eq!(lab.advance(), 1);
}

#[test]
fn unknown_module_without_session_opens_nothing() {
    let mut lab = lab_with(provider());
    assert!(lab.open("telescope").is_err());
    assert!(lab.session().is_none());
}

#[test]
fn missing_surface_aborts_open() {
    let mut lab = lab_with(provider().without(ModuleId::Optics));
    let err = lab.open("optics").unwrap_err();
    assert!(matches!(err, LabError::MissingSurface(_)));
    assert!(lab.session().is_none());
    assert!(lab.open("sound").is_ok());

    // A refused surface leaves the open session in place.
    lab.start().unwrap();
    assert!(lab.open("optics").is_err());
    assert_eq!(lab.session().unwrap().module(), ModuleId::Sound);
    assert!(lab.is_running());
}

#[test]
fn unavailable_frame_facility_degrades_quietly() {
    let mut lab = Laboratory::new(LabConfig::default(), VirtualFrames::unavailable(), provider());
    lab.open("pendulum").unwrap();
    lab.start().unwrap();
    assert!(lab.scheduler().is_degraded());
    assert_eq!(lab.scheduler().pending_len(), 0);
    assert_eq!(lab.advance(), 0);
    assert_eq!(lab.session().unwrap().frames(), 0);
}

#[test]
fn ph_test_action_publishes_classification() {
    let provider = provider();
    let log = provider.log();
    let mut lab = lab_with(provider);
    lab.open("ph").unwrap();
    assert_eq!(lab.set_control("substance", 2.2).unwrap(), 2.0);
    lab.start().unwrap();
    assert!(!lab.is_running());
    match lab.summary() {
        Some(Summary::Ph { ph, class, .. }) => {
            assert_eq!(*ph, 2);
            assert_eq!(*class, Acidity::Acidic);
        }
        other => panic!("unexpected summary {other:?}"),
    }
    let frame = log.last().unwrap();
    assert!(frame
        .iter()
        .any(|c| matches!(c, DrawCmd::FillCircle { .. })));
}

#[test]
fn friction_runs_to_the_end_of_the_track() {
    let mut lab = lab_with(provider());
    lab.open("friction").unwrap();
    lab.set_control("surface", 0.9).unwrap();
    lab.set_control("mass", 10.0).unwrap();
    lab.start().unwrap();
    lab.run_until_idle(10_000);
    match lab.summary() {
        Some(Summary::Slide {
            friction_force,
            net_force,
            acceleration,
            final_velocity,
        }) => {
            assert!(approx(*friction_force, 88.2, 1e-3));
            assert!(approx(*net_force, 11.8, 1e-3));
            assert!(approx(*acceleration, 1.18, 1e-4));
            let ideal = (2.0f32 * 1.18 * 650.0).sqrt();
            assert!(approx(*final_velocity, ideal, 0.13), "{final_velocity} vs {ideal}");
        }
        other => panic!("unexpected summary {other:?}"),
    }
}

#[test]
fn initial_frames_are_deterministic() {
    for id in ModuleId::ALL {
        let frames: Vec<_> = (0..2)
            .map(|_| {
                let provider = provider();
                let log = provider.log();
                let mut lab = lab_with(provider);
                lab.open(id.as_str()).unwrap();
                log.last().unwrap()
            })
            .collect();
        assert_eq!(frames[0], frames[1], "{id}");
    }
}

#[test]
fn reaction_finishes_on_its_own_and_keeps_its_equation() {
    let mut lab = lab_with(provider());
    lab.open("reaction").unwrap();
    lab.set_control("reaction", 2.0).unwrap();
    lab.start().unwrap();
    let refreshes = lab.run_until_idle(10_000);
    // 6.2 s of animation at 60 Hz.
    assert!((370..=375).contains(&refreshes), "{refreshes}");
    assert_eq!(
        lab.summary(),
        Some(&Summary::Reaction {
            name: "Oxidation",
            equation: "2Mg + O₂ → 2MgO",
        })
    );
}

#[test]
fn schemas_serialize_for_the_ui() {
    let lab = lab_with(provider());
    let json = lab.schema(ModuleId::Friction).unwrap().to_json().unwrap();
    assert!(json.contains("\"id\":\"surface\""), "{json}");
    assert!(json.contains("Rubber"));
}
