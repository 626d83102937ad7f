//! Guide session flows with a mocked navigation launcher

use mockall::mock;
use smartguide_core::ManualClock;
use smartguide_eye::ScriptedScene;
use smartguide_session::{
    DialogueStep, GuideConfig, GuideSession, NavigationLauncher, SessionError, StopReason,
};
use smartguide_spk::engines::CustomTtsEngine;
use smartguide_spk::{ScriptedRecognizer, SpeechConfig, VoiceInterface, NOT_UNDERSTOOD_REPLY};
use std::sync::Arc;
use url::Url;

mock! {
    pub Launcher {}

    impl NavigationLauncher for Launcher {
        fn launch(&self, url: &Url) -> smartguide_session::Result<()>;
        fn name(&self) -> &str;
    }
}

fn voice(answers: &[&str]) -> Arc<VoiceInterface> {
    let engine = CustomTtsEngine::from_fn("silent", |_, _| Ok(()));
    let recognizer = ScriptedRecognizer::new(answers.iter().copied());
    Arc::new(VoiceInterface::new(SpeechConfig::default(), Arc::new(engine), Arc::new(recognizer)).unwrap())
}

fn launcher_expecting(fragment: &'static str) -> MockLauncher {
    let mut launcher = MockLauncher::new();
    launcher
        .expect_launch()
        .withf(move |url: &Url| url.as_str().contains(fragment))
        .times(1)
        .returning(|_| Ok(()));
    launcher.expect_name().return_const("mock".to_string());
    launcher
}

#[tokio::test]
async fn test_voice_intake_opens_navigation_once() {
    let voice = voice(&["台北101", "捷運"]);
    let session = GuideSession::new(
        GuideConfig::default(),
        voice.clone(),
        Arc::new(launcher_expecting("travelmode=transit")),
        Arc::new(ManualClock::new()),
    )
    .unwrap();

    let state = session.start_voice_intake().await.unwrap();
    assert_eq!(state.step, DialogueStep::Detecting);
    assert_eq!(state.destination, "台北101");
    assert!(session.is_detecting());

    // Second intake is a no-op: no new prompts, no second launch
    let spoken_before = voice.spoken_lines().len();
    let again = session.start_voice_intake().await.unwrap();
    assert_eq!(again, state);
    assert_eq!(voice.spoken_lines().len(), spoken_before);
}

#[tokio::test]
async fn test_unheard_transport_defaults_to_walking() {
    let voice = voice(&["台北車站"]);
    let session = GuideSession::new(
        GuideConfig::default(),
        voice,
        Arc::new(launcher_expecting("travelmode=walking")),
        Arc::new(ManualClock::new()),
    )
    .unwrap();

    let state = session.start_voice_intake().await.unwrap();
    assert_eq!(state.transport, NOT_UNDERSTOOD_REPLY);
}

#[tokio::test]
async fn test_launch_failure_is_not_fatal() {
    let mut launcher = MockLauncher::new();
    launcher
        .expect_launch()
        .times(1)
        .returning(|_| Err(SessionError::Navigation("no browser".to_string())));
    launcher.expect_name().return_const("mock".to_string());

    let session = GuideSession::new(
        GuideConfig::default(),
        voice(&[]),
        Arc::new(launcher),
        Arc::new(ManualClock::new()),
    )
    .unwrap();

    let state = session.start_manual("台大醫院", "走路").await.unwrap();
    assert!(state.detecting);
}

#[tokio::test]
async fn test_detection_requires_intake_and_stops_on_request() {
    let scene = ScriptedScene::parse(
        r#"{"width":900,"height":600,"detections":[{"label":"車","box":[700,300,880,500]}]}"#,
    )
    .unwrap();
    let session = GuideSession::new(
        GuideConfig::default(),
        voice(&[]),
        Arc::new(launcher_expecting("destination=")),
        Arc::new(ManualClock::new()),
    )
    .unwrap();

    let mut camera = scene.camera();
    let early = session.run_detection(&mut camera, Arc::new(scene.detector())).await;
    assert!(matches!(early, Err(SessionError::Dialogue(_))));

    session.start_manual("台北101", "公車").await.unwrap();
    let report = session
        .run_detection(&mut camera, Arc::new(scene.detector()))
        .await
        .unwrap();
    assert_eq!(report.frames, 1);
    assert_eq!(report.stop_reason, StopReason::CaptureEnded);

    session.stop_detection();
    assert!(!session.is_detecting());
    assert!(!session.state().detecting);
    let stopped = session
        .run_detection(&mut scene.camera(), Arc::new(scene.detector()))
        .await;
    assert!(stopped.is_err());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = GuideConfig::default();
    config.speech.volume = 3.0;
    let result = GuideSession::new(
        config,
        voice(&[]),
        Arc::new(MockLauncher::new()),
        Arc::new(ManualClock::new()),
    );
    assert!(matches!(result, Err(SessionError::Config(_))));
}
