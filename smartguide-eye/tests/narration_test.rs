//! End-to-end narration over a scripted scene

use smartguide_eye::camera::FrameSource;
use smartguide_eye::narration::{NarrationScheduler, NarrationState, TickOutcome};
use smartguide_eye::processing::{DetectionPipeline, FrameObservation};
use smartguide_eye::scene::ScriptedScene;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CROSSING: &str = r#"
{"width":900,"height":600,"detections":[{"label":"斑馬線","box":[0,400,200,600]},{"label":"人","box":[400,10,500,200]},{"label":"車","box":[700,300,880,500]}]}
{"width":900,"height":600,"detections":[{"label":"人","box":[400,10,500,200]}]}
{"width":900,"height":600,"detections":[{"label":"dog","box":[650,300,700,400]},{"label":"人","box":[660,300,700,400]}]}
{"width":900,"height":600}
"#;

async fn observations(scene: &ScriptedScene) -> Vec<FrameObservation> {
    let pipeline = DetectionPipeline::new(Arc::new(scene.detector()), 0.25);
    let mut camera = scene.camera();
    camera.open().await.unwrap();

    let mut out = Vec::new();
    while let Some(frame) = camera.next_frame().await.unwrap() {
        let detections = pipeline.detect(&frame).await.unwrap();
        out.push(FrameObservation::from_detections(&detections, frame.width()));
    }
    camera.release().await;
    out
}

#[tokio::test]
async fn test_crossing_scene_utterance() {
    let scene = ScriptedScene::parse(CROSSING).unwrap();
    let frames = observations(&scene).await;
    let scheduler = NarrationScheduler::default();

    let start = Instant::now();
    let state = NarrationState::new(start, Duration::from_secs(3));
    let (_, outcome) = scheduler.tick(state, &frames[0], start + Duration::from_secs(4));

    assert_eq!(
        outcome.utterance(),
        Some("左邊是斑馬線，請注意過馬路安全，中間有人，右邊有車輛經過，請小心通行")
    );
}

#[tokio::test]
async fn test_one_utterance_per_interval() {
    let scene = ScriptedScene::parse(CROSSING).unwrap();
    let frames = observations(&scene).await;
    let scheduler = NarrationScheduler::default();

    let start = Instant::now();
    let mut state = NarrationState::new(start, Duration::from_secs(3));
    let mut spoken = Vec::new();

    // Frames every 2s: t=2 suppressed, t=4 speaks, t=6 suppressed, t=8 silent reset.
    for (i, observation) in frames.iter().enumerate() {
        let now = start + Duration::from_secs(2 * (i as u64 + 1));
        let (next, outcome) = scheduler.tick(state, observation, now);
        state = next;
        if let TickOutcome::Announce(text) = outcome {
            spoken.push(text);
        }
    }

    assert_eq!(spoken, vec!["中間有人".to_string()]);
    assert_eq!(state.last_spoken_at(), start + Duration::from_secs(8));
}

#[tokio::test]
async fn test_person_outranks_dog_in_same_region() {
    let scene = ScriptedScene::parse(CROSSING).unwrap();
    let frames = observations(&scene).await;
    let scheduler = NarrationScheduler::default();

    assert_eq!(scheduler.phrases(&frames[2]), vec!["右邊有人".to_string()]);
    assert!(scheduler.phrases(&frames[3]).is_empty());
}

#[tokio::test]
async fn test_low_confidence_detections_are_not_narrated() {
    let scene = ScriptedScene::parse(
        r#"{"width":900,"height":600,"detections":[{"label":"車","box":[0,0,100,100],"confidence":0.1}]}"#,
    )
    .unwrap();
    let frames = observations(&scene).await;
    assert!(frames[0].is_empty());
}

#[test]
fn test_demo_scene_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/crossing.jsonl");
    let scene = ScriptedScene::from_file(path).unwrap();
    assert_eq!(scene.len(), 510);
    assert_eq!(scene.frames()[0].detections.len(), 3);
    assert!(scene.frames()[360].detector_error.is_some());
}
