//! Voice interface through the SpeechSink trait object

use parking_lot::Mutex;
use smartguide_spk::engines::ConsoleTtsEngine;
use smartguide_spk::{
    EngineKind, Recognition, ScriptedRecognizer, SpeechConfig, SpeechSink, Speaker, VoiceInterface,
    NOT_UNDERSTOOD_REPLY,
};
use std::sync::Arc;

fn console_voice(answers: &[&str]) -> (Arc<dyn SpeechSink>, Arc<VoiceInterface>, Arc<Mutex<Vec<u8>>>) {
    let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
    let engine = ConsoleTtsEngine::with_writer(buffer.clone());
    let mut config = SpeechConfig::default();
    config.engine = EngineKind::Console;
    let voice = Arc::new(
        VoiceInterface::new(
            config,
            Arc::new(engine),
            Arc::new(ScriptedRecognizer::new(answers.iter().copied())),
        )
        .unwrap(),
    );
    (voice.clone() as Arc<dyn SpeechSink>, voice, buffer)
}

#[tokio::test]
async fn test_console_conversation() {
    let (sink, voice, buffer) = console_voice(&["台北101"]);

    let destination = sink.listen("請問今天想要去哪裡？").await.into_text();
    let transport = sink.listen("請問您想用什麼交通工具？").await.into_text();
    sink.say("左邊有椅子").await.unwrap();

    assert_eq!(destination, "台北101");
    assert_eq!(transport, NOT_UNDERSTOOD_REPLY);

    let output = String::from_utf8(buffer.lock().clone()).unwrap();
    assert_eq!(
        output,
        "🤖: 請問今天想要去哪裡？\n🤖: 請問您想用什麼交通工具？\n🤖: 左邊有椅子\n"
    );

    let transcript = voice.transcript();
    let speakers: Vec<Speaker> = transcript.entries().map(|e| e.speaker).collect();
    assert_eq!(
        speakers,
        vec![Speaker::Guide, Speaker::User, Speaker::Guide, Speaker::Guide]
    );
}

#[tokio::test]
async fn test_invalid_text_is_not_spoken() {
    let (sink, _voice, buffer) = console_voice(&[]);
    assert!(sink.say("   ").await.is_err());
    assert!(sink.say("bad\0text").await.is_err());
    assert!(buffer.lock().is_empty());
}

#[tokio::test]
async fn test_transcript_is_bounded() {
    let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
    let mut config = SpeechConfig::default();
    config.transcript_capacity = 3;
    let voice = VoiceInterface::new(
        config,
        Arc::new(ConsoleTtsEngine::with_writer(buffer)),
        Arc::new(ScriptedRecognizer::default()),
    )
    .unwrap();

    for i in 0..5 {
        voice.say(&format!("第{}句", i)).await.unwrap();
    }
    assert_eq!(
        voice.spoken_lines(),
        vec!["第2句".to_string(), "第3句".to_string(), "第4句".to_string()]
    );
    assert_eq!(voice.listen("請說").await, Recognition::NotUnderstood);
}
