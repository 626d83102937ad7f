// SmartGuide command line interface
// Voice intake, navigation hand-off and scene narration from recorded scenes

use anyhow::{bail, Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use smartguide_core::SystemClock;
use smartguide_eye::{PngSequenceDisplay, ScriptedScene};
use smartguide_session::{
    build_maps_url, GuideConfig, GuideSession, LoopReport, NavigationLauncher, NullLauncher,
    SystemBrowserLauncher, TRANSPORT_CHOICES,
};
use smartguide_spk::{
    ConsoleRecognizer, EngineKind, ScriptedRecognizer, SpeechRecognizer, SpeechSink, VoiceInterface,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "smartguide")]
#[command(about = "SmartGuide - spoken scene narration for pedestrians", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Speech engine (native, console)
    #[arg(long)]
    engine: Option<EngineKind>,

    /// Print the navigation link instead of opening a browser
    #[arg(long)]
    no_browser: bool,

    /// Write annotated frames as PNG files into this directory
    #[arg(long)]
    save_frames: Option<PathBuf>,

    /// Replay the scene as fast as possible instead of at the camera frame rate
    #[arg(long)]
    no_pace: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for destination and transport by voice, then narrate a scene
    Run {
        /// Recorded scene (JSON Lines)
        #[arg(long)]
        scene: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Start navigation from a chosen destination, optionally narrating a scene
    Navigate {
        #[arg(long, short)]
        destination: String,

        /// Transport
        #[arg(long, short, default_value = "走路", value_parser = PossibleValuesParser::new(TRANSPORT_CHOICES))]
        transport: String,

        #[arg(long)]
        scene: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Narrate a scene without intake
    Narrate {
        #[arg(long)]
        scene: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the directions link for a destination
    Url {
        #[arg(long, short)]
        destination: String,

        #[arg(long, short, default_value = "走路", value_parser = PossibleValuesParser::new(TRANSPORT_CHOICES))]
        transport: String,
    },
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            ["smartguide", "smartguide_core", "smartguide_eye", "smartguide_spk", "smartguide_session"]
                .iter()
                .map(|target| format!("{}={}", target, level))
                .collect::<Vec<_>>()
                .join(","),
        )
    });

    // stdout carries console speech; logs go to stderr
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<GuideConfig> {
    let mut config = match path {
        Some(path) => GuideConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match GuideConfig::default_path().filter(|p| p.exists()) {
            Some(default) => {
                info!("Using config {}", default.display());
                GuideConfig::from_file(&default)
                    .with_context(|| format!("loading config {}", default.display()))?
            }
            None => GuideConfig::default(),
        },
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

fn apply_output_args(config: &mut GuideConfig, output: &OutputArgs) {
    if let Some(engine) = &output.engine {
        config.speech.engine = engine.clone();
    }
    if output.no_browser {
        config.navigation.open_browser = false;
    }
}

fn build_session(
    config: GuideConfig,
    recognizer: Arc<dyn SpeechRecognizer>,
    output: &OutputArgs,
) -> Result<GuideSession> {
    let voice: Arc<dyn SpeechSink> =
        Arc::new(VoiceInterface::from_config(config.speech.clone(), recognizer)?);
    let launcher: Arc<dyn NavigationLauncher> = if config.navigation.open_browser {
        Arc::new(SystemBrowserLauncher)
    } else {
        Arc::new(NullLauncher)
    };

    let mut session = GuideSession::new(config, voice, launcher, Arc::new(SystemClock))?;
    if let Some(dir) = &output.save_frames {
        session = session.with_display(Arc::new(PngSequenceDisplay::new(dir)?));
    }
    Ok(session)
}

fn load_scene(path: &Path, config: &GuideConfig, output: &OutputArgs) -> Result<ScriptedScene> {
    let scene = ScriptedScene::from_file(path)
        .with_context(|| format!("loading scene {}", path.display()))?;
    if scene.is_empty() {
        bail!("scene {} has no frames", path.display());
    }
    Ok(if output.no_pace {
        scene
    } else {
        scene.with_frame_rate(config.vision.frame_rate)
    })
}

async fn narrate(session: &GuideSession, scene: &ScriptedScene) -> Result<LoopReport> {
    let toggle = session.toggle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping detection");
            toggle.disable();
        }
    });

    let mut camera = scene.camera();
    let report = session.run_detection(&mut camera, Arc::new(scene.detector())).await;
    ctrl_c.abort();

    let report = report?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { scene, output } => {
            apply_output_args(&mut config, &output);
            config.validate()?;
            let scene = load_scene(&scene, &config, &output)?;
            let session = build_session(config, Arc::new(ConsoleRecognizer::new()), &output)?;

            let state = session.start_voice_intake().await?;
            info!("Navigating to {} by {}", state.destination, state.transport);
            narrate(&session, &scene).await?;
        }
        Commands::Navigate { destination, transport, scene, output } => {
            apply_output_args(&mut config, &output);
            config.validate()?;
            let scene = scene.map(|path| load_scene(&path, &config, &output)).transpose()?;
            let session = build_session(config, Arc::new(ScriptedRecognizer::default()), &output)?;

            session.start_manual(&destination, &transport).await?;
            if let Some(scene) = scene {
                narrate(&session, &scene).await?;
            }
        }
        Commands::Narrate { scene, output } => {
            apply_output_args(&mut config, &output);
            config.validate()?;
            let scene = load_scene(&scene, &config, &output)?;
            let session = build_session(config, Arc::new(ScriptedRecognizer::default()), &output)?;

            session.toggle().enable();
            narrate(&session, &scene).await?;
        }
        Commands::Url { destination, transport } => {
            config.validate()?;
            let url = build_maps_url(&config.navigation.base_url, &destination, &transport)?;
            println!("{}", url);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_limited_to_form_choices() {
        let cli = Cli::try_parse_from(["smartguide", "url", "-d", "台北車站", "-t", "捷運"]).unwrap();
        match cli.command {
            Commands::Url { transport, .. } => assert_eq!(transport, "捷運"),
            _ => panic!("Expected url command"),
        }

        assert!(Cli::try_parse_from(["smartguide", "url", "-d", "台北車站", "-t", "飛機"]).is_err());
        assert!(Cli::try_parse_from(["smartguide", "navigate", "-d", "台北車站", "-t", "飛機"]).is_err());
    }

    #[test]
    fn test_transport_defaults_to_walking() {
        let cli = Cli::try_parse_from(["smartguide", "url", "-d", "台北車站"]).unwrap();
        match cli.command {
            Commands::Url { transport, .. } => assert_eq!(transport, "走路"),
            _ => panic!("Expected url command"),
        }
    }
}
