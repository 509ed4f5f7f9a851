use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voice_chat::{
    create_router, AppState, ChatState, ChatStore, Config, LocalMicrophone, NatsClientFactory,
    VoiceController,
};

#[derive(Parser, Debug)]
#[command(name = "voice-chat", version, about = "Chat client core with voice mode")]
struct Cli {
    /// Config file, without extension
    #[arg(short, long, default_value = "config/voice-chat")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Loaded config: {}", cfg.service.name);
    info!("NATS voice gateway: {}", cfg.nats.url);
    info!("Voice endpoint: {}", cfg.voice.settings().endpoint());

    let factory = NatsClientFactory::new(cfg.nats.url.clone(), cfg.voice.input_device.clone());
    let devices = LocalMicrophone::new(cfg.voice.input_device.clone());
    let (voice, transcripts) =
        VoiceController::new(cfg.voice.settings(), Box::new(factory), Box::new(devices));

    let initial = match &cfg.user {
        Some(user) => ChatState::with_user(user.into()),
        None => ChatState::default(),
    };
    let chat = ChatStore::new(initial);
    let follower = chat.follow_transcripts(transcripts);

    let app = create_router(AppState::new(voice.clone(), chat));

    let port = cli.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;

    voice.cleanup();
    follower.abort();

    Ok(())
}
