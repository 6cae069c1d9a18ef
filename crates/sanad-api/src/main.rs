use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use signdict_db::{LoadStatus, SignLexicon, StopWords};

use sanad_api::rate_limit::ThrottleLayer;
use sanad_api::{
    AppState, CommandSegmenter, Segmenter, Translator, VideoLibrary, WhitespaceSegmenter, router,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_SIGNS: &str = "signs.json";
const DEFAULT_STOP_WORDS: &str = "stop_words.txt";
const DEFAULT_VIDEO_DIRS: &str = "videos";
const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!("using sign dictionary at {}", config.signs_path.display());
    info!(
        "rate limit: {} req/s (burst {})",
        config.rate_limit_rps, config.rate_limit_burst
    );

    let start = Instant::now();
    let lexicon = Arc::new(SignLexicon::load(&config.signs_path));
    match lexicon.status() {
        LoadStatus::Loaded { entries } => {
            info!(
                "lexicon ready: {entries} entries, {} surface forms, in {} ms",
                lexicon.surface_form_count(),
                start.elapsed().as_millis()
            );
        }
        LoadStatus::Failed(reason) => {
            warn!("lexicon empty, every request will miss: {reason}");
        }
    }

    let stop_words = Arc::new(StopWords::load_or_builtin(
        config.stop_words_path.as_deref(),
    ));
    info!("{} stop words active", stop_words.len());

    let segmenter: Arc<dyn Segmenter> = match &config.segmenter_cmd {
        Some(command) => {
            info!("segmenter command: {command}");
            match CommandSegmenter::from_command_line(command) {
                Some(seg) => Arc::new(seg),
                None => {
                    warn!("blank segmenter command, falling back to whitespace tokens");
                    Arc::new(WhitespaceSegmenter)
                }
            }
        }
        None => {
            warn!("no segmenter configured, affix recovery disabled");
            Arc::new(WhitespaceSegmenter)
        }
    };

    let translator = Arc::new(Translator::new(
        Arc::clone(&lexicon),
        stop_words,
        segmenter,
    ));
    let videos = Arc::new(VideoLibrary::new(config.video_dirs));

    let state = AppState {
        translator,
        lexicon,
        videos,
    };

    let throttle = ThrottleLayer::new(config.rate_limit_rps, config.rate_limit_burst);
    let app = router(state)
        .layer(throttle)
        .layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid listen address");
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    signs_path: PathBuf,
    stop_words_path: Option<PathBuf>,
    video_dirs: Vec<PathBuf>,
    segmenter_cmd: Option<String>,
    rate_limit_rps: u32,
    rate_limit_burst: u32,
}

fn load_config() -> Config {
    let mut cli_signs: Option<PathBuf> = None;
    let mut cli_segmenter: Option<String> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--signs-path" => {
                if let Some(path) = args.next() {
                    cli_signs = Some(PathBuf::from(path));
                }
            }
            "--segmenter" => {
                cli_segmenter = args.next();
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--signs-path=") {
                    cli_signs = Some(PathBuf::from(path));
                } else if let Some(cmd) = arg.strip_prefix("--segmenter=") {
                    cli_segmenter = Some(cmd.to_string());
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let signs_path = cli_signs
        .or_else(|| env::var("SIGNS_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SIGNS));
    let stop_words_path = Some(
        env::var("STOP_WORDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STOP_WORDS)),
    );
    let video_dirs = env::var("VIDEO_DIRS")
        .unwrap_or_else(|_| DEFAULT_VIDEO_DIRS.to_string())
        .split(':')
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect();
    let segmenter_cmd = cli_segmenter.or_else(|| env::var("SEGMENTER_CMD").ok());
    let rate_limit_rps = env::var("RATE_LIMIT_RPS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_RPS);
    let rate_limit_burst = env::var("RATE_LIMIT_BURST")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_BURST);

    Config {
        host,
        port,
        signs_path,
        stop_words_path,
        video_dirs,
        segmenter_cmd,
        rate_limit_rps,
        rate_limit_burst,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
