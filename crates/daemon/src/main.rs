// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pfd: the photoflow importer daemon binary.

use pf_core::{Clock, SystemClock};
use pf_daemon::{worker, Config, DaemonError, FsSink};
use pf_engine::{ActionScheduler, LocalScheduler, TaskRegistry, TaskRunner};
use pf_flickr::{FlickrApi, FlickrClient};
use pf_import::{
    CommentDeltaImporter, ContentSink, FetchCommentDeltaTask, FetchLatestTask, InitialImportTask,
    PhotoStreamImporter, Settings, Staging,
};
use pf_store::{FileStore, KeyedStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn config_path() -> PathBuf {
    std::env::var_os("PFD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| Config::default().data_dir.join("pfd.toml"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("pfd: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DaemonError> {
    let config = Config::load(&config_path())?;
    std::fs::create_dir_all(&config.data_dir)?;

    let file_appender = tracing_appender::rolling::daily(config.data_dir.join("logs"), "pfd.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    tracing::info!(data_dir = %config.data_dir.display(), "starting pfd");

    let store: Arc<dyn KeyedStore> =
        Arc::new(FileStore::open(config.data_dir.join("store.json"))?);
    let settings = Settings::new(Arc::clone(&store));
    if let Some(creds) = &config.flickr {
        settings.set_credentials(
            &creds.api_key,
            &creds.api_secret,
            &creds.username,
            &creds.site_author_username,
        )?;
    }

    let clock = SystemClock;
    let scheduler = Arc::new(LocalScheduler::open(Arc::clone(&store))?);
    if scheduler.pending_len() > 0 {
        tracing::info!(pending = scheduler.pending_len(), "restored scheduled actions");
    }

    let mut registry = TaskRegistry::new();
    if settings.credentials_exist()? {
        let api_key = settings.api_key()?.unwrap_or_default();
        let flickr: Arc<dyn FlickrApi> = Arc::new(FlickrClient::new(api_key));
        let sink: Arc<dyn ContentSink> = Arc::new(FsSink::open(config.data_dir.join("content"))?);
        let staging = Staging::new(config.data_dir.join("staging"));

        let photo_stream = Arc::new(PhotoStreamImporter::new(
            Arc::clone(&flickr),
            Arc::clone(&sink),
            settings.clone(),
            staging,
        ));
        let comment_delta = Arc::new(CommentDeltaImporter::new(
            Arc::clone(&flickr),
            Arc::clone(&sink),
            settings.clone(),
        ));

        registry.register(Arc::new(InitialImportTask::new(
            Arc::clone(&photo_stream),
            settings.clone(),
            clock.clone(),
        )))?;
        registry.register(Arc::new(
            FetchLatestTask::new(Arc::clone(&photo_stream), settings.clone(), clock.clone())
                .with_interval(config.fetch_latest_interval()),
        ))?;
        registry.register(Arc::new(
            FetchCommentDeltaTask::new(comment_delta, settings.clone())
                .with_interval(config.comment_delta_interval()),
        ))?;
    } else {
        tracing::warn!("flickr credentials incomplete; no import tasks registered");
    }

    let registry = Arc::new(registry);
    registry.register_schedules(&*scheduler as &dyn ActionScheduler, clock.epoch_ms())?;

    let runner = TaskRunner::new(
        store,
        Arc::clone(&scheduler) as Arc<dyn ActionScheduler>,
        registry,
        clock.clone(),
    )
    .with_continue_delay(config.continue_delay());

    worker::run(scheduler, runner, clock).await
}
