use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use parley_client::{
    api::{self, ThreadId},
    HttpSync, LocalSync, SyncClient, ThreadConfig, ThreadStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod session;
use session::Command;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base url of the comment service
    #[structopt(
        short,
        long,
        env = "PARLEY_HOST",
        default_value = "http://localhost:8080"
    )]
    host: String,

    /// Thread to open
    #[structopt(short, long)]
    thread: String,

    /// Name to post comments as
    #[structopt(short, long)]
    author: String,

    /// Keep the thread in memory instead of using the comment service
    #[structopt(long)]
    offline: bool,

    /// JSON list of comments to start the offline thread with
    #[structopt(long, parse(from_os_str), requires = "offline")]
    seed: Option<PathBuf>,

    #[structopt(long)]
    max_depth: Option<usize>,

    #[structopt(long)]
    max_root_comments: Option<usize>,

    /// Count comments already in the thread against the root comment quota
    #[structopt(long)]
    count_loaded_roots: bool,

    /// Request timeout, in seconds
    #[structopt(long)]
    timeout: Option<u64>,
}

impl Opt {
    fn config(&self) -> ThreadConfig {
        let mut cfg = match self.offline {
            true => ThreadConfig::local(),
            false => ThreadConfig::remote(),
        };
        if let Some(max_depth) = self.max_depth {
            cfg.max_depth = max_depth;
        }
        if let Some(max_root_comments) = self.max_root_comments {
            cfg.max_root_comments = max_root_comments;
        }
        cfg.count_loaded_roots |= self.count_loaded_roots;
        cfg
    }
}

fn read_seed(path: &Path) -> anyhow::Result<Vec<api::Comment>> {
    let data = std::fs::read(path).with_context(|| format!("reading seed file {path:?}"))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing seed file {path:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "parley_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let thread = ThreadId::new(opt.thread.clone());
    let cfg = opt.config();
    tracing::debug!(?cfg, offline = opt.offline, "starting session");

    if opt.offline {
        let mut sync = LocalSync::new();
        if let Some(seed) = &opt.seed {
            sync.seed(thread.clone(), read_seed(seed)?);
        }
        run(ThreadStore::new(thread, sync, cfg), &opt.author).await
    } else {
        let sync = match opt.timeout {
            Some(secs) => HttpSync::with_timeout(&opt.host, Duration::from_secs(secs))?,
            None => HttpSync::new(&opt.host)?,
        };
        run(ThreadStore::new(thread, sync, cfg), &opt.author).await
    }
}

async fn run<S: SyncClient>(mut store: ThreadStore<S>, author: &str) -> anyhow::Result<()> {
    let thread = store.thread_id().clone();
    match store.load(thread).await {
        Ok(()) => print!("{}", session::render(&store)),
        Err(e) => eprintln!("error: {e}"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if !session::execute(&mut store, author, cmd).await {
            break;
        }
    }
    Ok(())
}
