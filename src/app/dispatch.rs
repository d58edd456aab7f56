use crate::backend::{ChatBackend, DuckDuckGo, SearchBackend, SearchQuery};
use crate::chat::{ASSISTANT_NAME, LineInput, Orchestrator, TerminalInput, TurnInput, ask_once};
use crate::cli::{Cli, Mode};
use crate::config::{AppPaths, Config, ConfigStore, SearchKind};
use crate::onboard::{ensure_config, reselect_model};
use crate::search::render_hits;
use crate::session::{DEFAULT_CAPACITY, JsonSessionStore, SessionStore};
use crate::ui::style;
use anyhow::{Context, Result, bail};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use tracing::debug;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let Some(mode) = cli.mode() else {
        bail!("nothing to do; run with --help for usage");
    };
    let paths = AppPaths::resolve()?;
    let config_store = ConfigStore::new(paths.config_file());
    debug!(root = %paths.root().display(), ?mode, "dispatching");

    match mode {
        Mode::SelectModel => {
            let config = reselect_model(&config_store)?;
            println!(
                "  {} Model set to {}",
                style::tick(),
                style::model(config.model)
            );
            Ok(())
        }
        Mode::List => list_sessions(&config_store, &paths),
        Mode::Ask(question) => {
            let config = load_config(&config_store)?;
            ask(&DuckDuckGo::new(), &config, &question).await
        }
        Mode::Search { kind, query } => {
            let config = load_config(&config_store)?;
            search(&DuckDuckGo::new(), &config, kind, &query).await
        }
        Mode::Chat { resume } => {
            let config = load_config(&config_store)?;
            chat(Arc::new(DuckDuckGo::new()), &config, &paths, resume).await
        }
    }
}

fn load_config(store: &ConfigStore) -> Result<Config> {
    let mut config = ensure_config(store)?;
    config.apply_env_overrides();
    Ok(config)
}

async fn ask(backend: &dyn ChatBackend, config: &Config, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question is empty");
    }
    let answer = ask_once(backend, config.model, question)
        .await
        .with_context(|| format!("{} could not answer", config.model))?;
    println!("{} {answer}", style::speaker(ASSISTANT_NAME));
    Ok(())
}

async fn search(
    backend: &dyn SearchBackend,
    config: &Config,
    kind: SearchKind,
    query: &str,
) -> Result<()> {
    if query.trim().is_empty() {
        bail!("search query is empty");
    }
    let surface = config.search.surface(kind);
    let hits = backend
        .search(SearchQuery::new(kind, query, surface))
        .await
        .with_context(|| format!("{kind} search failed"))?;
    println!("{}", render_hits(&hits));
    Ok(())
}

async fn chat(
    backend: Arc<dyn ChatBackend>,
    config: &Config,
    paths: &AppPaths,
    resume: Option<usize>,
) -> Result<()> {
    let store = JsonSessionStore::open(paths.conversations_dir(), config.sessions.capacity)
        .context("failed to open session store")?;
    let orchestrator = Orchestrator::new(backend, Box::new(store), config.model);
    let session = orchestrator.start(resume)?;

    let mut input: Box<dyn TurnInput> = if io::stdin().is_terminal() {
        Box::new(TerminalInput)
    } else {
        Box::new(LineInput::new(io::stdin().lock(), io::stdout()))
    };
    orchestrator
        .run(session, input.as_mut(), &mut io::stdout())
        .await
        .context("chat session failed")?;
    Ok(())
}

fn list_sessions(config_store: &ConfigStore, paths: &AppPaths) -> Result<()> {
    let capacity = config_store.load().map_or(DEFAULT_CAPACITY, |mut config| {
        config.apply_env_overrides();
        config.sessions.capacity
    });
    let store = JsonSessionStore::open(paths.conversations_dir(), capacity)
        .context("failed to open session store")?;
    let sessions = store.list()?;
    println!("{}", super::status::render_sessions(&sessions, store.capacity()));
    Ok(())
}
