use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use scribe_core::{update, AppState, ArticleFacet, Msg};
use scribe_engine::{EngineEvent, EngineHandle, ReqwestContentApi};
use scribe_logging::{scribe_debug, scribe_info, scribe_warn};
use tokio::sync::mpsc;

use super::config::AppConfig;
use super::effects::{event_to_msg, EffectRunner};
use super::logging;
use super::ui::commands::{self, Command};
use super::ui::render;

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    logging::initialize(config.log_destination, config.log_level()?);
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    runtime.block_on(async {
        let api = ReqwestContentApi::new(config.api_settings()?).context("building HTTP client")?;
        scribe_info!("backend {}", api.base_url());
        let (engine, events) = EngineHandle::new(Arc::new(api));
        let runner = EffectRunner::new(engine, config.poll_interval());
        let dashboard = Dashboard::new(AppState::with_list_limit(config.list_limit), runner);

        let input = spawn_stdin_reader();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        dashboard.run(events, input, &mut out).await
    })
}

/// Reads stdin on a plain thread; the channel closes on EOF.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    scribe_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
    });
    line_rx
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Dashboard {
    state: AppState,
    runner: EffectRunner,
    facet: ArticleFacet,
}

impl Dashboard {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            facet: ArticleFacet::Content,
        }
    }

    async fn run<W: Write>(
        mut self,
        mut events: mpsc::UnboundedReceiver<EngineEvent>,
        mut input: mpsc::UnboundedReceiver<String>,
        out: &mut W,
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", render::BANNER)?;
        self.dispatch(Msg::Initialize, out)?;

        loop {
            tokio::select! {
                Some(event) = events.recv() => self.handle_event(event, out)?,
                line = input.recv() => {
                    let Some(line) = line else { break };
                    if self.handle_line(&line, out)? == Flow::Quit {
                        break;
                    }
                }
            }
        }

        self.close(out)?;
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, msg: Msg, out: &mut W) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.render(out)?;
        }
        Ok(())
    }

    fn handle_event<W: Write>(&mut self, event: EngineEvent, out: &mut W) -> io::Result<()> {
        self.dispatch(event_to_msg(event), out)
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        match commands::parse(line, &self.state.view()) {
            Ok(Command::Intent(msg)) => {
                scribe_debug!("intent {:?}", msg);
                self.dispatch(msg, out)?;
            }
            Ok(Command::Show(facet)) => {
                self.facet = facet;
                self.render(out)?;
            }
            Ok(Command::Help) => writeln!(out, "{}", commands::HELP)?,
            Ok(Command::Quit) => return Ok(Flow::Quit),
            Ok(Command::Empty) => {}
            Err(err) => writeln!(out, "{err}")?,
        }
        Ok(Flow::Continue)
    }

    fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", render::render(&self.state.view(), self.facet))?;
        out.flush()
    }

    fn close<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        scribe_info!("dashboard closing");
        self.dispatch(Msg::Shutdown, out)?;
        self.runner.shutdown();
        Ok(())
    }
}
