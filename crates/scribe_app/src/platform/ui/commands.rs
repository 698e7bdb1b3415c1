//! Console command grammar.
//!
//! Every command that changes the dashboard resolves to one [`Msg`] intent.
//! Display-only commands (`show`, `help`) never reach the controller.

use scribe_core::{
    resume_intent, select_intent, submit_intent, AppViewModel, ArticleFacet, ArticleRequest,
    JobId, JobStatus, Msg, ParseStatusError, RequestError, ToolRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Msg),
    Show(ArticleFacet),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{flag}` expects {expected}")]
    Flag {
        flag: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Status(#[from] ParseStatusError),
    #[error("no job #{0} in the list")]
    NoSuchRow(usize),
    #[error("no job selected")]
    NoCurrentJob,
    #[error("job {0} is not failed and cannot be resumed")]
    NotResumable(JobId),
    #[error("unknown facet `{0}` (content, quality, links, faq)")]
    UnknownFacet(String),
}

pub const HELP: &str = "\
commands:
  submit <topic> [--words N] [--lang xx]   start a tracked job
  select <job-id | #row>                   load a job into the detail view
  resume [job-id | #row]                   resume a failed job
  filter <status | all>                    filter the job list
  show <content|quality|links|faq>         switch the article facet
  research <topic>                         one-shot research call
  outline <topic> [--words N] [--lang xx]  one-shot outline call
  generate <topic> [--words N] [--lang xx] one-shot article call
  dismiss                                  clear the error banner
  help | quit";

pub fn parse(line: &str, view: &AppViewModel) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "dismiss" => Command::Intent(Msg::ErrorDismissed),
        "submit" => {
            let request = article_request(rest, "submit <topic> [--words N] [--lang xx]")?;
            Command::Intent(submit_intent(request)?)
        }
        "select" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("select <job-id | #row>"));
            }
            Command::Intent(select_intent(job_ref(rest, view)?))
        }
        "resume" => Command::Intent(resume(rest, view)?),
        "filter" => {
            let status = match rest.to_ascii_lowercase().as_str() {
                "" => return Err(CommandError::Usage("filter <status | all>")),
                "all" => None,
                other => Some(other.parse::<JobStatus>()?),
            };
            Command::Intent(Msg::ListFilterChanged(status))
        }
        "show" => {
            let facet = ArticleFacet::ALL
                .into_iter()
                .find(|facet| facet.label().eq_ignore_ascii_case(rest))
                .ok_or_else(|| CommandError::UnknownFacet(rest.to_string()))?;
            Command::Show(facet)
        }
        "research" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("research <topic>"));
            }
            Command::Intent(Msg::ToolRequested(ToolRequest::Research {
                topic: rest.to_string(),
            }))
        }
        "outline" => {
            let request = article_request(rest, "outline <topic> [--words N] [--lang xx]")?;
            request.validate()?;
            Command::Intent(Msg::ToolRequested(ToolRequest::Outline { request }))
        }
        "generate" => {
            let request = article_request(rest, "generate <topic> [--words N] [--lang xx]")?;
            request.validate()?;
            Command::Intent(Msg::ToolRequested(ToolRequest::Generate { request }))
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn article_request(args: &str, usage: &'static str) -> Result<ArticleRequest, CommandError> {
    let mut topic = Vec::new();
    let mut words = None;
    let mut language = None;

    let mut tokens = args.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "--words" => {
                let value = tokens.next().and_then(|raw| raw.parse::<u32>().ok());
                words = Some(value.ok_or(CommandError::Flag {
                    flag: token.to_string(),
                    expected: "a number",
                })?);
            }
            "--lang" => {
                let value = tokens.next().ok_or(CommandError::Flag {
                    flag: token.to_string(),
                    expected: "a language code",
                })?;
                language = Some(value.to_string());
            }
            word => topic.push(word),
        }
    }

    if topic.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    let mut request = ArticleRequest::new(topic.join(" "));
    request.target_word_count = words;
    request.language = language;
    Ok(request)
}

/// A job id, or `#n` for the n-th row of the visible list (1-based).
fn job_ref(raw: &str, view: &AppViewModel) -> Result<JobId, CommandError> {
    match raw.strip_prefix('#') {
        Some(index) => {
            let row: usize = index
                .parse()
                .map_err(|_| CommandError::Usage("select <job-id | #row>"))?;
            row.checked_sub(1)
                .and_then(|idx| view.jobs.get(idx))
                .map(|row| row.job_id.clone())
                .ok_or(CommandError::NoSuchRow(row))
        }
        None => Ok(JobId::from(raw)),
    }
}

/// Resume is only offered for jobs the dashboard knows to be failed.
fn resume(rest: &str, view: &AppViewModel) -> Result<Msg, CommandError> {
    if rest.is_empty() {
        let detail = view.current.as_ref().ok_or(CommandError::NoCurrentJob)?;
        return resume_intent(detail).ok_or_else(|| CommandError::NotResumable(detail.job_id.clone()));
    }

    let job_id = job_ref(rest, view)?;
    if let Some(detail) = view.current.as_ref().filter(|detail| detail.job_id == job_id) {
        return resume_intent(detail).ok_or(CommandError::NotResumable(job_id));
    }
    match view.jobs.iter().find(|row| row.job_id == job_id) {
        Some(row) if row.status.status == JobStatus::Failed => {
            Ok(Msg::ResumeRequested { job_id })
        }
        _ => Err(CommandError::NotResumable(job_id)),
    }
}
