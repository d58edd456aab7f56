use crate::config::SearchKind;
use clap::{ArgGroup, Parser};

/// `BASHō` - Linux terminal assistant.
#[derive(Parser, Debug)]
#[command(name = "basho")]
#[command(version)]
#[command(about = "Ask Linux questions, search the web, or chat from your terminal.", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(group(
    ArgGroup::new("mode")
        .args(["question", "text", "video", "news", "chat", "list", "select_model"])
        .required(true)
        .multiple(false)
))]
pub struct Cli {
    /// Question answered in one short reply
    #[arg(value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Web search
    #[arg(short = 't', long = "text", value_name = "QUERY", num_args = 1..)]
    pub text: Option<Vec<String>>,

    /// Video search
    #[arg(short = 'v', long = "video", value_name = "QUERY", num_args = 1..)]
    pub video: Option<Vec<String>>,

    /// News search
    #[arg(short = 'n', long = "news", value_name = "QUERY", num_args = 1..)]
    pub news: Option<Vec<String>>,

    /// Interactive chat; pass N to resume stored session N
    #[arg(short = 'c', long = "chat", value_name = "N", num_args = 0..=1)]
    pub chat: Option<Option<usize>>,

    /// List stored sessions
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Choose a different model
    #[arg(long)]
    pub select_model: bool,

    /// Debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Ask(String),
    Search { kind: SearchKind, query: String },
    Chat { resume: Option<usize> },
    List,
    SelectModel,
}

impl Cli {
    pub fn mode(&self) -> Option<Mode> {
        let searches = [
            (SearchKind::Text, &self.text),
            (SearchKind::Video, &self.video),
            (SearchKind::News, &self.news),
        ];
        if let Some((kind, words)) = searches
            .into_iter()
            .find_map(|(kind, words)| words.as_ref().map(|words| (kind, words)))
        {
            return Some(Mode::Search {
                kind,
                query: words.join(" "),
            });
        }

        if let Some(resume) = self.chat {
            return Some(Mode::Chat { resume });
        }
        if self.list {
            return Some(Mode::List);
        }
        if self.select_model {
            return Some(Mode::SelectModel);
        }
        if self.question.is_empty() {
            return None;
        }
        Some(Mode::Ask(self.question.join(" ")))
    }
}
