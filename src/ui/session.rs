//! Line-oriented front end for the stack suggestion form.

use crate::api::models::Peptide;
use crate::app::form::StackSuggestionForm;
use crate::app::search::filter_catalog;
use crate::app::status::SubmitState;
use crate::ui::output::OutputHandler;
use anyhow::Result;
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    User(String),
    Name(String),
    Search(String),
    Add(String),
    Remove(String),
    Desc(String),
    Outcomes(bool),
    Ack(bool),
    Preview,
    Show,
    Submit,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "user" => SessionCommand::User(rest.to_string()),
            "name" => SessionCommand::Name(rest.to_string()),
            "search" | "s" => SessionCommand::Search(rest.to_string()),
            "add" => SessionCommand::Add(required(rest, "add <slug or search text>")?),
            "remove" | "rm" => SessionCommand::Remove(required(rest, "remove <slug>")?),
            "desc" => SessionCommand::Desc(rest.to_string()),
            "outcomes" => match rest {
                "on" => SessionCommand::Outcomes(true),
                "off" => SessionCommand::Outcomes(false),
                _ => return Err("usage: outcomes on|off".to_string()),
            },
            "ack" => match rest {
                "" | "on" => SessionCommand::Ack(true),
                "off" => SessionCommand::Ack(false),
                _ => return Err("usage: ack [off]".to_string()),
            },
            "preview" => SessionCommand::Preview,
            "show" => SessionCommand::Show,
            "submit" => SessionCommand::Submit,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(arg.to_string())
    }
}

const HELP: &str = "\
user <name>          set your username
name <stack name>    set the stack name
search [text]        search compounds by title or slug
add <slug|text>      add a compound (text must match exactly one)
remove <slug>        remove a selected compound
desc <text>          set the description
outcomes on|off      include the expected-outcomes draft
ack [off]            acknowledge the no-dosing rule
preview              show the expected-outcomes draft
show                 show the draft and the text that would be sent
submit               send the suggestion for review
quit                 leave";

pub struct Session {
    form: StackSuggestionForm,
    output: OutputHandler,
}

impl Session {
    pub fn new(form: StackSuggestionForm, output: OutputHandler) -> Self {
        Self { form, output }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut editor = Reedline::create();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("stack".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.output.print_banner()?;
        self.output.print_system("Type 'help' for commands.")?;

        loop {
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt))?;
            let line = match signal {
                Signal::Success(line) => line,
                Signal::CtrlC => continue,
                Signal::CtrlD => break,
                #[allow(unreachable_patterns)]
                _ => break,
            };
            if line.trim().is_empty() {
                continue;
            }

            match SessionCommand::parse(&line) {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.handle(command).await?,
                Err(message) => self.output.print_error(&message)?,
            }
        }
        Ok(())
    }

    async fn handle(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::User(name) => self.form.set_username(name),
            SessionCommand::Name(name) => self.form.set_stack_name(name),
            SessionCommand::Desc(text) => self.form.set_description(text),
            SessionCommand::Outcomes(on) => self.form.set_include_outcomes(on),
            SessionCommand::Ack(on) => self.form.set_acknowledged(on),
            SessionCommand::Search(query) => {
                if self.form.is_loading() {
                    self.output.print_system("Loading compounds…")?;
                }
                self.form.set_query(query.clone());
                let suggestions = self.form.suggestions();
                self.output.print_suggestions(&query, &suggestions)?;
            }
            SessionCommand::Add(arg) => self.add(&arg)?,
            SessionCommand::Remove(slug) => {
                if !self.form.remove(&slug) {
                    self.output.print_error(&format!("'{}' is not selected.", slug))?;
                }
                self.output.print_selection(self.form.draft().selection.as_slice())?;
            }
            SessionCommand::Preview => match self.form.outcomes_preview() {
                Some(draft) => self.output.print_preview("Expected outcomes", &draft)?,
                None => self.output.print_system("Outcomes draft is off ('outcomes on').")?,
            },
            SessionCommand::Show => self.show()?,
            SessionCommand::Submit => {
                if !self.form.can_submit() {
                    self.output.print_system("A submission is already in flight.")?;
                    return Ok(());
                }
                self.output.print_state(&SubmitState::Submitting)?;
                let state = self.form.submit().await;
                self.output.print_state(&state)?;
            }
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn add(&mut self, arg: &str) -> Result<()> {
        if self.form.draft().selection.contains(arg.trim()) {
            self.output.print_system("Already selected.")?;
            return Ok(());
        }

        if !self.form.select_slug(arg) {
            let matches: Vec<Peptide> = filter_catalog(self.form.catalog(), arg)
                .into_iter()
                .cloned()
                .collect();
            match matches.as_slice() {
                [only] => {
                    if !self.form.select(only.clone()) {
                        self.output.print_system("Already selected.")?;
                    }
                }
                [] => self.output.print_error(&format!("No compound matches '{}'.", arg))?,
                many => {
                    self.output.print_error("More than one compound matches:")?;
                    let refs: Vec<&Peptide> = many.iter().collect();
                    self.output.print_suggestions(arg, &refs)?;
                }
            }
        }

        self.output.print_selection(self.form.draft().selection.as_slice())?;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let draft = self.form.draft();
        self.output.print_system(&format!(
            "user: {} | ack: {} | outcomes: {}",
            if draft.username.is_empty() { "-" } else { &draft.username },
            if draft.acknowledged_no_dosing { "yes" } else { "no" },
            if draft.include_outcomes { "on" } else { "off" },
        ))?;
        self.output.print_preview("Submission text", &self.form.submission_text())?;
        self.output.print_state(&self.form.state())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_commands() {
        assert_eq!(
            SessionCommand::parse("name  Recovery Combo "),
            Ok(SessionCommand::Name("Recovery Combo".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("desc trying to support joint recovery and sleep"),
            Ok(SessionCommand::Desc(
                "trying to support joint recovery and sleep".to_string()
            ))
        );
        assert_eq!(SessionCommand::parse("user"), Ok(SessionCommand::User(String::new())));
    }

    #[test]
    fn test_parse_toggles() {
        assert_eq!(SessionCommand::parse("outcomes on"), Ok(SessionCommand::Outcomes(true)));
        assert_eq!(SessionCommand::parse("OUTCOMES off"), Ok(SessionCommand::Outcomes(false)));
        assert_eq!(SessionCommand::parse("ack"), Ok(SessionCommand::Ack(true)));
        assert_eq!(SessionCommand::parse("ack off"), Ok(SessionCommand::Ack(false)));
        assert!(SessionCommand::parse("outcomes maybe").is_err());
    }

    #[test]
    fn test_add_and_remove_need_an_argument() {
        assert_eq!(
            SessionCommand::parse("add"),
            Err("usage: add <slug or search text>".to_string())
        );
        assert!(SessionCommand::parse("rm").is_err());
        assert_eq!(
            SessionCommand::parse("add bpc-157"),
            Ok(SessionCommand::Add("bpc-157".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            SessionCommand::parse("dose 5mg"),
            Err("unknown command 'dose', try 'help'".to_string())
        );
        assert_eq!(SessionCommand::parse("q"), Ok(SessionCommand::Quit));
    }
}
