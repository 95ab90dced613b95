use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use stack_suggest::api::client::{UgcBackend, UgcClient};
use stack_suggest::api::models::EntityType;
use stack_suggest::app::form::StackSuggestionForm;
use stack_suggest::app::notes::CommunityNotes;
use stack_suggest::app::status::SubmitState;
use stack_suggest::ui::output::OutputHandler;
use stack_suggest::ui::session::Session;
use stack_suggest::utils::config::Config;
use stack_suggest::utils::logger;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stack-suggest")]
#[command(about = "Suggest peptide stacks and community notes for moderator review", long_about = None)]
struct Cli {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Site origin to talk to (overrides config and STACK_SUGGEST_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Context slug stack suggestions are filed under
    #[arg(long, global = true)]
    slug: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List compounds, optionally filtered
    Peptides {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print the text a suggestion would be submitted with
    Draft(StackArgs),
    /// Submit a stack suggestion
    Submit(StackArgs),
    /// Community notes on a compound, blend or stack page
    #[command(subcommand)]
    Notes(NotesCommand),
    /// Fill in a suggestion interactively (default)
    Interactive,
}

#[derive(Args)]
struct StackArgs {
    #[arg(long, default_value = "")]
    username: String,
    /// Stack name
    #[arg(long, default_value = "")]
    name: String,
    /// Compound slug; repeat for each compound
    #[arg(long = "peptide")]
    peptides: Vec<String>,
    #[arg(long, default_value = "")]
    description: String,
    /// Append the expected-outcomes draft
    #[arg(long)]
    outcomes: bool,
    /// Acknowledge the no-dosing rule
    #[arg(long)]
    ack_no_dosing: bool,
}

#[derive(Subcommand)]
enum NotesCommand {
    /// Show approved notes
    List {
        #[arg(long = "type", value_parser = parse_entity_type)]
        entity_type: EntityType,
        #[arg(long)]
        slug: String,
    },
    /// Submit a note for review
    Submit {
        #[arg(long = "type", value_parser = parse_entity_type)]
        entity_type: EntityType,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long)]
        ack_no_dosing: bool,
    },
}

fn parse_entity_type(s: &str) -> Result<EntityType, String> {
    s.parse::<EntityType>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default();
    config.apply_env_overrides();
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.trim().to_string();
    }
    if let Some(slug) = &cli.slug {
        config.ugc_slug = slug.trim().to_string();
    }
    config.validate()?;

    let log_path = logger::init_global_logger(&config.log_level, cli.debug)?;

    let mut output = OutputHandler::new().with_debug(cli.debug);
    if cli.verbose {
        output.print_system(&format!("Endpoint: {}", config.endpoint))?;
        output.print_system(&format!("Log file: {}", log_path.display()))?;
    }

    let client = UgcClient::from_config(&config).context("building HTTP client")?;
    let backend: Arc<dyn UgcBackend> = Arc::new(client);

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Peptides { query } => {
            let mut form = StackSuggestionForm::mount(backend, &config.ugc_slug);
            form.wait_for_catalog().await;
            form.set_query(query.clone());
            let suggestions = form.suggestions();
            output.print_suggestions(&query, &suggestions)?;
        }
        Command::Draft(args) => {
            let form = fill_form(backend, &config.ugc_slug, args, &mut output).await?;
            if let Some(draft) = form.outcomes_preview() {
                output.print_preview("Expected outcomes", &draft)?;
            }
            output.print_preview("Submission text", &form.submission_text())?;
        }
        Command::Submit(args) => {
            let mut form = fill_form(backend, &config.ugc_slug, args, &mut output).await?;
            let state = form.submit().await;
            output.print_state(&state)?;
            return Ok(exit_code(&state));
        }
        Command::Notes(NotesCommand::List { entity_type, slug }) => {
            let mut notes = CommunityNotes::mount(backend, entity_type, slug);
            let posts = notes.wait_for_posts().await;
            output.print_posts(posts)?;
        }
        Command::Notes(NotesCommand::Submit {
            entity_type,
            slug,
            username,
            text,
            ack_no_dosing,
        }) => {
            let mut notes = CommunityNotes::mount(backend, entity_type, slug);
            notes.set_username(username);
            notes.set_text(text);
            notes.set_acknowledged(ack_no_dosing);
            let state = notes.submit().await;
            output.print_state(&state)?;
            return Ok(exit_code(&state));
        }
        Command::Interactive => {
            let form = StackSuggestionForm::mount(backend, &config.ugc_slug);
            Session::new(form, output).run().await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(state: &SubmitState) -> ExitCode {
    match state {
        SubmitState::Error(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

async fn fill_form(
    backend: Arc<dyn UgcBackend>,
    ugc_slug: &str,
    args: StackArgs,
    output: &mut OutputHandler,
) -> Result<StackSuggestionForm> {
    let mut form = StackSuggestionForm::mount(backend, ugc_slug);
    let loaded = form.wait_for_catalog().await;
    output.print_debug(&format!("{} compounds loaded", loaded))?;

    for slug in &args.peptides {
        if form.draft().selection.contains(slug) {
            continue;
        }
        if !form.select_slug(slug) {
            bail!("unknown compound '{}'", slug);
        }
    }

    form.set_username(args.username);
    form.set_stack_name(args.name);
    form.set_description(args.description);
    form.set_include_outcomes(args.outcomes);
    form.set_acknowledged(args.ack_no_dosing);
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_follows_submit_state() {
        assert_eq!(exit_code(&SubmitState::Ok), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(&SubmitState::Error("Username is required.".to_string())),
            ExitCode::FAILURE
        );
    }
}
