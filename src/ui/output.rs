use crate::api::models::{CommunityPost, Peptide};
use crate::app::search::PREVIEW_LIMIT;
use crate::app::status::SubmitState;
use console::style;
use std::io;

pub struct OutputHandler {
    debug: bool,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self { debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn print_banner(&mut self) -> io::Result<()> {
        println!("{}", style("╔═══════════════════════════════════════╗").cyan().bold());
        println!("{}", style("║      Suggest a Stack (moderated)      ║").cyan().bold());
        println!("{}", style("╚═══════════════════════════════════════╝").cyan().bold());
        println!(
            "{}",
            style("Share what you'd combine and why. No dosing or protocols.").dim()
        );
        Ok(())
    }

    pub fn print_error(&mut self, content: &str) -> io::Result<()> {
        println!("{} {}", style("Error:").red().bold(), content);
        Ok(())
    }

    pub fn print_system(&mut self, content: &str) -> io::Result<()> {
        println!("{}", style(content).yellow().dim());
        Ok(())
    }

    pub fn print_success(&mut self, content: &str) -> io::Result<()> {
        println!("{}", style(content).green().bold());
        Ok(())
    }

    pub fn print_debug(&mut self, content: &str) -> io::Result<()> {
        if self.debug {
            println!("{} {}", style("debug:").magenta(), style(content).dim());
        }
        Ok(())
    }

    /// Search results for `query`. With an empty query only the first slice
    /// of the catalog is shown, so say so.
    pub fn print_suggestions(&mut self, query: &str, suggestions: &[&Peptide]) -> io::Result<()> {
        if suggestions.is_empty() {
            self.print_system("No matches.")?;
            return Ok(());
        }

        for peptide in suggestions {
            println!(
                "  {} {}",
                style(&peptide.title).bold(),
                style(format!("({})", peptide.slug)).dim()
            );
        }

        if query.trim().is_empty() && suggestions.len() == PREVIEW_LIMIT {
            self.print_system("Showing the first compounds; type to narrow the list.")?;
        }
        Ok(())
    }

    pub fn print_selection(&mut self, selection: &[Peptide]) -> io::Result<()> {
        if selection.is_empty() {
            self.print_system("No compounds selected.")?;
            return Ok(());
        }

        println!("{}", style("Selected:").cyan().bold());
        for peptide in selection {
            println!("  • {}", peptide.label());
        }
        Ok(())
    }

    /// Framed block for the outcomes preview and the composed text.
    pub fn print_preview(&mut self, title: &str, body: &str) -> io::Result<()> {
        println!();
        println!("{}", style(format!("┌─ {} ", title)).dim());
        for line in body.lines() {
            println!("│ {}", line);
        }
        println!("{}", style("└───────────────────────────────────").dim());
        Ok(())
    }

    pub fn print_state(&mut self, state: &SubmitState) -> io::Result<()> {
        match state {
            SubmitState::Idle => Ok(()),
            SubmitState::Submitting => self.print_system("Submitting…"),
            SubmitState::Ok => self.print_success("Submitted for review. Thanks!"),
            SubmitState::Error(message) => self.print_error(message),
        }
    }

    pub fn print_posts(&mut self, posts: &[CommunityPost]) -> io::Result<()> {
        if posts.is_empty() {
            self.print_system("No approved notes yet.")?;
            return Ok(());
        }

        for post in posts {
            let when = post
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            println!("{} {}", style(&post.username).cyan().bold(), style(when).dim());
            for line in post.text.lines() {
                println!("  {}", line);
            }
            if self.debug {
                println!("  {}", style(format!("id: {}", post.id)).dim());
            }
        }
        Ok(())
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
