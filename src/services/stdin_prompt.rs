use std::io::{self, Write};

use async_trait::async_trait;

use crate::enums::response_handling::ResponseHandling;
use crate::structs::response_mode_choice::ResponseModeChoice;
use crate::structs::variable_note::VariableNote;
use crate::traits::prompt::{ResponseModePrompt, VariableNotePrompt};

/// Terminal prompts for the CLI. An empty answer or `q` cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl StdinPrompt {
    pub fn new() -> Self {
        Self
    }

    async fn ask(question: String) -> Option<String> {
        tokio::task::spawn_blocking(move || -> io::Result<String> {
            print!("{question}");
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            Ok(input)
        })
        .await
        .ok()?
        .ok()
    }

    /// 1-based menu answer to a 0-based index.
    pub fn parse_index(input: &str, count: usize) -> Option<usize> {
        let n = input.trim().parse::<usize>().ok()?;
        (1..=count).contains(&n).then(|| n - 1)
    }

    pub fn parse_yes(input: &str) -> bool {
        matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[async_trait]
impl VariableNotePrompt for StdinPrompt {
    async fn choose(&self, notes: Vec<VariableNote>) -> Option<VariableNote> {
        println!("\n🗂️  Select Variable Note");
        for (i, note) in notes.iter().enumerate() {
            println!("  {}. {} ({} variables)", i + 1, note.title, note.variables.len());
        }

        let answer = Self::ask(format!("\nSelect note (1-{}, q to cancel): ", notes.len())).await?;
        let index = Self::parse_index(&answer, notes.len())?;
        notes.into_iter().nth(index)
    }
}

#[async_trait]
impl ResponseModePrompt for StdinPrompt {
    async fn choose(&self) -> Option<ResponseModeChoice> {
        let choices = ResponseHandling::choices();

        println!("\n📥 How should the response be handled?");
        for (i, mode) in choices.iter().enumerate() {
            println!("  {}. {}", i + 1, mode.label());
        }

        let answer = Self::ask(format!("\nSelect option (1-{}): ", choices.len())).await?;
        let mode = choices[Self::parse_index(&answer, choices.len())?];

        let remember = Self::ask("Remember this choice? (y/N): ".to_string())
            .await
            .is_some_and(|answer| Self::parse_yes(&answer));

        Some(ResponseModeChoice { mode, remember })
    }
}
