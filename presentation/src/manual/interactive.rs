//! Interactive manual control for a running discussion.
//!
//! When the moderator suggests ending, and after every summary in
//! interactive mode, the user sees:
//!
//! ```text
//! 主持人建议结束，是否需要继续？
//!   <Enter>  continue automatically
//!   stop     end the discussion
//!   <name>   let this participant speak next
//! roundtable>
//! ```

use async_trait::async_trait;
use colored::Colorize;
use roundtable_application::ports::manual_control::{
    ManualControlError, ManualControlPort, ManualDecision,
};
use std::io::{self, BufRead, Write};

/// Terminal-based [`ManualControlPort`].
///
/// Reads one line from stdin on a blocking thread so the runtime keeps
/// driving spinners while the user types. End of input counts as `stop`.
pub struct InteractiveManualControl;

impl InteractiveManualControl {
    pub fn new() -> Self {
        Self
    }

    fn display_prompt(prompt: &str) -> Result<(), ManualControlError> {
        println!();
        println!("{}", prompt.yellow().bold());
        println!("  {}  continue automatically", "<Enter>".green());
        println!("  {}     end the discussion", "stop".red());
        println!("  {}   let this participant speak next", "<name>".cyan());
        print!("{} ", "roundtable>".magenta().bold());
        io::stdout()
            .flush()
            .map_err(|e| ManualControlError::IoError(format!("Failed to flush stdout: {}", e)))
    }

    fn read_decision(input: &mut impl BufRead) -> Result<ManualDecision, ManualControlError> {
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| ManualControlError::IoError(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Ok(ManualDecision::Stop);
        }
        Ok(ManualDecision::parse(&line))
    }
}

impl Default for InteractiveManualControl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManualControlPort for InteractiveManualControl {
    async fn request_decision(&self, prompt: &str) -> Result<ManualDecision, ManualControlError> {
        Self::display_prompt(prompt)?;

        let decision = tokio::task::spawn_blocking(|| Self::read_decision(&mut io::stdin().lock()))
            .await
            .map_err(|_| ManualControlError::Cancelled)??;

        match &decision {
            ManualDecision::Stop => println!("{}", "Stopping after this round.".red()),
            ManualDecision::Speaker(name) => println!("{} {}", "Next speaker:".green(), name),
            ManualDecision::Continue => {}
        }
        Ok(decision)
    }
}
