#![doc = include_str!("../README.md")]

mod color;
mod prompt;

pub use color::{Color, install_color_eyre};
use inquire::{Password, Text, error::InquireResult};
pub use prompt::TerminalRolePrompt;

/// Prompt the user for input if the value is None
///
/// Typically used when the user can provide a value via CLI or prompt
pub fn text_prompt_when_none(prompt: &str, val: Option<String>) -> InquireResult<String> {
    Ok(if let Some(val) = val {
        val
    } else {
        Text::new(prompt).prompt()?
    })
}

/// Like [`text_prompt_when_none`], without echoing what is typed.
pub fn password_prompt_when_none(prompt: &str, val: Option<String>) -> InquireResult<String> {
    Ok(if let Some(val) = val {
        val
    } else {
        Password::new(prompt).without_confirmation().prompt()?
    })
}

/// Asks for a one-time passcode.
pub fn passcode_prompt() -> InquireResult<String> {
    Ok(Text::new("MFA Passcode").prompt()?.trim().to_string())
}
