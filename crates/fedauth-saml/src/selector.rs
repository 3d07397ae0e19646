use tracing::{info, warn};

use crate::{RoleEntry, RoleSelectionError};

/// Interactive capability used to choose between several roles.
///
/// Implementations display the listing and return whatever the user typed. Validation is done
/// by [`select_role`], which keeps asking until it gets a usable answer.
pub trait RolePrompt {
    /// Shows the 1-indexed `listing` and returns the raw response.
    fn ask(&mut self, listing: &[String]) -> Result<String, RoleSelectionError>;

    /// Called with a response that was not a valid selection, before asking again.
    fn rejected(&mut self, _response: &str) {}
}

/// Picks the role to assume.
///
/// A single entry is returned as is, without prompting. With several entries the prompt is
/// asked for a 1-based index until it answers with one that is in range.
pub fn select_role<'a, P>(
    entries: &'a [RoleEntry],
    prompt: &mut P,
) -> Result<&'a RoleEntry, RoleSelectionError>
where
    P: RolePrompt + ?Sized,
{
    match entries {
        [] => Err(RoleSelectionError::NoRoles),
        [only] => Ok(only),
        _ => {
            info!("More than one role available, please select one");
            let listing: Vec<String> = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("[{}] Role: {}", i + 1, entry.role_arn))
                .collect();

            loop {
                let response = prompt.ask(&listing)?;
                match parse_selection(&response, entries.len()) {
                    Some(index) => return Ok(&entries[index]),
                    None => {
                        warn!(response = response.trim(), "Invalid role selection");
                        prompt.rejected(&response);
                    }
                }
            }
        }
    }
}

/// Zero-based index for a 1-based `response`, if it is a number within `1..=count`.
fn parse_selection(response: &str, count: usize) -> Option<usize> {
    let choice = response.trim().parse::<usize>().ok()?;
    (1..=count).contains(&choice).then(|| choice - 1)
}
