//! Terminal prompter backed by `dialoguer`.
//!
//! Every answer is validated before it is accepted, so the core only ever sees
//! non-empty required strings, well-formed dates and decodable lists.

use article_sync_core::contract::Prompter;
use article_sync_core::{document, list_codec, SyncError};
use chrono::{DateTime, Utc};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

/// Prompt labels that are read without echo.
const SECRET_PROMPTS: &[&str] = &["password"];

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask_secret(&self, prompt: &str, default: &str, required: bool) -> Result<String, SyncError> {
        let answer = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(!required || !default.is_empty())
            .interact()
            .map_err(input_error)?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn ask_string(&self, prompt: &str, default: &str, required: bool) -> Result<String, SyncError> {
        if is_secret(prompt) {
            return self.ask_secret(prompt, default, required);
        }

        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(!required);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let answer = input
            .validate_with(move |answer: &String| -> Result<(), &'static str> {
                if required && answer.trim().is_empty() {
                    Err("a value is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(input_error)?;
        Ok(answer.trim().to_string())
    }

    fn ask_date(&self, prompt: &str, default: DateTime<Utc>) -> Result<DateTime<Utc>, SyncError> {
        let shown = document::format_date(&default);
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("{prompt} (MM/DD/YYYY)"))
            .default(shown)
            .validate_with(move |answer: &String| -> Result<(), &'static str> {
                date_answer(answer, default)
                    .map(|_| ())
                    .ok_or("expected a date like 01/31/2024")
            })
            .interact_text()
            .map_err(input_error)?;
        date_answer(&answer, default)
            .ok_or_else(|| SyncError::Input(format!("invalid date: {answer}")))
    }

    fn ask_csv(&self, prompt: &str, default: &[String]) -> Result<Vec<String>, SyncError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        let shown = list_codec::encode(default);
        if !shown.is_empty() {
            input = input.default(shown);
        }
        let answer = input
            .validate_with(|answer: &String| -> Result<(), String> {
                csv_answer(answer).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(input_error)?;
        csv_answer(&answer).map_err(|e| SyncError::Input(e.to_string()))
    }
}

fn is_secret(prompt: &str) -> bool {
    SECRET_PROMPTS
        .iter()
        .any(|secret| prompt.trim().eq_ignore_ascii_case(secret))
}

fn input_error(err: dialoguer::Error) -> SyncError {
    SyncError::Input(err.to_string())
}

/// Parses a date answer. Accepting the offered default keeps its time of day.
pub fn date_answer(answer: &str, default: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let answer = answer.trim();
    if answer.is_empty() || answer == document::format_date(&default) {
        return Some(default);
    }
    document::parse_date(answer)
}

/// Decodes a comma-separated answer, dropping empty items.
pub fn csv_answer(answer: &str) -> Result<Vec<String>, list_codec::ListDecodeError> {
    Ok(list_codec::decode(answer)?
        .into_iter()
        .filter(|item| !item.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn csv_answer_drops_stray_separators() {
        assert_eq!(csv_answer("rust, ,cli,").unwrap(), vec!["rust", "cli"]);
        assert!(csv_answer("   ").unwrap().is_empty());
        assert!(csv_answer("a\0b").is_err());
    }

    #[test]
    fn accepting_the_default_date_keeps_its_time() {
        let default = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 0).unwrap();
        assert_eq!(date_answer("03/09/2024", default), Some(default));
        assert_eq!(date_answer("", default), Some(default));
    }

    #[test]
    fn a_new_date_is_midnight_utc() {
        let default = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 0).unwrap();
        assert_eq!(
            date_answer("12/25/2023", default),
            Some(Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap())
        );
        assert_eq!(date_answer("2023-12-25", default), None);
    }

    #[test]
    fn password_prompts_are_secret() {
        assert!(is_secret("Password"));
        assert!(is_secret("password "));
        assert!(!is_secret("Username"));
    }
}
