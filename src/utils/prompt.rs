//! Console prompting behind a trait, so the interactive flows can be
//! exercised in tests with scripted answers instead of a live console.

use crate::error::Result;

pub trait Prompter {
    /// Yes/no question with a default for plain Enter.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Free-text line; empty input is allowed.
    fn input(&self, prompt: &str) -> Result<String>;

    /// Final "press Enter to exit" pause.
    fn pause(&self, prompt: &str) -> Result<()>;
}

/// Live console implementation on `dialoguer`.
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Ok(dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn pause(&self, prompt: &str) -> Result<()> {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }
}

/// Present a numbered menu and read a 1-based selection. Empty input
/// cancels; anything else invalid re-prompts.
pub fn choose_index(prompter: &dyn Prompter, items: &[String]) -> Result<Option<usize>> {
    for (i, item) in items.iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }

    loop {
        let line = prompter.input("Selection (empty cancels)")?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(n) if n >= 1 && n <= items.len() => return Ok(Some(n - 1)),
            _ => println!("Invalid selection, try again."),
        }
    }
}

/// Like [`choose_index`] but without a cancel path: re-prompts until a
/// valid selection is made.
pub fn choose_required(prompter: &dyn Prompter, items: &[String]) -> Result<usize> {
    for (i, item) in items.iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }

    loop {
        let line = prompter.input("Selection")?;
        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= items.len() => return Ok(n - 1),
            _ => println!("Invalid selection, try again."),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays prepared answers; confirms consume from the same queue as
    /// inputs ("y"/"n", empty means the default).
    pub struct ScriptedPrompter {
        answers: RefCell<VecDeque<String>>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(|s| s.to_string()).collect()),
            }
        }

        fn next(&self) -> String {
            self.answers.borrow_mut().pop_front().unwrap_or_default()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
            let answer = self.next();
            Ok(match answer.trim().to_lowercase().as_str() {
                "" => default,
                "y" | "yes" => true,
                _ => false,
            })
        }

        fn input(&self, _prompt: &str) -> Result<String> {
            Ok(self.next())
        }

        fn pause(&self, _prompt: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_choose_index_empty_input_cancels() {
        let prompter = ScriptedPrompter::new(&[""]);
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(choose_index(&prompter, &items).unwrap(), None);
    }

    #[test]
    fn test_choose_index_reprompts_on_invalid_input() {
        let prompter = ScriptedPrompter::new(&["zero", "9", "2"]);
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(choose_index(&prompter, &items).unwrap(), Some(1));
    }

    #[test]
    fn test_choose_required_reprompts_on_empty() {
        let prompter = ScriptedPrompter::new(&["", "1"]);
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(choose_required(&prompter, &items).unwrap(), 0);
    }

    #[test]
    fn test_scripted_confirm_defaults_on_empty() {
        let prompter = ScriptedPrompter::new(&["", "n"]);
        assert!(prompter.confirm("q", true).unwrap());
        assert!(!prompter.confirm("q", true).unwrap());
    }
}
