// Copyright 2023 Remi Bernotavicius

use crate::Result;
use dialoguer::{Confirm, Input, Select};

/// Where interactive answers come from.
pub trait Prompter {
    /// Reads one line of text. Blank answers are only accepted when `allow_empty` is set.
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Returns the index of the chosen item.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;
}

pub struct Terminal;

impl Prompter for Terminal {
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()?)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }
}

/// Replays canned answers in order. Confirmations take "y"/"n", selections take an index.
#[cfg(test)]
pub struct Scripted {
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl Scripted {
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            answers: answers.into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt: &str) -> String {
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer left for {prompt:?}"))
    }
}

#[cfg(test)]
impl Prompter for Scripted {
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String> {
        let answer = self.next(prompt);
        assert!(
            allow_empty || !answer.trim().is_empty(),
            "blank answer for {prompt:?}"
        );
        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.next(prompt) == "y")
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        let index = self.next(prompt).parse().unwrap();
        assert!(index < items.len());
        Ok(index)
    }
}
