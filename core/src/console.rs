use std::collections::VecDeque;

use crate::constants::*;
use crate::types::modifier;

/// Rolling log shown in the in-game console. Every line is mirrored to the
/// `log` facade.
#[derive(Clone, Debug, Default)]
pub struct Console {
    lines: VecDeque<String>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{}", line);
        if self.lines.len() == CONSOLE_HISTORY {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

const CODE_FLY: &str = "29103";
const CODE_INFINITE_JUMP: &str = "84721";
const CODE_NO_CLIP: &str = "112233";

/// Digit buffer typed into the cheat panel. A modifier is on only while the
/// buffer exactly equals its code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheatCodes {
    buffer: String,
}

impl CheatCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append a digit (0..=9). Full buffers ignore further input.
    pub fn type_digit(&mut self, digit: u8) {
        if digit <= 9 && self.buffer.len() < CHEAT_BUFFER_LEN {
            self.buffer.push(char::from(b'0' + digit));
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn modifiers(&self) -> u8 {
        match self.buffer.as_str() {
            CODE_FLY => modifier::FLY,
            CODE_INFINITE_JUMP => modifier::INFINITE_JUMP,
            CODE_NO_CLIP => modifier::NO_CLIP,
            _ => 0,
        }
    }
}
