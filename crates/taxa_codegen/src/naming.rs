//! Identifier naming for generated code.

use regex::Regex;

use crate::error::CodegenResult;

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Turns event keys into safe camelCase identifiers.
pub struct KeyNormalizer {
    leading_digits: Regex,
    separators: Regex,
}

impl KeyNormalizer {
    pub fn new() -> CodegenResult<Self> {
        Ok(Self {
            leading_digits: Regex::new(r"^\d+")?,
            separators: Regex::new(r"[^a-zA-Z0-9]+")?,
        })
    }

    /// `page_view` → `pageView`, `3d-render!` → `threeDRender`.
    ///
    /// Leading digits are spelled out, one word per digit, so the result
    /// never starts with a number.
    pub fn normalize(&self, key: &str) -> String {
        let spelled = self.leading_digits.replace(key, |caps: &regex::Captures| {
            let words: Vec<&str> = caps[0]
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| DIGIT_WORDS[d as usize])
                .collect();
            format!("{} ", words.join(" "))
        });

        self.separators
            .split(&spelled)
            .filter(|word| !word.is_empty())
            .enumerate()
            .map(|(index, word)| {
                if index == 0 {
                    word.to_lowercase()
                } else {
                    capitalize(word)
                }
            })
            .collect()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
