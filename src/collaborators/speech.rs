use std::cell::RefCell;
use std::process::{Command, Stdio};

use crate::debug;
use crate::error::{invalid, Error, Result};
use crate::utils::first_available;

const SPEECH_COMMANDS: [&str; 3] = ["espeak-ng", "espeak", "say"];

/// Base words per minute used by espeak and say at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    /// 0.5 to 2.0
    pub rate: f32,
    /// 0.5 to 2.0
    pub pitch: f32,
    /// 0.0 to 1.0
    pub volume: f32,
    pub voice: Option<String>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice: None,
        }
    }
}

impl SpeechOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.5..=2.0).contains(&self.rate) {
            return Err(invalid(format!("rate must be between 0.5 and 2, got {}", self.rate)));
        }
        if !(0.5..=2.0).contains(&self.pitch) {
            return Err(invalid(format!("pitch must be between 0.5 and 2, got {}", self.pitch)));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(invalid(format!("volume must be between 0 and 1, got {}", self.volume)));
        }
        Ok(())
    }
}

pub trait SpeechSynthesizer {
    fn speak(&self, text: &str, options: &SpeechOptions) -> Result<()>;

    fn voices(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fn check_request(text: &str, options: &SpeechOptions) -> Result<()> {
    if text.trim().is_empty() {
        return Err(invalid("please enter some text to speak"));
    }
    options.validate()
}

/// Speaks through espeak-ng, espeak or the macOS `say` command
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: Option<&'static str>,
}

impl CommandSynthesizer {
    pub fn detect() -> Self {
        let program = first_available(&SPEECH_COMMANDS);
        debug!("Speech command: {:?}", program);
        Self { program }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }

    /// Builds the arguments for the given program
    pub fn arguments(program: &str, text: &str, options: &SpeechOptions) -> Vec<String> {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * options.rate).round() as u32;
        let mut args = Vec::new();
        if program == "say" {
            args.push("-r".to_string());
            args.push(words_per_minute.to_string());
            if let Some(voice) = &options.voice {
                args.push("-v".to_string());
                args.push(voice.clone());
            }
        } else {
            args.push("-s".to_string());
            args.push(words_per_minute.to_string());
            args.push("-p".to_string());
            args.push(((50.0 * options.pitch).round() as u32).min(99).to_string());
            args.push("-a".to_string());
            args.push(((100.0 * options.volume).round() as u32).to_string());
            if let Some(voice) = &options.voice {
                args.push("-v".to_string());
                args.push(voice.clone());
            }
        }
        args.push(text.to_string());
        args
    }

    fn program(&self) -> Result<&'static str> {
        self.program.ok_or_else(|| {
            Error::CommandError("no speech synthesizer found (espeak-ng, espeak or say)".to_string())
        })
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, text: &str, options: &SpeechOptions) -> Result<()> {
        check_request(text, options)?;
        let program = self.program()?;
        let status = Command::new(program)
            .args(Self::arguments(program, text, options))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::CommandError(format!("{}: {}", program, e)))?;
        if !status.success() {
            return Err(Error::CommandError(format!("{} exited with {}", program, status)));
        }
        Ok(())
    }

    fn voices(&self) -> Result<Vec<String>> {
        let program = self.program()?;
        let list_args: &[&str] = if program == "say" { &["-v", "?"] } else { &["--voices"] };
        let output = Command::new(program)
            .args(list_args)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| Error::CommandError(format!("{}: {}", program, e)))?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_voices(program, &listing))
    }
}

/// Extracts voice names from the listing printed by the speech program
fn parse_voices(program: &str, listing: &str) -> Vec<String> {
    if program == "say" {
        // "Alex                en_US    # Most people recognize me by my voice."
        listing
            .lines()
            .filter_map(|line| line.split("  ").next())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    } else {
        // "Pty Language       Age/Gender VoiceName          File                 Other Languages"
        listing
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(3))
            .map(str::to_string)
            .collect()
    }
}

/// Records what would have been spoken
#[derive(Debug, Default)]
pub struct NullSynthesizer {
    spoken: RefCell<Vec<String>>,
}

impl NullSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }
}

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&self, text: &str, options: &SpeechOptions) -> Result<()> {
        check_request(text, options)?;
        self.spoken.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_espeak_arguments() {
        let options = SpeechOptions {
            rate: 2.0,
            pitch: 0.5,
            volume: 0.5,
            voice: Some("en-us".to_string()),
        };
        assert_eq!(
            CommandSynthesizer::arguments("espeak", "hi", &options),
            vec!["-s", "350", "-p", "25", "-a", "50", "-v", "en-us", "hi"]
        );
    }

    #[test]
    fn test_say_arguments() {
        let args = CommandSynthesizer::arguments("say", "hello", &SpeechOptions::default());
        assert_eq!(args, vec!["-r", "175", "hello"]);
    }

    #[test]
    fn test_options_validation() {
        let synthesizer = NullSynthesizer::new();
        let fast = SpeechOptions {
            rate: 3.0,
            ..SpeechOptions::default()
        };
        assert!(synthesizer.speak("text", &fast).is_err());
        assert!(synthesizer.speak("   ", &SpeechOptions::default()).is_err());
        synthesizer.speak("Hello there", &SpeechOptions::default()).unwrap();
        assert_eq!(synthesizer.spoken(), vec!["Hello there".to_string()]);
    }

    #[test]
    fn test_parse_voices() {
        let espeak = "Pty Language       Age/Gender VoiceName          File          Other Languages\n \
                      5  af              --/M      Afrikaans          gmw/af\n \
                      5  en-us           --/M      English_(America)  gmw/en-US\n";
        assert_eq!(parse_voices("espeak", espeak), vec!["Afrikaans", "English_(America)"]);

        let say = "Alex                en_US    # Most people recognize me by my voice.\nDaniel              en_GB    # Hello\n";
        assert_eq!(parse_voices("say", say), vec!["Alex", "Daniel"]);
    }
}
