use crate::error::ShellError;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: BTreeMap<String, Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: Option<String>,
    pub long: String,
    pub description: String,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Flag {
    fn switch(short: Option<&str>, long: &str, description: &str) -> Self {
        Flag {
            short: short.map(str::to_string),
            long: long.to_string(),
            description: description.to_string(),
            takes_value: false,
            value: None,
        }
    }

    fn option(short: Option<&str>, long: &str, description: &str) -> Self {
        Flag {
            takes_value: true,
            ..Self::switch(short, long, description)
        }
    }

    fn matches(&self, arg: &str) -> bool {
        arg == self.long || self.short.as_deref() == Some(arg)
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = BTreeMap::new();

        let definitions = [
            ("help", Flag::switch(Some("-h"), "--help", "Print this help message")),
            ("version", Flag::switch(Some("-v"), "--version", "Show version information")),
            ("config", Flag::option(Some("-c"), "--config", "Read settings from this rc file")),
            ("quiet", Flag::switch(Some("-q"), "--quiet", "Suppress error reports and notices")),
            ("debug", Flag::switch(Some("-d"), "--debug", "Enable debug logging")),
            ("prompt", Flag::option(Some("-p"), "--prompt", "Prompt string")),
            ("max-line", Flag::option(None, "--max-line", "Maximum input line length in bytes")),
            ("max-args", Flag::option(None, "--max-args", "Maximum number of arguments per line")),
            ("no-color", Flag::switch(None, "--no-color", "Disable coloured output")),
        ];
        for (name, flag) in definitions {
            flags.insert(name.to_string(), flag);
        }

        Flags { flags }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let flag = self
                .flags
                .values_mut()
                .find(|flag| flag.matches(arg))
                .ok_or_else(|| ShellError::FlagError(format!("Unknown flag {}", arg)))?;

            if flag.takes_value {
                let value = iter.next().ok_or_else(|| {
                    ShellError::FlagError(format!("Flag {} requires a value", arg))
                })?;
                flag.value = Some(value.clone());
            } else {
                flag.value = Some("true".to_string());
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    pub fn print_help(&self) {
        println!("Usage: dropsh [OPTIONS]");
        println!("\nOptions:");
        for flag in self.flags.values() {
            let short = flag
                .short
                .as_deref()
                .map(|s| format!("{},", s))
                .unwrap_or_default();
            let long = if flag.takes_value {
                format!("{} <value>", flag.long)
            } else {
                flag.long.clone()
            };
            println!("  {:<4}{:<20} {}", short, long, flag.description);
        }
    }
}
