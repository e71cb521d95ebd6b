//! Text command parser.
//!
//! # Responsibility
//! - Turn one input line into a `Command` (or a help request).
//! - Validate every field value before a command reaches the core.
//!
//! # Invariants
//! - Prefixes are only recognized at the start of the arguments or after
//!   whitespace, so `a/` inside an email never splits a value.
//! - Indexes are one-based positive integers.

use socket_core::{
    Address, Command, EditPersonDescriptor, Email, FieldValidationError, FindKeywords, Language,
    Name, PersonDraft, PersonPredicate, Phone, Profile, Removal, RemovePersonDescriptor, Tag,
    Target,
};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREFIX_NAME: &str = "n/";
const PREFIX_PROFILE: &str = "g/";
const PREFIX_PHONE: &str = "p/";
const PREFIX_EMAIL: &str = "e/";
const PREFIX_ADDRESS: &str = "a/";
const PREFIX_LANGUAGE: &str = "l/";
const PREFIX_TAG: &str = "t/";

const ALL_PREFIXES: [&str; 7] = [
    PREFIX_NAME,
    PREFIX_PROFILE,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_LANGUAGE,
    PREFIX_TAG,
];
const REMOVABLE_PREFIXES: [&str; 5] = [
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_LANGUAGE,
    PREFIX_TAG,
];

pub const ADD_USAGE: &str =
    "add n/NAME g/PROFILE [p/PHONE] [e/EMAIL] [a/ADDRESS] [l/LANGUAGE]... [t/TAG]...";
pub const EDIT_USAGE: &str =
    "edit INDEX [n/NAME] [g/PROFILE] [p/PHONE] [e/EMAIL] [a/ADDRESS] [l/LANGUAGE]... [t/TAG]...";
pub const REMOVE_USAGE: &str =
    "remove INDEX [p/[PHONE]] [e/[EMAIL]] [a/[ADDRESS]] [l/[LANGUAGE]]... [t/[TAG]]...";
pub const DELETE_USAGE: &str = "delete INDEX";
pub const FIND_USAGE: &str =
    "find [n/KEYWORDS] [g/KEYWORDS] [p/KEYWORDS] [e/KEYWORDS] [a/KEYWORDS] [l/KEYWORDS] [t/KEYWORDS]";

/// What the REPL should do with a parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Run(Command),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(String),
    InvalidFormat { usage: &'static str },
    InvalidIndex(String),
    RepeatedPrefix(&'static str),
    UnexpectedPrefix(&'static str),
    Field(FieldValidationError),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(word) => write!(f, "Unknown command: {word}"),
            Self::InvalidFormat { usage } => write!(f, "Invalid command format!\n{usage}"),
            Self::InvalidIndex(raw) => {
                write!(f, "Index is not a non-zero unsigned integer: `{raw}`")
            }
            Self::RepeatedPrefix(prefix) => write!(
                f,
                "Multiple values specified for the following single-valued field(s): {prefix}"
            ),
            Self::UnexpectedPrefix(prefix) => {
                write!(f, "Prefix {prefix} is not accepted by this command")
            }
            Self::Field(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldValidationError> for ParseError {
    fn from(value: FieldValidationError) -> Self {
        Self::Field(value)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses one input line.
pub fn parse_line(line: &str) -> ParseResult<Input> {
    let line = line.trim();
    let (word, args) = match line.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (line, ""),
    };

    let command = match word {
        "add" => parse_add(args)?,
        "edit" => parse_edit(args)?,
        "remove" => parse_remove(args)?,
        "delete" => parse_delete(args)?,
        "find" => parse_find(args)?,
        "list" => Command::List,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "clear" => Command::Clear,
        "exit" => Command::Exit,
        "help" => return Ok(Input::Help),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Input::Run(command))
}

fn parse_add(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    let usage = ADD_USAGE;
    if !map.preamble.is_empty() {
        return Err(ParseError::InvalidFormat { usage });
    }
    let (Some(name), Some(profile)) = (map.single(PREFIX_NAME)?, map.single(PREFIX_PROFILE)?)
    else {
        return Err(ParseError::InvalidFormat { usage });
    };

    let draft = PersonDraft {
        phone: map.single(PREFIX_PHONE)?.map(str::to_string),
        email: map.single(PREFIX_EMAIL)?.map(str::to_string),
        address: map.single(PREFIX_ADDRESS)?.map(str::to_string),
        languages: map.all(PREFIX_LANGUAGE).map(str::to_string).collect(),
        tags: map.all(PREFIX_TAG).map(str::to_string).collect(),
        ..PersonDraft::new(name, profile)
    };
    Ok(Command::Add(draft.build()?))
}

fn parse_edit(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    let target = parse_index(map.preamble, EDIT_USAGE)?;

    let descriptor = EditPersonDescriptor {
        name: map.single(PREFIX_NAME)?.map(Name::parse).transpose()?,
        profile: map.single(PREFIX_PROFILE)?.map(Profile::parse).transpose()?,
        phone: map.single(PREFIX_PHONE)?.map(Phone::parse).transpose()?,
        email: map.single(PREFIX_EMAIL)?.map(Email::parse).transpose()?,
        address: map.single(PREFIX_ADDRESS)?.map(Address::parse).transpose()?,
        languages: replacement_set(&map, PREFIX_LANGUAGE, |raw| Language::parse(raw))?,
        tags: replacement_set(&map, PREFIX_TAG, |raw| Tag::parse(raw))?,
    };
    Ok(Command::Edit { target, descriptor })
}

fn parse_remove(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    let target = parse_index(map.preamble, REMOVE_USAGE)?;
    map.only(&REMOVABLE_PREFIXES)?;

    let descriptor = RemovePersonDescriptor {
        phone: removal_single(&map, PREFIX_PHONE, |raw| Phone::parse(raw))?,
        email: removal_single(&map, PREFIX_EMAIL, |raw| Email::parse(raw))?,
        address: removal_single(&map, PREFIX_ADDRESS, |raw| Address::parse(raw))?,
        languages: removal_set(&map, PREFIX_LANGUAGE, |raw| Language::parse(raw))?,
        tags: removal_set(&map, PREFIX_TAG, |raw| Tag::parse(raw))?,
    };
    Ok(Command::RemoveFields { target, descriptor })
}

fn parse_delete(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    map.only(&[])?;
    Ok(Command::Remove(parse_index(map.preamble, DELETE_USAGE)?))
}

fn parse_find(args: &str) -> ParseResult<Command> {
    let map = ArgumentMap::tokenize(args);
    if !map.preamble.is_empty() {
        return Err(ParseError::InvalidFormat { usage: FIND_USAGE });
    }

    let words = |prefix| {
        map.all(prefix)
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    let keywords = FindKeywords {
        name: words(PREFIX_NAME),
        profile: words(PREFIX_PROFILE),
        phone: words(PREFIX_PHONE),
        email: words(PREFIX_EMAIL),
        address: words(PREFIX_ADDRESS),
        languages: words(PREFIX_LANGUAGE),
        tags: words(PREFIX_TAG),
    };
    if keywords.is_empty() {
        return Err(ParseError::InvalidFormat { usage: FIND_USAGE });
    }
    Ok(Command::Find(PersonPredicate::Keywords(keywords)))
}

fn parse_index(preamble: &str, usage: &'static str) -> ParseResult<Target> {
    if preamble.is_empty() {
        return Err(ParseError::InvalidFormat { usage });
    }
    match preamble.parse::<usize>() {
        Ok(index) if index > 0 => Ok(Target::Index(index)),
        _ => Err(ParseError::InvalidIndex(preamble.to_string())),
    }
}

/// `None` when the prefix is absent; a single empty value clears the set.
fn replacement_set<T: Ord>(
    map: &ArgumentMap<'_>,
    prefix: &'static str,
    parse: impl Fn(&str) -> Result<T, FieldValidationError>,
) -> ParseResult<Option<BTreeSet<T>>> {
    let values: Vec<&str> = map.all(prefix).collect();
    match values.as_slice() {
        [] => Ok(None),
        [""] => Ok(Some(BTreeSet::new())),
        _ => Ok(Some(
            values
                .into_iter()
                .map(parse)
                .collect::<Result<BTreeSet<_>, _>>()?,
        )),
    }
}

fn removal_single<T>(
    map: &ArgumentMap<'_>,
    prefix: &'static str,
    parse: impl Fn(&str) -> Result<T, FieldValidationError>,
) -> ParseResult<Option<Removal<T>>> {
    match map.single(prefix)? {
        None => Ok(None),
        Some("") => Ok(Some(Removal::Any)),
        Some(value) => Ok(Some(Removal::Exact(parse(value)?))),
    }
}

fn removal_set<T: Ord>(
    map: &ArgumentMap<'_>,
    prefix: &'static str,
    parse: impl Fn(&str) -> Result<T, FieldValidationError>,
) -> ParseResult<Option<Removal<BTreeSet<T>>>> {
    Ok(replacement_set(map, prefix, parse)?.map(|values| {
        if values.is_empty() {
            Removal::Any
        } else {
            Removal::Exact(values)
        }
    }))
}

/// Prefix-tokenized command arguments.
#[derive(Debug)]
struct ArgumentMap<'a> {
    preamble: &'a str,
    values: Vec<(&'static str, &'a str)>,
}

impl<'a> ArgumentMap<'a> {
    fn tokenize(args: &'a str) -> Self {
        let mut markers: Vec<(usize, &'static str)> = Vec::new();
        let mut previous_is_space = true;
        for (offset, ch) in args.char_indices() {
            if previous_is_space {
                if let Some(prefix) = ALL_PREFIXES
                    .iter()
                    .find(|prefix| args[offset..].starts_with(**prefix))
                {
                    markers.push((offset, *prefix));
                }
            }
            previous_is_space = ch.is_whitespace();
        }

        let preamble_end = markers.first().map_or(args.len(), |(offset, _)| *offset);
        let values = markers
            .iter()
            .enumerate()
            .map(|(position, (offset, prefix))| {
                let end = markers
                    .get(position + 1)
                    .map_or(args.len(), |(next, _)| *next);
                (*prefix, args[offset + prefix.len()..end].trim())
            })
            .collect();

        Self {
            preamble: args[..preamble_end].trim(),
            values,
        }
    }

    fn all(&self, prefix: &'static str) -> impl Iterator<Item = &'a str> + '_ {
        self.values
            .iter()
            .filter(move |(candidate, _)| *candidate == prefix)
            .map(|(_, value)| *value)
    }

    fn single(&self, prefix: &'static str) -> ParseResult<Option<&'a str>> {
        let mut values = self.all(prefix);
        let first = values.next();
        if values.next().is_some() {
            return Err(ParseError::RepeatedPrefix(prefix));
        }
        Ok(first)
    }

    fn only(&self, allowed: &[&'static str]) -> ParseResult<()> {
        match self
            .values
            .iter()
            .find(|(prefix, _)| !allowed.contains(prefix))
        {
            Some((prefix, _)) => Err(ParseError::UnexpectedPrefix(*prefix)),
            None => Ok(()),
        }
    }
}
