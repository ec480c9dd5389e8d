use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Day of the week a club meets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl ClubDay {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monday" => Some(Self::Monday),
            "tuesday" => Some(Self::Tuesday),
            "wednesday" => Some(Self::Wednesday),
            "thursday" => Some(Self::Thursday),
            "friday" => Some(Self::Friday),
            "saturday" => Some(Self::Saturday),
            "sunday" => Some(Self::Sunday),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for ClubDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One club as advertised on the request form.
///
/// Identity is `(name, day)`; the teacher and the raw description are
/// informational only. Value equality, no global dedup: each parsed
/// description yields its own instance.
#[derive(Debug, Clone, Serialize)]
pub struct Club {
    pub name: String,
    pub day: ClubDay,
    pub teacher: String,
    pub description: String,
}

impl Club {
    /// Parses a description of the form `Name (Day) - Teacher`.
    ///
    /// Malformed descriptions are logged and yield `None`; the caller drops
    /// the entry rather than aborting the run.
    pub fn parse(description: &str) -> Option<Self> {
        match Self::parse_parts(description) {
            Some(club) => Some(club),
            None => {
                tracing::warn!(%description, "unmatched club description");
                None
            }
        }
    }

    fn parse_parts(description: &str) -> Option<Self> {
        let open = description.find('(')?;
        let close = open + description[open..].find(')')?;
        let name = description[..open].trim().replace('\'', "");
        if name.is_empty() {
            return None;
        }
        let day = ClubDay::parse(&description[open + 1..close])?;
        let teacher = description[close + 1..]
            .trim_start()
            .strip_prefix('-')?
            .trim()
            .to_string();
        if teacher.is_empty() {
            return None;
        }
        Some(Self {
            name,
            day,
            teacher,
            description: description.to_string(),
        })
    }
}

impl fmt::Display for Club {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.day)
    }
}

impl PartialEq for Club {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.day == other.day
    }
}

impl Eq for Club {}

impl Hash for Club {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.day.hash(state);
    }
}

impl PartialOrd for Club {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Club {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.day.cmp(&other.day))
    }
}
