use std::fmt;

use serde::{Deserialize, Serialize};

/// Owner of an invitation. Guestbook entries and RSVPs are scoped by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How multiple cover photos are presented over time.
///
/// Unknown values and `null` fall back to [`CoverDisplayMode::Fade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum CoverDisplayMode {
    Static,
    Slide,
    #[default]
    Fade,
}

impl CoverDisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Slide => "slide",
            Self::Fade => "fade",
        }
    }

    pub fn rotates(self) -> bool {
        !matches!(self, Self::Static)
    }
}

impl From<&str> for CoverDisplayMode {
    fn from(value: &str) -> Self {
        match value.trim() {
            "static" => Self::Static,
            "slide" => Self::Slide,
            _ => Self::Fade,
        }
    }
}

impl From<String> for CoverDisplayMode {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Option<String>> for CoverDisplayMode {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<CoverDisplayMode> for String {
    fn from(value: CoverDisplayMode) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Groom,
    Bride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Adult,
    Child,
    None,
}

macro_rules! str_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

str_enum!(Side { Groom => "groom", Bride => "bride" });
str_enum!(Attendance { Confirmed => "confirmed", Declined => "declined" });
str_enum!(MealType { Adult => "adult", Child => "child", None => "none" });

/// Optional page sections a layout may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Cover,
    Greeting,
    Parents,
    Calendar,
    Countdown,
    Gallery,
    Directions,
    Accounts,
    Funding,
    Rsvp,
    Guestbook,
    GuestSnap,
    Closing,
}
