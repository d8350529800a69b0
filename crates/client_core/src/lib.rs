//! Client-side core of the wedding invitation preview.
//!
//! [`PreviewEngine`] owns the per-invitation UI state that every themed
//! [`Layout`] renders from. The remaining modules are the seams it talks
//! through (guestbook persistence, clipboard, clock) and the RSVP form.

pub mod calendar;
pub mod clipboard;
pub mod clock;
pub mod countdown;
pub mod engine;
pub mod format;
pub mod guestbook;
pub mod layout;
pub mod rsvp;
pub mod transport;

pub use calendar::CalendarGrid;
pub use clipboard::{Clipboard, MemoryClipboard, MissingClipboard};
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::Countdown;
pub use engine::{EngineDeps, EngineOptions, EngineState, PreviewEngine};
pub use guestbook::{GuestbookStore, HttpGuestbookStore, MissingGuestbookStore};
pub use layout::{Layout, PreviewHelpers};
pub use rsvp::{HttpRsvpClient, RsvpError, RsvpForm, RsvpSender};
pub use transport::ApiEndpoint;

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod engine_tests;

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod http_tests;
