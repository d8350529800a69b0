use chrono::{DateTime, FixedOffset, NaiveDate};
use shared::{domain::Section, invitation::InvitationData};

use crate::{
    calendar::CalendarGrid,
    engine::{EngineState, PreviewEngine},
};

/// Section order used when a layout does not define its own.
pub const DEFAULT_SECTION_ORDER: [Section; 13] = [
    Section::Cover,
    Section::Greeting,
    Section::Parents,
    Section::Calendar,
    Section::Countdown,
    Section::Gallery,
    Section::Directions,
    Section::Accounts,
    Section::Funding,
    Section::Rsvp,
    Section::Guestbook,
    Section::GuestSnap,
    Section::Closing,
];

/// Derived values a layout may need besides the raw state.
pub trait PreviewHelpers {
    fn all_photos(&self) -> &[String];
    fn gallery_images(&self) -> &[String];
    fn calendar(&self) -> Option<CalendarGrid>;
    fn wedding_datetime(&self) -> Option<DateTime<FixedOffset>>;
    fn today(&self) -> NaiveDate;
}

impl PreviewHelpers for PreviewEngine {
    fn all_photos(&self) -> &[String] {
        PreviewEngine::all_photos(self)
    }

    fn gallery_images(&self) -> &[String] {
        PreviewEngine::gallery_images(self)
    }

    fn calendar(&self) -> Option<CalendarGrid> {
        PreviewEngine::calendar(self)
    }

    fn wedding_datetime(&self) -> Option<DateTime<FixedOffset>> {
        PreviewEngine::wedding_datetime(self)
    }

    fn today(&self) -> NaiveDate {
        PreviewEngine::today(self)
    }
}

/// A themed renderer of one invitation.
pub trait Layout {
    type Output;

    fn name(&self) -> &'static str;

    fn section_order(&self) -> &[Section] {
        &DEFAULT_SECTION_ORDER
    }

    /// Sections of [`Layout::section_order`] that the invitation enables.
    fn visible_sections(&self, data: &InvitationData) -> Vec<Section> {
        self.section_order()
            .iter()
            .copied()
            .filter(|section| data.section_enabled(*section))
            .collect()
    }

    fn render(
        &self,
        data: &InvitationData,
        state: &EngineState,
        helpers: &dyn PreviewHelpers,
    ) -> Self::Output;
}

impl PreviewEngine {
    /// Renders the current state with `layout`.
    pub fn render_with<L: Layout + ?Sized>(&self, layout: &L) -> L::Output {
        let state = self.snapshot();
        layout.render(self.data(), &state, self)
    }
}
