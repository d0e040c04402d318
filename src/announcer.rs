use crate::constants::{LIVE_ASSERTIVE_ID, LIVE_POLITE_ID};
use crate::dom;
use orb_core::{Announcement, Announcer, Politeness};
use web_sys as web;

/// Writes announcements into a polite and an assertive `aria-live` region.
pub struct LiveRegionAnnouncer {
    polite: web::Element,
    assertive: web::Element,
}

impl LiveRegionAnnouncer {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        Ok(Self {
            polite: dom::ensure_live_region(document, LIVE_POLITE_ID, "polite")?,
            assertive: dom::ensure_live_region(document, LIVE_ASSERTIVE_ID, "assertive")?,
        })
    }
}

impl Announcer for LiveRegionAnnouncer {
    fn announce(&mut self, announcement: &Announcement) {
        let region = match announcement.politeness {
            Politeness::Polite => &self.polite,
            Politeness::Assertive => &self.assertive,
        };
        region.set_text_content(Some(&announcement.message));
    }

    fn clear(&mut self) {
        self.polite.set_text_content(None);
        self.assertive.set_text_content(None);
    }
}
