//! Message lookup with `{name}` interpolation.
//!
//! Only the English table ships here; other languages fall back to it key by
//! key, and an unknown key renders as itself.

use shared::language::LanguageCode;

static EN: &[(&str, &str)] = &[
    // Navigation
    ("nav_home", "Home"),
    ("nav_find_shops", "Find Shops"),
    ("nav_identify_waste", "Identify Waste"),
    ("nav_alternatives", "Eco Alternatives"),
    ("nav_disposal_guide", "Disposal Guide"),
    ("nav_diy_projects", "DIY Projects"),
    ("nav_rewards", "Rewards"),
    // Home
    ("home_subtitle", "Turn your waste into worth."),
    ("refuse_title", "Refuse"),
    ("refuse_desc", "Say no to what you don't need."),
    ("reduce_title", "Reduce"),
    ("reduce_desc", "Use less of what you do need."),
    ("reuse_title", "Reuse"),
    ("reuse_desc", "Give items a second life."),
    ("recycle_title", "Recycle"),
    ("recycle_desc", "Send materials back into production."),
    ("rot_title", "Rot"),
    ("rot_desc", "Compost what is left."),
    // Generic errors
    ("error_no_input", "Please enter an item name or upload an image."),
    ("error_no_location", "Please share your location first."),
    ("error_ai_busy", "Our AI is busy right now. Please try again in a moment."),
    ("location_error_enable", "Please enable location access to continue."),
    ("location_error_unsupported", "Geolocation is not supported on this device."),
    ("image_error", "Image could not be generated."),
    // Page specific errors
    ("find_shops_error_enter_waste", "Please enter a waste type."),
    ("find_shops_error_provide_location", "Please provide your location to find shops."),
    ("error_upload_image", "Please upload an image first."),
    ("error_identify_waste", "We could not identify this item. Please try again."),
    ("error_find_shops_for_waste", "We could not find shops for this waste. Please try again."),
    ("alternatives_error_no_input", "Please enter a product name or upload an image."),
    ("alternatives_error_no_location", "Please share your location to find nearby alternatives."),
    ("disposal_error_no_input", "Please enter an item name or upload an image."),
    ("diy_error_no_input", "Please enter an item name or upload an image."),
    // Shops and rewards
    ("log_drop_off_alert", "You earned {score} points for your drop-off at {shopName}!"),
    ("points_away_message", "You are {points} points away from {milestone}!"),
    ("milestone_novice_title", "Eco-Novice"),
    ("milestone_novice_description", "Awarded for starting your journey."),
    ("milestone_rookie_title", "Recycling Rookie"),
    ("milestone_rookie_description", "You are getting the hang of it!"),
    ("milestone_guru_title", "Green Guru"),
    ("milestone_guru_description", "₹100 Amazon Coupon"),
    ("milestone_star_title", "Sustainability Star"),
    ("milestone_star_description", "₹250 Coupon for Eco-friendly Store"),
    // Chat
    ("chatbot_greeting", "Hi! I'm the Ecoloop assistant. Ask me anything about recycling and waste."),
    ("chatbot_error", "Sorry, I couldn't answer that. Please try again."),
];

#[derive(Debug, Clone, Copy)]
pub struct Translator {
    language: LanguageCode,
}

impl Translator {
    pub fn new(language: LanguageCode) -> Self {
        Self { language }
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    fn table(&self) -> Option<&'static [(&'static str, &'static str)]> {
        match self.language {
            LanguageCode::En => Some(EN),
            _ => None,
        }
    }

    fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
        table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn t(&self, key: &str) -> String {
        self.table()
            .and_then(|table| Self::lookup(table, key))
            .or_else(|| Self::lookup(EN, key))
            .unwrap_or(key)
            .to_string()
    }

    pub fn t_with(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.t(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}
