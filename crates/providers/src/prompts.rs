//! Prompt text for each gateway operation.
//!
//! Every prompt ends with the same language clause so the whole JSON payload,
//! not just the prose, comes back in the user's language.

use shared::language::LanguageCode;
use shared::waste::GeoPoint;

fn language_clause(language: LanguageCode) -> String {
    format!(
        "CRITICAL: The entire response, including all text inside the JSON values, must be in the {} language.",
        language.language_name()
    )
}

pub fn shops(waste_type: &str, location: GeoPoint, language: LanguageCode) -> String {
    format!(
        "Based on the user's location (latitude: {}, longitude: {}) and the waste type \"{}\", \
         generate a list of 5 fictional but realistic-sounding nearby shops in India that would buy this waste. \
         Provide the response as a valid JSON array. {}",
        location.lat,
        location.lng,
        waste_type,
        language_clause(language)
    )
}

pub fn identify_waste(language: LanguageCode) -> String {
    format!(
        "Analyze this image of a waste item. First, classify it as either 'Biodegradable' or 'Non-biodegradable'. \
         Then give a brief, easy-to-understand explanation of what the item is and why it has that classification. \
         Finally, suggest the general category of waste the item belongs to. \
         Return the response as a valid JSON object. {}",
        language_clause(language)
    )
}

pub fn alternatives(location: GeoPoint, language: LanguageCode) -> String {
    format!(
        "First, analyze the user's product: its name, classification (Biodegradable/Non-biodegradable), \
         primary material, estimated degradation time and a short description of its environmental impact.\n\
         Second, based on the user's location (latitude: {}, longitude: {}), suggest 3 eco-friendly alternatives. \
         For each give a 'name', a 'description' of why it is a better choice, an 'imagePrompt' describing a \
         photorealistic product shot on a clean, simple background, its 'degradationTime', its 'material', \
         a plausible 'buyLink', and 'shops': 2 fictional but realistic nearby shops in India with a 'name', \
         a Google Maps 'location' link and a 10-digit Indian 'phone' number.\n\
         Return a single, valid JSON object that strictly follows the provided schema. {}",
        location.lat,
        location.lng,
        language_clause(language)
    )
}

pub fn disposal(language: LanguageCode) -> String {
    format!(
        "Identify the specific waste item in the user's input and write a step-by-step guide for preparing it \
         for safe disposal before it is recycled or sold. For a plastic bottle the steps could be \
         \"Empty the bottle completely\", \"Rinse with water\", \"Remove the cap\", \"Crush the bottle\". \
         Also list important safety warnings for handling the item; if there are none, return an empty array. \
         Return a single, valid JSON object that strictly follows the provided schema. {}",
        language_clause(language)
    )
}

pub fn diy(language: LanguageCode) -> String {
    format!(
        "Based on the user's waste item, generate one creative, practical DIY upcycling project explained step by step. \
         For each step provide a detailed 'imagePrompt' an image model can use to show the action, the objects \
         involved and the setting (e.g., on a wooden workbench). Keep the materials list practical. \
         Return a single, valid JSON object that strictly follows the provided schema. {}",
        language_clause(language)
    )
}

/// Lead-in placed before the operation prompt, depending on the input kind.
pub fn text_lead(subject: &str, text: &str) -> String {
    format!("The user is asking about {}: \"{}\".", subject, text)
}

pub fn image_lead(subject: &str) -> String {
    format!("The user uploaded an image of {}.", subject)
}

pub fn product_image(prompt: &str) -> String {
    format!(
        "Generate a photorealistic product shot of the following: {}. The item should be on a clean, neutral background.",
        prompt
    )
}

pub fn chat_system(language: LanguageCode) -> String {
    format!(
        "You are a friendly and helpful AI assistant for an app called Ecoloop. Answer user questions about \
         waste management, recycling, sustainability, and how to use the app. Keep your answers concise, \
         positive, and encouraging. CRITICAL: You must converse with the user in the {} language.",
        language.language_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_prompt_names_the_language() {
        let here = GeoPoint::new(12.97, 77.59);
        let lang = LanguageCode::Ta;
        for prompt in [
            shops("plastic", here, lang),
            identify_waste(lang),
            alternatives(here, lang),
            disposal(lang),
            diy(lang),
            chat_system(lang),
        ] {
            assert!(prompt.contains("Tamil language"), "{prompt}");
        }
    }

    #[test]
    fn test_location_is_embedded() {
        let prompt = shops("e-waste", GeoPoint::new(19.07, 72.87), LanguageCode::En);
        assert!(prompt.contains("latitude: 19.07"));
        assert!(prompt.contains("longitude: 72.87"));
        assert!(prompt.contains("\"e-waste\""));
    }
}
