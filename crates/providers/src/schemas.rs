//! Response schemas sent as `generationConfig.responseSchema`.
//!
//! The service is asked for strictly conforming JSON; the shapes here mirror
//! the types in `shared::waste` field for field.

use serde_json::{json, Value};

fn classification() -> Value {
    json!({ "type": "STRING", "enum": ["Biodegradable", "Non-biodegradable"] })
}

fn string_list(description: Option<&str>) -> Value {
    let mut schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    if let Some(d) = description {
        schema["description"] = Value::String(d.to_string());
    }
    schema
}

pub fn shop_list() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "wasteTypes": string_list(None),
                "phone": { "type": "STRING", "description": "A 10-digit Indian phone number." },
                "address": { "type": "STRING", "description": "A plausible Indian address." },
                "location": { "type": "STRING", "description": "A valid Google Maps link for the address." }
            },
            "required": ["name", "wasteTypes", "phone", "address", "location"]
        }
    })
}

pub fn waste_info() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "classification": classification(),
            "explanation": { "type": "STRING" },
            "wasteCategory": { "type": "STRING", "description": "e.g., e-waste, plastic, organic waste, metal" }
        },
        "required": ["classification", "explanation", "wasteCategory"]
    })
}

pub fn eco_alternatives() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "originalProduct": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING", "description": "The product identified from the user's input." },
                    "classification": classification(),
                    "material": { "type": "STRING", "description": "Primary material, e.g. Plastic, Paper, Glass." },
                    "degradationTime": { "type": "STRING", "description": "Estimated decomposition time, e.g. '450 years'." },
                    "description": { "type": "STRING", "description": "Brief environmental impact of the product." }
                },
                "required": ["name", "classification", "material", "degradationTime", "description"]
            },
            "alternatives": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "imagePrompt": { "type": "STRING", "description": "Detailed prompt for a photorealistic product image." },
                        "degradationTime": { "type": "STRING" },
                        "material": { "type": "STRING" },
                        "buyLink": { "type": "STRING", "description": "A plausible example URL to an online store." },
                        "shops": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": { "type": "STRING" },
                                    "location": { "type": "STRING", "description": "A Google Maps link for a realistic shop in India." },
                                    "phone": { "type": "STRING", "description": "A 10-digit Indian phone number." }
                                },
                                "required": ["name", "location", "phone"]
                            }
                        }
                    },
                    "required": ["name", "description", "imagePrompt", "degradationTime", "material", "buyLink", "shops"]
                }
            }
        },
        "required": ["originalProduct", "alternatives"]
    })
}

pub fn disposal_guide() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "itemName": { "type": "STRING", "description": "The item identified from the user's input." },
            "steps": string_list(Some("Clear, actionable steps for disposal preparation.")),
            "safetyWarnings": string_list(Some("Important safety warnings. Empty array when there are none."))
        },
        "required": ["itemName", "steps", "safetyWarnings"]
    })
}

pub fn diy_project() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "A catchy title for the DIY project." },
            "description": { "type": "STRING", "description": "A brief, engaging summary." },
            "materials": string_list(Some("Materials needed for the project.")),
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "step": { "type": "INTEGER" },
                        "instruction": { "type": "STRING", "description": "A clear, concise instruction." },
                        "imagePrompt": { "type": "STRING", "description": "A detailed prompt to picture this step." }
                    },
                    "required": ["step", "instruction", "imagePrompt"]
                }
            }
        },
        "required": ["title", "description", "materials", "steps"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_are_declared() {
        for schema in [waste_info(), eco_alternatives(), disposal_guide(), diy_project()] {
            let props = schema["properties"].as_object().unwrap();
            for field in schema["required"].as_array().unwrap() {
                assert!(props.contains_key(field.as_str().unwrap()), "{field}");
            }
        }
    }

    #[test]
    fn test_shop_list_is_array() {
        assert_eq!(shop_list()["type"], "ARRAY");
        assert_eq!(diy_project()["properties"]["steps"]["items"]["properties"]["step"]["type"], "INTEGER");
    }
}
