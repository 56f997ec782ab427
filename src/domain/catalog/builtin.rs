//! The gear library that ships with the crate.
//!
//! Bump [`VERSION`] whenever an item or tag changes so that existing trips are
//! re-initialized against the new definitions.

use super::{Category, ItemDefinition as Item};
use crate::domain::context::{
    CampingStyle::{Backpacking, CarCamping, Hammock, Rv},
    Precipitation::{Rain, Snow},
    Season::{Shoulder, Summer, Winter},
    TemperatureBand::{BelowFreezing, Cold, Hot, Mild},
};

pub const VERSION: u32 = 3;

pub fn categories() -> Vec<Category> {
    vec![
        Category::new("shelter", "Shelter", 0, "tent"),
        Category::new("sleep", "Sleep system", 1, "bed"),
        Category::new("kitchen", "Kitchen", 2, "flame"),
        Category::new("water", "Water", 3, "droplet"),
        Category::new("clothing", "Clothing", 4, "shirt"),
        Category::new("navigation", "Navigation", 5, "compass"),
        Category::new("safety", "Safety & first aid", 6, "first-aid"),
        Category::new("hygiene", "Hygiene", 7, "soap"),
        Category::new("tools", "Tools & repair", 8, "wrench"),
        Category::new("comfort", "Camp comfort", 9, "chair"),
        Category::new("other", "Other", 100, "box"),
    ]
}

#[allow(clippy::too_many_lines)]
pub fn items() -> Vec<Item> {
    vec![
        // Shelter
        Item::new("Tent", "shelter")
            .priority(5)
            .styles([CarCamping, Backpacking])
            .base(),
        Item::new("Tent footprint", "shelter")
            .priority(3)
            .styles([CarCamping, Backpacking])
            .base(),
        Item::new("Hammock with suspension straps", "shelter")
            .priority(5)
            .styles([Hammock])
            .base(),
        Item::new("Rain tarp", "shelter")
            .priority(4)
            .styles([Hammock])
            .base(),
        Item::new("4-season tent", "shelter")
            .priority(5)
            .notes("Replaces a three-season tent when snow load is possible")
            .styles([CarCamping, Backpacking])
            .seasons([Winter])
            .temps([BelowFreezing])
            .precip([Snow]),
        Item::new("Extra guylines", "shelter")
            .qty(4)
            .priority(3)
            .styles([CarCamping, Backpacking, Hammock])
            .windy(),
        Item::new("Snow stakes", "shelter")
            .qty(6)
            .priority(4)
            .styles([CarCamping, Backpacking])
            .precip([Snow]),
        Item::new("Canopy or pop-up shade", "shelter")
            .priority(3)
            .styles([CarCamping, Rv])
            .seasons([Summer])
            .temps([Hot]),
        Item::new("Hammock underquilt", "shelter")
            .priority(5)
            .styles([Hammock])
            .temps([BelowFreezing, Cold]),
        Item::new("Hammock bug net", "shelter")
            .priority(3)
            .styles([Hammock])
            .seasons([Summer, Shoulder]),
        // Sleep
        Item::new("Sleeping bag", "sleep")
            .priority(5)
            .styles([CarCamping, Backpacking, Hammock])
            .base(),
        Item::new("Sleeping pad", "sleep")
            .priority(5)
            .styles([CarCamping, Backpacking])
            .base(),
        Item::new("Pillow", "sleep")
            .priority(2)
            .styles([CarCamping, Rv])
            .base(),
        Item::new("Inflatable pillow", "sleep")
            .priority(2)
            .styles([Backpacking, Hammock])
            .base(),
        Item::new("Bedding for RV bunks", "sleep")
            .priority(4)
            .styles([Rv])
            .base(),
        Item::new("Cold-weather sleeping bag (0-20°F)", "sleep")
            .priority(5)
            .styles([CarCamping, Backpacking, Hammock])
            .seasons([Winter])
            .temps([BelowFreezing]),
        Item::new("Insulated sleeping pad (R-value 4+)", "sleep")
            .priority(5)
            .styles([CarCamping, Backpacking])
            .temps([BelowFreezing, Cold]),
        Item::new("Sleeping bag liner", "sleep")
            .priority(3)
            .styles([CarCamping, Backpacking, Hammock])
            .temps([Cold]),
        Item::new("Extra blankets", "sleep")
            .qty(2)
            .priority(3)
            .styles([CarCamping, Rv])
            .seasons([Winter, Shoulder]),
        Item::new("Lightweight summer quilt", "sleep")
            .priority(3)
            .styles([Backpacking, Hammock])
            .seasons([Summer])
            .temps([Hot]),
        // Kitchen
        Item::new("Camp stove", "kitchen")
            .priority(4)
            .styles([CarCamping, Backpacking, Hammock])
            .base(),
        Item::new("Fuel canister", "kitchen")
            .priority(4)
            .styles([CarCamping, Backpacking, Hammock])
            .base(),
        Item::new("Lighter", "kitchen")
            .qty(2)
            .priority(5)
            .base(),
        Item::new("Cookware set", "kitchen")
            .priority(3)
            .styles([CarCamping, Rv])
            .base(),
        Item::new("Ultralight pot", "kitchen")
            .priority(4)
            .styles([Backpacking, Hammock])
            .base(),
        Item::new("Utensils", "kitchen")
            .priority(3)
            .base(),
        Item::new("Cooler", "kitchen")
            .priority(4)
            .styles([CarCamping])
            .base(),
        Item::new("Bear canister", "kitchen")
            .priority(4)
            .notes("Required in many backcountry areas")
            .styles([Backpacking, Hammock]),
        Item::new("Extra fuel for snow melting", "kitchen")
            .qty(2)
            .priority(4)
            .styles([CarCamping, Backpacking, Hammock])
            .temps([BelowFreezing])
            .precip([Snow]),
        Item::new("Windscreen for stove", "kitchen")
            .priority(3)
            .styles([CarCamping, Backpacking, Hammock])
            .windy(),
        Item::new("Insulated mug", "kitchen")
            .priority(2)
            .seasons([Winter])
            .temps([BelowFreezing, Cold]),
        Item::new("Camp kitchen table", "kitchen")
            .priority(2)
            .styles([CarCamping]),
        // Water
        Item::new("Water bottles", "water")
            .qty(2)
            .priority(5)
            .base(),
        Item::new("Water filter", "water")
            .priority(5)
            .styles([Backpacking, Hammock])
            .base(),
        Item::new("Water jug (5 gal)", "water")
            .priority(4)
            .styles([CarCamping, Rv])
            .base(),
        Item::new("Electrolyte tablets", "water")
            .qty(10)
            .priority(3)
            .seasons([Summer])
            .temps([Hot]),
        Item::new("Insulated bottle sleeve", "water")
            .priority(3)
            .styles([Backpacking, Hammock])
            .temps([BelowFreezing]),
        Item::new("Hydration reservoir", "water")
            .priority(3)
            .styles([Backpacking])
            .temps([Hot, Mild]),
        // Clothing
        Item::new("Rain jacket", "clothing")
            .priority(4)
            .base(),
        Item::new("Base layers", "clothing")
            .qty(2)
            .priority(4)
            .base(),
        Item::new("Hiking socks", "clothing")
            .qty(3)
            .priority(4)
            .base(),
        Item::new("Insulated parka", "clothing")
            .priority(5)
            .seasons([Winter])
            .temps([BelowFreezing, Cold]),
        Item::new("Warm hat", "clothing")
            .priority(4)
            .temps([BelowFreezing, Cold]),
        Item::new("Insulated gloves", "clothing")
            .priority(4)
            .temps([BelowFreezing, Cold])
            .precip([Snow]),
        Item::new("Fleece mid-layer", "clothing")
            .priority(3)
            .seasons([Shoulder])
            .temps([Cold, Mild]),
        Item::new("Rain pants", "clothing")
            .priority(4)
            .precip([Rain]),
        Item::new("Gaiters", "clothing")
            .priority(3)
            .styles([Backpacking])
            .precip([Snow, Rain]),
        Item::new("Sun hat", "clothing")
            .priority(3)
            .seasons([Summer])
            .temps([Hot]),
        Item::new("Windbreaker", "clothing")
            .priority(3)
            .windy(),
        Item::new("Camp shoes", "clothing")
            .priority(2)
            .styles([CarCamping, Backpacking]),
        // Navigation
        Item::new("Map and compass", "navigation")
            .priority(4)
            .styles([Backpacking, Hammock])
            .base(),
        Item::new("GPS device", "navigation")
            .priority(3)
            .styles([Backpacking])
            .premium(),
        Item::new("Satellite messenger", "navigation")
            .priority(4)
            .notes("For trips without cell coverage")
            .styles([Backpacking, Hammock])
            .seasons([Winter]),
        // Safety
        Item::new("First aid kit", "safety")
            .priority(5)
            .base(),
        Item::new("Headlamp", "safety")
            .priority(5)
            .base(),
        Item::new("Spare batteries", "safety")
            .priority(3)
            .base(),
        Item::new("Emergency blanket", "safety")
            .priority(4)
            .styles([Backpacking, Hammock])
            .temps([BelowFreezing, Cold]),
        Item::new("Hand warmers", "safety")
            .qty(4)
            .priority(3)
            .temps([BelowFreezing]),
        Item::new("Microspikes", "safety")
            .priority(4)
            .styles([Backpacking])
            .precip([Snow]),
        Item::new("Avalanche beacon", "safety")
            .priority(3)
            .styles([Backpacking])
            .precip([Snow])
            .premium(),
        Item::new("Sunscreen", "safety")
            .priority(4)
            .seasons([Summer])
            .temps([Hot]),
        Item::new("Insect repellent", "safety")
            .priority(4)
            .seasons([Summer, Shoulder]),
        Item::new("Fire extinguisher", "safety")
            .priority(3)
            .styles([Rv])
            .base(),
        // Hygiene
        Item::new("Toilet paper", "hygiene")
            .priority(4)
            .base(),
        Item::new("Trowel", "hygiene")
            .priority(3)
            .styles([Backpacking, Hammock])
            .base(),
        Item::new("Hand sanitizer", "hygiene")
            .priority(3)
            .base(),
        Item::new("Quick-dry towel", "hygiene")
            .priority(2)
            .styles([Backpacking, Hammock]),
        Item::new("Bath towels", "hygiene")
            .qty(2)
            .priority(2)
            .styles([CarCamping, Rv]),
        // Tools
        Item::new("Multi-tool", "tools")
            .priority(4)
            .base(),
        Item::new("Repair kit", "tools")
            .priority(3)
            .styles([Backpacking, Hammock])
            .base(),
        Item::new("Duct tape", "tools")
            .priority(2)
            .base(),
        Item::new("Mallet", "tools")
            .priority(2)
            .styles([CarCamping]),
        Item::new("Leveling blocks", "tools")
            .qty(4)
            .priority(4)
            .styles([Rv])
            .base(),
        Item::new("Sewer hose", "tools")
            .priority(4)
            .styles([Rv])
            .base(),
        Item::new("Snow shovel", "tools")
            .priority(4)
            .styles([CarCamping, Rv])
            .precip([Snow]),
        Item::new("Heated water hose", "tools")
            .priority(4)
            .styles([Rv])
            .temps([BelowFreezing]),
        // Comfort
        Item::new("Camp chairs", "comfort")
            .qty(2)
            .priority(3)
            .styles([CarCamping])
            .base(),
        Item::new("Lantern", "comfort")
            .priority(3)
            .styles([CarCamping, Rv])
            .base(),
        Item::new("Outdoor rug", "comfort")
            .priority(1)
            .styles([Rv]),
        Item::new("Portable fan", "comfort")
            .priority(2)
            .styles([CarCamping, Rv])
            .temps([Hot]),
        Item::new("Portable heater", "comfort")
            .priority(3)
            .styles([CarCamping, Rv])
            .temps([BelowFreezing, Cold])
            .premium(),
        Item::new("Sit pad", "comfort")
            .priority(1)
            .styles([Backpacking, Hammock]),
        Item::new("Playing cards", "comfort")
            .priority(1)
            .precip([Rain]),
    ]
}
