use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A numeric tracker shown next to a player (life, mana pools, storm count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: u32,
    pub name: String,
    pub color: Color,
    pub radius: u32,
    pub value: i32,
}

impl Counter {
    pub fn new(id: u32, name: &str, color: Color, radius: u32, value: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
            radius,
            value,
        }
    }
}
