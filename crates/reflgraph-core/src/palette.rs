//! Palettes and deterministic color assignment.

use std::collections::HashMap;
use std::str::FromStr;

/// Color returned for unknown palette names.
pub const FALLBACK_COLOR: &str = "white";
/// Palette used when no policy is configured.
pub const DEFAULT_PALETTE: &str = "set312";

// Brewer schemes, see https://graphviz.org/doc/info/colors.html
pub const YLGN9: &[&str] = &[
    "#ffffe5", "#f7fcb9", "#d9f0a3", "#addd8e", "#78c679", "#41ab5d", "#238443", "#006837",
    "#004529",
];
pub const YLORBR9: &[&str] = &[
    "#ffffe5", "#fff7bc", "#fee391", "#fec44f", "#fe9929", "#ec7014", "#cc4c02", "#993404",
    "#662506",
];
pub const SET312: &[&str] = &[
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];
pub const RDYLGN9: &[&str] = &[
    "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a", "#66bd63",
    "#1a9850",
];

// X11 color names
pub const REDS: &[&str] = &[
    "IndianRed", "LightCoral", "Salmon", "DarkSalmon", "LightSalmon", "Crimson", "Red",
    "FireBrick",
];
pub const GREENS: &[&str] = &[
    "MediumSeaGreen", "SeaGreen", "ForestGreen", "Green", "DarkGreen", "YellowGreen",
    "OliveDrab", "DarkOliveGreen",
];
pub const BROWNS: &[&str] = &[
    "Cornsilk", "BlanchedAlmond", "Bisque", "NavajoWhite", "Wheat", "BurlyWood", "Tan",
    "RosyBrown", "SandyBrown", "Goldenrod", "DarkGoldenrod", "Peru", "Chocolate", "SaddleBrown",
    "Sienna", "Brown", "Maroon",
];
pub const GREYS: &[&str] = &[
    "Gainsboro", "LightGrey", "Gray", "DimGray", "LightSlateGray", "SlateGray", "DarkSlateGray",
];

/// Palettes addressable by name.
pub const NAMED_PALETTES: &[(&str, &[&str])] = &[
    ("red", REDS),
    ("green", GREENS),
    ("brown", BROWNS),
    ("grey", GREYS),
    ("set312", SET312),
    ("ylgn9", YLGN9),
    ("ylorbr9", YLORBR9),
    ("rdylgn9", RDYLGN9),
];

/// Palettes walked by the `rotate` and `order` policies, in this order.
pub const ROTATION: &[&[&str]] = &[SET312, BROWNS, GREENS, GREYS, REDS];

pub fn palette(name: &str) -> Option<&'static [&'static str]> {
    NAMED_PALETTES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, colors)| *colors)
}

/// Total number of colors across [`ROTATION`].
pub fn rotation_len() -> usize {
    ROTATION.iter().map(|colors| colors.len()).sum()
}

/// How the next color is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Cycle through one named palette.
    Single(String),
    /// One color from each rotation palette in turn.
    Rotate,
    /// Walk the concatenated rotation palettes linearly.
    Order,
}

impl Default for Policy {
    fn default() -> Self {
        Policy::Single(DEFAULT_PALETTE.to_string())
    }
}

impl FromStr for Policy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "rotate" => Policy::Rotate,
            "order" => Policy::Order,
            name => Policy::Single(name.to_string()),
        })
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Single(name) => write!(f, "{name}"),
            Policy::Rotate => write!(f, "rotate"),
            Policy::Order => write!(f, "order"),
        }
    }
}

/// Owns the rotation counters. Each instance starts from zero, so two
/// assigners never influence each other.
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    single: HashMap<String, usize>,
    cycle: usize,
    within: usize,
    order: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick(&mut self, policy: &Policy) -> &'static str {
        match policy {
            Policy::Single(name) => self.pick_single(name),
            Policy::Rotate => self.pick_rotate(),
            Policy::Order => self.pick_order(),
        }
    }

    fn pick_single(&mut self, name: &str) -> &'static str {
        let Some(colors) = palette(name) else {
            tracing::debug!("unknown palette '{}', using {}", name, FALLBACK_COLOR);
            return FALLBACK_COLOR;
        };
        let counter = self.single.entry(name.to_string()).or_insert(0);
        let color = colors[*counter % colors.len()];
        *counter += 1;
        color
    }

    fn pick_rotate(&mut self) -> &'static str {
        let colors = ROTATION[self.cycle % ROTATION.len()];
        let color = colors[self.within % colors.len()];
        self.cycle += 1;
        if self.cycle % ROTATION.len() == 0 {
            self.within += 1;
        }
        color
    }

    fn pick_order(&mut self) -> &'static str {
        let mut index = self.order % rotation_len();
        self.order += 1;
        for colors in ROTATION {
            if index < colors.len() {
                return colors[index];
            }
            index -= colors.len();
        }
        FALLBACK_COLOR
    }
}

/// Remembers the color given to each key, so a key keeps its color for the
/// whole document.
#[derive(Debug, Clone)]
pub struct ColorPlate {
    policy: Policy,
    colors: HashMap<String, &'static str>,
}

impl ColorPlate {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            colors: HashMap::new(),
        }
    }

    pub fn color_for(&mut self, key: &str, assigner: &mut ColorAssigner) -> &'static str {
        if let Some(color) = self.colors.get(key) {
            return color;
        }
        let color = assigner.pick(&self.policy);
        self.colors.insert(key.to_string(), color);
        color
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cycles_per_palette() {
        let mut assigner = ColorAssigner::new();
        let policy = Policy::Single("grey".into());
        let picked: Vec<_> = (0..GREYS.len() + 1).map(|_| assigner.pick(&policy)).collect();
        assert_eq!(&picked[..GREYS.len()], GREYS);
        assert_eq!(picked[GREYS.len()], GREYS[0]);

        // other palettes keep their own counter
        assert_eq!(assigner.pick(&Policy::Single("red".into())), REDS[0]);
    }

    #[test]
    fn test_unknown_palette_falls_back() {
        let mut assigner = ColorAssigner::new();
        assert_eq!(assigner.pick(&"nope".parse().unwrap()), FALLBACK_COLOR);
        assert!(assigner.single.is_empty());
    }

    #[test]
    fn test_rotate_advances_within_once_per_pass() {
        let mut assigner = ColorAssigner::new();
        let first: Vec<_> = (0..ROTATION.len()).map(|_| assigner.pick(&Policy::Rotate)).collect();
        let expected: Vec<_> = ROTATION.iter().map(|colors| colors[0]).collect();
        assert_eq!(first, expected);
        assert_eq!((assigner.cycle, assigner.within), (ROTATION.len(), 1));

        assert_eq!(assigner.pick(&Policy::Rotate), SET312[1]);
        assert_eq!(assigner.pick(&Policy::Rotate), BROWNS[1]);
    }

    #[test]
    fn test_order_walks_all_palettes_then_wraps() {
        let mut assigner = ColorAssigner::new();
        let total = rotation_len();
        let walked: Vec<_> = (0..total).map(|_| assigner.pick(&Policy::Order)).collect();
        let flat: Vec<_> = ROTATION.iter().flat_map(|colors| colors.iter().copied()).collect();
        assert_eq!(walked, flat);
        assert_eq!(assigner.pick(&Policy::Order), SET312[0]);
    }

    #[test]
    fn test_fresh_assigners_are_independent() {
        let mut a = ColorAssigner::new();
        let mut b = ColorAssigner::new();
        a.pick(&Policy::default());
        a.pick(&Policy::default());
        assert_eq!(b.pick(&Policy::default()), SET312[0]);
        assert_eq!(a.pick(&Policy::default()), SET312[2]);
    }

    #[test]
    fn test_plate_memoizes_per_key() {
        let mut assigner = ColorAssigner::new();
        let mut plate = ColorPlate::new(Policy::default());
        let first = plate.color_for("sample", &mut assigner);
        let second = plate.color_for("builtins", &mut assigner);
        assert_eq!(plate.color_for("sample", &mut assigner), first);
        assert_ne!(first, second);
        assert_eq!(plate.len(), 2);
    }
}
