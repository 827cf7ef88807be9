//! Model classification by display name.
//!
//! Categories and descriptions come from static tables. Lookup is an exact,
//! case-insensitive match on the whole name: "helmet" is not "damaged_helmet".
//!
//! Pinned priority order for overlapping tables:
//! Geometric, Educational, Animals, Objects, Equipment, General

use serde::{Deserialize, Serialize};

/// Description used when a name has no table entry.
pub const FALLBACK_DESCRIPTION: &str = "A 3D model for AR viewing and interaction.";

/// Viewer category for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Geometric,
    Educational,
    Animals,
    Objects,
    Equipment,
    /// Fallback for names no table knows
    General,
}

impl Default for Category {
    fn default() -> Self {
        Self::General
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Geometric => "Geometric",
            Self::Educational => "Educational",
            Self::Animals => "Animals",
            Self::Objects => "Objects",
            Self::Equipment => "Equipment",
            Self::General => "General",
        };
        write!(f, "{}", s)
    }
}

/// Maps a display name to a category and a human readable description.
///
/// Implementations must be pure: the same name (in any casing) always
/// yields the same answer.
pub trait Classifier: Send + Sync {
    fn classify(&self, display_name: &str) -> Category;

    fn describe(&self, display_name: &str) -> String;
}

const GEOMETRIC: &[&str] = &["cube", "sphere", "cylinder", "square"];

const EDUCATIONAL: &[&str] = &["alphabet"];

const ANIMALS: &[&str] = &[
    "cat", "dog", "elephant", "fox", "goat", "hen", "lion", "monkey", "owl", "parrot", "quail",
    "rat", "zebra",
];

const OBJECTS: &[&str] = &[
    "apple",
    "ball",
    "icecream",
    "jug",
    "kite",
    "nest",
    "ship",
    "telephone",
    "umbrella",
    "van",
    "watch",
    "xylophone",
    "yacht",
];

const EQUIPMENT: &[&str] = &["damaged_helmet"];

/// Checked in order, first hit wins.
const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (Category::Geometric, GEOMETRIC),
    (Category::Educational, EDUCATIONAL),
    (Category::Animals, ANIMALS),
    (Category::Objects, OBJECTS),
    (Category::Equipment, EQUIPMENT),
];

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("cube", "A three-dimensional solid object bounded by six square faces, facets or sides, with three meeting at each vertex."),
    ("cylinder", "A three-dimensional solid that holds two parallel bases joined by a curved surface, at a fixed distance."),
    ("sphere", "A perfectly round three-dimensional object where every point on the surface is equidistant from the center."),
    ("square", "A two-dimensional shape with four equal sides and four right angles."),
    ("alphabet", "Educational model for learning the alphabet."),
    ("apple", "A round fruit with red, yellow, or green skin and white flesh."),
    ("ball", "A spherical object used in various sports and games."),
    ("cat", "A small domesticated carnivorous mammal with soft fur."),
    ("dog", "A domesticated carnivorous mammal, typically kept as a pet."),
    ("elephant", "A large gray mammal with a long trunk and tusks."),
    ("fox", "A small wild canine with a bushy tail and pointed ears."),
    ("goat", "A domesticated ruminant mammal with backward-curving horns."),
    ("hen", "A female chicken, especially one kept for egg production."),
    ("icecream", "A sweet frozen food made from dairy products."),
    ("jug", "A container for holding liquids, typically with a handle and spout."),
    ("kite", "A light frame covered with paper or cloth, flown in the wind."),
    ("lion", "A large wild cat with a tawny coat and a flowing mane."),
    ("monkey", "A small to medium-sized primate with a long tail."),
    ("nest", "A structure built by birds to hold their eggs and young."),
    ("owl", "A nocturnal bird of prey with large eyes and a hooked beak."),
    ("parrot", "A colorful tropical bird with a curved beak and the ability to mimic speech."),
    ("quail", "A small ground-dwelling bird with a plump body."),
    ("rat", "A rodent with a long tail and pointed snout."),
    ("ship", "A large vessel for transporting passengers or cargo by sea."),
    ("telephone", "A device for transmitting sound over long distances."),
    ("umbrella", "A device used for protection against rain or sun."),
    ("van", "A motor vehicle used for transporting goods or people."),
    ("watch", "A small timepiece worn on the wrist."),
    ("xylophone", "A musical instrument with wooden bars struck by mallets."),
    ("yacht", "A medium-sized sailing vessel used for recreation."),
    ("zebra", "A wild horse with black and white stripes."),
    ("damaged_helmet", "A protective headgear that has been damaged or worn."),
];

/// Built-in lookup tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticClassifier;

impl StaticClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for StaticClassifier {
    fn classify(&self, display_name: &str) -> Category {
        let lower = display_name.to_lowercase();
        CATEGORY_TABLE
            .iter()
            .find(|(_, names)| names.contains(&lower.as_str()))
            .map(|(category, _)| *category)
            .unwrap_or_default()
    }

    fn describe(&self, display_name: &str) -> String {
        let lower = display_name.to_lowercase();
        DESCRIPTIONS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, text)| *text)
            .unwrap_or(FALLBACK_DESCRIPTION)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_table() {
        let c = StaticClassifier::new();
        assert_eq!(c.classify("cube"), Category::Geometric);
        assert_eq!(c.classify("alphabet"), Category::Educational);
        assert_eq!(c.classify("zebra"), Category::Animals);
        assert_eq!(c.classify("yacht"), Category::Objects);
        assert_eq!(c.classify("damaged_helmet"), Category::Equipment);
    }

    #[test]
    fn test_classify_ignores_case() {
        let c = StaticClassifier::new();
        for name in ["Cat", "cat", "CAT", "cAt"] {
            assert_eq!(c.classify(name), Category::Animals, "{name}");
        }
        assert_eq!(c.describe("Cat"), c.describe("CAT"));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let c = StaticClassifier::new();
        assert_eq!(c.classify("spaceship"), Category::General);
        assert_eq!(c.describe("spaceship"), FALLBACK_DESCRIPTION);
        assert_eq!(c.describe("spaceship"), "A 3D model for AR viewing and interaction.");
    }

    #[test]
    fn test_exact_match_only() {
        let c = StaticClassifier::new();
        assert_eq!(c.classify("helmet"), Category::General);
        assert_eq!(c.classify("damaged"), Category::General);
        assert_eq!(c.classify("cubes"), Category::General);
        assert_eq!(c.describe("helmet"), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_every_category_name_has_description() {
        let c = StaticClassifier::new();
        for (_, names) in CATEGORY_TABLE {
            for name in *names {
                assert_ne!(c.describe(name), FALLBACK_DESCRIPTION, "{name}");
            }
        }
        assert_eq!(DESCRIPTIONS.len(), 32);
    }

    #[test]
    fn test_category_display_matches_serde() {
        for category in [
            Category::Geometric,
            Category::Educational,
            Category::Animals,
            Category::Objects,
            Category::Equipment,
            Category::General,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
