//! Class catalog loaded from an `id,name` text file.

use std::collections::BTreeMap;
use std::path::Path;

use crate::format::FormatError;

/// Display colors (RGB) for the first ten class ids. Larger ids wrap around.
const CLASS_PALETTE: [[u8; 3]; 10] = [
    [0, 255, 0],
    [0, 0, 255],
    [255, 0, 0],
    [0, 255, 255],
    [255, 0, 255],
    [255, 255, 0],
    [0, 0, 128],
    [0, 128, 0],
    [128, 0, 0],
    [0, 128, 128],
];

/// An annotation class with a name and color.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Class id written to label files
    pub id: u32,
    /// Display name of the class
    pub name: String,
    /// RGB color used for overlays
    pub color: [u8; 3],
}

impl Category {
    /// Create a category with the palette color for its id.
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: class_color(id),
        }
    }
}

/// Palette color for a class id.
pub fn class_color(id: u32) -> [u8; 3] {
    CLASS_PALETTE[id as usize % CLASS_PALETTE.len()]
}

/// Read-only mapping from class id to category, ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCatalog {
    classes: BTreeMap<u32, Category>,
}

impl ClassCatalog {
    /// Build a catalog from `(id, name)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (u32, &'a str)>) -> Self {
        let classes = pairs
            .into_iter()
            .map(|(id, name)| (id, Category::new(id, name)))
            .collect();
        Self { classes }
    }

    /// Parse catalog text: one `id,name` per line, `#` comments and blank lines ignored.
    pub fn parse(content: &str) -> Result<Self, FormatError> {
        let mut classes = BTreeMap::new();

        for (line_no, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, name) = line.split_once(',').ok_or_else(|| {
                FormatError::invalid_format(format!(
                    "class catalog line {}: expected 'id,name', got '{}'",
                    line_no + 1,
                    line
                ))
            })?;
            let name = name.trim();
            if name.is_empty() || name.contains(',') {
                return Err(FormatError::invalid_format(format!(
                    "class catalog line {}: bad class name '{}'",
                    line_no + 1,
                    name
                )));
            }
            let id: u32 = id.trim().parse().map_err(|_| {
                FormatError::invalid_format(format!(
                    "class catalog line {}: '{}' is not a class id",
                    line_no + 1,
                    id.trim()
                ))
            })?;

            classes.insert(id, Category::new(id, name));
        }

        if classes.is_empty() {
            return Err(FormatError::invalid_format("class catalog has no entries"));
        }

        Ok(Self { classes })
    }

    /// Load and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&content)?;
        log::info!("Loaded {} classes from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn get(&self, id: u32) -> Option<&Category> {
        self.classes.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.classes.contains_key(&id)
    }

    /// Display name for an id, or "Unknown".
    pub fn name(&self, id: u32) -> &str {
        self.classes.get(&id).map_or("Unknown", |c| c.name.as_str())
    }

    /// Lowest class id, used as the initial selection.
    pub fn first_id(&self) -> Option<u32> {
        self.classes.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let text = "# id,name\n0,normal\n\n1, scratch \n2,dent\n";
        let catalog = ClassCatalog::parse(text).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.name(1), "scratch");
        assert_eq!(catalog.name(7), "Unknown");
        assert_eq!(catalog.first_id(), Some(0));
    }

    #[test]
    fn test_parse_catalog_rejects_bad_lines() {
        assert!(ClassCatalog::parse("0 normal\n").is_err());
        assert!(ClassCatalog::parse("x,normal\n").is_err());
        assert!(ClassCatalog::parse("0,a,b\n").is_err());
        assert!(ClassCatalog::parse("# only comments\n").is_err());
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(class_color(0), [0, 255, 0]);
        assert_eq!(class_color(10), class_color(0));
        assert_ne!(class_color(1), class_color(2));
    }
}
