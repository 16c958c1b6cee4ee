use crate::room::CatalogItem;

/// Footprint of a fixed wall element before it is attached to a wall
#[derive(Debug, Clone, PartialEq)]
pub struct FixedElementTemplate {
    pub name: &'static str,
    pub width: f64,
    pub length: f64,
}

/// Common furniture with typical dimensions (width x length, in meters)
pub fn furniture_templates() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("Bed", 1.5, 2.0),
        CatalogItem::new("Sofa", 0.9, 2.2),
        CatalogItem::new("Table", 0.8, 1.2),
        CatalogItem::new("Chair", 0.5, 0.5),
        CatalogItem::new("Dresser", 0.5, 1.2),
        CatalogItem::new("Desk", 0.7, 1.4),
        CatalogItem::new("TV Stand", 0.4, 1.5),
        CatalogItem::new("Bookshelf", 0.4, 0.8),
    ]
}

pub fn fixed_element_templates() -> Vec<FixedElementTemplate> {
    vec![
        FixedElementTemplate {
            name: "Door",
            width: 0.2,
            length: 0.9,
        },
        FixedElementTemplate {
            name: "Window",
            width: 0.1,
            length: 1.2,
        },
    ]
}
