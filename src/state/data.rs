/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the network layer and the UI layer.
use serde::Deserialize;

/// A single catalog entry, as served by the collection endpoint.
///
/// Items are created server-side when an upload lands; the client never
/// mutates or deletes them, it only holds the latest snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClothingItem {
    /// Unique server-assigned ID
    pub id: i64,
    /// Storage-relative file name (opaque to the client)
    pub filename: String,
    /// Fully resolved image location
    pub url: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub color_base: Option<String>,
    pub formality: Option<String>,
    pub season: Option<String>,
}

impl ClothingItem {
    /// Classification attributes joined for display, e.g. "tops / blue".
    /// `None` when the item carries no attributes at all.
    pub fn classification(&self) -> Option<String> {
        let attributes: Vec<&str> = [
            &self.category,
            &self.subcategory,
            &self.color_base,
            &self.formality,
            &self.season,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();

        if attributes.is_empty() {
            None
        } else {
            Some(attributes.join(" / "))
        }
    }
}

/// The client's view of the desired filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogQuery {
    /// Active category constraint. `None` means unconstrained, never
    /// "category is the empty string".
    pub category: Option<String>,
    /// Free-text substring filter
    pub search: String,
}

impl CatalogQuery {
    /// Query parameters for the collection endpoint.
    ///
    /// An absent category and an empty search term are omitted entirely
    /// rather than sent as empty strings.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        params
    }
}

/// One cell of the two-column gallery.
///
/// Fillers are a distinct variant so a padding cell can never be mistaken
/// for a real item by inspecting its fields.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryCell {
    Item(ClothingItem),
    Filler,
}

/// Derive the render-ready cell sequence from an item snapshot.
///
/// Appends exactly one `Filler` when the item count is odd, so the last
/// grid row always spans both columns. Depends only on `items.len()`.
pub fn pad_gallery(items: &[ClothingItem]) -> Vec<GalleryCell> {
    let mut cells: Vec<GalleryCell> = items.iter().cloned().map(GalleryCell::Item).collect();
    if items.len() % 2 == 1 {
        cells.push(GalleryCell::Filler);
    }
    cells
}

/// Response body of the ingestion endpoint. Extra fields are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// Where the stored image can be fetched from
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> ClothingItem {
        ClothingItem {
            id,
            filename: format!("{id}.jpg"),
            url: format!("https://closet.example/uploads/{id}.jpg"),
            category: None,
            subcategory: None,
            color_base: None,
            formality: None,
            season: None,
        }
    }

    #[test]
    fn test_even_count_is_not_padded() {
        let items = [item(1), item(2), item(3), item(4)];
        let cells = pad_gallery(&items);

        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|cell| matches!(cell, GalleryCell::Item(_))));
    }

    #[test]
    fn test_odd_count_gains_exactly_one_filler() {
        let items = [item(1), item(2), item(3)];
        let cells = pad_gallery(&items);

        assert_eq!(cells.len(), 4);
        assert_eq!(cells.last(), Some(&GalleryCell::Filler));

        let fillers = cells
            .iter()
            .filter(|cell| matches!(cell, GalleryCell::Filler))
            .count();
        assert_eq!(fillers, 1);
    }

    #[test]
    fn test_empty_catalog_stays_empty() {
        assert!(pad_gallery(&[]).is_empty());
    }

    #[test]
    fn test_filler_is_detected_by_variant_not_by_fields() {
        // An item with an empty URL is still an item, never a filler.
        let mut blank = item(7);
        blank.url = String::new();

        let cells = pad_gallery(&[blank.clone()]);
        assert_eq!(cells[0], GalleryCell::Item(blank));
        assert_eq!(cells[1], GalleryCell::Filler);
    }

    #[test]
    fn test_absent_category_and_empty_search_are_omitted() {
        assert!(CatalogQuery::default().params().is_empty());
    }

    #[test]
    fn test_params_carry_the_active_constraints() {
        let query = CatalogQuery {
            category: Some("tops".to_string()),
            search: "linen".to_string(),
        };

        assert_eq!(
            query.params(),
            vec![
                ("category", "tops".to_string()),
                ("search", "linen".to_string()),
            ]
        );
    }

    #[test]
    fn test_classification_joins_the_present_attributes() {
        let mut shirt = item(1);
        shirt.category = Some("tops".to_string());
        shirt.color_base = Some("blue".to_string());

        assert_eq!(shirt.classification().as_deref(), Some("tops / blue"));
    }

    #[test]
    fn test_classification_is_absent_for_unclassified_items() {
        assert_eq!(item(1).classification(), None);
    }

    #[test]
    fn test_item_decodes_without_classification_attributes() {
        let json = r#"{"id": 3, "filename": "a.jpg", "url": "https://x/a.jpg"}"#;
        let decoded: ClothingItem = serde_json::from_str(json).unwrap();

        assert_eq!(decoded.id, 3);
        assert_eq!(decoded.category, None);
        assert_eq!(decoded.season, None);
    }

    #[test]
    fn test_receipt_tolerates_extra_fields() {
        let json = r#"{"url": "https://x/y.jpg", "category": "shirt"}"#;
        let receipt: UploadReceipt = serde_json::from_str(json).unwrap();

        assert_eq!(receipt.url, "https://x/y.jpg");
    }
}
