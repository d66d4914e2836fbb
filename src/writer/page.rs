//! Pages under construction.
//!
//! A [`Page`] collects its content stream, the resources that stream names
//! and its link annotations. Pages get object ids only at output, once the
//! font objects they reference exist.

use indexmap::IndexMap;

use super::content_stream::ContentStreamBuilder;
use super::object_serializer::ObjectSerializer as Obj;
use crate::geometry::Rect;
use crate::object::Object;

/// Kinds of page resources registered by object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Image XObjects (`/XObject`)
    XObject,
    /// Graphics state dictionaries (`/ExtGState`)
    ExtGState,
    /// Shading dictionaries (`/Shading`)
    Shading,
}

impl ResourceKind {
    /// Key of the resource category in `/Resources`.
    pub fn pdf_key(&self) -> &'static str {
        match self {
            ResourceKind::XObject => "XObject",
            ResourceKind::ExtGState => "ExtGState",
            ResourceKind::Shading => "Shading",
        }
    }
}

/// Resources named by a page's content stream.
#[derive(Debug, Clone, Default)]
pub struct PageResources {
    /// Font label (`F1`) -> font alias
    pub fonts: IndexMap<String, String>,
    /// Label -> object id, per category
    pub objects: IndexMap<ResourceKind, IndexMap<String, u32>>,
}

impl PageResources {
    /// Record a font used on this page.
    pub fn add_font(&mut self, label: &str, alias: &str) {
        if !self.fonts.contains_key(label) {
            self.fonts.insert(label.to_string(), alias.to_string());
        }
    }

    /// Record a resource object used on this page.
    pub fn add_object(&mut self, kind: ResourceKind, label: &str, object_id: u32) {
        self.objects
            .entry(kind)
            .or_default()
            .insert(label.to_string(), object_id);
    }

    /// Build the `/Resources` dictionary, resolving font aliases through
    /// `font_ids`. Fonts without an id are left out.
    pub fn to_object(&self, font_ids: &IndexMap<String, u32>) -> Object {
        let mut entries = Vec::new();

        let fonts: Vec<(&str, Object)> = self
            .fonts
            .iter()
            .filter_map(|(label, alias)| {
                font_ids
                    .get(alias)
                    .map(|&id| (label.as_str(), Obj::reference(id)))
            })
            .collect();
        if !fonts.is_empty() {
            entries.push(("Font", Obj::dict(fonts)));
        }

        for (kind, labels) in &self.objects {
            let dict = labels
                .iter()
                .map(|(label, &id)| (label.as_str(), Obj::reference(id)))
                .collect();
            entries.push((kind.pdf_key(), Obj::dict(dict)));
        }

        entries.push((
            "ProcSet",
            Obj::array(vec![Obj::name("PDF"), Obj::name("Text"), Obj::name("ImageC")]),
        ));
        Obj::dict(entries)
    }
}

/// A `/Link` annotation opening a URI.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// Clickable area
    pub rect: Rect,
    /// Target URI
    pub uri: String,
}

impl LinkAnnotation {
    /// Create a URI link.
    pub fn uri(rect: Rect, uri: impl Into<String>) -> Self {
        Self {
            rect,
            uri: uri.into(),
        }
    }

    /// Annotation dictionary with an invisible border.
    pub fn to_object(&self) -> Object {
        let [llx, lly, urx, ury] = self.rect.to_pdf_array();
        Obj::dict(vec![
            ("Type", Obj::name("Annot")),
            ("Subtype", Obj::name("Link")),
            ("Rect", Obj::rect(llx as f64, lly as f64, urx as f64, ury as f64)),
            (
                "Border",
                Obj::array(vec![Obj::integer(0), Obj::integer(0), Obj::integer(0)]),
            ),
            (
                "A",
                Obj::dict(vec![("S", Obj::name("URI")), ("URI", Obj::string(&self.uri))]),
            ),
        ])
    }
}

/// One page under construction.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Page content
    pub content: ContentStreamBuilder,
    /// Resources the content names
    pub resources: PageResources,
    /// Hyperlinks
    pub annotations: Vec<LinkAnnotation>,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything was drawn on the page.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Every page of the document plus the one being written.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pages: Vec<Page>,
    current: usize,
}

impl PageSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page exists yet.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append a page and make it current. Returns its index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::new());
        self.current = self.pages.len() - 1;
        self.current
    }

    /// Move to the page after the current one, appending it when the
    /// current page is the last. Returns its index.
    pub fn next_page(&mut self) -> usize {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            self.current
        } else {
            self.add_page()
        }
    }

    /// Index of the current page.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Make an existing page current.
    pub fn set_current(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = index;
        }
    }

    /// The current page, creating the first one if needed.
    pub fn current_mut(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.add_page();
        }
        let index = self.current;
        &mut self.pages[index]
    }

    /// Page at `index`.
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Mutable page at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// All pages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    #[test]
    fn test_page_set_lazy_first_page() {
        let mut pages = PageSet::new();
        assert!(pages.is_empty());
        pages.current_mut().content.fill();
        assert_eq!(pages.len(), 1);
        assert!(pages.get(0).unwrap().has_content());

        assert_eq!(pages.add_page(), 1);
        assert_eq!(pages.current_index(), 1);
        pages.set_current(7);
        assert_eq!(pages.current_index(), 1);
    }

    #[test]
    fn test_next_page_reuses_following_page() {
        let mut pages = PageSet::new();
        pages.add_page();
        pages.add_page();
        pages.set_current(0);
        assert_eq!(pages.next_page(), 1);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.next_page(), 2);
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_resources_dictionary() {
        let mut resources = PageResources::default();
        resources.add_font("F1", "body");
        resources.add_font("F2", "unused");
        resources.add_object(ResourceKind::XObject, "Im1", 9);

        let mut font_ids = IndexMap::new();
        font_ids.insert("body".to_string(), 4);
        let text = ObjectSerializer::serialize_to_string(&resources.to_object(&font_ids));

        assert!(text.contains("/Font <</F1 4 0 R>>"));
        assert!(!text.contains("/F2"));
        assert!(text.contains("/XObject <</Im1 9 0 R>>"));
    }

    #[test]
    fn test_link_annotation_dictionary() {
        let link = LinkAnnotation::uri(Rect::new(10.0, 20.0, 30.0, 12.0), "https://example.com");
        let text = ObjectSerializer::serialize_to_string(&link.to_object());
        assert!(text.contains("/Subtype /Link"));
        assert!(text.contains("/Rect [10 20 40 32]"));
        assert!(text.contains("/A <</S /URI /URI (https://example.com)>>"));
    }
}
