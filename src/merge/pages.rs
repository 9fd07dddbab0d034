//! Copying pages between documents.
//!
//! [`TargetDocument`] starts empty and accumulates the pages of every
//! appended source in the source's native order. Attributes a page inherits
//! from its page-tree ancestors are written onto the page itself before it
//! is re-parented, since the source's intermediate tree nodes are not kept.

use lopdf::{Document, Object, ObjectId, dictionary};

/// Page attributes that may be inherited from ancestor page-tree nodes.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// An output document under construction.
pub struct TargetDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl TargetDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append every page of `source`, in order.
    ///
    /// Returns the number of pages copied.
    ///
    /// # Errors
    ///
    /// Returns an error if the source's page tree is structurally broken.
    pub fn append(&mut self, mut source: Document) -> lopdf::Result<usize> {
        // Move the source's ids past ours so both can share one object table.
        source.renumber_objects_with(self.doc.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

        for &page_id in &page_ids {
            let inherited = inherited_attributes(&source, page_id)?;
            let page = source.get_object_mut(page_id)?.as_dict_mut()?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(self.pages_id));
        }

        // The source catalog must not survive as a second root.
        if let Ok(root_id) = source.trailer.get(b"Root").and_then(Object::as_reference) {
            source.objects.remove(&root_id);
        }

        if source.version > self.doc.version {
            self.doc.version = source.version.clone();
        }

        self.doc.max_id = self.doc.max_id.max(source.max_id);
        self.doc.objects.extend(source.objects);
        self.kids.extend_from_slice(&page_ids);

        Ok(page_ids.len())
    }

    /// Build the page tree and catalog and return the finished document.
    ///
    /// Objects no longer reachable from the new catalog (old page-tree
    /// nodes, source info dictionaries) are pruned.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let kids: Vec<Object> = self.kids.into_iter().map(Object::Reference).collect();

        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => Object::Name(b"Pages".to_vec()),
                "Kids" => Object::Array(kids),
                "Count" => Object::Integer(count),
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(self.pages_id),
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        self.doc.prune_objects();
        self.doc.renumber_objects();

        self.doc
    }
}

impl Default for TargetDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Inherited attributes the page does not define itself, resolved from the
/// nearest ancestor that does.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
) -> lopdf::Result<Vec<(&'static [u8], Object)>> {
    let page = doc.get_dictionary(page_id)?;

    let mut missing: Vec<&'static [u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }

        let node = doc.get_dictionary(node_id)?;
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(found)
}
