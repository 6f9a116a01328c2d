//! Real PDF documents built in memory for tests.

use lopdf::{dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream};

/// Text drawn on the single page of every fixture.
pub(crate) const PAGE_TEXT: &str = "Quarterly figures";

fn one_page_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content = format!("BT /F1 12 Tf 72 720 Td ({PAGE_TEXT}) Tj ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::string_literal("pdf-unlock-fixture"),
            Object::string_literal("pdf-unlock-fixture"),
        ]),
    );
    doc
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// An unprotected one-page document.
pub(crate) fn plain_pdf() -> Vec<u8> {
    save(&mut one_page_document())
}

/// A one-page document protected with RC4 128-bit.
pub(crate) fn encrypted_pdf(user_password: &str, owner_password: &str) -> Vec<u8> {
    let mut doc = one_page_document();
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password,
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();
    save(&mut doc)
}

/// Text of the first page of `bytes`, which must not be encrypted.
pub(crate) fn first_page_text(bytes: &[u8]) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    assert!(!doc.is_encrypted());
    let page_id = *doc.get_pages().values().next().unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}
