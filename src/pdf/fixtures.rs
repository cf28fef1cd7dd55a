//! In-memory PDFs for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

struct PageSpec {
    media_box: Vec<Object>,
    content: Vec<u8>,
    resources: Option<ObjectId>,
    rotate: Option<i64>,
}

fn content(operations: Vec<Operation>) -> Vec<u8> {
    Content { operations }.encode().unwrap()
}

fn red_square() -> Vec<u8> {
    content(vec![
        Operation::new("q", vec![]),
        Operation::new("rg", vec![1.into(), 0.into(), 0.into()]),
        Operation::new("re", vec![0.into(), 0.into(), 10.into(), 10.into()]),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ])
}

/// Stretch `/Im0` over a 20x10 area at the origin.
fn draw_image() -> Vec<u8> {
    content(vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![20.into(), 0.into(), 0.into(), 10.into(), 0.into(), 0.into()],
        ),
        Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
        Operation::new("Q", vec![]),
    ])
}

fn media_box(width: i64, height: i64) -> Vec<Object> {
    vec![0.into(), 0.into(), width.into(), height.into()]
}

fn numbered_page(n: u32) -> PageSpec {
    PageSpec {
        media_box: media_box(100 + i64::from(n), 200),
        content: red_square(),
        resources: None,
        rotate: None,
    }
}

/// Assemble a document. Pages without their own resources inherit a shared
/// font dictionary from the page tree root.
fn build(pages: impl FnOnce(&mut Document) -> Vec<PageSpec>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let shared_resources = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for spec in pages(&mut doc) {
        let content_id = doc.add_object(Stream::new(dictionary! {}, spec.content));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => spec.media_box,
            "Contents" => content_id,
        };
        if let Some(resources) = spec.resources {
            page.set("Resources", resources);
        }
        if let Some(rotate) = spec.rotate {
            page.set("Rotate", rotate);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => shared_resources,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn image_resources(doc: &mut Document, image: Stream) -> ObjectId {
    let image_id = doc.add_object(image);
    doc.add_object(dictionary! {
        "XObject" => dictionary! { "Im0" => image_id },
    })
}

/// `pages` pages; page `n` is `(100 + n) x 200` points with a red 10x10
/// square in its bottom-left corner.
pub fn numbered_pdf(pages: u32) -> Vec<u8> {
    build(|_| (1..=pages).map(numbered_page).collect())
}

/// Read back the page numbers encoded by [`numbered_pdf`], in page order.
pub fn page_numbers(bytes: &[u8]) -> Vec<u32> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let media_box = doc
                .get_dictionary(id)
                .unwrap()
                .get(b"MediaBox")
                .unwrap()
                .as_array()
                .unwrap();
            (media_box[2].as_i64().unwrap() - 100) as u32
        })
        .collect()
}

/// One 20x10 page showing a 2x1 image: red on the left, blue on the right.
pub fn image_pdf() -> Vec<u8> {
    build(|doc| {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![255, 0, 0, 0, 0, 255],
        );
        let resources = image_resources(doc, image);
        vec![PageSpec {
            media_box: media_box(20, 10),
            content: draw_image(),
            resources: Some(resources),
            rotate: None,
        }]
    })
}

/// One 20x10 page rotated by 90 degrees.
pub fn rotated_pdf() -> Vec<u8> {
    build(|_| {
        vec![PageSpec {
            media_box: media_box(20, 10),
            content: red_square(),
            resources: None,
            rotate: Some(90),
        }]
    })
}

/// Like [`numbered_pdf`], but page `oversized` is 40000 points wide, too
/// large to rasterize at any usable scale.
pub fn oversized_page_pdf(pages: u32, oversized: u32) -> Vec<u8> {
    build(|_| {
        (1..=pages)
            .map(|n| {
                if n == oversized {
                    PageSpec {
                        media_box: media_box(40_000, 200),
                        ..numbered_page(n)
                    }
                } else {
                    numbered_page(n)
                }
            })
            .collect()
    })
}

/// One 200x200 page with a line of Helvetica text and a thick diagonal
/// stroke.
pub fn text_pdf() -> Vec<u8> {
    build(|_| {
        vec![PageSpec {
            media_box: media_box(200, 200),
            content: content(vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 72.into()]),
                Operation::new("Td", vec![10.into(), 80.into()]),
                Operation::new("Tj", vec![Object::string_literal("HELLO")]),
                Operation::new("ET", vec![]),
                Operation::new("w", vec![5.into()]),
                Operation::new("m", vec![0.into(), 0.into()]),
                Operation::new("l", vec![200.into(), 200.into()]),
                Operation::new("S", vec![]),
            ]),
            resources: None,
            rotate: None,
        }]
    })
}
